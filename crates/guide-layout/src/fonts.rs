//! Font assets, registration and text measurement
//!
//! Fonts arrive through a [`FontSource`] capability so layout code never
//! touches the network or the disk itself. The Arabic-capable assets are
//! optional: when they are missing every role falls back to Helvetica.

use crate::constants::{HELVETICA_BOLD_CHAR_WIDTH_RATIO, HELVETICA_CHAR_WIDTH_RATIO, pt_to_mm};
use crate::types::{GuideError, Result, ScriptKind};
use printpdf::ParsedFont;

/// The two Arabic-capable font files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontAsset {
    Regular,
    Bold,
}

impl FontAsset {
    pub fn file_name(&self) -> &'static str {
        match self {
            FontAsset::Regular => "Amiri-Regular.ttf",
            FontAsset::Bold => "Amiri-Bold.ttf",
        }
    }
}

/// Supplies raw TrueType bytes for a font asset
pub trait FontSource {
    fn load(&self, asset: FontAsset) -> Result<Vec<u8>>;
}

/// A source that never has any font; renders use Helvetica only
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFonts;

impl FontSource for NoFonts {
    fn load(&self, asset: FontAsset) -> Result<Vec<u8>> {
        Err(GuideError::Font(format!(
            "{} unavailable: no font source",
            asset.file_name()
        )))
    }
}

/// Font bytes already held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryFonts {
    pub regular: Option<Vec<u8>>,
    pub bold: Option<Vec<u8>>,
}

impl FontSource for MemoryFonts {
    fn load(&self, asset: FontAsset) -> Result<Vec<u8>> {
        let bytes = match asset {
            FontAsset::Regular => self.regular.as_ref(),
            FontAsset::Bold => self.bold.as_ref(),
        };
        bytes
            .cloned()
            .ok_or_else(|| GuideError::Font(format!("{} not loaded", asset.file_name())))
    }
}

/// Concrete font a run of text is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
    ArabicRegular,
    ArabicBold,
}

impl FontFace {
    pub fn is_bold(self) -> bool {
        matches!(self, FontFace::HelveticaBold | FontFace::ArabicBold)
    }
}

/// Fonts registered for one render
pub struct FontBook {
    regular: Option<ParsedFont>,
    bold: Option<ParsedFont>,
}

impl FontBook {
    /// Book without Arabic fonts
    pub fn empty() -> Self {
        Self {
            regular: None,
            bold: None,
        }
    }

    /// Load and parse both assets. Failures degrade, they never abort.
    pub fn register(source: &dyn FontSource) -> Self {
        let regular = parse_asset(source, FontAsset::Regular);
        let bold = if regular.is_some() {
            parse_asset(source, FontAsset::Bold)
        } else {
            None
        };

        if regular.is_none() {
            log::warn!("Arabic font unavailable, using Helvetica for all roles");
        } else if bold.is_none() {
            log::warn!("Bold Arabic font unavailable, using the regular weight");
        }

        Self { regular, bold }
    }

    pub fn has_arabic(&self) -> bool {
        self.regular.is_some()
    }

    pub fn has_arabic_bold(&self) -> bool {
        self.bold.is_some()
    }

    /// Pick the face for a script and weight
    pub fn face(&self, script: ScriptKind, bold: bool) -> FontFace {
        match (script, self.has_arabic()) {
            (ScriptKind::Arabic, true) if bold && self.has_arabic_bold() => FontFace::ArabicBold,
            (ScriptKind::Arabic, true) => FontFace::ArabicRegular,
            _ if bold => FontFace::HelveticaBold,
            _ => FontFace::Helvetica,
        }
    }

    pub fn parsed(&self, face: FontFace) -> Option<&ParsedFont> {
        match face {
            FontFace::ArabicRegular => self.regular.as_ref(),
            FontFace::ArabicBold => self.bold.as_ref(),
            FontFace::Helvetica | FontFace::HelveticaBold => None,
        }
    }

    /// Width of `text` in millimeters when drawn with `face` at `size_pt`
    pub fn measure_mm(&self, text: &str, face: FontFace, size_pt: f32) -> f32 {
        let width_pt = match self.parsed(face) {
            Some(font) => {
                let units_per_em = font.font_metrics.units_per_em as f32;
                text.chars()
                    .map(|ch| match advance_units(font, ch) {
                        Some(advance) => advance / units_per_em * size_pt,
                        None => HELVETICA_CHAR_WIDTH_RATIO * size_pt,
                    })
                    .sum()
            }
            None => {
                let ratio = if face.is_bold() {
                    HELVETICA_BOLD_CHAR_WIDTH_RATIO
                } else {
                    HELVETICA_CHAR_WIDTH_RATIO
                };
                text.chars().count() as f32 * ratio * size_pt
            }
        };
        pt_to_mm(width_pt)
    }
}

/// Advance of `ch` in font units, `None` when the font has no glyph for it
fn advance_units(font: &ParsedFont, ch: char) -> Option<f32> {
    let glyph_id = font.lookup_glyph_index(ch as u32)?;
    match font.get_glyph_size(glyph_id) {
        Some((advance, _)) => Some(advance as f32),
        // Glyphs without an outline are not decoded, the space among them
        None if ch.is_whitespace() => font.get_space_width().map(|width| width as f32),
        None => Some(0.0),
    }
}

fn parse_asset(source: &dyn FontSource, asset: FontAsset) -> Option<ParsedFont> {
    let bytes = match source.load(asset) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("{}", err);
            return None;
        }
    };

    let mut warnings = Vec::new();
    let font = ParsedFont::from_bytes(&bytes, 0, &mut warnings);
    if font.is_none() {
        log::warn!("Failed to parse font {}", asset.file_name());
    } else {
        log::debug!(
            "Registered {} ({} parser warnings)",
            asset.file_name(),
            warnings.len()
        );
    }
    font
}

#[cfg(test)]
mod tests {
    use super::*;

    // DejaVu Sans: 2048 units per em, covers Arabic
    const REGULAR_TTF: &[u8] = include_bytes!("../tests/fonts/DejaVuSans.ttf");
    const BOLD_TTF: &[u8] = include_bytes!("../tests/fonts/DejaVuSans-Bold.ttf");

    fn dejavu(bold: bool) -> FontBook {
        FontBook::register(&MemoryFonts {
            regular: Some(REGULAR_TTF.to_vec()),
            bold: bold.then(|| BOLD_TTF.to_vec()),
        })
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}mm, got {actual}mm"
        );
    }

    #[test]
    fn test_no_fonts_falls_back_to_helvetica() {
        let book = FontBook::register(&NoFonts);
        assert!(!book.has_arabic());
        assert_eq!(book.face(ScriptKind::Arabic, true), FontFace::HelveticaBold);
        assert_eq!(book.face(ScriptKind::Arabic, false), FontFace::Helvetica);
        assert_eq!(book.face(ScriptKind::Latin, true), FontFace::HelveticaBold);
    }

    #[test]
    fn test_unparseable_bytes_degrade_silently() {
        let source = MemoryFonts {
            regular: Some(b"not a font".to_vec()),
            bold: None,
        };
        let book = FontBook::register(&source);
        assert!(!book.has_arabic());
    }

    #[test]
    fn test_memory_fonts_report_missing_asset() {
        let source = MemoryFonts::default();
        assert!(matches!(
            source.load(FontAsset::Bold),
            Err(GuideError::Font(_))
        ));
    }

    #[test]
    fn test_helvetica_measure_is_additive() {
        let book = FontBook::empty();
        let a = book.measure_mm("abc", FontFace::Helvetica, 10.0);
        let b = book.measure_mm("de", FontFace::Helvetica, 10.0);
        let ab = book.measure_mm("abcde", FontFace::Helvetica, 10.0);
        assert!((a + b - ab).abs() < 1e-4);
        assert!(
            book.measure_mm("abc", FontFace::HelveticaBold, 10.0)
                > book.measure_mm("abc", FontFace::Helvetica, 10.0)
        );
    }

    #[test]
    fn test_both_assets_select_arabic_bold() {
        let book = dejavu(true);
        assert!(book.has_arabic());
        assert!(book.has_arabic_bold());
        assert_eq!(book.face(ScriptKind::Arabic, true), FontFace::ArabicBold);
        assert_eq!(book.face(ScriptKind::Arabic, false), FontFace::ArabicRegular);
        assert_eq!(book.face(ScriptKind::Latin, true), FontFace::HelveticaBold);
        assert!(book.parsed(FontFace::ArabicBold).is_some());
    }

    #[test]
    fn test_regular_only_bold_drops_to_regular() {
        let book = dejavu(false);
        assert!(book.has_arabic());
        assert!(!book.has_arabic_bold());
        assert_eq!(book.face(ScriptKind::Arabic, true), FontFace::ArabicRegular);
        assert!(book.parsed(FontFace::ArabicBold).is_none());
    }

    #[test]
    fn test_bold_ignored_without_regular() {
        let book = FontBook::register(&MemoryFonts {
            regular: None,
            bold: Some(BOLD_TTF.to_vec()),
        });
        assert!(!book.has_arabic_bold());
        assert_eq!(book.face(ScriptKind::Arabic, true), FontFace::HelveticaBold);
    }

    #[test]
    fn test_parsed_font_measure_scales_by_units_per_em() {
        let book = dejavu(true);
        assert_close(book.measure_mm("Hello", FontFace::ArabicRegular, 10.0), 8.942);
        assert_close(book.measure_mm("Hello", FontFace::ArabicBold, 10.0), 10.187);
        assert_close(
            book.measure_mm("مرحبا بكم", FontFace::ArabicRegular, 10.0),
            20.001,
        );
        assert_close(
            book.measure_mm("مرحبا بكم", FontFace::ArabicBold, 13.0),
            29.257,
        );
    }

    #[test]
    fn test_parsed_font_measures_spaces() {
        let book = dejavu(false);
        assert_close(book.measure_mm(" ", FontFace::ArabicRegular, 10.0), 1.121);
        let words = book.measure_mm("مرحبا", FontFace::ArabicRegular, 10.0)
            + book.measure_mm("بكم", FontFace::ArabicRegular, 10.0);
        let joined = book.measure_mm("مرحبا بكم", FontFace::ArabicRegular, 10.0);
        assert_close(joined - words, 1.121);
    }
}
