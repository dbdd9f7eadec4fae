//! Per-role visual styling
//!
//! A [`StyleSpec`] is a pure function of the line role, its script and the
//! configuration. Font selection goes through the [`FontBook`] so a missing
//! Arabic font silently degrades to Helvetica.

use crate::classify::LineRole;
use crate::fonts::{FontBook, FontFace};
use crate::options::GuideConfig;
use crate::types::{Anchor, RgbColor, ScriptKind};

/// Decoration drawn behind or beside a line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoration {
    None,
    /// Vertical accent bar at the anchor side
    AccentBar(RgbColor),
    /// Filled circle at the anchor side
    BulletDot(RgbColor),
    /// Rounded box behind all wrapped sub-lines
    Box(RgbColor),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleSpec {
    pub face: FontFace,
    pub size_pt: f32,
    pub color: RgbColor,
    pub decoration: Decoration,
    pub anchor: Anchor,
    /// Offset from the anchor margin toward the page centre
    pub indent_mm: f32,
    /// Vertical advance per wrapped sub-line
    pub line_height_mm: f32,
    /// Extra space after the last sub-line
    pub space_after_mm: f32,
}

impl StyleSpec {
    /// Text column width after indentation
    pub fn max_width_mm(&self, config: &GuideConfig) -> f32 {
        config.geometry.column_width_mm() - self.indent_mm
    }
}

/// Resolve the style of a content line
pub fn resolve_style(
    role: LineRole,
    script: ScriptKind,
    config: &GuideConfig,
    fonts: &FontBook,
) -> StyleSpec {
    let palette = &config.palette;
    let sizes = &config.font_sizes;
    let base = config.geometry.line_height_mm;

    let (bold, size_pt, color, decoration, indent_mm, space_after_mm) = match role {
        LineRole::Title => (true, sizes.title, palette.navy, Decoration::None, 0.0, base * 0.5),
        LineRole::NumberedSection(index) => {
            let accent = section_color(config, index);
            (
                true,
                sizes.section,
                accent,
                Decoration::AccentBar(accent),
                4.0,
                base * 0.25,
            )
        }
        LineRole::Bullet => (
            false,
            sizes.body,
            palette.plain,
            Decoration::BulletDot(palette.navy),
            6.0,
            0.0,
        ),
        LineRole::Alert => (
            true,
            sizes.body,
            palette.alert_text,
            Decoration::Box(palette.alert_fill),
            3.0,
            base * 0.5,
        ),
        LineRole::Question => (true, sizes.body, palette.question, Decoration::None, 0.0, 0.0),
        LineRole::Answer => (false, sizes.body, palette.answer, Decoration::None, 5.0, base * 0.25),
        LineRole::Plain | LineRole::Spacer => {
            (false, sizes.body, palette.plain, Decoration::None, 0.0, 0.0)
        }
    };

    StyleSpec {
        face: fonts.face(script, bold),
        size_pt,
        color,
        decoration,
        anchor: script.anchor(),
        indent_mm,
        line_height_mm: base * config.line_scale(size_pt),
        space_after_mm,
    }
}

/// Accent colour of section `index`; indices outside `1..=4` wrap around
pub fn section_color(config: &GuideConfig, index: u8) -> RgbColor {
    let slot = (index.max(1) as usize - 1) % config.palette.sections.len();
    config.palette.sections[slot]
}
