//! PDF serialisation and render entry points
//!
//! printpdf 0.8 builds documents from `PdfPage`s holding `Vec<Op>` lists.
//! Marks recorded by the painter use top-down millimeters; PDF user space is
//! bottom-up points, so every coordinate is flipped here.

use crate::canvas::{Canvas, Mark};
use crate::constants::{CIRCLE_SEGMENTS, CORNER_SEGMENTS, mm_to_pt};
use crate::fonts::{FontBook, FontFace, FontSource};
use crate::options::GuideConfig;
use crate::paint::layout_guide;
use crate::shape::{ArabicShaper, Shaper};
use crate::types::{GuideError, Language, Result, RgbColor};
use printpdf::*;
use std::f32::consts::{FRAC_PI_2, PI};
use std::path::Path;

/// A finished document
#[derive(Debug, Clone)]
pub struct RenderedGuide {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Render guide text into PDF bytes
pub fn render_guide(
    text: &str,
    language: Language,
    config: &GuideConfig,
    fonts: &dyn FontSource,
    shaper: &dyn Shaper,
) -> Result<RenderedGuide> {
    config.validate()?;

    let book = FontBook::register(fonts);
    let canvas = layout_guide(text, language, config, &book, shaper);
    let bytes = write_pdf(&canvas, &book, config, language)?;

    log::info!(
        "Rendered {} guide: {} page(s), {} bytes",
        language,
        canvas.page_count(),
        bytes.len()
    );

    Ok(RenderedGuide {
        bytes,
        page_count: canvas.page_count(),
    })
}

/// Render a guide and write it to `output_path`, returning the page count
pub async fn generate_pdf<F>(
    text: &str,
    language: Language,
    config: &GuideConfig,
    fonts: F,
    output_path: impl AsRef<Path>,
) -> Result<usize>
where
    F: FontSource + Send + 'static,
{
    let text = text.to_owned();
    let config = config.clone();
    let output_path = output_path.as_ref().to_owned();

    let rendered = tokio::task::spawn_blocking(move || {
        render_guide(&text, language, &config, &fonts, &ArabicShaper)
    })
    .await??;

    tokio::fs::write(&output_path, &rendered.bytes).await?;

    Ok(rendered.page_count)
}

/// Read guide text from a file
pub async fn load_guide_text(path: impl AsRef<Path>) -> Result<String> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(text)
}

struct FontIds {
    regular: Option<FontId>,
    bold: Option<FontId>,
}

/// Serialise a laid-out canvas
pub fn write_pdf(
    canvas: &Canvas,
    fonts: &FontBook,
    config: &GuideConfig,
    language: Language,
) -> Result<Vec<u8>> {
    let title = format!("{} - {}", config.app_name, language.header_title());
    let mut doc = PdfDocument::new(&title);

    let ids = FontIds {
        regular: fonts
            .parsed(FontFace::ArabicRegular)
            .map(|font| doc.add_font(font)),
        bold: fonts.parsed(FontFace::ArabicBold).map(|font| doc.add_font(font)),
    };

    let g = &config.geometry;
    let page_height_pt = mm_to_pt(g.page_height_mm);

    for page in &canvas.pages {
        let mut ops = Vec::new();
        for mark in &page.marks {
            push_mark_ops(&mut ops, mark, &ids, page_height_pt);
        }
        doc.pages.push(PdfPage::new(
            Mm(g.page_width_mm),
            Mm(g.page_height_mm),
            ops,
        ));
    }

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);

    if !warnings.is_empty() {
        log::debug!("PDF writer reported {} warning(s)", warnings.len());
    }
    if bytes.is_empty() {
        return Err(GuideError::Pdf("PDF writer produced no output".to_string()));
    }

    Ok(bytes)
}

fn push_mark_ops(ops: &mut Vec<Op>, mark: &Mark, ids: &FontIds, page_height_pt: f32) {
    let point = |x_mm: f32, y_mm: f32| Point {
        x: Pt(mm_to_pt(x_mm)),
        y: Pt(page_height_pt - mm_to_pt(y_mm)),
    };

    match mark {
        Mark::Text {
            text,
            x_mm,
            baseline_mm,
            face,
            size_pt,
            color,
            ..
        } => {
            ops.push(Op::SaveGraphicsState);
            ops.push(Op::SetFillColor {
                col: pdf_color(*color),
            });
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: point(*x_mm, *baseline_mm),
            });
            let items = vec![TextItem::Text(text.clone())];
            match external_font(*face, ids) {
                Some(font) => {
                    ops.push(Op::SetFontSize {
                        size: Pt(*size_pt),
                        font: font.clone(),
                    });
                    ops.push(Op::WriteText { items, font });
                }
                None => {
                    ops.push(Op::SetFontSizeBuiltinFont {
                        size: Pt(*size_pt),
                        font: builtin_font(*face),
                    });
                    ops.push(Op::WriteTextBuiltinFont {
                        items,
                        font: builtin_font(*face),
                    });
                }
            }
            ops.push(Op::EndTextSection);
            ops.push(Op::RestoreGraphicsState);
        }
        Mark::Rect {
            x_mm,
            top_mm,
            width_mm,
            height_mm,
            corner_mm,
            fill,
            ..
        } => {
            let outline = rounded_rect_outline(*x_mm, *top_mm, *width_mm, *height_mm, *corner_mm);
            push_filled_polygon(ops, outline.into_iter().map(|(x, y)| point(x, y)), *fill);
        }
        Mark::Circle {
            cx_mm,
            cy_mm,
            radius_mm,
            fill,
            ..
        } => {
            let outline = (0..CIRCLE_SEGMENTS).map(|i| {
                let angle = 2.0 * PI * i as f32 / CIRCLE_SEGMENTS as f32;
                point(
                    cx_mm + radius_mm * angle.cos(),
                    cy_mm + radius_mm * angle.sin(),
                )
            });
            push_filled_polygon(ops, outline, *fill);
        }
        Mark::Rule {
            x1_mm,
            x2_mm,
            y_mm,
            thickness_pt,
            color,
            ..
        } => {
            ops.push(Op::SaveGraphicsState);
            ops.push(Op::SetOutlineColor {
                col: pdf_color(*color),
            });
            ops.push(Op::SetOutlineThickness {
                pt: Pt(*thickness_pt),
            });
            ops.push(Op::DrawLine {
                line: Line {
                    points: vec![
                        LinePoint {
                            p: point(*x1_mm, *y_mm),
                            bezier: false,
                        },
                        LinePoint {
                            p: point(*x2_mm, *y_mm),
                            bezier: false,
                        },
                    ],
                    is_closed: false,
                },
            });
            ops.push(Op::RestoreGraphicsState);
        }
    }
}

fn push_filled_polygon(ops: &mut Vec<Op>, outline: impl Iterator<Item = Point>, fill: RgbColor) {
    let points = outline
        .map(|p| LinePoint { p, bezier: false })
        .collect();

    ops.push(Op::SaveGraphicsState);
    ops.push(Op::SetFillColor {
        col: pdf_color(fill),
    });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing { points }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    });
    ops.push(Op::RestoreGraphicsState);
}

/// Outline of a rectangle in top-down millimeters, clockwise from top-left
fn rounded_rect_outline(x: f32, top: f32, width: f32, height: f32, corner: f32) -> Vec<(f32, f32)> {
    let r = corner.min(width / 2.0).min(height / 2.0).max(0.0);
    if r == 0.0 {
        return vec![
            (x, top),
            (x + width, top),
            (x + width, top + height),
            (x, top + height),
        ];
    }

    // Corner centres with the angle each quarter arc starts at (y grows down)
    let corners = [
        (x + width - r, top + r, -FRAC_PI_2),
        (x + width - r, top + height - r, 0.0),
        (x + r, top + height - r, FRAC_PI_2),
        (x + r, top + r, PI),
    ];

    let mut outline = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (cx, cy, start) in corners {
        for step in 0..=CORNER_SEGMENTS {
            let angle = start + FRAC_PI_2 * step as f32 / CORNER_SEGMENTS as f32;
            outline.push((cx + r * angle.cos(), cy + r * angle.sin()));
        }
    }
    outline
}

fn external_font(face: FontFace, ids: &FontIds) -> Option<FontId> {
    match face {
        FontFace::ArabicRegular => ids.regular.clone(),
        FontFace::ArabicBold => ids.bold.clone().or_else(|| ids.regular.clone()),
        FontFace::Helvetica | FontFace::HelveticaBold => None,
    }
}

fn builtin_font(face: FontFace) -> BuiltinFont {
    if face.is_bold() {
        BuiltinFont::HelveticaBold
    } else {
        BuiltinFont::Helvetica
    }
}

fn pdf_color(color: RgbColor) -> Color {
    Color::Rgb(Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
        icc_profile: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_rect_has_four_corners() {
        let outline = rounded_rect_outline(10.0, 20.0, 30.0, 5.0, 0.0);
        assert_eq!(
            outline,
            vec![(10.0, 20.0), (40.0, 20.0), (40.0, 25.0), (10.0, 25.0)]
        );
    }

    #[test]
    fn test_rounded_rect_stays_inside_bounds() {
        let outline = rounded_rect_outline(10.0, 20.0, 30.0, 8.0, 2.0);
        assert_eq!(outline.len(), 4 * (CORNER_SEGMENTS + 1));
        for (x, y) in outline {
            assert!((10.0 - 1e-4..=40.0 + 1e-4).contains(&x));
            assert!((20.0 - 1e-4..=28.0 + 1e-4).contains(&y));
        }
    }

    #[test]
    fn test_corner_radius_is_clamped() {
        let outline = rounded_rect_outline(0.0, 0.0, 4.0, 2.0, 10.0);
        for (_, y) in outline {
            assert!((-1e-4..=2.0 + 1e-4).contains(&y));
        }
    }
}
