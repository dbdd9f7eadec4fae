//! Page painter
//!
//! Places wrapped sub-lines at a vertical cursor, anchored right for Arabic
//! and left for Latin script. Before a sub-line would cross the bottom
//! margin the current page is closed (footer drawn) and a fresh page is
//! opened (header drawn).

use crate::canvas::{Canvas, Mark, Page, Region};
use crate::classify::{LineRole, classify, detect_script, display_text};
use crate::constants::{
    ALERT_CORNER_RADIUS_MM, ALERT_PADDING_MM, BULLET_RADIUS_MM, SECTION_BAR_WIDTH_MM,
    SPACER_FRACTION,
};
use crate::fonts::{FontBook, FontFace};
use crate::options::GuideConfig;
use crate::shape::{Shaper, shape_or_raw};
use crate::style::{Decoration, StyleSpec, resolve_style};
use crate::types::{Anchor, Language, RgbColor, ScriptKind};
use crate::wrap::{WrapContext, WrappedLine, wrap};

/// Tolerance for cursor comparisons
const EPSILON_MM: f32 = 1e-3;

/// Baseline position within a line box, as a fraction of its height
const BASELINE_FRACTION: f32 = 0.75;

/// Position of the painter within the current document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    /// Number of the open page, 0 before the first page is opened
    pub page: usize,
    /// Top of the next line, measured from the top edge of the page
    pub y_mm: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    /// No page open yet, or the last page has been closed
    Closed,
    HeaderDrawn,
    BodyActive,
}

pub struct Painter<'a> {
    config: &'a GuideConfig,
    language: Language,
    fonts: &'a FontBook,
    shaper: &'a dyn Shaper,
    canvas: Canvas,
    cursor: PageCursor,
    marks: Vec<Mark>,
    state: PageState,
}

impl<'a> Painter<'a> {
    pub fn new(
        config: &'a GuideConfig,
        language: Language,
        fonts: &'a FontBook,
        shaper: &'a dyn Shaper,
    ) -> Self {
        Self {
            config,
            language,
            fonts,
            shaper,
            canvas: Canvas::default(),
            cursor: PageCursor {
                page: 0,
                y_mm: config.geometry.body_top_mm(),
            },
            marks: Vec::new(),
            state: PageState::Closed,
        }
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    /// Start a new page and draw its header band
    pub fn open_page(&mut self) {
        debug_assert_eq!(self.state, PageState::Closed);

        self.cursor.page += 1;
        self.cursor.y_mm = self.config.geometry.body_top_mm();
        self.marks.clear();
        self.draw_header();
        self.state = PageState::HeaderDrawn;

        log::debug!("Opened page {}", self.cursor.page);
    }

    /// Draw the footer and commit the open page to the canvas
    pub fn close_page(&mut self) {
        if self.state == PageState::Closed {
            return;
        }

        self.draw_footer();
        self.canvas.pages.push(Page {
            number: self.cursor.page,
            marks: std::mem::take(&mut self.marks),
        });
        self.state = PageState::Closed;

        log::debug!("Closed page {}", self.cursor.page);
    }

    /// Classify, style, wrap and draw one input line
    pub fn paint_line(&mut self, line: &str) {
        if self.state == PageState::Closed {
            self.open_page();
        }

        let role = classify(line);
        if role == LineRole::Spacer {
            self.cursor.y_mm += self.config.geometry.line_height_mm * SPACER_FRACTION;
            return;
        }

        let script = detect_script(line);
        let text = display_text(line, role);
        let style = resolve_style(role, script, self.config, self.fonts);
        let ctx = WrapContext {
            fonts: self.fonts,
            shaper: self.shaper,
        };
        let lines = wrap(
            &text,
            script,
            style.face,
            style.size_pt,
            style.max_width_mm(self.config),
            &ctx,
        );

        log::debug!(
            "{:?}/{:?} line wrapped into {} sub-lines",
            role,
            script,
            lines.len()
        );

        let padding = match style.decoration {
            Decoration::Box(_) => ALERT_PADDING_MM,
            _ => 0.0,
        };

        let mut remaining: &[WrappedLine] = &lines;
        let mut first_chunk = true;
        while !remaining.is_empty() {
            if !self.fits(style.line_height_mm + padding) {
                self.break_page();
            }

            let available = self.config.geometry.body_bottom_mm() - self.cursor.y_mm - padding;
            let fit = ((available + EPSILON_MM) / style.line_height_mm).floor() as usize;
            let (chunk, rest) = remaining.split_at(fit.clamp(1, remaining.len()));

            self.state = PageState::BodyActive;
            self.draw_decoration(&style, chunk.len(), first_chunk);
            self.cursor.y_mm += padding / 2.0;
            for sub_line in chunk {
                self.draw_sub_line(&style, sub_line);
                self.cursor.y_mm += style.line_height_mm;
            }
            self.cursor.y_mm += padding / 2.0;

            remaining = rest;
            first_chunk = false;
        }

        self.cursor.y_mm += style.space_after_mm;
    }

    /// Close the last page and hand over the finished canvas
    pub fn finish(mut self) -> Canvas {
        if self.cursor.page == 0 {
            self.open_page();
        }
        self.close_page();
        log::info!("Laid out {} page(s)", self.canvas.page_count());
        self.canvas
    }

    fn fits(&self, height_mm: f32) -> bool {
        self.cursor.y_mm + height_mm <= self.config.geometry.body_bottom_mm() + EPSILON_MM
    }

    fn break_page(&mut self) {
        self.close_page();
        self.open_page();
    }

    // -- Body primitives ------------------------------------------------------

    fn draw_sub_line(&mut self, style: &StyleSpec, line: &WrappedLine) {
        let baseline = self.cursor.y_mm + style.line_height_mm * BASELINE_FRACTION;
        let x = self.anchored_x(style.anchor, style.indent_mm, line.width_mm);
        self.marks.push(Mark::Text {
            region: Region::Body,
            text: line.display.clone(),
            x_mm: x,
            baseline_mm: baseline,
            width_mm: line.width_mm,
            anchor: style.anchor,
            face: style.face,
            size_pt: style.size_pt,
            color: style.color,
        });
    }

    fn draw_decoration(&mut self, style: &StyleSpec, sub_lines: usize, first_chunk: bool) {
        let g = &self.config.geometry;
        let lh = style.line_height_mm;
        let y = self.cursor.y_mm;

        match style.decoration {
            Decoration::None => {}
            Decoration::AccentBar(color) => {
                let x = match style.anchor {
                    Anchor::Right => g.page_width_mm - g.side_margin_mm - SECTION_BAR_WIDTH_MM,
                    _ => g.side_margin_mm,
                };
                self.marks.push(Mark::Rect {
                    region: Region::Body,
                    x_mm: x,
                    top_mm: y + lh * 0.1,
                    width_mm: SECTION_BAR_WIDTH_MM,
                    height_mm: sub_lines as f32 * lh - lh * 0.2,
                    corner_mm: 0.0,
                    fill: color,
                });
            }
            Decoration::BulletDot(color) if first_chunk => {
                let offset = style.indent_mm / 2.0;
                let cx = match style.anchor {
                    Anchor::Right => g.page_width_mm - g.side_margin_mm - offset,
                    _ => g.side_margin_mm + offset,
                };
                self.marks.push(Mark::Circle {
                    region: Region::Body,
                    cx_mm: cx,
                    cy_mm: y + lh * 0.55,
                    radius_mm: BULLET_RADIUS_MM,
                    fill: color,
                });
            }
            Decoration::BulletDot(_) => {}
            Decoration::Box(fill) => {
                self.marks.push(Mark::Rect {
                    region: Region::Body,
                    x_mm: g.side_margin_mm,
                    top_mm: y,
                    width_mm: g.column_width_mm(),
                    height_mm: sub_lines as f32 * lh + ALERT_PADDING_MM,
                    corner_mm: ALERT_CORNER_RADIUS_MM,
                    fill,
                });
            }
        }
    }

    // -- Header and footer ----------------------------------------------------

    fn draw_header(&mut self) {
        let config = self.config;
        let g = &config.geometry;
        let palette = &config.palette;
        let sizes = &config.font_sizes;

        self.marks.push(Mark::Rect {
            region: Region::Header,
            x_mm: 0.0,
            top_mm: 0.0,
            width_mm: g.page_width_mm,
            height_mm: g.header_height_mm,
            corner_mm: 0.0,
            fill: palette.navy,
        });

        let title_script = self.draw_header_text(
            self.language.header_title(),
            true,
            sizes.header_title,
            g.header_height_mm * 0.45,
            palette.header_text,
        );
        self.draw_header_text(
            self.language.header_subtitle(),
            false,
            sizes.header_subtitle,
            g.header_height_mm * 0.75,
            palette.header_text,
        );

        // Decorative marker on the side opposite the title
        let marker_x = match title_script {
            ScriptKind::Arabic => g.side_margin_mm + 5.0,
            ScriptKind::Latin => g.page_width_mm - g.side_margin_mm - 5.0,
        };
        let marker_y = g.header_height_mm / 2.0;
        self.marks.push(Mark::Circle {
            region: Region::Header,
            cx_mm: marker_x,
            cy_mm: marker_y,
            radius_mm: 5.0,
            fill: palette.header_text,
        });
        self.marks.push(Mark::Circle {
            region: Region::Header,
            cx_mm: marker_x,
            cy_mm: marker_y,
            radius_mm: 2.5,
            fill: palette.sections[2],
        });
    }

    fn draw_header_text(
        &mut self,
        text: &str,
        bold: bool,
        size_pt: f32,
        baseline_mm: f32,
        color: RgbColor,
    ) -> ScriptKind {
        let script = detect_script(text);
        let face = self.fonts.face(script, bold);
        let anchor = script.anchor();
        self.push_text(Region::Header, text, script, face, size_pt, baseline_mm, anchor, color);
        script
    }

    fn draw_footer(&mut self) {
        let config = self.config;
        let g = &config.geometry;
        let rule_y = g.page_height_mm - g.footer_rule_mm;

        self.marks.push(Mark::Rule {
            region: Region::Footer,
            x1_mm: g.side_margin_mm,
            x2_mm: g.page_width_mm - g.side_margin_mm,
            y_mm: rule_y,
            thickness_pt: 0.5,
            color: config.palette.rule,
        });

        let baseline = rule_y + 6.0;
        let label = self.language.footer_label(self.cursor.page);
        let script = detect_script(&label);
        let face = self.fonts.face(script, false);
        self.push_text(
            Region::Footer,
            &label,
            script,
            face,
            config.font_sizes.footer,
            baseline,
            Anchor::Center,
            config.palette.plain,
        );

        let app_anchor = if self.language.is_rtl() {
            Anchor::Left
        } else {
            Anchor::Right
        };
        self.push_text(
            Region::Footer,
            &config.app_name,
            detect_script(&config.app_name),
            FontFace::Helvetica,
            config.font_sizes.footer,
            baseline,
            app_anchor,
            config.palette.rule,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn push_text(
        &mut self,
        region: Region,
        text: &str,
        script: ScriptKind,
        face: FontFace,
        size_pt: f32,
        baseline_mm: f32,
        anchor: Anchor,
        color: RgbColor,
    ) {
        let display = match script {
            ScriptKind::Arabic => shape_or_raw(self.shaper, text).0,
            ScriptKind::Latin => text.to_string(),
        };
        let width = self.fonts.measure_mm(&display, face, size_pt);
        let x = self.anchored_x(anchor, 0.0, width);
        self.marks.push(Mark::Text {
            region,
            text: display,
            x_mm: x,
            baseline_mm,
            width_mm: width,
            anchor,
            face,
            size_pt,
            color,
        });
    }

    fn anchored_x(&self, anchor: Anchor, indent_mm: f32, width_mm: f32) -> f32 {
        let g = &self.config.geometry;
        match anchor {
            Anchor::Left => g.side_margin_mm + indent_mm,
            Anchor::Right => g.page_width_mm - g.side_margin_mm - indent_mm - width_mm,
            Anchor::Center => (g.page_width_mm - width_mm) / 2.0,
        }
    }
}

/// Lay out a whole guide into pages without serialising it
pub fn layout_guide(
    text: &str,
    language: Language,
    config: &GuideConfig,
    fonts: &FontBook,
    shaper: &dyn Shaper,
) -> Canvas {
    let mut painter = Painter::new(config, language, fonts, shaper);
    painter.open_page();
    for line in text.lines() {
        painter.paint_line(line);
    }
    painter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ArabicShaper;

    fn layout(text: &str, language: Language) -> Canvas {
        let config = GuideConfig::default();
        let fonts = FontBook::empty();
        layout_guide(text, language, &config, &fonts, &ArabicShaper)
    }

    fn body_texts(page: &Page) -> Vec<&Mark> {
        page.marks
            .iter()
            .filter(|m| matches!(m, Mark::Text { region: Region::Body, .. }))
            .collect()
    }

    #[test]
    fn test_empty_document_has_one_page() {
        let canvas = layout("", Language::French);
        assert_eq!(canvas.page_count(), 1);
        let page = &canvas.pages[0];
        assert_eq!(page.number, 1);
        assert!(page.has_region(Region::Header));
        assert!(page.has_region(Region::Footer));
        assert!(!page.has_region(Region::Body));
    }

    #[test]
    fn test_spacer_only_advances_cursor() {
        let config = GuideConfig::default();
        let fonts = FontBook::empty();
        let mut painter = Painter::new(&config, Language::French, &fonts, &ArabicShaper);
        painter.open_page();
        let before = painter.cursor().y_mm;
        painter.paint_line("   ");
        let after = painter.cursor().y_mm;
        assert!((after - before - config.geometry.line_height_mm * SPACER_FRACTION).abs() < 1e-4);
        let canvas = painter.finish();
        assert!(!canvas.pages[0].has_region(Region::Body));
    }

    #[test]
    fn test_latin_lines_are_left_anchored() {
        let canvas = layout("1. Repos\n- Pas de sport", Language::French);
        let texts = body_texts(&canvas.pages[0]);
        assert_eq!(texts.len(), 2);
        for mark in texts {
            if let Mark::Text { anchor, .. } = mark {
                assert_eq!(*anchor, Anchor::Left);
            }
        }
    }

    #[test]
    fn test_arabic_lines_are_right_anchored_at_margin() {
        let config = GuideConfig::default();
        let canvas = layout("الراحة ضرورية", Language::ClassicalArabic);
        let texts = body_texts(&canvas.pages[0]);
        assert_eq!(texts.len(), 1);
        if let Mark::Text {
            anchor,
            x_mm,
            width_mm,
            ..
        } = texts[0]
        {
            assert_eq!(*anchor, Anchor::Right);
            let right_edge = x_mm + width_mm;
            let expected = config.geometry.page_width_mm - config.geometry.side_margin_mm;
            assert!((right_edge - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_bullet_gets_marker_and_indent() {
        let config = GuideConfig::default();
        let canvas = layout("- Pas de sport", Language::French);
        let page = &canvas.pages[0];
        let dots = page
            .marks
            .iter()
            .filter(|m| matches!(m, Mark::Circle { region: Region::Body, .. }))
            .count();
        assert_eq!(dots, 1);
        let texts = body_texts(page);
        if let Mark::Text { x_mm, text, .. } = texts[0] {
            assert_eq!(text, "Pas de sport");
            assert!(*x_mm > config.geometry.side_margin_mm);
        }
    }

    #[test]
    fn test_alert_box_covers_all_sub_lines() {
        let long = format!("URGENCE {}", "fièvre ".repeat(60));
        let canvas = layout(&long, Language::French);
        let page = &canvas.pages[0];
        let sub_lines = body_texts(page).len();
        assert!(sub_lines > 1);

        let boxes: Vec<_> = page
            .marks
            .iter()
            .filter_map(|m| match m {
                Mark::Rect {
                    region: Region::Body,
                    height_mm,
                    corner_mm,
                    ..
                } => Some((*height_mm, *corner_mm)),
                _ => None,
            })
            .collect();
        assert_eq!(boxes.len(), 1);
        let line_height = GuideConfig::default().geometry.line_height_mm;
        let expected = sub_lines as f32 * line_height + ALERT_PADDING_MM;
        assert!((boxes[0].0 - expected).abs() < 1e-3);
        assert!(boxes[0].1 > 0.0);
    }

    #[test]
    fn test_body_never_crosses_bottom_margin() {
        let config = GuideConfig::default();
        let text = (0..200)
            .map(|i| format!("Ligne numéro {} du guide", i))
            .collect::<Vec<_>>()
            .join("\n");
        let canvas = layout(&text, Language::French);
        assert!(canvas.page_count() > 1);
        for page in &canvas.pages {
            for mark in &page.marks {
                if let Mark::Text {
                    region: Region::Body,
                    baseline_mm,
                    ..
                } = mark
                {
                    assert!(*baseline_mm <= config.geometry.body_bottom_mm());
                    assert!(*baseline_mm >= config.geometry.body_top_mm());
                }
            }
        }
    }

    #[test]
    fn test_page_numbers_are_sequential() {
        let text = vec!["texte"; 150].join("\n");
        let canvas = layout(&text, Language::French);
        for (i, page) in canvas.pages.iter().enumerate() {
            assert_eq!(page.number, i + 1);
            let footer: Vec<_> = page.texts(Region::Footer).collect();
            assert!(footer.contains(&format!("Page {}", i + 1).as_str()));
        }
    }

    #[test]
    fn test_numbered_section_draws_accent_bar_in_section_color() {
        let config = GuideConfig::default();
        let canvas = layout("2. Médicaments", Language::French);
        let bar = canvas.pages[0].marks.iter().find_map(|m| match m {
            Mark::Rect {
                region: Region::Body,
                fill,
                ..
            } => Some(*fill),
            _ => None,
        });
        assert_eq!(bar, Some(config.palette.sections[1]));
    }
}
