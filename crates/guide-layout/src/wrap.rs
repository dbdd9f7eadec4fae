//! Script-aware greedy line wrapping
//!
//! Words are accumulated into a candidate line until it no longer fits the
//! column. Arabic candidates are measured in their shaped, visually
//! reordered form because joined glyphs differ in width from the isolated
//! letters. A word is never split: one that is wider than the column is
//! emitted alone on its own line.

use crate::fonts::{FontBook, FontFace};
use crate::shape::Shaper;
use crate::types::ScriptKind;
use std::convert::Infallible;

/// One display-ready sub-line
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    /// Words of this sub-line in logical order
    pub logical: String,
    /// Text to draw: visual order for shaped Arabic, literal otherwise
    pub display: String,
    pub width_mm: f32,
}

/// Fonts and shaping used while measuring
pub struct WrapContext<'a> {
    pub fonts: &'a FontBook,
    pub shaper: &'a dyn Shaper,
}

/// Wrap `text` to `max_width_mm`, returning sub-lines top to bottom
///
/// Shaping is all or nothing per line: if any candidate fails to shape,
/// the whole line is wrapped again in logical order.
pub fn wrap(
    text: &str,
    script: ScriptKind,
    face: FontFace,
    size_pt: f32,
    max_width_mm: f32,
    ctx: &WrapContext<'_>,
) -> Vec<WrappedLine> {
    let measure = |display: String| {
        let width = ctx.fonts.measure_mm(&display, face, size_pt);
        (display, width)
    };

    if script == ScriptKind::Arabic {
        let shaped = greedy(text, max_width_mm, |logical| {
            ctx.shaper.shape(logical).map(measure)
        });
        match shaped {
            Ok(lines) => return lines,
            Err(err) => log::warn!("Shaping failed, line drawn in logical order: {}", err),
        }
    }

    let unshaped = greedy(text, max_width_mm, |logical| {
        Ok::<_, Infallible>(measure(logical.to_string()))
    });
    match unshaped {
        Ok(lines) => lines,
        Err(never) => match never {},
    }
}

/// Greedy word accumulation; `layout` maps a logical candidate to its
/// display text and width
fn greedy<E>(
    text: &str,
    max_width_mm: f32,
    mut layout: impl FnMut(&str) -> Result<(String, f32), E>,
) -> Result<Vec<WrappedLine>, E> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_layout = (String::new(), 0.0);

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            current_layout = layout(&current)?;
            continue;
        }

        let candidate = format!("{} {}", current, word);
        let candidate_layout = layout(&candidate)?;

        if candidate_layout.1 > max_width_mm {
            let (display, width_mm) = std::mem::take(&mut current_layout);
            lines.push(WrappedLine {
                logical: std::mem::take(&mut current),
                display,
                width_mm,
            });
            current.push_str(word);
            current_layout = layout(&current)?;
        } else {
            current = candidate;
            current_layout = candidate_layout;
        }
    }

    if !current.is_empty() {
        let (display, width_mm) = current_layout;
        lines.push(WrappedLine {
            logical: current,
            display,
            width_mm,
        });
    }

    Ok(lines)
}
