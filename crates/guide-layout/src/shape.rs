//! Arabic shaping and bidirectional reordering
//!
//! The wrapper and painter never draw Arabic text in logical order: letters
//! are first joined into their contextual forms, then the line is reordered
//! into visual (left-to-right drawing) order.

use ar_reshaper::reshape_line;
use thiserror::Error;
use unicode_bidi::{BidiInfo, Level};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("reshaping produced no output for {0:?}")]
    Empty(String),
    #[error("bidi analysis found no paragraph in {0:?}")]
    NoParagraph(String),
}

/// Converts logical-order text into display-ready visual order
pub trait Shaper {
    fn shape(&self, logical: &str) -> Result<String, ShapeError>;
}

/// Letter joining with `ar_reshaper`, then UAX#9 reordering with an RTL base
#[derive(Debug, Clone, Copy, Default)]
pub struct ArabicShaper;

impl Shaper for ArabicShaper {
    fn shape(&self, logical: &str) -> Result<String, ShapeError> {
        if logical.is_empty() {
            return Ok(String::new());
        }

        let reshaped = reshape_line(logical);
        if reshaped.is_empty() {
            return Err(ShapeError::Empty(logical.to_string()));
        }

        let info = BidiInfo::new(&reshaped, Some(Level::rtl()));
        if info.paragraphs.is_empty() {
            return Err(ShapeError::NoParagraph(logical.to_string()));
        }

        let mut out = String::with_capacity(reshaped.len());
        for para in &info.paragraphs {
            out.push_str(&info.reorder_line(para, para.range.clone()));
        }
        Ok(out)
    }
}

/// Shape `logical`, falling back to the raw text when shaping fails
pub fn shape_or_raw(shaper: &dyn Shaper, logical: &str) -> (String, bool) {
    match shaper.shape(logical) {
        Ok(visual) => (visual, true),
        Err(err) => {
            log::warn!("Shaping failed, drawing logical order: {}", err);
            (logical.to_string(), false)
        }
    }
}
