//! Recorded page content
//!
//! The painter records what each page shows as [`Mark`]s in millimeters,
//! measured from the top-left corner of the page. The PDF writer converts
//! them to content stream operations once the whole document is laid out.

use crate::fonts::FontFace;
use crate::types::{Anchor, RgbColor};

/// Which part of the page a mark belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Header,
    Body,
    Footer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// Single line of text; `x_mm` is the left edge of the drawn run
    Text {
        region: Region,
        text: String,
        x_mm: f32,
        baseline_mm: f32,
        width_mm: f32,
        anchor: Anchor,
        face: FontFace,
        size_pt: f32,
        color: RgbColor,
    },
    /// Filled rectangle, optionally with rounded corners
    Rect {
        region: Region,
        x_mm: f32,
        top_mm: f32,
        width_mm: f32,
        height_mm: f32,
        corner_mm: f32,
        fill: RgbColor,
    },
    /// Filled circle
    Circle {
        region: Region,
        cx_mm: f32,
        cy_mm: f32,
        radius_mm: f32,
        fill: RgbColor,
    },
    /// Horizontal rule
    Rule {
        region: Region,
        x1_mm: f32,
        x2_mm: f32,
        y_mm: f32,
        thickness_pt: f32,
        color: RgbColor,
    },
}

impl Mark {
    pub fn region(&self) -> Region {
        match self {
            Mark::Text { region, .. }
            | Mark::Rect { region, .. }
            | Mark::Circle { region, .. }
            | Mark::Rule { region, .. } => *region,
        }
    }
}

/// A finished page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page number printed in the footer
    pub number: usize,
    pub marks: Vec<Mark>,
}

impl Page {
    /// Text runs of one region, in drawing order
    pub fn texts(&self, region: Region) -> impl Iterator<Item = &str> {
        self.marks.iter().filter_map(move |mark| match mark {
            Mark::Text {
                region: r, text, ..
            } if *r == region => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_region(&self, region: Region) -> bool {
        self.marks.iter().any(|m| m.region() == region)
    }
}

/// All pages of one rendered document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canvas {
    pub pages: Vec<Page>,
}

impl Canvas {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
