//! Patient discharge guide typesetting
//!
//! Turns plain guide text into a paginated PDF. Each line is classified
//! into a role, styled, wrapped with script-aware measurement (shaped and
//! reordered for Arabic) and painted right- or left-anchored, with a header
//! band and a numbered footer on every page.

pub mod canvas;
pub mod classify;
mod constants;
pub mod fonts;
mod options;
pub mod paint;
pub mod pdf;
pub mod shape;
pub mod style;
mod types;
pub mod wrap;

pub use canvas::{Canvas, Mark, Page, Region};
pub use classify::{LineRole, classify, detect_script, display_text};
pub use fonts::{FontAsset, FontBook, FontFace, FontSource, MemoryFonts, NoFonts};
pub use options::*;
pub use paint::{PageCursor, Painter, layout_guide};
pub use pdf::{RenderedGuide, generate_pdf, load_guide_text, render_guide, write_pdf};
pub use shape::{ArabicShaper, ShapeError, Shaper};
pub use style::{Decoration, StyleSpec, resolve_style, section_color};
pub use types::*;
pub use wrap::{WrapContext, WrappedLine, wrap};
