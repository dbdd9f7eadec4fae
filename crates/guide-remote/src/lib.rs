//! Network collaborators of the guide renderer: the analysis webhook and
//! the download-once font cache.

pub mod backend;
pub mod font_cache;
mod types;

pub use backend::{
    AnalysisBackend, WebhookBackend, WebhookPayload, analyze_or_error_text, extract_guide,
};
pub use font_cache::FontCache;
pub use types::*;
