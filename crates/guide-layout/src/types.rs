use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuideError {
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Font error: {0}")]
    Font(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, GuideError>;

/// Output language selected for the patient guide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    French,
    Darija,
    ClassicalArabic,
}

impl Language {
    /// Label expected by the analysis backend
    pub fn label(&self) -> &'static str {
        match self {
            Language::French => "Français",
            Language::Darija => "Darija (Maroc)",
            Language::ClassicalArabic => "Arabe Classique",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Darija | Language::ClassicalArabic)
    }

    pub fn header_title(&self) -> &'static str {
        match self {
            Language::French => "Guide de Sortie Patient",
            Language::Darija => "دليل الخروج ديال المريض",
            Language::ClassicalArabic => "دليل خروج المريض",
        }
    }

    pub fn header_subtitle(&self) -> &'static str {
        match self {
            Language::French => "Conseils personnalisés après votre hospitalisation",
            Language::Darija => "نصائح ليك من بعد الخروج من السبيطار",
            Language::ClassicalArabic => "إرشادات شخصية بعد مغادرة المستشفى",
        }
    }

    pub fn footer_label(&self, page: usize) -> String {
        if self.is_rtl() {
            format!("صفحة {}", page)
        } else {
            format!("Page {}", page)
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = GuideError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fr" | "french" | "francais" | "français" => Ok(Language::French),
            "darija" | "ma" | "darija (maroc)" => Ok(Language::Darija),
            "ar" | "arabic" | "classical" | "arabe classique" => Ok(Language::ClassicalArabic),
            other => Err(GuideError::Config(format!("Unknown language: {}", other))),
        }
    }
}

/// Script of a single line, used to pick font, measurement and anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    Arabic,
    Latin,
}

impl ScriptKind {
    pub fn anchor(self) -> Anchor {
        match self {
            ScriptKind::Arabic => Anchor::Right,
            ScriptKind::Latin => Anchor::Left,
        }
    }
}

/// Which edge of the text column a line is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    Left,
    Right,
    Center,
}

/// RGB colour with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RgbColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from 8-bit channel values
    pub const fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }
}
