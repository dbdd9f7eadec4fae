//! Line classification
//!
//! Every input line is assigned exactly one [`LineRole`] by an ordered rule
//! list (first match wins) and, independently, a [`ScriptKind`].

use crate::types::ScriptKind;

/// Semantic role of one input line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRole {
    /// Empty or whitespace-only line; only advances the cursor
    Spacer,
    Title,
    /// Numbered section heading, index in `1..=4`
    NumberedSection(u8),
    Bullet,
    Alert,
    Question,
    Answer,
    Plain,
}

/// Phrases that mark the document title
const TITLE_PHRASES: &[&str] = &[
    "guide de sortie",
    "guide patient",
    "دليل الخروج",
    "دليل المريض",
];

/// Section-break marker anywhere in the line
const SECTION_BREAK: &str = "===";

/// Section-break marker at the start of the line
const HEADING_PREFIX: &str = "##";

const BULLET_MARKERS: &[char] = &['-', '•', '*'];

/// Urgency keywords, compared against the lowercased line
const ALERT_KEYWORDS: &[&str] = &[
    "urgence",
    "urgent",
    "alerte",
    "danger",
    "immédiatement",
    "appelez le 15",
    "طوارئ",
    "مستعجل",
    "المستعجلات",
    "خطر",
    "تنبيه",
    "فورا",
    "فوراً",
];

const QUESTION_MARKERS: &[&str] = &["Q:", "Q :", "س:", "س :", "سؤال:"];

const ANSWER_MARKERS: &[&str] = &["R:", "R :", "ج:", "ج :", "جواب:"];

/// Classify one line. Total and deterministic.
pub fn classify(line: &str) -> LineRole {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return LineRole::Spacer;
    }

    let lowered = trimmed.to_lowercase();

    if is_title(trimmed, &lowered) {
        return LineRole::Title;
    }

    if let Some(index) = section_index(trimmed) {
        return LineRole::NumberedSection(index);
    }

    if trimmed.starts_with(BULLET_MARKERS) {
        return LineRole::Bullet;
    }

    if ALERT_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        return LineRole::Alert;
    }

    if QUESTION_MARKERS.iter().any(|m| trimmed.starts_with(m)) {
        return LineRole::Question;
    }

    if ANSWER_MARKERS.iter().any(|m| trimmed.starts_with(m)) {
        return LineRole::Answer;
    }

    LineRole::Plain
}

fn is_title(trimmed: &str, lowered: &str) -> bool {
    trimmed.contains(SECTION_BREAK)
        || trimmed.starts_with(HEADING_PREFIX)
        || TITLE_PHRASES.iter().any(|p| lowered.contains(p))
}

/// Numeral value of a Western or Arabic-Indic digit in `1..=4`
fn numeral_value(ch: char) -> Option<u8> {
    match ch {
        '1'..='4' => Some(ch as u8 - b'0'),
        '\u{0661}'..='\u{0664}' => Some((ch as u32 - 0x0660) as u8),
        _ => None,
    }
}

/// Section index of a line starting with `<digit 1-4>.<whitespace>`
pub fn section_index(trimmed: &str) -> Option<u8> {
    let mut chars = trimmed.chars();
    let value = numeral_value(chars.next()?)?;
    if chars.next()? != '.' {
        return None;
    }
    match chars.next() {
        Some(c) if c.is_whitespace() => Some(value),
        _ => None,
    }
}

/// Detect whether a line contains any Arabic-script codepoint
pub fn detect_script(line: &str) -> ScriptKind {
    if line.chars().any(is_arabic) {
        ScriptKind::Arabic
    } else {
        ScriptKind::Latin
    }
}

fn is_arabic(ch: char) -> bool {
    matches!(
        ch,
        '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}' | '\u{08A0}'..='\u{08FF}'
    )
}

/// Text shown for a classified line, with role markers removed
pub fn display_text(line: &str, role: LineRole) -> String {
    let trimmed = line.trim();
    match role {
        LineRole::Spacer => String::new(),
        LineRole::Bullet => trimmed
            .trim_start_matches(BULLET_MARKERS)
            .trim_start()
            .to_string(),
        LineRole::Title => {
            let stripped = trimmed.trim_matches(|c: char| c == '=' || c == '#' || c.is_whitespace());
            if stripped.is_empty() {
                trimmed.to_string()
            } else {
                stripped.to_string()
            }
        }
        _ => trimmed.to_string(),
    }
}
