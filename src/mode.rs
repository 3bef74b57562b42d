use regex::Regex;
use std::sync::OnceLock;

const MARKER_PATTERN: &str = r"(?i)\s*(#au|/au)\b";

const GENERAL_INSTRUCTION: &str = "You are an experienced English teacher. \
Please check the following message and tell me:\n\
1. Is it understandable to native English speakers?\n\
2. How can I improve it (grammar, word choice, fluency, etc.)?\n\
Be clear, friendly, and constructive.";

const AUSTRALIAN_INSTRUCTION: &str = "You are an experienced English teacher specialising in Australian English. \
Please check the following message and tell the user:\n\
1. Is it understandable and natural-sounding to native Australian English speakers?\n\
2. How can they improve it\u{2014}considering Australian spelling (e.g., 'colour', 'realise'), \
common phrasing, idioms (e.g., 'arvo', 'no worries', 'she'll be right'), and cultural fluency?\n\
Be encouraging, clear, and give examples where helpful.";

/// Which flavour of feedback the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackMode {
    General,
    Australian,
}

impl FeedbackMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Australian => "australian",
        }
    }

    pub fn system_instruction(&self) -> &'static str {
        match self {
            Self::General => GENERAL_INSTRUCTION,
            Self::Australian => AUSTRALIAN_INSTRUCTION,
        }
    }
}

/// User text with the mode marker stripped, plus the mode it selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedInput {
    pub text: String,
    pub mode: FeedbackMode,
}

impl CleanedInput {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

fn marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(MARKER_PATTERN).expect("marker pattern is valid"))
}

/// Splits raw text into cleaned text and mode. Every marker occurrence is
/// removed, not only a trailing one.
pub fn detect(raw: &str) -> CleanedInput {
    let trimmed = raw.trim();
    let mode = if marker().is_match(trimmed) {
        FeedbackMode::Australian
    } else {
        FeedbackMode::General
    };
    let text = marker().replace_all(trimmed, "").trim().to_string();

    CleanedInput { text, mode }
}
