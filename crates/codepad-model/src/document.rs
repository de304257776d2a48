use serde::{Deserialize, Serialize};

use crate::language::Language;

/// The text buffer for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub language: Language,
    pub text: String,
}

impl Document {
    pub fn new(language: Language, text: impl Into<String>) -> Self {
        Self {
            language,
            text: text.into(),
        }
    }

    /// Document seeded with the language template.
    pub fn from_template(language: Language) -> Self {
        Self::new(language, language.template())
    }

}

/// True when `text` is empty or whitespace-only.
///
/// Blank text is never persisted and cannot be run.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
