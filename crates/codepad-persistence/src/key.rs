//! Storage keys.

use std::fmt;

use codepad_model::Language;

/// Prefix shared by all document keys.
const DOCUMENT_PREFIX: &str = "code-";

/// Key under which the theme preference is stored.
const THEME_KEY: &str = "editor-theme";

/// A namespaced key in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Saved text for one language (`code-<language>`).
    Document(Language),
    /// The theme preference (`editor-theme`).
    Theme,
}

impl StoreKey {
    /// Rendered key string.
    pub fn as_string(&self) -> String {
        match self {
            Self::Document(language) => format!("{DOCUMENT_PREFIX}{}", language.tag()),
            Self::Theme => THEME_KEY.to_string(),
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}
