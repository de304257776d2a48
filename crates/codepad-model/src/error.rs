use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    #[error("unknown theme: {0}")]
    UnknownTheme(String),
}

impl ModelError {
    /// Message suitable for a notice shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownLanguage(tag) => format!(
                "'{tag}' is not a supported language. Choose one of: javascript, python, cpp, java."
            ),
            Self::UnknownTheme(name) => format!("'{name}' is not a theme. Use dark or light."),
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
