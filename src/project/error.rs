use thiserror::Error;

/// Errors raised by the project aggregate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    /// Construction or mutation input was rejected.
    #[error("Invalid project field '{field}': {message}")]
    Validation { field: &'static str, message: String },

    #[error("No base language is configured")]
    NoBaseLanguage,

    #[error("Language '{0}' is not configured")]
    UndefinedLanguage(String),

    #[error("Translation key '{0}' already exists")]
    DuplicateKey(String),

    #[error("Translation key '{0}' does not exist")]
    UnknownKey(String),
}

impl ProjectError {
    /// Shorthand for [`ProjectError::Validation`].
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation { field, message: message.into() }
    }
}
