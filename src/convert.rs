//! Conversions between flat/nested JSON, translation entries and file names.

pub mod document;
pub mod filename;
pub mod language;
pub mod shape;

use thiserror::Error;

pub use document::TranslationDocument;
pub use filename::{
    DEFAULT_MAX_FILENAME_LENGTH,
    sanitize_filename,
};
pub use language::detect_language_from_path;
pub use shape::{
    FlatDocument,
    JsonDocument,
    NestedDocument,
};

/// Errors raised while interpreting JSON documents.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Expected a JSON object at the document root, found {0}")]
    NotAnObject(&'static str),
}
