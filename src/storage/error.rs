use std::io;
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use crate::crypto::CryptoError;
use crate::project::ProjectError;
use crate::template::TemplateError;

/// Errors raised while persisting, loading or exporting projects.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Project file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The `.prj` file exists but could not be parsed, authenticated or restored.
    #[error("Data file is invalid")]
    TamperOrCorruption { path: PathBuf, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("Failed to serialize JSON: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("No translation data for language '{0}'")]
    MissingTranslation(String),

    #[error("Invalid translation file {}: {reason}", path.display())]
    InvalidTranslationFile { path: PathBuf, reason: String },
}

impl StoreError {
    /// `map_err` adapter attaching `path` to an I/O error.
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io { path: path.to_path_buf(), source }
    }

    /// A `.prj` file that could not be read back.
    pub(crate) fn corrupted(path: &Path, reason: impl ToString) -> Self {
        Self::TamperOrCorruption { path: path.to_path_buf(), reason: reason.to_string() }
    }
}
