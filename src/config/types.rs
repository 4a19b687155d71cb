use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::convert::DEFAULT_MAX_FILENAME_LENGTH;
use crate::crypto::CryptoError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "import.includePatterns[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Encryption secret is not set. Export it in the '{0}' environment variable")]
    MissingSecret(String),

    #[error("Failed to prepare encryption: {0}")]
    Crypto(#[from] CryptoError),

    #[error("No per-user data directory is available on this platform")]
    NoDataDir,
}

/// バリデーションエラーを1行ずつ整形する
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Contents of `settings.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    /// Where `.prj` files live. Defaults to `<data dir>/projects`.
    pub projects_dir: Option<PathBuf>,

    /// Upper bound for sanitized project file names.
    pub filename_max_length: usize,

    pub import: ImportConfig,
    pub encryption: EncryptionConfig,
}

/// Translation file import.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportConfig {
    /// Value of keys missing from one of the imported files.
    pub fallback_value: String,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            fallback_value: String::new(),
            include_patterns: vec!["**/*.json".to_string()],
            exclude_patterns: vec!["node_modules/**".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EncryptionConfig {
    /// Environment variable holding the secret.
    pub secret_env: String,
    pub salt: String,
    /// PBKDF2 iteration count.
    pub iterations: u32,
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            secret_env: "LOCAL_LOCALIZATOR_SECRET".to_string(),
            salt: "local-localizator".to_string(),
            iterations: 100_000,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            projects_dir: None,
            filename_max_length: DEFAULT_MAX_FILENAME_LENGTH,
            import: ImportConfig::default(),
            encryption: EncryptionConfig::default(),
        }
    }
}

impl AppSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Out of range number
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(dir) = &self.projects_dir
            && dir.as_os_str().is_empty()
        {
            errors.push(ValidationError::new(
                "projectsDir",
                "The directory cannot be empty. Please specify a path, or remove this field",
            ));
        }

        if self.filename_max_length == 0 {
            errors.push(ValidationError::new(
                "filenameMaxLength",
                "The length must be at least 1. Example: 100",
            ));
        }

        if self.import.include_patterns.is_empty() {
            errors.push(ValidationError::new(
                "import.includePatterns",
                "At least one pattern is required. Example: [\"**/*.json\"]",
            ));
        }

        for (index, pattern) in self.import.include_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("import.includePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        for (index, pattern) in self.import.exclude_patterns.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("import.excludePatterns[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if self.encryption.secret_env.is_empty() {
            errors.push(ValidationError::new(
                "encryption.secretEnv",
                "The variable name cannot be empty. Example: \"LOCAL_LOCALIZATOR_SECRET\"",
            ));
        }

        if self.encryption.salt.is_empty() {
            errors.push(ValidationError::new("encryption.salt", "The salt cannot be empty"));
        }

        if self.encryption.iterations == 0 {
            errors.push(ValidationError::new(
                "encryption.iterations",
                "The iteration count must be at least 1. Example: 100000",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
