//! Application settings.
/// Settings file loader
mod loader;
/// Configuration manager
mod manager;
/// Import file pattern matcher
mod matcher;
/// Configuration types and settings
mod types;

pub use loader::SETTINGS_FILE_NAME;
pub use manager::{
    APP_DIR_NAME,
    ConfigManager,
    PROJECTS_DIR_NAME,
};
pub use matcher::{
    FileMatcher,
    MatcherError,
};
pub use types::{
    AppSettings,
    ConfigError,
    EncryptionConfig,
    ImportConfig,
    ValidationError,
};
