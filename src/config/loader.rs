//! `settings.json` の読み込み

use std::path::Path;

use super::{
    AppSettings,
    ConfigError,
};

/// Name of the settings file inside the data directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// データディレクトリから設定を読み込む
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_data_dir(data_dir: &Path) -> Result<Option<AppSettings>, ConfigError> {
    let config_path = data_dir.join(SETTINGS_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "Settings file not found");
        return Ok(None);
    }

    tracing::debug!(path = %config_path.display(), "Loading settings");

    let content = std::fs::read_to_string(&config_path)?;
    let settings: AppSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}
