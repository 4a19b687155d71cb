//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    AppSettings,
    ConfigError,
    loader,
};
use crate::crypto::EncryptionContext;

/// Directory name under the platform data directory.
pub const APP_DIR_NAME: &str = "local-localizator";

/// Subdirectory holding `.prj` files unless `projectsDir` is set.
pub const PROJECTS_DIR_NAME: &str = "projects";

/// 設定管理を行う
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: AppSettings,

    /// `settings.json` と `projects/` を置くディレクトリ
    data_dir: PathBuf,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self { current_settings: AppSettings::default(), data_dir }
    }

    /// Manager rooted at `<platform data dir>/local-localizator`.
    ///
    /// # Errors
    /// `NoDataDir` when the platform has no per-user data directory.
    pub fn with_default_data_dir() -> Result<Self, ConfigError> {
        let data_dir = dirs::data_dir().ok_or(ConfigError::NoDataDir)?;
        Ok(Self::new(data_dir.join(APP_DIR_NAME)))
    }

    /// 設定を読み込む
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self) -> Result<(), ConfigError> {
        tracing::debug!(data_dir = %self.data_dir.display(), "Loading settings");

        let settings = loader::load_from_data_dir(&self.data_dir)?.unwrap_or_default();

        settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = settings;
        tracing::debug!(settings = ?self.current_settings, "Settings loaded successfully");

        Ok(())
    }

    /// 設定を更新する
    ///
    /// # Errors
    /// バリデーションエラー
    pub fn update_settings(&mut self, new_settings: AppSettings) -> Result<(), ConfigError> {
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &AppSettings {
        &self.current_settings
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Directory holding the encrypted project files.
    #[must_use]
    pub fn projects_dir(&self) -> PathBuf {
        self.current_settings
            .projects_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join(PROJECTS_DIR_NAME))
    }

    /// Derives the encryption key from the secret in `encryption.secretEnv`.
    ///
    /// # Errors
    /// - `MissingSecret` when the variable is unset or empty
    /// - `Crypto` when key derivation fails
    pub fn encryption_context(&self) -> Result<EncryptionContext, ConfigError> {
        let name = &self.current_settings.encryption.secret_env;
        self.encryption_context_from(std::env::var(name).ok())
    }

    /// Builds the context from an already resolved secret.
    fn encryption_context_from(
        &self,
        secret: Option<String>,
    ) -> Result<EncryptionContext, ConfigError> {
        let encryption = &self.current_settings.encryption;
        let secret = secret
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| ConfigError::MissingSecret(encryption.secret_env.clone()))?;
        let context = EncryptionContext::from_passphrase(
            secret.as_bytes(),
            encryption.salt.as_bytes(),
            encryption.iterations,
        )?;
        tracing::debug!(iterations = encryption.iterations, "Encryption key derived");
        Ok(context)
    }
}
