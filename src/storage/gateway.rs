//! Encrypted `.prj` persistence and per-language JSON export.

use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;

use serde_json::Value;

use super::{
    FileSystem,
    StoreError,
};
use crate::config::AppSettings;
use crate::convert::{
    DEFAULT_MAX_FILENAME_LENGTH,
    FlatDocument,
};
use crate::crypto::{
    EncryptionContext,
    Envelope,
};
use crate::project::Project;
use crate::template::{
    Token,
    parse_template,
    resolve_path,
};
use crate::types::{
    Language,
    ObjectStructureType,
};

/// Outcome of exporting the per-language files of a project.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    /// Language code and error of every file that could not be written.
    pub failed: Vec<(String, StoreError)>,
}

impl ExportReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Saves, loads, deletes and exports projects.
#[derive(Clone)]
pub struct ProjectStore {
    pub(super) fs: Arc<dyn FileSystem>,
    crypto: Arc<EncryptionContext>,
    pub(super) projects_dir: PathBuf,
    filename_max_length: usize,
    pub(super) fallback_value: String,
}

impl std::fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectStore")
            .field("projects_dir", &self.projects_dir)
            .field("filename_max_length", &self.filename_max_length)
            .finish_non_exhaustive()
    }
}

impl ProjectStore {
    #[must_use]
    pub fn new(
        fs: Arc<dyn FileSystem>,
        crypto: Arc<EncryptionContext>,
        projects_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fs,
            crypto,
            projects_dir: projects_dir.into(),
            filename_max_length: DEFAULT_MAX_FILENAME_LENGTH,
            fallback_value: String::new(),
        }
    }

    /// Applies the file name limit and import fallback of `settings`.
    #[must_use]
    pub fn with_settings(mut self, settings: &AppSettings) -> Self {
        self.filename_max_length = settings.filename_max_length;
        settings.import.fallback_value.clone_into(&mut self.fallback_value);
        self
    }

    #[must_use]
    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    /// Location of the `.prj` file of `project`.
    #[must_use]
    pub fn project_path(&self, project: &Project) -> PathBuf {
        self.projects_dir.join(project.filename_with_max_length(self.filename_max_length))
    }

    /// Reconciles, encrypts and writes `project`, then exports its language files.
    ///
    /// # Errors
    /// Serialization, encryption or writing of the `.prj` file failed.
    /// Export failures are reported per language in the returned [`ExportReport`].
    pub async fn save(&self, project: &mut Project) -> Result<ExportReport, StoreError> {
        project.touch();
        project.reconcile();
        project.calculate();

        let payload = serde_json::to_vec(project)?;
        let envelope = self.crypto.encrypt(&payload)?;
        let content = serde_json::to_string_pretty(&envelope)?;

        let path = self.project_path(project);
        self.fs.write_file(&path, &content).await.map_err(StoreError::io(&path))?;
        tracing::info!(path = %path.display(), name = project.name(), "Project saved");

        Ok(self.save_files(project).await)
    }

    /// Reads and decrypts a `.prj` file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    /// - `Io` when the file cannot be read
    /// - `TamperOrCorruption` for anything that fails after reading
    pub async fn load(&self, path: &Path) -> Result<Option<Project>, StoreError> {
        if !self.fs.exists(path).await {
            tracing::debug!(path = %path.display(), "Project file does not exist");
            return Ok(None);
        }

        let raw = self.fs.read_file(path).await.map_err(StoreError::io(path))?;
        let envelope: Envelope =
            serde_json::from_str(&raw).map_err(|e| StoreError::corrupted(path, e))?;
        let payload = self.crypto.decrypt(&envelope).map_err(|e| StoreError::corrupted(path, e))?;
        let project: Project =
            serde_json::from_slice(&payload).map_err(|e| StoreError::corrupted(path, e))?;

        tracing::debug!(path = %path.display(), id = project.id(), "Project loaded");
        Ok(Some(project))
    }

    /// Removes the `.prj` file of `project`. Exported language files are kept.
    ///
    /// # Errors
    /// `NotFound` when there is no file to delete.
    pub async fn delete(&self, project: &Project) -> Result<(), StoreError> {
        let path = self.project_path(project);
        if !self.fs.exists(&path).await {
            return Err(StoreError::NotFound(path));
        }
        self.fs.delete_file(&path).await.map_err(StoreError::io(&path))?;
        tracing::info!(path = %path.display(), "Project deleted");
        Ok(())
    }

    /// Writes one JSON file per language below the project folder.
    ///
    /// Languages are exported concurrently; one failure never stops the others.
    pub async fn save_files(&self, project: &Project) -> ExportReport {
        let tokens = parse_template(project.structure());
        let exports = project
            .languages()
            .iter()
            .map(|language| self.export_language(project, &tokens, language));
        let results = futures::future::join_all(exports).await;

        let mut report = ExportReport::default();
        for (language, result) in project.languages().iter().zip(results) {
            match result {
                Ok(path) => {
                    tracing::debug!(language = %language.code, path = %path.display(), "Exported");
                    report.written.push(path);
                }
                Err(e) => {
                    tracing::error!(language = %language.code, error = %e, "Export failed");
                    report.failed.push((language.code.clone(), e));
                }
            }
        }
        report
    }

    /// Writes the language file of `language` and returns its path.
    async fn export_language(
        &self,
        project: &Project,
        tokens: &[Token],
        language: &Language,
    ) -> Result<PathBuf, StoreError> {
        let translation = project
            .translation()
            .get(&language.code)
            .ok_or_else(|| StoreError::MissingTranslation(language.code.clone()))?;
        let relative = resolve_path(tokens, language)?;

        let flat = FlatDocument::from_entries(&translation.data);
        let document = match project.object_structure_type() {
            ObjectStructureType::Flated => flat.into_map(),
            ObjectStructureType::Nested => flat.unflatten().into_map(),
        };
        let content = serde_json::to_string_pretty(&Value::Object(document))?;

        let path = project.folder().join(relative);
        self.fs.write_file(&path, &content).await.map_err(StoreError::io(&path))
    }
}
