//! Library scan and import of existing translation files.

use std::collections::{
    BTreeMap,
    HashMap,
    HashSet,
};
use std::path::{
    Path,
    PathBuf,
};

use super::{
    Dialogs,
    ExportReport,
    FileFilter,
    ProjectStore,
    StoreError,
};
use crate::convert::{
    TranslationDocument,
    detect_language_from_path,
};
use crate::project::{
    NewProject,
    Project,
    ProjectError,
};
use crate::types::{
    Language,
    LanguageTranslation,
    ProjectType,
    TranslationEntry,
};

/// Prefix given to projects imported from another library's `.prj` file.
const IMPORTED_PREFIX: &str = "[IMPORTED]";

/// A plain JSON language file selected for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFileDescriptor {
    pub path: PathBuf,
    pub code: String,
    pub base: bool,
}

impl TranslationFileDescriptor {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, code: impl Into<String>, base: bool) -> Self {
        Self { path: path.into(), code: code.into(), base }
    }

    /// Descriptor with the language code detected from the path, falling back
    /// to the file stem.
    #[must_use]
    pub fn detect(path: impl Into<PathBuf>, base: bool) -> Self {
        let path = path.into();
        let code = detect_language_from_path(&path)
            .or_else(|| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
            .unwrap_or_default();
        Self { path, code, base }
    }
}

/// Projects produced by [`ProjectStore::import_with_dialog`].
#[derive(Debug, Default)]
pub struct ImportOutcome {
    /// Project built from the picked JSON files, not yet saved.
    pub created: Option<Project>,
    /// `.prj` files copied into this library.
    pub imported: Vec<Project>,
    /// Why the picked JSON files could not become a project.
    pub translation_error: Option<StoreError>,
}

/// Outcome of [`ProjectStore::save_all`].
#[derive(Debug, Default)]
pub struct SaveAllReport {
    /// Saved projects with the result of their file export.
    pub saved: Vec<(Project, ExportReport)>,
    /// Name and error of every project whose `.prj` file could not be written.
    pub failed: Vec<(String, StoreError)>,
}

impl SaveAllReport {
    /// Projects saved with every language file written.
    #[must_use]
    pub fn complete_count(&self) -> usize {
        self.saved.iter().filter(|(_, export)| export.is_complete()).count()
    }
}

impl ProjectStore {
    /// Loads every project file of the library.
    ///
    /// Files that fail to load are logged and skipped.
    ///
    /// # Errors
    /// Only when the projects directory itself cannot be listed.
    pub async fn scan(&self) -> Result<Vec<Project>, StoreError> {
        if !self.fs.exists(&self.projects_dir).await {
            tracing::debug!(dir = %self.projects_dir.display(), "Projects directory does not exist");
            return Ok(Vec::new());
        }

        let entries = self
            .fs
            .list_directory_recursive(&self.projects_dir)
            .await
            .map_err(StoreError::io(&self.projects_dir))?;
        let files: Vec<PathBuf> =
            entries.into_iter().filter(|entry| entry.is_file()).map(|entry| entry.path).collect();

        let results = futures::future::join_all(files.iter().map(|path| self.load(path))).await;

        let mut projects = Vec::new();
        for (path, result) in files.iter().zip(results) {
            match result {
                Ok(Some(project)) => projects.push(project),
                Ok(None) => {
                    tracing::debug!(path = %path.display(), "Project file vanished during scan");
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, reason = ?e, "Skipping project file");
                }
            }
        }

        tracing::debug!(found = files.len(), loaded = projects.len(), "Scan finished");
        Ok(projects)
    }

    /// Re-saves every project of the library, reconciling and exporting each.
    ///
    /// A project that fails to save is logged and reported; the rest still run.
    ///
    /// # Errors
    /// Only the errors of [`Self::scan`].
    pub async fn save_all(&self) -> Result<SaveAllReport, StoreError> {
        let mut report = SaveAllReport::default();
        for mut project in self.scan().await? {
            match self.save(&mut project).await {
                Ok(export) => report.saved.push((project, export)),
                Err(e) => {
                    tracing::error!(name = project.name(), error = %e, "Failed to save project");
                    report.failed.push((project.name().to_string(), e));
                }
            }
        }
        tracing::debug!(saved = report.saved.len(), failed = report.failed.len(), "Save all finished");
        Ok(report)
    }

    /// Builds a new project from plain JSON language files.
    ///
    /// Keys are the union over all files, base file first; a key missing from
    /// a file gets the configured fallback value.
    ///
    /// # Errors
    /// - `InvalidTranslationFile` for unreadable or non-object JSON
    /// - `Project` for an empty selection or duplicate language codes
    pub async fn create_project_from_translation_files(
        &self,
        files: &[TranslationFileDescriptor],
    ) -> Result<Project, StoreError> {
        let first = files.first().ok_or_else(|| {
            ProjectError::validation("languages", "At least one language is required")
        })?;
        let folder = first.path.parent().map(Path::to_path_buf).unwrap_or_default();

        let mut ordered: Vec<&TranslationFileDescriptor> = files.iter().collect();
        ordered.sort_by_key(|descriptor| !descriptor.base);

        let reads = ordered.iter().map(|descriptor| self.read_translation_file(&descriptor.path));
        let documents = futures::future::join_all(reads)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        let mut keys: Vec<TranslationEntry> = Vec::new();
        let mut seen = HashSet::new();
        let mut values: Vec<HashMap<String, String>> = Vec::with_capacity(documents.len());
        for document in documents {
            let mut by_key = HashMap::new();
            for entry in document.into_entries() {
                if seen.insert(entry.key.clone()) {
                    keys.push(entry.blank());
                }
                by_key.insert(entry.key, entry.value);
            }
            values.push(by_key);
        }

        let languages: Vec<Language> = ordered
            .iter()
            .map(|descriptor| Language { base: descriptor.base, ..Language::new(&descriptor.code, "") })
            .collect();
        let translation: BTreeMap<String, LanguageTranslation> = languages
            .iter()
            .zip(&values)
            .map(|(language, by_key)| {
                let data = keys
                    .iter()
                    .map(|key| TranslationEntry {
                        value: by_key
                            .get(&key.key)
                            .cloned()
                            .unwrap_or_else(|| self.fallback_value.clone()),
                        ..key.clone()
                    })
                    .collect();
                (language.code.clone(), LanguageTranslation::new(language.clone(), data))
            })
            .collect();

        let name = folder
            .file_name()
            .map_or_else(|| "Imported project".to_string(), |name| name.to_string_lossy().into_owned());
        let project = NewProject::new(name, folder, languages)
            .project_type(ProjectType::React)
            .translation(translation)
            .build()?;

        tracing::info!(
            name = project.name(),
            languages = files.len(),
            keys = keys.len(),
            "Project created from translation files"
        );
        Ok(project)
    }

    /// Reads and parses one plain JSON language file.
    async fn read_translation_file(&self, path: &Path) -> Result<TranslationDocument, StoreError> {
        let invalid = |reason: String| StoreError::InvalidTranslationFile {
            path: path.to_path_buf(),
            reason,
        };
        let raw = self.fs.read_file(path).await.map_err(|e| invalid(e.to_string()))?;
        let value = serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))?;
        TranslationDocument::from_value(value).map_err(|e| invalid(e.to_string()))
    }

    /// Copies a `.prj` file from elsewhere into this library under a marked name.
    ///
    /// # Errors
    /// `NotFound` when the file is missing, otherwise the errors of [`Self::load`] and [`Self::save`].
    pub async fn import_project_file(&self, path: &Path) -> Result<Project, StoreError> {
        let mut project =
            self.load(path).await?.ok_or_else(|| StoreError::NotFound(path.to_path_buf()))?;
        project.set_name(format!("{IMPORTED_PREFIX} {}", project.name()))?;
        self.save(&mut project).await?;
        Ok(project)
    }

    /// Import driven by a file picker.
    ///
    /// Picked `.prj` files are imported one by one; picked JSON files become one
    /// new project whose base language is the first file.
    ///
    /// A failing `.prj` import is logged and skipped. A failure to build the
    /// project from JSON files is kept in [`ImportOutcome::translation_error`]
    /// next to the `.prj` files already written.
    pub async fn import_with_dialog(&self, dialogs: &dyn Dialogs) -> ImportOutcome {
        let filters = [FileFilter::new("Translation files", &["json"]), FileFilter::new("Projects", &["prj"])];
        let picked = dialogs.pick_files(&filters).await;
        let [json_filter, project_filter] = &filters;

        let mut outcome = ImportOutcome::default();
        for path in picked.iter().filter(|path| project_filter.accepts(path)) {
            match self.import_project_file(path).await {
                Ok(project) => outcome.imported.push(project),
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping project file"),
            }
        }

        let descriptors: Vec<TranslationFileDescriptor> = picked
            .iter()
            .filter(|path| json_filter.accepts(path))
            .enumerate()
            .map(|(index, path)| TranslationFileDescriptor::detect(path, index == 0))
            .collect();
        if !descriptors.is_empty() {
            match self.create_project_from_translation_files(&descriptors).await {
                Ok(project) => outcome.created = Some(project),
                Err(e) => {
                    tracing::warn!(files = descriptors.len(), error = %e, "Translation files not imported");
                    outcome.translation_error = Some(e);
                }
            }
        }
        outcome
    }

    /// Moves the export folder of `project` to a picked directory and saves it.
    ///
    /// Returns `Ok(None)` when the dialog is cancelled.
    ///
    /// # Errors
    /// Errors of [`Self::save`].
    pub async fn relocate(
        &self,
        project: &mut Project,
        dialogs: &dyn Dialogs,
    ) -> Result<Option<ExportReport>, StoreError> {
        let Some(folder) = dialogs.pick_directory().await else {
            tracing::debug!(id = project.id(), "Relocation cancelled");
            return Ok(None);
        };
        project.set_folder(folder)?;
        self.save(project).await.map(Some)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use async_trait::async_trait;
    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::crypto::{
        EncryptionContext,
        KEY_LEN,
    };
    use crate::storage::{
        DirEntry,
        FileSystem,
        LocalFileSystem,
    };

    fn store(projects_dir: &Path) -> ProjectStore {
        ProjectStore::new(
            Arc::new(LocalFileSystem),
            Arc::new(EncryptionContext::from_key([5u8; KEY_LEN])),
            projects_dir,
        )
    }

    fn keys(project: &Project, code: &str) -> Vec<String> {
        project.translation()[code].keys().map(str::to_string).collect()
    }

    fn value<'a>(project: &'a Project, code: &str, key: &str) -> &'a str {
        project.translation()[code].find(key).unwrap().value.as_str()
    }

    struct FixedDialogs {
        directory: Option<PathBuf>,
        files: Vec<PathBuf>,
    }

    #[async_trait]
    impl Dialogs for FixedDialogs {
        async fn pick_directory(&self) -> Option<PathBuf> {
            self.directory.clone()
        }

        async fn pick_files(&self, _filters: &[FileFilter]) -> Vec<PathBuf> {
            self.files.clone()
        }
    }

    #[rstest]
    #[case::code_in_name("/app/locales/fr.json", "fr")]
    #[case::code_in_directory("/app/locales/de/common.json", "de")]
    #[case::stem_fallback("/app/strings.json", "strings")]
    fn descriptor_detects_language(#[case] path: &str, #[case] code: &str) {
        assert_that!(TranslationFileDescriptor::detect(path, false).code, eq(code));
    }

    #[tokio::test]
    async fn scan_of_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();

        let projects = store(&temp_dir.path().join("nothing")).scan().await.unwrap();

        assert!(projects.is_empty());
    }

    #[tokio::test]
    async fn create_from_files_unions_keys_with_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("web");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("en.json"), r#"{"a": "A", "nested": {"b": "B"}}"#).unwrap();
        fs::write(dir.join("fr.json"), r#"{"a": "Ah", "c": "Cé"}"#).unwrap();
        let store = store(temp_dir.path()).with_settings(&crate::config::AppSettings {
            import: crate::config::ImportConfig {
                fallback_value: "?".to_string(),
                ..crate::config::ImportConfig::default()
            },
            ..crate::config::AppSettings::default()
        });

        let project = store
            .create_project_from_translation_files(&[
                TranslationFileDescriptor::new(dir.join("fr.json"), "fr", false),
                TranslationFileDescriptor::new(dir.join("en.json"), "en", true),
            ])
            .await
            .unwrap();

        assert_that!(keys(&project, "en"), elements_are![eq("a"), eq("nested.b"), eq("c")]);
        assert_that!(keys(&project, "fr"), elements_are![eq("a"), eq("nested.b"), eq("c")]);
        assert_that!(value(&project, "en", "c"), eq("?"));
        assert_that!(value(&project, "fr", "nested.b"), eq("?"));
        assert_that!(value(&project, "fr", "c"), eq("Cé"));
        assert_that!(project.name(), eq("web"));
        assert_that!(project.folder(), eq(dir.as_path()));
        assert_that!(project.project_type(), eq(ProjectType::React));
        assert_that!(project.base_language().map(|l| l.code.as_str()), some(eq("en")));
    }

    #[tokio::test]
    async fn create_from_invalid_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("en.json");
        fs::write(&path, "[1, 2]").unwrap();

        let result = store(temp_dir.path())
            .create_project_from_translation_files(&[TranslationFileDescriptor::new(&path, "en", true)])
            .await;

        assert!(matches!(result, Err(StoreError::InvalidTranslationFile { .. })));
    }

    #[tokio::test]
    async fn create_from_no_files_fails() {
        let temp_dir = TempDir::new().unwrap();

        let result = store(temp_dir.path()).create_project_from_translation_files(&[]).await;

        assert!(matches!(result, Err(StoreError::Project(ProjectError::Validation { .. }))));
    }

    #[tokio::test]
    async fn import_with_dialog_handles_json_and_prj() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("en.json"), r#"{"hello": "Hello"}"#).unwrap();
        fs::write(source.join("es.json"), r#"{"hello": "Hola"}"#).unwrap();

        let other_library = store(&temp_dir.path().join("other"));
        let mut foreign = other_library
            .create_project_from_translation_files(&[TranslationFileDescriptor::new(
                source.join("en.json"),
                "en",
                true,
            )])
            .await
            .unwrap();
        other_library.save(&mut foreign).await.unwrap();

        let library = store(&temp_dir.path().join("library"));
        let dialogs = FixedDialogs {
            directory: None,
            files: vec![
                source.join("en.json"),
                other_library.project_path(&foreign),
                source.join("es.json"),
            ],
        };

        let outcome = library.import_with_dialog(&dialogs).await;

        let created = outcome.created.unwrap();
        assert_that!(created.languages().len(), eq(2));
        assert_that!(created.base_language().map(|l| l.code.as_str()), some(eq("en")));
        assert_that!(outcome.imported.len(), eq(1));
        assert_that!(outcome.imported[0].name(), eq("[IMPORTED] src"));
        assert!(library.project_path(&outcome.imported[0]).exists());
        assert!(outcome.translation_error.is_none());
    }

    #[tokio::test]
    async fn import_with_dialog_keeps_prj_imports_when_json_fails() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("en.json"), r#"{"hello": "Hello"}"#).unwrap();
        fs::write(source.join("fr.json"), "[1, 2, 3]").unwrap();

        let other_library = store(&temp_dir.path().join("other"));
        let mut foreign = other_library
            .create_project_from_translation_files(&[TranslationFileDescriptor::new(
                source.join("en.json"),
                "en",
                true,
            )])
            .await
            .unwrap();
        other_library.save(&mut foreign).await.unwrap();

        let library = store(&temp_dir.path().join("library"));
        let dialogs = FixedDialogs {
            directory: None,
            files: vec![other_library.project_path(&foreign), source.join("fr.json")],
        };

        let outcome = library.import_with_dialog(&dialogs).await;

        assert!(outcome.created.is_none());
        assert_that!(outcome.imported.len(), eq(1));
        assert!(library.project_path(&outcome.imported[0]).exists());
        assert!(matches!(
            outcome.translation_error,
            Some(StoreError::InvalidTranslationFile { .. })
        ));
    }

    #[tokio::test]
    async fn relocate_moves_export_folder() {
        let temp_dir = TempDir::new().unwrap();
        let library = store(&temp_dir.path().join("library"));
        let mut project = NewProject::new(
            "Move me",
            temp_dir.path().join("old"),
            vec![Language::new("en", "English")],
        )
        .project_type(ProjectType::Vuejs)
        .build()
        .unwrap();

        let cancelled = FixedDialogs { directory: None, files: Vec::new() };
        assert!(library.relocate(&mut project, &cancelled).await.unwrap().is_none());
        assert_that!(project.folder(), eq(temp_dir.path().join("old").as_path()));

        let target = temp_dir.path().join("new");
        let picked = FixedDialogs { directory: Some(target.clone()), files: Vec::new() };
        let report = library.relocate(&mut project, &picked).await.unwrap().unwrap();

        assert!(report.is_complete());
        assert!(target.join("locales/en.json").exists());
        assert_that!(project.folder(), eq(target.as_path()));
    }

    /// Local disk that refuses to write project files whose name contains `broken`.
    struct RefusingFileSystem;

    #[async_trait]
    impl FileSystem for RefusingFileSystem {
        async fn read_file(&self, path: &Path) -> std::io::Result<String> {
            LocalFileSystem.read_file(path).await
        }

        async fn write_file(&self, full_path: &Path, content: &str) -> std::io::Result<PathBuf> {
            let name = full_path.file_name().map(|name| name.to_string_lossy().to_string()).unwrap_or_default();
            if name.contains("broken") && name.ends_with(".prj") {
                return Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"));
            }
            LocalFileSystem.write_file(full_path, content).await
        }

        async fn delete_file(&self, path: &Path) -> std::io::Result<()> {
            LocalFileSystem.delete_file(path).await
        }

        async fn exists(&self, path: &Path) -> bool {
            LocalFileSystem.exists(path).await
        }

        async fn list_directory_recursive(&self, path: &Path) -> std::io::Result<Vec<DirEntry>> {
            LocalFileSystem.list_directory_recursive(path).await
        }
    }

    #[tokio::test]
    async fn save_all_continues_after_failed_project() {
        let temp_dir = TempDir::new().unwrap();
        let projects_dir = temp_dir.path().join("library");
        let library = store(&projects_dir);
        for name in ["Alpha", "Broken", "Gamma"] {
            let mut project = NewProject::new(
                name,
                temp_dir.path().join(name),
                vec![Language::new("en", "English")],
            )
            .project_type(ProjectType::Vuejs)
            .build()
            .unwrap();
            library.save(&mut project).await.unwrap();
        }
        let refusing = ProjectStore::new(
            Arc::new(RefusingFileSystem),
            Arc::new(EncryptionContext::from_key([5u8; KEY_LEN])),
            &projects_dir,
        );

        let report = refusing.save_all().await.unwrap();

        assert_that!(report.saved.len(), eq(2));
        assert_that!(report.complete_count(), eq(2));
        assert_that!(report.failed.len(), eq(1));
        assert_that!(report.failed[0].0, eq("Broken"));
        assert!(matches!(report.failed[0].1, StoreError::Io { .. }));
    }
}
