//! Project construction, metadata and language configuration.

use std::collections::{
    BTreeMap,
    HashSet,
};
use std::path::{
    Path,
    PathBuf,
};

use chrono::{
    DateTime,
    Local,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::ProjectError;
use crate::convert::{
    DEFAULT_MAX_FILENAME_LENGTH,
    sanitize_filename,
};
use crate::stats::ProjectStatistics;
use crate::types::{
    Language,
    LanguageTranslation,
    ObjectStructureType,
    ProjectStats,
    ProjectStatus,
    ProjectType,
    ensure_single_base,
    generate_token,
};

/// Extension of persisted project files.
pub(crate) const PROJECT_FILE_EXTENSION: &str = "prj";

/// A localization project.
///
/// Derived fields (`progress`, `status`, `emptySlots`, `emptySlotsAsString`)
/// are only written by [`Project::calculate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ProjectRecord")]
pub struct Project {
    pub(super) id: String,
    pub(super) slug: String,
    pub(super) name: String,
    pub(super) description: String,
    pub(super) folder: PathBuf,
    #[serde(rename = "type")]
    pub(super) project_type: ProjectType,
    pub(super) object_structure_type: ObjectStructureType,
    pub(super) structure: String,
    pub(super) created_at: DateTime<Utc>,
    pub(super) last_modified: DateTime<Utc>,
    pub(super) languages: Vec<Language>,
    pub(super) translation: BTreeMap<String, LanguageTranslation>,
    pub(super) progress: u8,
    pub(super) status: ProjectStatus,
    pub(super) empty_slots: usize,
    pub(super) empty_slots_as_string: String,
    pub(super) stats: ProjectStats,
}

/// Persisted form of a project, as read back from disk.
///
/// Everything except `name`, `folder` and `languages` is optional so that
/// files written by older versions still load.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub folder: Option<PathBuf>,
    #[serde(default, rename = "type")]
    pub project_type: ProjectType,
    #[serde(default)]
    pub object_structure_type: ObjectStructureType,
    #[serde(default)]
    pub structure: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default, alias = "selectedLanguages")]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub translation: BTreeMap<String, LanguageTranslation>,
    #[serde(default)]
    pub stats: Option<ProjectStats>,
}

impl TryFrom<ProjectRecord> for Project {
    type Error = ProjectError;

    fn try_from(record: ProjectRecord) -> Result<Self, Self::Error> {
        Self::restore(record)
    }
}

/// Parameters of a brand-new project.
#[derive(Debug, Clone)]
pub struct NewProject {
    name: String,
    folder: PathBuf,
    languages: Vec<Language>,
    description: String,
    project_type: ProjectType,
    object_structure_type: ObjectStructureType,
    structure: Option<String>,
    translation: BTreeMap<String, LanguageTranslation>,
}

impl NewProject {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        folder: impl Into<PathBuf>,
        languages: Vec<Language>,
    ) -> Self {
        Self {
            name: name.into(),
            folder: folder.into(),
            languages,
            description: String::new(),
            project_type: ProjectType::default(),
            object_structure_type: ObjectStructureType::default(),
            structure: None,
            translation: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub const fn project_type(mut self, project_type: ProjectType) -> Self {
        self.project_type = project_type;
        self
    }

    #[must_use]
    pub const fn object_structure_type(mut self, object_structure_type: ObjectStructureType) -> Self {
        self.object_structure_type = object_structure_type;
        self
    }

    /// Export path template; overrides the template of the project type.
    #[must_use]
    pub fn structure(mut self, structure: impl Into<String>) -> Self {
        self.structure = Some(structure.into());
        self
    }

    /// Pre-filled translation data, e.g. from imported files.
    #[must_use]
    pub fn translation(mut self, translation: BTreeMap<String, LanguageTranslation>) -> Self {
        self.translation = translation;
        self
    }

    /// Starts every language with an empty entry list instead of the placeholder key.
    #[must_use]
    pub fn empty(mut self) -> Self {
        for language in &self.languages {
            self.translation
                .entry(language.code.clone())
                .or_insert_with(|| LanguageTranslation::new(language.clone(), Vec::new()));
        }
        self
    }

    /// Validates the input and builds a reconciled project.
    ///
    /// # Errors
    /// `ProjectError::Validation` when the name, folder or language list is invalid.
    pub fn build(self) -> Result<Project, ProjectError> {
        let record = ProjectRecord {
            name: self.name,
            description: Some(self.description),
            folder: Some(self.folder),
            project_type: self.project_type,
            object_structure_type: self.object_structure_type,
            structure: self.structure,
            languages: self.languages,
            translation: self.translation,
            ..ProjectRecord::default()
        };
        Project::assemble(record, true)
    }
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM` in local time.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Random prefix, `_`, then the name reduced to `[a-z0-9-]`.
fn create_slug(name: &str) -> String {
    let ascii: String = name
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('-')
            } else if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                Some(c)
            } else {
                None
            }
        })
        .collect();
    let body = ascii.split('-').filter(|part| !part.is_empty()).collect::<Vec<_>>().join("-");
    format!("{}_{body}", generate_token())
}

/// Non-empty list without duplicate codes.
fn validate_languages(languages: &[Language]) -> Result<(), ProjectError> {
    if languages.is_empty() {
        return Err(ProjectError::validation("languages", "At least one language is required"));
    }
    let mut seen = HashSet::new();
    for language in languages {
        if language.code.trim().is_empty() {
            return Err(ProjectError::validation("languages", "language code is required"));
        }
        if !seen.insert(language.code.as_str()) {
            return Err(ProjectError::validation(
                "languages",
                format!("duplicate language code '{}'", language.code),
            ));
        }
    }
    Ok(())
}

impl Project {
    /// Rebuilds a persisted project, trusting its translation data as-is.
    ///
    /// # Errors
    /// `ProjectError::Validation` when required fields are missing.
    pub fn restore(record: ProjectRecord) -> Result<Self, ProjectError> {
        Self::assemble(record, false)
    }

    /// Validates `record` and derives the computed fields; `initialize` also reconciles.
    fn assemble(record: ProjectRecord, initialize: bool) -> Result<Self, ProjectError> {
        if record.name.trim().is_empty() {
            return Err(ProjectError::validation("name", "name is required"));
        }
        let folder = record.folder.filter(|folder| !folder.as_os_str().is_empty()).ok_or_else(
            || ProjectError::validation("folder", "folder path is required"),
        )?;
        validate_languages(&record.languages)?;

        let mut languages = record.languages;
        ensure_single_base(&mut languages);

        let structure = record
            .structure
            .filter(|structure| !structure.is_empty())
            .unwrap_or_else(|| record.project_type.structure_template().to_string());
        let now = Utc::now();

        let mut project = Self {
            id: record.id.unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string()),
            slug: record.slug.unwrap_or_else(|| create_slug(&record.name)),
            name: record.name,
            description: record.description.unwrap_or_default(),
            folder,
            project_type: record.project_type,
            object_structure_type: record.object_structure_type,
            structure,
            created_at: record.created_at.unwrap_or(now),
            last_modified: record.last_modified.unwrap_or(now),
            languages,
            translation: record.translation,
            progress: 100,
            status: ProjectStatus::Completed,
            empty_slots: 0,
            empty_slots_as_string: String::new(),
            stats: record.stats.unwrap_or_default(),
        };

        if initialize {
            project.reconcile();
        }
        project.calculate();

        tracing::debug!(id = %project.id, slug = %project.slug, initialize, "Project assembled");
        Ok(project)
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    #[must_use]
    pub const fn project_type(&self) -> ProjectType {
        self.project_type
    }

    #[must_use]
    pub const fn object_structure_type(&self) -> ObjectStructureType {
        self.object_structure_type
    }

    /// Export path template, e.g. `/locales/{lang}/common.json`.
    #[must_use]
    pub fn structure(&self) -> &str {
        &self.structure
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub const fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    #[must_use]
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    #[must_use]
    pub fn base_language(&self) -> Option<&Language> {
        self.languages.iter().find(|language| language.base)
    }

    #[must_use]
    pub const fn translation(&self) -> &BTreeMap<String, LanguageTranslation> {
        &self.translation
    }

    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    #[must_use]
    pub const fn empty_slots(&self) -> usize {
        self.empty_slots
    }

    /// Names of the languages that still have untranslated keys.
    #[must_use]
    pub fn empty_slots_as_string(&self) -> &str {
        &self.empty_slots_as_string
    }

    #[must_use]
    pub const fn stats(&self) -> &ProjectStats {
        &self.stats
    }

    /// Name of the persisted project file.
    #[must_use]
    pub fn filename(&self) -> String {
        self.filename_with_max_length(DEFAULT_MAX_FILENAME_LENGTH)
    }

    #[must_use]
    pub fn filename_with_max_length(&self, max_length: usize) -> String {
        format!("{}.{PROJECT_FILE_EXTENSION}", sanitize_filename(&self.slug, max_length))
    }

    #[must_use]
    pub fn last_modified_display(&self) -> String {
        format_timestamp(self.last_modified)
    }

    #[must_use]
    pub fn created_at_display(&self) -> String {
        format_timestamp(self.created_at)
    }

    #[must_use]
    pub fn last_edited_key_at_display(&self) -> String {
        format_timestamp(self.stats.last_edited_key_at)
    }

    /// # Errors
    /// `ProjectError::Validation` when the name is blank.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ProjectError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProjectError::validation("name", "name is required"));
        }
        self.name = name;
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// # Errors
    /// `ProjectError::Validation` when the path is empty.
    pub fn set_folder(&mut self, folder: impl Into<PathBuf>) -> Result<(), ProjectError> {
        let folder = folder.into();
        if folder.as_os_str().is_empty() {
            return Err(ProjectError::validation("folder", "folder path is required"));
        }
        self.folder = folder;
        Ok(())
    }

    /// Switching to a preset type also switches to its path template.
    pub fn set_project_type(&mut self, project_type: ProjectType) {
        self.project_type = project_type;
        if project_type != ProjectType::Custom {
            project_type.structure_template().clone_into(&mut self.structure);
        }
    }

    pub const fn set_object_structure_type(&mut self, object_structure_type: ObjectStructureType) {
        self.object_structure_type = object_structure_type;
    }

    /// Sets a custom export path template.
    pub fn set_structure(&mut self, structure: impl Into<String>) {
        self.project_type = ProjectType::Custom;
        self.structure = structure.into();
    }

    /// Replaces the language set. Translation data follows on the next [`Project::reconcile`].
    ///
    /// # Errors
    /// `ProjectError::Validation` for an empty list or duplicate codes.
    pub fn set_languages(&mut self, mut languages: Vec<Language>) -> Result<(), ProjectError> {
        validate_languages(&languages)?;
        ensure_single_base(&mut languages);
        self.languages = languages;
        Ok(())
    }

    /// # Errors
    /// `ProjectError::Validation` when the code is already configured.
    pub fn add_language(&mut self, language: Language) -> Result<(), ProjectError> {
        let code = language.code.clone();
        let is_base = language.base;
        let mut languages = self.languages.clone();
        languages.push(language);
        validate_languages(&languages)?;
        self.languages = languages;
        if is_base {
            self.set_base_language(&code)?;
        }
        ensure_single_base(&mut self.languages);
        Ok(())
    }

    /// Removing the base language promotes the first remaining one.
    ///
    /// # Errors
    /// - `UndefinedLanguage` for an unknown code
    /// - `Validation` when it is the last language
    pub fn remove_language(&mut self, code: &str) -> Result<(), ProjectError> {
        let index = self
            .languages
            .iter()
            .position(|language| language.code == code)
            .ok_or_else(|| ProjectError::UndefinedLanguage(code.to_string()))?;
        if self.languages.len() == 1 {
            return Err(ProjectError::validation("languages", "At least one language is required"));
        }
        self.languages.remove(index);
        ensure_single_base(&mut self.languages);
        Ok(())
    }

    /// # Errors
    /// `UndefinedLanguage` for an unknown code.
    pub fn set_base_language(&mut self, code: &str) -> Result<(), ProjectError> {
        if !self.languages.iter().any(|language| language.code == code) {
            return Err(ProjectError::UndefinedLanguage(code.to_string()));
        }
        for language in &mut self.languages {
            language.base = language.code == code;
        }
        Ok(())
    }

    /// Marks the project as modified now.
    pub(crate) fn touch(&mut self) {
        self.last_modified = Utc::now();
    }

    /// Recomputes the derived statistics fields.
    pub fn calculate(&mut self) {
        let statistics = ProjectStatistics::compute(self);
        self.progress = statistics.progress;
        self.status = statistics.status();
        self.empty_slots = statistics.empty_slots_count;
        self.empty_slots_as_string = self
            .languages
            .iter()
            .filter(|language| statistics.empty_slots.get(&language.code).is_some_and(|n| *n > 0))
            .map(Language::display_name)
            .collect::<Vec<_>>()
            .join(", ");
    }
}
