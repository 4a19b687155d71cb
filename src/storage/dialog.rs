//! Directory and file pickers used by import and relocation.

use std::path::{
    Path,
    PathBuf,
};

use async_trait::async_trait;
use ignore::WalkBuilder;

use crate::config::FileMatcher;

/// Extension filter offered by a file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    #[must_use]
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self { name: name.into(), extensions: extensions.iter().map(|e| (*e).to_string()).collect() }
    }

    /// True if the file extension is one of the filter's, ignoring case.
    #[must_use]
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(extension)))
    }
}

#[async_trait]
pub trait Dialogs: Send + Sync {
    /// `None` when the user cancels.
    async fn pick_directory(&self) -> Option<PathBuf>;

    /// Empty when the user cancels.
    async fn pick_files(&self, filters: &[FileFilter]) -> Vec<PathBuf>;
}

/// Non-interactive [`Dialogs`] answering from a fixed directory.
///
/// `pick_files` returns every file below the root matching the import
/// patterns and one of the filters; `pick_directory` returns the configured target.
#[derive(Debug, Clone)]
pub struct DirectoryDialogs {
    matcher: FileMatcher,
    target_dir: Option<PathBuf>,
}

impl DirectoryDialogs {
    #[must_use]
    pub const fn new(matcher: FileMatcher) -> Self {
        Self { matcher, target_dir: None }
    }

    #[must_use]
    pub fn with_target_dir(mut self, target_dir: impl Into<PathBuf>) -> Self {
        self.target_dir = Some(target_dir.into());
        self
    }

    /// Files below the root accepted by the matcher and one of `filters`.
    fn find_files(&self, filters: &[FileFilter]) -> Vec<PathBuf> {
        let root = self.matcher.root();
        let mut found_files = Vec::new();
        for result in WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .sort_by_file_name(Ord::cmp)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            if !self.matcher.is_translation_file(path) {
                continue;
            }
            if !filters.is_empty() && !filters.iter().any(|filter| filter.accepts(path)) {
                continue;
            }

            found_files.push(path.to_path_buf());
        }
        found_files
    }
}

#[async_trait]
impl Dialogs for DirectoryDialogs {
    async fn pick_directory(&self) -> Option<PathBuf> {
        self.target_dir.clone()
    }

    async fn pick_files(&self, filters: &[FileFilter]) -> Vec<PathBuf> {
        let files = self.find_files(filters);
        tracing::debug!(root = %self.matcher.root().display(), count = files.len(), "Picked files");
        files
    }
}
