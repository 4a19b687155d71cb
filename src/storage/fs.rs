//! File-system access used by the persistence gateway.

use std::io;
use std::path::{
    Path,
    PathBuf,
};

use async_trait::async_trait;
use ignore::WalkBuilder;
use serde::{
    Deserialize,
    Serialize,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

/// One item of a recursive directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    pub path: PathBuf,
}

impl DirEntry {
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Reads the whole file as UTF-8.
    async fn read_file(&self, path: &Path) -> io::Result<String>;

    /// Writes `content`, creating missing parent directories, and returns the written path.
    async fn write_file(&self, full_path: &Path, content: &str) -> io::Result<PathBuf>;

    /// Removes a single file.
    async fn delete_file(&self, path: &Path) -> io::Result<()>;

    /// True for an existing file or directory.
    async fn exists(&self, path: &Path) -> bool;

    /// Lists `path` itself and everything below it.
    async fn list_directory_recursive(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn read_file(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn write_file(&self, full_path: &Path, content: &str) -> io::Result<PathBuf> {
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(full_path, content).await?;
        Ok(full_path.to_path_buf())
    }

    async fn delete_file(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn list_directory_recursive(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let root = path.to_path_buf();
        tokio::task::spawn_blocking(move || walk(&root)).await.map_err(io::Error::other)?
    }
}

/// Blocking recursive listing, sorted by file name.
fn walk(root: &Path) -> io::Result<Vec<DirEntry>> {
    if !root.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Path does not exist: {}", root.display()),
        ));
    }

    let mut entries = Vec::new();
    for result in WalkBuilder::new(root)
        .standard_filters(false)
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
        let kind = if entry.file_type().is_some_and(|ft| ft.is_dir()) {
            EntryKind::Folder
        } else {
            EntryKind::File
        };
        entries.push(DirEntry {
            kind,
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.into_path(),
        });
    }
    Ok(entries)
}
