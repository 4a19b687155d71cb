//! Persistence of projects and the file-system collaborators it depends on.
mod dialog;
mod error;
mod fs;
mod gateway;
mod scanner;

pub use dialog::{
    Dialogs,
    DirectoryDialogs,
    FileFilter,
};
pub use error::StoreError;
pub use fs::{
    DirEntry,
    EntryKind,
    FileSystem,
    LocalFileSystem,
};
pub use gateway::{
    ExportReport,
    ProjectStore,
};
pub use scanner::{
    ImportOutcome,
    SaveAllReport,
    TranslationFileDescriptor,
};
