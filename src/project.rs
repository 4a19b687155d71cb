//! The project aggregate: languages, translation entries and key lifecycle.

mod error;
mod keys;
mod model;
mod reconcile;

pub use error::ProjectError;
pub use model::{
    NewProject,
    Project,
    ProjectRecord,
    format_timestamp,
};
