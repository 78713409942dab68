//! Forest persistence contracts and error taxonomy.
//!
//! # Responsibility
//! - Define the storage seam the tree service mutates through.
//! - Keep document-format details inside store implementations.
//!
//! # Invariants
//! - `load` never yields a forest with unsorted sibling lists.
//! - `save` persists the sanitized wire shape only, never runtime ids.

use crate::model::forest::Forest;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod json_file;

/// Result type used by store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from forest persistence.
#[derive(Debug)]
pub enum StoreError {
    /// Document could not be read, created or replaced.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Document exists but is not a valid project-manager JSON array.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// In-memory forest could not be encoded to JSON.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "project store I/O failed at `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => write!(
                f,
                "project document `{}` is not valid: {source}",
                path.display()
            ),
            Self::Encode(source) => write!(f, "project forest could not be encoded: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Encode(source) => Some(source),
        }
    }
}

/// Persistence seam for the project-manager forest.
pub trait ForestStore {
    /// Loads the persisted document, bootstrapping an empty one if absent.
    fn load(&self) -> StoreResult<Forest>;
    /// Replaces the persisted document with the sanitized forest.
    fn save(&self, forest: &Forest) -> StoreResult<()>;
}
