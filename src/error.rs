//! Error types for the upload pipeline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error returned by an [`ArchiveStore`](crate::store::ArchiveStore) implementation.
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Terminal error of a pipeline task. Each variant names the unit that failed.
#[derive(Error, Debug)]
pub enum UploadError {
    /// A directory (the root included) could not be listed.
    #[error("failed listing files in dir {}: {source}", dir.display())]
    Listing {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file the filter would accept has a name that is not valid UTF-8, so it has no id.
    #[error("file name is not valid UTF-8: {}", path.display())]
    NonUtf8Path { path: PathBuf },

    #[error("failed to open file {id}: {source}")]
    Open {
        id: String,
        #[source]
        source: io::Error,
    },

    #[error("failed reading bytes for file {id}: {source}")]
    Read {
        id: String,
        #[source]
        source: io::Error,
    },

    /// The archive store rejected the payload or could not be reached.
    #[error("failed calling the archive api for file {id}: {source}")]
    RemoteStore {
        id: String,
        #[source]
        source: StoreError,
    },

    #[error("failed to spawn task {task}: {source}")]
    Spawn {
        task: String,
        #[source]
        source: io::Error,
    },

    #[error("task {task} panicked")]
    TaskPanicked { task: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl UploadError {
    /// File id or directory the error is about, when there is one.
    pub fn subject(&self) -> Option<String> {
        match self {
            UploadError::Listing { dir, .. } => Some(dir.display().to_string()),
            UploadError::NonUtf8Path { path } => Some(path.display().to_string()),
            UploadError::Open { id, .. }
            | UploadError::Read { id, .. }
            | UploadError::RemoteStore { id, .. } => Some(id.clone()),
            UploadError::Spawn { task, .. } | UploadError::TaskPanicked { task } => {
                Some(task.clone())
            }
            UploadError::InvalidConfig(_) => None,
        }
    }
}
