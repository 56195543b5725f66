//! Public types for the upload API and pipeline.

use std::path::{Path, PathBuf};

use crate::error::UploadError;
use crate::utils::config::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};

/// Path of a file relative to the upload root, `/`-separated. Used as the archive key.
pub type FileId = String;

/// A queued file: its archive id and the path the finder saw it at.
///
/// Uploaders open `path` directly; `id` is only the archive key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FoundFile {
    pub id: FileId,
    pub path: PathBuf,
}

impl FoundFile {
    pub fn new(id: impl Into<FileId>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
        }
    }

    /// `id` located at `root/id`.
    pub fn under(root: &Path, id: impl Into<FileId>) -> Self {
        let id = id.into();
        let path = root.join(&id);
        Self { id, path }
    }
}

/// Options for one upload run.
#[derive(Clone, Debug)]
pub struct UploadOpts {
    /// Directory whose files are uploaded. Ids are relative to it.
    pub root_dir: PathBuf,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Number of concurrent uploaders. Must be at least 1.
    pub workers: usize,
    /// Suffixes a relative path must end with to be uploaded (e.g. `pdf`, `.csv`).
    /// Empty matches nothing.
    pub include_extensions: Vec<String>,
    /// Capacity of the queue between the finder and the uploaders.
    pub queue_capacity: usize,
}

impl Default for UploadOpts {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            recursive: false,
            workers: DEFAULT_WORKERS,
            include_extensions: Vec::new(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl UploadOpts {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), UploadError> {
        if self.workers == 0 {
            return Err(UploadError::InvalidConfig(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(UploadError::InvalidConfig(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// What a run accomplished. Returned on success; failed runs report their error instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_uploaded: usize,
    pub bytes_uploaded: u64,
    /// The run stopped because its parent scope was canceled (interrupt, deadline), not because
    /// the tree was exhausted.
    pub canceled: bool,
}
