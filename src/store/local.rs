use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::StoreError;

use super::ArchiveStore;

/// Archive backed by a local directory: `id` is written to `<dir>/<id>`.
#[derive(Clone, Debug)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Destination for `id`. Only plain relative ids are accepted so nothing lands outside `dir`.
    pub fn destination(&self, id: &str) -> io::Result<PathBuf> {
        let rel = Path::new(id);
        let plain = rel.components().next().is_some()
            && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to store outside the archive dir: {id}"),
            ));
        }
        Ok(self.dir.join(rel))
    }
}

impl ArchiveStore for DirStore {
    fn store(&self, id: &str, payload: Vec<u8>) -> Result<(), StoreError> {
        let dest = self.destination(id)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, payload)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "dir"
    }
}
