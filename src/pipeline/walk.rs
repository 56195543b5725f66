//! Finder: walks the upload root and queues the ids of files the inclusion predicate accepts.

use crossbeam_channel::{Sender, select};
use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::engine::tools::{
    IncludePredicate, extension_predicate, path_relative_to, path_to_file_id,
};
use crate::error::UploadError;
use crate::{FoundFile, UploadOpts};

use super::observer::UploadObserver;
use super::scope::Scope;

/// Producer side of the pipeline.
///
/// `run` owns `out`; dropping it on return (on every path, errors included) is what closes the
/// queue for the uploaders.
pub trait FileSource: Send + Sync {
    fn run(&self, scope: &Scope, out: Sender<FoundFile>) -> Result<(), UploadError>;
}

/// Depth-first directory walk in directory-entry order (no sorting).
pub struct DirFinder {
    root: PathBuf,
    recursive: bool,
    include: IncludePredicate,
    observer: Arc<dyn UploadObserver>,
}

impl DirFinder {
    pub fn new(
        root: impl Into<PathBuf>,
        recursive: bool,
        include: IncludePredicate,
        observer: Arc<dyn UploadObserver>,
    ) -> Self {
        Self {
            root: root.into(),
            recursive,
            include,
            observer,
        }
    }

    pub fn from_opts(opts: &UploadOpts, observer: Arc<dyn UploadObserver>) -> Self {
        Self::new(
            opts.root_dir.clone(),
            opts.recursive,
            extension_predicate(&opts.include_extensions),
            observer,
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn walker(&self) -> walkdir::IntoIter {
        let walk = WalkDir::new(&self.root).min_depth(1).follow_links(false);
        match self.recursive {
            true => walk.into_iter(),
            false => walk.max_depth(1).into_iter(),
        }
    }

    /// The root itself must be a listable directory, not a file.
    fn check_root(&self) -> Result<(), UploadError> {
        let meta =
            std::fs::metadata(&self.root).map_err(|source| listing_error(&self.root, source))?;
        if !meta.is_dir() {
            return Err(listing_error(
                &self.root,
                io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
            ));
        }
        Ok(())
    }
}

fn listing_error(dir: &Path, source: io::Error) -> UploadError {
    UploadError::Listing {
        dir: dir.to_path_buf(),
        source,
    }
}

/// Send `file` unless the scope is (or becomes, while the queue is full) canceled.
/// Returns false when the finder should stop producing.
fn push(scope: &Scope, out: &Sender<FoundFile>, file: FoundFile) -> bool {
    if scope.is_canceled() {
        return false;
    }
    select! {
        send(out, file) -> sent => sent.is_ok(),
        recv(scope.done()) -> _ => false,
    }
}

impl FileSource for DirFinder {
    fn run(&self, scope: &Scope, out: Sender<FoundFile>) -> Result<(), UploadError> {
        self.check_root()?;

        let mut queued = 0_usize;
        for item in self.walker() {
            let entry = item.map_err(|err| {
                let dir = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone());
                listing_error(&dir, io::Error::from(err))
            })?;

            if entry.file_type().is_dir() {
                // walkdir descends right after yielding the directory
                if scope.is_canceled() {
                    break;
                }
                continue;
            }

            let rel = path_relative_to(entry.path(), &self.root)
                .unwrap_or_else(|| entry.path().to_path_buf());
            let Some(id) = path_to_file_id(&rel) else {
                // only an error if the file would have been uploaded
                if (self.include)(&rel.to_string_lossy()) {
                    return Err(UploadError::NonUtf8Path {
                        path: entry.into_path(),
                    });
                }
                continue;
            };
            if !(self.include)(&id) {
                continue;
            }
            self.observer.file_found(&id);
            if !push(scope, &out, FoundFile::new(id, entry.into_path())) {
                break;
            }
            queued += 1;
        }
        debug!(
            "finder: {} files queued from {}",
            queued,
            self.root.display()
        );
        Ok(())
    }
}
