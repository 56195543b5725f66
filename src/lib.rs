//! archive-uploader: upload a directory tree to an archive service with a bounded worker pool.
//!
//! One finder thread walks the root and queues matching file ids on a bounded channel; `workers`
//! uploader threads read each file and hand it to an [`ArchiveStore`](store::ArchiveStore). The
//! first failure of any thread cancels the others and is the run's result.

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod store;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{StoreError, UploadError};
pub use pipeline::{FilesProcessor, LogObserver, Scope, UploadObserver};

use log::debug;
use std::sync::Arc;

use store::ArchiveStore;

/// Result alias used by the public API
pub type Result<T> = std::result::Result<T, UploadError>;

/// Upload every file under `opts.root_dir` matching `opts.include_extensions` to `store`.
///
/// Blocks until the tree is exhausted, the first error occurs, or `parent` is canceled. Logs
/// through [`LogObserver`].
///
/// ```ignore
/// let store = archive_uploader::store::open_store("http://archive:8090/archives", timeout)?;
/// let mut opts = UploadOpts::new("/data/bills");
/// opts.include_extensions = vec!["pdf".into()];
/// let summary = archive_uploader::process_files(&opts, store, &Scope::root())?;
/// ```
pub fn process_files(
    opts: &UploadOpts,
    store: Arc<dyn ArchiveStore>,
    parent: &Scope,
) -> Result<RunSummary> {
    process_files_with_observer(opts, store, parent, Arc::new(LogObserver))
}

/// [`process_files`] with a caller-supplied observer.
pub fn process_files_with_observer(
    opts: &UploadOpts,
    store: Arc<dyn ArchiveStore>,
    parent: &Scope,
    observer: Arc<dyn UploadObserver>,
) -> Result<RunSummary> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    FilesProcessor::with_dir_finder(store, opts, observer)?.process_files(parent)
}
