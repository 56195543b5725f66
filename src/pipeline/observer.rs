//! Observability port handed to every pipeline component at construction.
//!
//! The library never installs a logger. [`LogObserver`] forwards events to the `log` facade;
//! callers that want something else (progress bars, counters in tests) implement
//! [`UploadObserver`] themselves.

use log::{debug, info, trace, warn};

use crate::error::UploadError;
use crate::{RunSummary, UploadOpts};

/// Pipeline events. All methods default to no-ops and are called from worker threads.
pub trait UploadObserver: Send + Sync {
    fn run_started(&self, _opts: &UploadOpts) {}

    /// The finder matched `id` and is about to queue it.
    fn file_found(&self, _id: &str) {}

    fn upload_started(&self, _id: &str) {}

    fn upload_finished(&self, _id: &str, _bytes: usize) {}

    /// A task returned an error. Called for every failing task, the first one included.
    fn task_failed(&self, _task: &str, _err: &UploadError) {}

    /// An error lost the race for the terminal outcome.
    fn error_discarded(&self, _task: &str, _err: &UploadError) {}

    fn run_finished(&self, _summary: &RunSummary, _outcome: Option<&UploadError>) {}
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl UploadObserver for NoopObserver {}

/// Observer backed by the `log` facade.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl UploadObserver for LogObserver {
    fn run_started(&self, opts: &UploadOpts) {
        info!(
            "Starting processing files in {}. Recursive: {}. Looking for files with extensions: {:?}. Workers: {}",
            opts.root_dir.display(),
            opts.recursive,
            opts.include_extensions,
            opts.workers
        );
    }

    fn file_found(&self, id: &str) {
        trace!("found {}", id);
    }

    fn upload_started(&self, id: &str) {
        info!("Processing file {}", id);
    }

    fn upload_finished(&self, id: &str, bytes: usize) {
        debug!("uploaded {} ({} bytes)", id, bytes);
    }

    fn task_failed(&self, task: &str, err: &UploadError) {
        debug!("{} failed: {}", task, err);
    }

    fn error_discarded(&self, task: &str, err: &UploadError) {
        warn!(
            "{} also failed after the run was already failing ({}): {}",
            task,
            err.subject().unwrap_or_default(),
            err
        );
    }

    fn run_finished(&self, summary: &RunSummary, outcome: Option<&UploadError>) {
        match (outcome, summary.canceled) {
            (Some(_), _) => info!(
                "Processing failed after uploading {} files ({} bytes)",
                summary.files_uploaded, summary.bytes_uploaded
            ),
            (None, true) => info!(
                "Processing canceled after uploading {} files ({} bytes)",
                summary.files_uploaded, summary.bytes_uploaded
            ),
            (None, false) => info!(
                "Processing ended: {} files uploaded ({} bytes)",
                summary.files_uploaded, summary.bytes_uploaded
            ),
        }
    }
}
