//! Progress counter for uploaded files

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

use crate::error::UploadError;
use crate::pipeline::UploadObserver;
use crate::{RunSummary, UploadOpts};

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " files"
    )))
}

/// Force a refresh of the bar (e.g. so counter shows "0 files" immediately).
pub fn refresh_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.refresh();
    }
}

/// Update progress bar if available
/// Uses try_lock to avoid blocking if mutex is contended (non-blocking)
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    // If lock is contended, skip update (the final refresh catches up)
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Set the counter to an absolute value. Blocks on the lock; call once workers are done.
pub fn set_bar_counter(pb: &ProgressBar, n: usize) {
    if let Ok(mut bar) = pb.lock() {
        let _ = bar.update_to(n);
    }
}

/// Wraps another observer and counts finished uploads on a kdam bar.
pub struct ProgressObserver<O> {
    inner: O,
    bar: ProgressBar,
}

impl<O: UploadObserver> ProgressObserver<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            bar: create_counter("Uploading"),
        }
    }
}

impl<O: UploadObserver> UploadObserver for ProgressObserver<O> {
    fn run_started(&self, opts: &UploadOpts) {
        self.inner.run_started(opts);
        refresh_bar(&self.bar);
    }

    fn file_found(&self, id: &str) {
        self.inner.file_found(id);
    }

    fn upload_started(&self, id: &str) {
        self.inner.upload_started(id);
    }

    fn upload_finished(&self, id: &str, bytes: usize) {
        self.inner.upload_finished(id, bytes);
        update_progress_bar(&self.bar, 1);
    }

    fn task_failed(&self, task: &str, err: &UploadError) {
        self.inner.task_failed(task, err);
    }

    fn error_discarded(&self, task: &str, err: &UploadError) {
        self.inner.error_discarded(task, err);
    }

    fn run_finished(&self, summary: &RunSummary, outcome: Option<&UploadError>) {
        set_bar_counter(&self.bar, summary.files_uploaded);
        eprintln!();
        self.inner.run_finished(summary, outcome);
    }
}
