//! Pipeline context: the queue between finder and uploaders and the counters they share.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::store::ArchiveStore;
use crate::{FoundFile, RunSummary};

use super::observer::UploadObserver;

/// Bounded file queue. The finder receives `file_tx` by value and is its only owner, so the
/// queue closes exactly once, when the finder returns.
pub struct PipelineChannels {
    pub file_tx: Sender<FoundFile>,
    pub file_rx: Receiver<FoundFile>,
}

pub fn create_pipeline_channels(queue_capacity: usize) -> PipelineChannels {
    let (file_tx, file_rx) = bounded::<FoundFile>(queue_capacity);
    PipelineChannels { file_tx, file_rx }
}

/// Counters updated by uploaders after each successful store call.
#[derive(Default, Debug)]
pub struct UploadStats {
    files: AtomicUsize,
    bytes: AtomicU64,
}

impl UploadStats {
    pub fn record(&self, bytes: usize) {
        self.files.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn files(&self) -> usize {
        self.files.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self, canceled: bool) -> RunSummary {
        RunSummary {
            files_uploaded: self.files(),
            bytes_uploaded: self.bytes.load(Ordering::Relaxed),
            canceled,
        }
    }
}

/// Read-only state every uploader of one run shares.
#[derive(Clone)]
pub struct PipelineContext {
    pub store: Arc<dyn ArchiveStore>,
    pub observer: Arc<dyn UploadObserver>,
    pub stats: Arc<UploadStats>,
}

impl PipelineContext {
    pub fn new(store: Arc<dyn ArchiveStore>, observer: Arc<dyn UploadObserver>) -> Self {
        Self {
            store,
            observer,
            stats: Arc::new(UploadStats::default()),
        }
    }
}
