use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::UploadError;

/// Single-error slot: the first recorded error wins, later ones are handed back to the caller.
#[derive(Default)]
pub struct FirstError {
    slot: Mutex<Option<UploadError>>,
    discarded: AtomicUsize,
}

impl FirstError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `err` as the terminal error if none is set yet. Returns `Some(err)` back when the
    /// slot was already taken, so the caller can log what was dropped.
    pub fn record(&self, err: UploadError) -> Option<UploadError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            self.discarded.fetch_add(1, Ordering::Relaxed);
            return Some(err);
        }
        *slot = Some(err);
        None
    }

    pub fn is_set(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Number of errors that arrived after the first one.
    pub fn discarded(&self) -> usize {
        self.discarded.load(Ordering::Relaxed)
    }

    pub fn take(&self) -> Option<UploadError> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
