//! Shared fixtures: temp trees and an in-memory archive store.

#![allow(dead_code)]

use archive_uploader::StoreError;
use archive_uploader::store::ArchiveStore;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Create each file (and its parent dirs) under `root` with its own relative name as content.
pub fn create_test_files(root: &Path, files: &[&str]) {
    for name in files {
        let full = root.join(name);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(&full, name.as_bytes()).unwrap();
    }
}

#[derive(Debug, thiserror::Error)]
#[error("dummy error")]
pub struct DummyError;

/// Records every call. Optionally fails on the n-th call (1-based) and/or sleeps on success.
#[derive(Default)]
pub struct RecordingStore {
    pub calls: Mutex<Vec<(String, Vec<u8>)>>,
    pub count: AtomicUsize,
    pub fail_on_call: Option<usize>,
    pub delay: Option<Duration>,
}

impl RecordingStore {
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Calls sorted by id (upload order is not deterministic).
    pub fn sorted_calls(&self) -> Vec<(String, Vec<u8>)> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort();
        calls
    }

    pub fn sorted_ids(&self) -> Vec<String> {
        self.sorted_calls().into_iter().map(|(id, _)| id).collect()
    }
}

impl ArchiveStore for RecordingStore {
    fn store(&self, id: &str, payload: Vec<u8>) -> Result<(), StoreError> {
        let n = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        self.calls.lock().unwrap().push((id.to_string(), payload));
        if self.fail_on_call == Some(n) {
            return Err(Box::new(DummyError));
        }
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Expected store calls when every file holds its own relative name.
pub fn expected_calls(files: &[&str]) -> Vec<(String, Vec<u8>)> {
    let mut calls: Vec<_> = files
        .iter()
        .map(|f| (f.to_string(), f.as_bytes().to_vec()))
        .collect();
    calls.sort();
    calls
}
