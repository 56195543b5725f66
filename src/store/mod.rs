//! Archive store backends.
//!
//! The pipeline only needs [`ArchiveStore::store`]. Backends:
//! - [`http::HttpStore`]: `PUT` to an HTTP archive API, with transport-level retries
//! - [`local::DirStore`]: writes into a local directory (dry runs, mirrors)

pub mod http;
pub mod local;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{StoreError, UploadError};

pub use http::{HttpStore, RetryPolicy, is_retryable_status};
pub use local::DirStore;

/// Remote archive capability. Called concurrently by every uploader of a run.
pub trait ArchiveStore: Send + Sync {
    /// Persist `payload` under `id`. No retries happen above this call.
    fn store(&self, id: &str, payload: Vec<u8>) -> Result<(), StoreError>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}

/// Where uploads go, parsed from an address string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreTarget {
    Http(String),
    Dir(PathBuf),
}

/// `http://` / `https://` → HTTP API; `file://` or a plain path → local directory.
pub fn parse_address(address: &str) -> Result<StoreTarget, UploadError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(UploadError::InvalidConfig(
            "archive address is empty".to_string(),
        ));
    }
    match address.split_once("://") {
        None => Ok(StoreTarget::Dir(PathBuf::from(address))),
        Some(("http" | "https", _)) => Ok(StoreTarget::Http(address.to_string())),
        Some(("file", rest)) => Ok(StoreTarget::Dir(PathBuf::from(rest))),
        Some((scheme, _)) => Err(UploadError::InvalidConfig(format!(
            "unsupported archive address scheme: {scheme}"
        ))),
    }
}

/// Build the store for `address`. `request_timeout` applies to HTTP backends only.
pub fn open_store(
    address: &str,
    request_timeout: Duration,
) -> Result<Arc<dyn ArchiveStore>, UploadError> {
    match parse_address(address)? {
        StoreTarget::Http(url) => Ok(Arc::new(HttpStore::new(
            &url,
            request_timeout,
            RetryPolicy::default(),
        )?)),
        StoreTarget::Dir(dir) => Ok(Arc::new(DirStore::new(dir))),
    }
}
