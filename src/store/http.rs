//! HTTP archive API backend.
//!
//! Each file is sent as `PUT {base}/{id}` with the raw bytes as body. Transient failures
//! (connect errors, timeouts, 500/502/503/504) are retried here with linear backoff and jitter;
//! everything else fails the item on the first response.

use log::debug;
use rand::Rng;
use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use std::thread;
use std::time::Duration;
use thiserror::Error;

use crate::error::{StoreError, UploadError};

use super::ArchiveStore;

/// Longest response body excerpt kept in a rejection error.
const BODY_EXCERPT_CHARS: usize = 256;

/// Retry policy for transient transport failures.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Total attempts, the first one included.
    pub max_attempts: u32,
    /// Delay before retry `n` is `initial_delay * n`, plus jitter.
    pub initial_delay: Duration,
    /// Upper bound of the random extra delay, as a fraction of the base delay (0.0-1.0).
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            jitter_factor: 0.1,
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base = self.initial_delay * attempt.max(1);
        if self.jitter_factor > 0.0 {
            let jitter = rand::rng().random_range(0.0..self.jitter_factor);
            base + Duration::from_secs_f64(base.as_secs_f64() * jitter)
        } else {
            base
        }
    }
}

/// The archive API answered with a non-success status.
#[derive(Error, Debug)]
#[error("archive api responded {status}: {body}")]
pub struct RejectedError {
    pub status: StatusCode,
    pub body: String,
}

/// Server-side statuses worth another attempt.
pub fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

pub struct HttpStore {
    client: Client,
    base: Url,
    retry: RetryPolicy,
}

impl HttpStore {
    pub fn new(base: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self, UploadError> {
        let base = Url::parse(base)
            .map_err(|e| UploadError::InvalidConfig(format!("invalid archive url {base}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(UploadError::InvalidConfig(format!(
                "archive url cannot be used as a base: {base}"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UploadError::InvalidConfig(format!("cannot build http client: {e}")))?;
        Ok(Self {
            client,
            base,
            retry,
        })
    }

    /// `base` with each `/`-separated segment of `id` appended (percent-encoded).
    pub fn object_url(&self, id: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(id.split('/').filter(|s| !s.is_empty()));
        }
        url
    }

    fn send(&self, url: &Url, payload: &[u8]) -> reqwest::Result<Response> {
        self.client
            .put(url.clone())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(payload.to_vec())
            .send()
    }
}

fn check_status(response: Response) -> Result<(), StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body: String = response
        .text()
        .unwrap_or_default()
        .chars()
        .take(BODY_EXCERPT_CHARS)
        .collect();
    Err(Box::new(RejectedError { status, body }))
}

impl ArchiveStore for HttpStore {
    fn store(&self, id: &str, payload: Vec<u8>) -> Result<(), StoreError> {
        let url = self.object_url(id);
        let mut attempt = 1;
        loop {
            let result = self.send(&url, &payload);
            let retryable = match &result {
                Ok(response) => is_retryable_status(response.status()),
                Err(err) => err.is_connect() || err.is_timeout(),
            };
            if retryable && attempt < self.retry.max_attempts {
                let delay = self.retry.delay_for(attempt);
                debug!(
                    "retrying {} in {:?} (attempt {}/{})",
                    id,
                    delay,
                    attempt + 1,
                    self.retry.max_attempts
                );
                thread::sleep(delay);
                attempt += 1;
                continue;
            }
            return check_status(result?);
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
