//! Application configuration constants.
//! Defaults and package-derived names in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!("{pkg}.toml"),
            }
        })
    }

    /// Settings file looked up in the working directory when `--config` is not given.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Pipeline ----

/// Concurrent uploaders when not configured.
pub const DEFAULT_WORKERS: usize = 10;

/// Slots in the finder → uploader queue. The finder blocks once this many ids are waiting.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

// ---- Transport ----

/// Per-request timeout for the HTTP archive store.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
