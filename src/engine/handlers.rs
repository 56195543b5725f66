//! CLI command handler: resolve settings, wire interrupt handling, run the upload.

use anyhow::{Context, Result, bail};
use log::{info, warn};
use std::sync::Arc;

use crate::engine::arg_parser::Cli;
use crate::engine::progress::ProgressObserver;
use crate::pipeline::{LogObserver, Scope, UploadObserver};
use crate::process_files_with_observer;
use crate::store::open_store;
use crate::utils::{Settings, setup_logging};

/// Cancel `scope` on SIGINT/SIGTERM.
fn cancel_on_interrupt(scope: &Scope) -> Result<()> {
    let scope = scope.clone();
    ctrlc::set_handler(move || {
        if scope.cancel() {
            warn!("interrupt received, stopping uploads");
        }
    })
    .context("set Ctrl+C handler")
}

/// Run one upload from CLI/env/file settings.
///
/// Fails if any upload failed or the run was interrupted. The error is returned, not logged.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let settings = Settings::resolve(cli)?;
    setup_logging(settings.log_level, settings.log_format);

    let store = open_store(&settings.archive_api_address, settings.request_timeout)
        .context("open archive store")?;
    info!(
        "Uploading to {} ({} store)",
        settings.archive_api_address,
        store.name()
    );

    let root_scope = Scope::root();
    cancel_on_interrupt(&root_scope)?;
    let run_scope = match settings.timeout {
        Some(timeout) => root_scope
            .with_deadline(timeout)
            .context("start deadline watcher")?,
        None => root_scope.clone(),
    };

    let observer: Arc<dyn UploadObserver> = if settings.verbose {
        Arc::new(ProgressObserver::new(LogObserver))
    } else {
        Arc::new(LogObserver)
    };

    let result = process_files_with_observer(&settings.upload_opts(), store, &run_scope, observer);
    // Releases the deadline watcher, if any.
    root_scope.cancel();

    // main reports the error
    let summary = result?;
    if summary.canceled {
        bail!(
            "upload stopped before completion after {} files",
            summary.files_uploaded
        );
    }
    Ok(())
}
