use crossbeam_channel::{Receiver, select};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::FoundFile;
use crate::error::UploadError;

use super::context::PipelineContext;
use super::scope::Scope;

/// Consumer side of the pipeline: one per worker slot.
pub struct Uploader {
    ctx: PipelineContext,
    files: Receiver<FoundFile>,
}

impl Uploader {
    pub fn new(ctx: PipelineContext, files: Receiver<FoundFile>) -> Self {
        Self { ctx, files }
    }

    /// Upload queued files one at a time until the queue is closed and drained, the scope is
    /// canceled, or an upload fails. Cancellation is not an error.
    pub fn run(&self, scope: &Scope) -> Result<(), UploadError> {
        loop {
            if scope.is_canceled() {
                return Ok(());
            }
            select! {
                recv(scope.done()) -> _ => return Ok(()),
                recv(self.files) -> msg => match msg {
                    // select! picks randomly when both are ready
                    Ok(_) if scope.is_canceled() => return Ok(()),
                    Ok(file) => {
                        self.upload(&file)?;
                    }
                    Err(_) => return Ok(()),
                },
            }
        }
    }

    /// Read `file.path` and hand it to the store under `file.id`. Returns the payload size.
    pub fn upload(&self, file: &FoundFile) -> Result<usize, UploadError> {
        let id = file.id.as_str();
        self.ctx.observer.upload_started(id);
        let payload = read_payload(&file.path, id)?;
        let bytes = payload.len();
        self.ctx
            .store
            .store(id, payload)
            .map_err(|source| UploadError::RemoteStore {
                id: id.to_string(),
                source,
            })?;
        self.ctx.stats.record(bytes);
        self.ctx.observer.upload_finished(id, bytes);
        Ok(bytes)
    }
}

/// Open and fully read `path`; errors are tagged with `id`.
fn read_payload(path: &Path, id: &str) -> Result<Vec<u8>, UploadError> {
    let mut file = File::open(path).map_err(|source| UploadError::Open {
        id: id.to_string(),
        source,
    })?;
    let size_hint = file.metadata().map(|m| m.len() as usize).unwrap_or(0);
    let mut payload = Vec::with_capacity(size_hint);
    file.read_to_end(&mut payload)
        .map_err(|source| UploadError::Read {
            id: id.to_string(),
            source,
        })?;
    Ok(payload)
}
