use std::sync::Arc;

use crate::error::UploadError;
use crate::store::ArchiveStore;
use crate::{RunSummary, UploadOpts};

use super::context::{PipelineChannels, PipelineContext, create_pipeline_channels};
use super::observer::UploadObserver;
use super::scope::Scope;
use super::task_group::TaskGroup;
use super::uploader::Uploader;
use super::walk::{DirFinder, FileSource};

/// Coordinator: one finder and `workers` uploaders over one bounded queue and one scope.
///
/// [`process_files`](Self::process_files) consumes the processor, so each run gets a fresh
/// queue and scope.
pub struct FilesProcessor {
    store: Arc<dyn ArchiveStore>,
    opts: UploadOpts,
    finder: Box<dyn FileSource>,
    observer: Arc<dyn UploadObserver>,
}

impl FilesProcessor {
    pub fn new(
        store: Arc<dyn ArchiveStore>,
        opts: &UploadOpts,
        finder: Box<dyn FileSource>,
        observer: Arc<dyn UploadObserver>,
    ) -> Result<Self, UploadError> {
        opts.validate()?;
        Ok(Self {
            store,
            opts: opts.clone(),
            finder,
            observer,
        })
    }

    /// Processor whose finder walks `opts.root_dir` with the extension filter from `opts`.
    pub fn with_dir_finder(
        store: Arc<dyn ArchiveStore>,
        opts: &UploadOpts,
        observer: Arc<dyn UploadObserver>,
    ) -> Result<Self, UploadError> {
        let finder = DirFinder::from_opts(opts, Arc::clone(&observer));
        Self::new(store, opts, Box::new(finder), observer)
    }

    /// Run the pipeline under a child of `parent` and block until every task has exited.
    ///
    /// Returns the first error any task reported. Canceling `parent` stops the run early
    /// without an error; the summary then has `canceled` set.
    pub fn process_files(self, parent: &Scope) -> Result<RunSummary, UploadError> {
        let FilesProcessor {
            store,
            opts,
            finder,
            observer,
        } = self;
        observer.run_started(&opts);

        let scope = parent.child();
        let PipelineChannels { file_tx, file_rx } =
            create_pipeline_channels(opts.queue_capacity);
        let ctx = PipelineContext::new(store, Arc::clone(&observer));
        let stats = Arc::clone(&ctx.stats);

        let mut group = TaskGroup::new(scope.clone(), Arc::clone(&observer));
        group.spawn("finder", move |scope| finder.run(scope, file_tx));
        for n in 0..opts.workers {
            let uploader = Uploader::new(ctx.clone(), file_rx.clone());
            group.spawn(format!("uploader-{n}"), move |scope| uploader.run(scope));
        }
        // Only uploaders hold receivers from here on.
        drop(file_rx);

        let outcome = group.wait();
        let canceled = outcome.is_ok() && scope.is_canceled();
        scope.cancel();

        let summary = stats.snapshot(canceled);
        observer.run_finished(&summary, outcome.as_ref().err());
        outcome.map(|()| summary)
    }
}
