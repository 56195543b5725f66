//! Pipeline components: scope, finder, uploaders, task group, coordinator.

pub mod context;
pub mod error_handler;
pub mod observer;
pub mod orchestrator;
pub mod scope;
pub mod task_group;
pub mod uploader;
pub mod walk;

pub use context::{PipelineChannels, PipelineContext, UploadStats, create_pipeline_channels};
pub use error_handler::FirstError;
pub use observer::{LogObserver, NoopObserver, UploadObserver};
pub use orchestrator::FilesProcessor;
pub use scope::Scope;
pub use task_group::TaskGroup;
pub use uploader::Uploader;
pub use walk::{DirFinder, FileSource};
