//! Engine module: CLI parsing, command handling, progress, path helpers

pub mod arg_parser;
pub mod handlers;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use handlers::handle_run;
pub use progress::ProgressObserver;
pub use tools::{
    IncludePredicate, extension_predicate, has_any_suffix, normalize_extensions,
    path_relative_to, path_to_file_id,
};
