use clap::Parser;
use std::path::PathBuf;

use crate::utils::logger::{LogFormat, LogLevel};

/// Upload a directory tree to the archive API with a pool of concurrent workers.
///
/// Every option can also come from the environment (shown in `--help`), from a `.env` file in
/// the working directory, or from the `[settings]` table of the config file.
#[derive(Clone, Debug, Parser)]
#[command(name = "archive-uploader", version)]
#[command(about = "Upload items to the archive API; stops at the first failed upload.")]
pub struct Cli {
    /// The base directory where to upload all the files from.
    #[arg(long, short = 'd', env = "BASEDIR", value_name = "DIR")]
    pub basedir: Option<PathBuf>,

    /// Upload recursively all the files in the specified folder.
    #[arg(long, short = 'r', env = "RECURSIVE", num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub recursive: Option<bool>,

    /// The number of workers to use for uploading in parallel. Default: 10.
    #[arg(long, short = 'w', env = "WORKERS")]
    pub workers: Option<usize>,

    /// File suffixes to upload, comma separated (e.g. pdf,csv).
    #[arg(long, short = 'e', env = "FILE_EXTENSIONS", value_delimiter = ',', num_args = 1..)]
    pub extensions: Vec<String>,

    /// Archive API base URL (http/https), or a directory (plain path or file://) to archive into.
    #[arg(long, short = 'a', env = "ARCHIVE_API_ADDRESS", value_name = "ADDRESS")]
    pub archive_api_address: Option<String>,

    /// Log level. Default: info.
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    pub log_level: Option<LogLevel>,

    /// Log format. Default: json.
    #[arg(long, env = "LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Capacity of the queue between the directory scan and the workers. Default: 100.
    #[arg(long, env = "QUEUE_CAPACITY")]
    pub queue_capacity: Option<usize>,

    /// Stop the whole run after this many seconds.
    #[arg(long, env = "UPLOAD_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Per-request timeout for the HTTP archive API in seconds. Default: 60.
    #[arg(long, env = "REQUEST_TIMEOUT", value_name = "SECS")]
    pub request_timeout: Option<u64>,

    /// Settings file. Default: `archive-uploader.toml` in the working directory, if present.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show a progress counter of uploaded files.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}
