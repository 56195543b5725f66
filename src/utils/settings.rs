//! Resolved CLI settings: defaults, then the TOML settings file, then environment/CLI.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::UploadOpts;
use crate::engine::arg_parser::Cli;
use crate::engine::tools::normalize_extensions;
use crate::utils::config::{
    DEFAULT_QUEUE_CAPACITY, DEFAULT_REQUEST_TIMEOUT, DEFAULT_WORKERS, PackagePaths,
};
use crate::utils::logger::{LogFormat, LogLevel};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SettingsToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    basedir: Option<PathBuf>,
    recursive: Option<bool>,
    workers: Option<usize>,
    extensions: Option<Vec<String>>,
    archive_api_address: Option<String>,
    log_level: Option<LogLevel>,
    log_format: Option<LogFormat>,
    queue_capacity: Option<usize>,
    timeout: Option<u64>,
    request_timeout: Option<u64>,
    verbose: Option<bool>,
}

/// Load the settings file: `explicit` must exist; otherwise the default file is optional.
pub(crate) fn load_settings_toml(explicit: Option<&Path>) -> Result<SettingsToml> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let default = PathBuf::from(PackagePaths::get().config_filename());
            if !default.is_file() {
                return Ok(SettingsToml::default());
            }
            default
        }
    };
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("read settings file {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse settings file {}", path.display()))
}

/// Everything the binary needs for one run.
#[derive(Clone, Debug)]
pub struct Settings {
    pub basedir: PathBuf,
    pub recursive: bool,
    pub workers: usize,
    pub extensions: Vec<String>,
    pub archive_api_address: String,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    pub queue_capacity: usize,
    pub timeout: Option<Duration>,
    pub request_timeout: Duration,
    pub verbose: bool,
}

impl Settings {
    /// Merge defaults, the settings file, and `cli` (which already carries env values).
    pub fn resolve(cli: &Cli) -> Result<Settings> {
        let file = load_settings_toml(cli.config.as_deref())?;
        let settings = Self::merge(file.settings, cli)?;
        settings.validate()?;
        Ok(settings)
    }

    fn merge(file: SettingsSection, cli: &Cli) -> Result<Settings> {
        let Some(basedir) = cli.basedir.clone().or(file.basedir) else {
            bail!("basedir is required (--basedir or BASEDIR)");
        };
        let Some(archive_api_address) = cli.archive_api_address.clone().or(file.archive_api_address)
        else {
            bail!("archive api address is required (--archive-api-address or ARCHIVE_API_ADDRESS)");
        };
        let extensions = if cli.extensions.is_empty() {
            normalize_extensions(file.extensions.unwrap_or_default())
        } else {
            normalize_extensions(&cli.extensions)
        };

        Ok(Settings {
            basedir,
            recursive: cli.recursive.or(file.recursive).unwrap_or(false),
            workers: cli.workers.or(file.workers).unwrap_or(DEFAULT_WORKERS),
            extensions,
            archive_api_address,
            log_level: cli.log_level.or(file.log_level).unwrap_or_default(),
            log_format: cli.log_format.or(file.log_format).unwrap_or_default(),
            queue_capacity: cli
                .queue_capacity
                .or(file.queue_capacity)
                .unwrap_or(DEFAULT_QUEUE_CAPACITY),
            timeout: cli.timeout.or(file.timeout).map(Duration::from_secs),
            request_timeout: cli
                .request_timeout
                .or(file.request_timeout)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            verbose: cli.verbose.or(file.verbose).unwrap_or(false),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            bail!("workers must be at least 1");
        }
        if self.queue_capacity == 0 {
            bail!("queue capacity must be at least 1");
        }
        if self.extensions.is_empty() {
            bail!("at least one file extension is required (--extensions or FILE_EXTENSIONS)");
        }
        if self.timeout == Some(Duration::ZERO) {
            bail!("timeout must be greater than 0");
        }
        Ok(())
    }

    pub fn upload_opts(&self) -> UploadOpts {
        UploadOpts {
            root_dir: self.basedir.clone(),
            recursive: self.recursive,
            workers: self.workers,
            include_extensions: self.extensions.clone(),
            queue_capacity: self.queue_capacity,
        }
    }
}
