use clap::ValueEnum;
use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};
use serde::Deserialize;
use std::io::Write;

/// `--log-level` values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

/// `--log-format` values. JSON is one object per line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    #[default]
    Json,
}

/// Install the global logger. Binary only; the library logs through the `log` facade.
pub fn setup_logging(level: LogLevel, format: LogFormat) {
    let mut builder = Builder::from_default_env();
    builder
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(&env!("CARGO_PKG_NAME").replace('-', "_"), level.filter());

    match format {
        LogFormat::Text => builder.format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        _ => "ERROR".red(),
                    };
                    let path = record.target().to_string().white();
                    format!("[{} {} {}] {}", name.cyan(), level_str, path, record.args())
                }
                _ => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        }),
        LogFormat::Json => builder.format(|buf, record| {
            let line = serde_json::json!({
                "time": buf.timestamp().to_string(),
                "level": record.level().as_str().to_lowercase(),
                "target": record.target(),
                "msg": record.args().to_string(),
            });
            writeln!(buf, "{}", line)
        }),
    };

    if builder.try_init().is_err() {
        log::debug!("logger already initialized");
    }
}
