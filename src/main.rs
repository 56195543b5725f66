//! archive-uploader CLI: upload a directory tree to the archive API.

use anyhow::Result;
use archive_uploader::engine::arg_parser::Cli;
use archive_uploader::engine::handle_run;
use clap::Parser;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    // Values from .env feed clap's env lookups.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
