pub mod convert;
pub mod sessions;

use anyhow::{Context, Result};
use dasmine_providers::{AuditSource, BufferedSource, FileSource, LineSource};
use std::io;
use std::path::Path;
use tracing::info;

use crate::config::Config;

/// Marker for stdin / stdout in place of a path
pub const STDIO: &str = "-";

/// Open `input` as a restartable source.
///
/// Stdin cannot be re-read, so it is held as raw lines. With `buffer` set,
/// records are normalized once and replayed from memory.
pub fn open_source(input: &str, config: &Config) -> Result<Box<dyn AuditSource>> {
    let options = config.source_options();

    let source: Box<dyn AuditSource> = if input == STDIO {
        let stdin = io::stdin().lock();
        let lines = LineSource::from_reader(stdin, options).context("Failed to read stdin")?;
        info!(lines = lines.len(), "Read input from stdin");
        Box::new(lines)
    } else {
        let path = Path::new(input);
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", input);
        }
        Box::new(FileSource::new(path, options))
    };

    if !config.buffer {
        return Ok(source);
    }

    let buffered = BufferedSource::load(source.as_ref())?;
    info!(records = buffered.len(), "Input buffered in memory");
    Ok(Box::new(buffered))
}
