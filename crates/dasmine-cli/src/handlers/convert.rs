use anyhow::{Context, Result};
use dasmine_engine::{RunSummary, run};
use dasmine_providers::AuditSource;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;
use tracing::{debug, info};

use super::{STDIO, open_source};
use crate::config::Config;
use crate::services::writer::CsvSink;

pub fn handle(input: &str, output: &str, config: &Config) -> Result<()> {
    let source = open_source(input, config)?;

    let summary = if output == STDIO {
        write_to_stdout(source.as_ref(), config)?
    } else {
        write_to_file(source.as_ref(), Path::new(output), config)?
    };

    info!(
        output,
        rows = summary.rows_written,
        sessions = summary.sessions,
        known_sessions = summary.known_sessions,
        dropped_queries = summary.dropped_queries,
        anomalies = summary.anomalies.len(),
        "Conversion finished"
    );
    Ok(())
}

fn write_to_stdout(source: &dyn AuditSource, config: &Config) -> Result<RunSummary> {
    let mut sink = CsvSink::new(io::stdout().lock());
    let summary = run(source, &mut sink, &config.run_options())?;
    Ok(summary)
}

fn write_to_file(source: &dyn AuditSource, path: &Path, config: &Config) -> Result<RunSummary> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut sink = CsvSink::new(BufWriter::new(file));

    match run(source, &mut sink, &config.run_options()) {
        Ok(summary) => Ok(summary),
        Err(e) => {
            drop(sink);
            // Leave no half-written CSV behind
            if let Err(remove_err) = fs::remove_file(path) {
                debug!(path = %path.display(), error = %remove_err, "Could not remove output");
            }
            Err(e.into())
        }
    }
}
