use dasmine_providers::AuditSource;
use dasmine_types::Anomaly;
use tracing::info;

use crate::Result;
use crate::correlate::project;
use crate::schema::{RowSink, write_header};
use crate::tracker::{DuplicatePolicy, build_session_map};

/// Knobs for a full run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub duplicate_policy: DuplicatePolicy,
}

/// Outcome of a full run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Distinct session ids seen in boundary or query evidence
    pub sessions: usize,
    /// Sessions with an inferred start
    pub known_sessions: usize,
    pub rows_written: usize,
    pub dropped_queries: usize,
    pub anomalies: Vec<Anomaly>,
}

/// Reconstruct session windows from `source`, then write the header and one
/// row per correlated query to `sink`.
///
/// The source is traversed three times: boundaries, query fallback, rows.
pub fn run(
    source: &dyn AuditSource,
    sink: &mut dyn RowSink,
    options: &RunOptions,
) -> Result<RunSummary> {
    let tracked = build_session_map(source, options.duplicate_policy)?;

    write_header(sink)?;
    let stats = project(source, &tracked.sessions, sink)?;
    sink.flush()?;

    let summary = RunSummary {
        sessions: tracked.sessions.len(),
        known_sessions: tracked.sessions.known_len(),
        rows_written: stats.rows_written,
        dropped_queries: stats.dropped_queries,
        anomalies: tracked.anomalies,
    };
    info!(
        sessions = summary.sessions,
        known = summary.known_sessions,
        rows = summary.rows_written,
        anomalies = summary.anomalies.len(),
        "Run complete"
    );
    Ok(summary)
}
