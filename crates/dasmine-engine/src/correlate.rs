use dasmine_providers::AuditSource;
use dasmine_types::{AuditEvent, SessionMap};
use tracing::info;

use crate::Result;
use crate::schema::{OutputRow, RowSink, write_row};

/// Counts from one projection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionStats {
    pub rows_written: usize,
    /// Queries whose session had no inferred start
    pub dropped_queries: usize,
}

/// Join a query event with its session window.
///
/// Returns None for non-query events and for queries of unknown sessions.
pub fn correlate<'a>(event: &'a AuditEvent, sessions: &'a SessionMap) -> Option<OutputRow<'a>> {
    if !event.is_query() {
        return None;
    }
    let window = sessions.known(&event.session_id)?;
    Some(OutputRow {
        event,
        logged_in: window.start.as_ref()?,
        logged_out: window.end.as_ref(),
    })
}

/// Write one row per correlated query of `source`, in input order.
///
/// Unknown sessions are expected around log rotation, so dropped queries
/// are only counted.
pub fn project(
    source: &dyn AuditSource,
    sessions: &SessionMap,
    sink: &mut dyn RowSink,
) -> Result<ProjectionStats> {
    let mut stats = ProjectionStats::default();

    for record in source.records("sql list")? {
        let record = record?;
        for event in record.events.iter().filter(|e| e.is_query()) {
            match correlate(event, sessions) {
                Some(row) => {
                    write_row(sink, &row)?;
                    stats.rows_written += 1;
                }
                None => stats.dropped_queries += 1,
            }
        }
    }

    info!(
        rows = stats.rows_written,
        dropped = stats.dropped_queries,
        "Query rows written"
    );
    Ok(stats)
}
