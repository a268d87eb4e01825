use dasmine_providers::AuditSource;
use dasmine_types::{Anomaly, AnomalyKind, AuditEvent, AuditRecord, Command, SessionMap};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::Result;

/// What to do with the rest of a record after a duplicate CONNECT/DISCONNECT
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Ignore only the duplicate event
    #[default]
    Event,
    /// Ignore boundary events in the remainder of the same raw record.
    /// Later records are scanned normally.
    Record,
}

/// Result of a tracker run
#[derive(Debug, Clone, Default)]
pub struct TrackedSessions {
    pub sessions: SessionMap,
    pub anomalies: Vec<Anomaly>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Observed {
    Recorded,
    Duplicate,
    NotBoundary,
}

/// Accumulates session windows from boundary and query evidence.
///
/// Boundaries must all be observed before any query: query timestamps only
/// fill in what explicit CONNECT/DISCONNECT events left open, then widen.
#[derive(Debug, Default)]
pub struct BoundaryTracker {
    sessions: SessionMap,
    anomalies: Vec<Anomaly>,
    policy: DuplicatePolicy,
}

impl BoundaryTracker {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Explicit boundary rule: first CONNECT is the start, first DISCONNECT the end
    pub fn observe_boundaries(&mut self, record: &AuditRecord) {
        for event in &record.events {
            let observed = self.observe_boundary(event, record.line);
            if observed == Observed::Duplicate && self.policy == DuplicatePolicy::Record {
                break;
            }
        }
    }

    fn observe_boundary(&mut self, event: &AuditEvent, line: usize) -> Observed {
        let kind = match event.command {
            Command::Connect => AnomalyKind::DuplicateConnect,
            Command::Disconnect => AnomalyKind::DuplicateDisconnect,
            _ => return Observed::NotBoundary,
        };

        let window = self.sessions.window_mut(&event.session_id);
        let slot = match kind {
            AnomalyKind::DuplicateConnect => &mut window.start,
            AnomalyKind::DuplicateDisconnect => &mut window.end,
        };

        if let Some(retained) = slot.as_ref() {
            let anomaly = Anomaly {
                kind,
                session_id: event.session_id.clone(),
                retained: retained.clone(),
                ignored: event.timestamp.clone(),
                line,
            };
            warn!(
                session_id = %anomaly.session_id,
                line,
                retained = %anomaly.retained,
                ignored = %anomaly.ignored,
                "Same session id seen twice: {}",
                kind
            );
            self.anomalies.push(anomaly);
            return Observed::Duplicate;
        }

        *slot = Some(event.timestamp.clone());
        Observed::Recorded
    }

    /// Query-fallback rule: seed missing bounds, then widen to cover every query
    pub fn observe_queries(&mut self, record: &AuditRecord) {
        for event in record.events.iter().filter(|e| e.is_query()) {
            self.sessions
                .window_mut(&event.session_id)
                .widen(&event.timestamp);
        }
    }

    pub fn finish(self) -> TrackedSessions {
        for (session_id, window) in self.sessions.iter() {
            if window.is_inverted() {
                warn!(
                    session_id,
                    start = ?window.start,
                    end = ?window.end,
                    "Session logged out before it logged in"
                );
            }
        }

        TrackedSessions {
            sessions: self.sessions,
            anomalies: self.anomalies,
        }
    }
}

/// Build the session map with two passes over `source`.
///
/// A session that only ever disconnected keeps an entry without a start and
/// is treated as unknown by correlation.
pub fn build_session_map(
    source: &dyn AuditSource,
    policy: DuplicatePolicy,
) -> Result<TrackedSessions> {
    let mut tracker = BoundaryTracker::new(policy);

    for record in source.records("session list by CONNECT/DISCONNECT")? {
        tracker.observe_boundaries(&record?);
    }
    for record in source.records("session list by QUERY")? {
        tracker.observe_queries(&record?);
    }

    let tracked = tracker.finish();
    info!(
        sessions = tracked.sessions.len(),
        known = tracked.sessions.known_len(),
        anomalies = tracked.anomalies.len(),
        "Session windows built"
    );
    Ok(tracked)
}
