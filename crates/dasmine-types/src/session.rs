use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use crate::timestamp::CompactTimestamp;

/// Inferred lifetime of one database session.
///
/// Start and end are filled independently: a DISCONNECT may be observed for a
/// session whose CONNECT was never seen. Both bounds only ever widen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionWindow {
    pub start: Option<CompactTimestamp>,
    pub end: Option<CompactTimestamp>,
}

impl SessionWindow {
    /// A session is usable for correlation once it has a start
    pub fn is_known(&self) -> bool {
        self.start.is_some()
    }

    /// Fold one activity timestamp into the window.
    ///
    /// Missing bounds are seeded with `ts`; present bounds move outward only.
    pub fn widen(&mut self, ts: &CompactTimestamp) {
        match &self.start {
            Some(start) if start <= ts => {}
            _ => self.start = Some(ts.clone()),
        }
        match &self.end {
            Some(end) if end >= ts => {}
            _ => self.end = Some(ts.clone()),
        }
    }

    /// True when explicit boundaries contradict each other (start after end)
    pub fn is_inverted(&self) -> bool {
        matches!((&self.start, &self.end), (Some(start), Some(end)) if start > end)
    }

    /// Seconds between start and end, when both are set and are real dates
    pub fn duration_secs(&self) -> Option<i64> {
        let start = self.start.as_ref()?.to_datetime()?;
        let end = self.end.as_ref()?.to_datetime()?;
        Some((end - start).num_seconds())
    }
}

/// Session id to window mapping built by one tracker run.
///
/// Entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMap {
    windows: HashMap<String, SessionWindow>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Window for `session_id`, inserting an empty one on first sight
    pub fn window_mut(&mut self, session_id: &str) -> &mut SessionWindow {
        match self.windows.entry(session_id.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(SessionWindow::default()),
        }
    }

    pub fn get(&self, session_id: &str) -> Option<&SessionWindow> {
        self.windows.get(session_id)
    }

    /// Window for `session_id` only if it has a start
    pub fn known(&self, session_id: &str) -> Option<&SessionWindow> {
        self.windows.get(session_id).filter(|w| w.is_known())
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn known_len(&self) -> usize {
        self.windows.values().filter(|w| w.is_known()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SessionWindow)> {
        self.windows.iter().map(|(id, w)| (id.as_str(), w))
    }

    /// All windows ordered by session id, for stable reporting
    pub fn sorted(&self) -> Vec<(&str, &SessionWindow)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

/// Kind of boundary evidence that was seen more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    DuplicateConnect,
    DuplicateDisconnect,
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyKind::DuplicateConnect => write!(f, "duplicate CONNECT"),
            AnomalyKind::DuplicateDisconnect => write!(f, "duplicate DISCONNECT"),
        }
    }
}

/// Recoverable inconsistency found while tracking session boundaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub session_id: String,
    /// First-seen value, kept in the window
    pub retained: CompactTimestamp,
    /// Value from the duplicate event, discarded
    pub ignored: CompactTimestamp,
    pub line: usize,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} for session {} at line {} (kept {}, ignored {})",
            self.kind, self.session_id, self.line, self.retained, self.ignored
        )
    }
}
