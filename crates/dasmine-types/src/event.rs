use serde::Serialize;
use std::fmt;

use crate::timestamp::{CompactTimestamp, Micros};

/// Database activity kind carried by an audit event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    Connect,
    Disconnect,
    Query,
    /// Any other activity (e.g. `INIT DB`); ignored by session inference
    Other(String),
}

impl Command {
    pub fn as_str(&self) -> &str {
        match self {
            Command::Connect => "CONNECT",
            Command::Disconnect => "DISCONNECT",
            Command::Query => "QUERY",
            Command::Other(other) => other,
        }
    }

    /// True for CONNECT and DISCONNECT
    pub fn is_boundary(&self) -> bool {
        matches!(self, Command::Connect | Command::Disconnect)
    }
}

impl From<&str> for Command {
    fn from(value: &str) -> Self {
        match value {
            "CONNECT" => Command::Connect,
            "DISCONNECT" => Command::Disconnect,
            "QUERY" => Command::Query,
            other => Command::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized database activity.
///
/// Host, database, user, SQL text and remote host are opaque pass-through
/// values copied into the output row as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub session_id: String,
    pub command: Command,
    pub timestamp: CompactTimestamp,
    pub micros: Micros,
    pub db_host: String,
    pub db_name: String,
    pub db_user: String,
    pub sql_text: String,
    pub remote_host: String,
}

impl AuditEvent {
    pub fn is_query(&self) -> bool {
        self.command == Command::Query
    }
}

/// Retained events of one raw input line, in nested-list order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    /// 1-based line number in the source
    pub line: usize,
    pub events: Vec<AuditEvent>,
}

impl AuditRecord {
    pub fn new(line: usize, events: Vec<AuditEvent>) -> Self {
        Self { line, events }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_from_str() {
        assert_eq!(Command::from("CONNECT"), Command::Connect);
        assert_eq!(Command::from("DISCONNECT"), Command::Disconnect);
        assert_eq!(Command::from("QUERY"), Command::Query);
        assert_eq!(
            Command::from("INIT DB"),
            Command::Other("INIT DB".to_string())
        );
    }

    #[test]
    fn test_command_matching_is_case_sensitive() {
        assert_eq!(Command::from("query"), Command::Other("query".to_string()));
    }

    #[test]
    fn test_boundary_commands() {
        assert!(Command::Connect.is_boundary());
        assert!(Command::Disconnect.is_boundary());
        assert!(!Command::Query.is_boundary());
        assert_eq!(Command::Other("PING".into()).to_string(), "PING");
    }
}
