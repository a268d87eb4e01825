use dasmine_types::{AuditEvent, AuditRecord, Command, compact_timestamp};

use super::schema::{DasActivityEvent, DasRecord, RECORD_KIND};
use crate::filter::EventFilter;
use crate::{Error, Result};

/// Position of an activity entry inside the input, used for error reporting
#[derive(Debug, Clone, Copy)]
struct EntryPos {
    line: usize,
    index: usize,
}

impl EntryPos {
    fn require(self, value: Option<String>, field: &'static str) -> Result<String> {
        value.ok_or(Error::MissingField {
            line: self.line,
            index: self.index,
            field,
        })
    }

    /// Key must exist; an explicit null reads as blank
    fn require_key(self, value: Option<Option<String>>, field: &'static str) -> Result<String> {
        self.require(value.map(Option::unwrap_or_default), field)
    }

    /// Pass-through column: key mandatory on queries, blank elsewhere
    fn column(
        self,
        value: Option<Option<String>>,
        field: &'static str,
        command: &Command,
    ) -> Result<String> {
        if *command == Command::Query {
            self.require_key(value, field)
        } else {
            Ok(value.flatten().unwrap_or_default())
        }
    }
}

/// Normalize one raw activity-stream line into its retained audit events.
///
/// `line` is the 1-based line number, carried into the record and into any
/// error. Non-record entries and filtered users are dropped silently; any
/// structural problem with a retained entry is an error.
pub fn normalize_line(raw: &str, line: usize, filter: &EventFilter) -> Result<AuditRecord> {
    let record: DasRecord =
        serde_json::from_str(raw).map_err(|source| Error::Json { line, source })?;

    let mut events = Vec::with_capacity(record.database_activity_event_list.len());
    for (index, entry) in record.database_activity_event_list.into_iter().enumerate() {
        if let Some(event) = normalize_entry(entry, EntryPos { line, index }, filter)? {
            events.push(event);
        }
    }

    Ok(AuditRecord::new(line, events))
}

fn normalize_entry(
    entry: DasActivityEvent,
    pos: EntryPos,
    filter: &EventFilter,
) -> Result<Option<AuditEvent>> {
    if entry.kind != RECORD_KIND {
        return Ok(None);
    }

    let db_user = pos.require_key(entry.db_user_name, "dbUserName")?;
    if filter.excludes_user(&db_user) {
        return Ok(None);
    }

    let session_id = entry
        .session_id
        .map(|id| id.into_string())
        .ok_or(Error::MissingField {
            line: pos.line,
            index: pos.index,
            field: "sessionId",
        })?;
    let command = Command::from(pos.require(entry.command, "command")?.as_str());
    let log_time = pos.require(entry.log_time, "logTime")?;
    let (timestamp, micros) = compact_timestamp(&log_time).map_err(|source| Error::Timestamp {
        line: pos.line,
        index: pos.index,
        source,
    })?;

    Ok(Some(AuditEvent {
        db_host: pos.column(entry.server_host, "serverHost", &command)?,
        db_name: pos.column(entry.database_name, "databaseName", &command)?,
        sql_text: pos.column(entry.command_text, "commandText", &command)?,
        remote_host: pos.column(entry.remote_host, "remoteHost", &command)?,
        session_id,
        command,
        timestamp,
        micros,
        db_user,
    }))
}
