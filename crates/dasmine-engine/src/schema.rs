use dasmine_types::{AuditEvent, CompactTimestamp};

use crate::Result;

/// Number of columns in every output row, header included
pub const COLUMN_COUNT: usize = 15;

/// Output header, in column order.
///
/// This is the only place the order is defined; rows are produced by
/// [`OutputRow::values`] in the same order.
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "Host",
    "Database",
    "SID",
    "Serial",
    "Logged In",
    "Logged Out",
    "DB User",
    "SQL Start Time",
    "SQL Start Time(Micro Sec)",
    "SQL Text",
    "Bind Variables",
    "Object",
    "Elapsed Time",
    "Program",
    "Client Information - Host",
];

/// Columns the activity stream cannot populate
const NOT_AVAILABLE: &str = "";

/// One query joined with its session window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputRow<'a> {
    pub event: &'a AuditEvent,
    pub logged_in: &'a CompactTimestamp,
    pub logged_out: Option<&'a CompactTimestamp>,
}

impl<'a> OutputRow<'a> {
    pub fn values(&self) -> [&'a str; COLUMN_COUNT] {
        let event = self.event;
        [
            &event.db_host,
            &event.db_name,
            &event.session_id,
            NOT_AVAILABLE, // Serial
            self.logged_in.as_str(),
            self.logged_out.map(CompactTimestamp::as_str).unwrap_or(""),
            &event.db_user,
            event.timestamp.as_str(),
            event.micros.as_str(),
            &event.sql_text,
            NOT_AVAILABLE, // Bind Variables
            NOT_AVAILABLE, // Object
            NOT_AVAILABLE, // Elapsed Time
            NOT_AVAILABLE, // Program
            &event.remote_host,
        ]
    }
}

/// Destination for output rows, one ordered list of column values per call
pub trait RowSink {
    fn write_values(&mut self, values: &[&str]) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

pub fn write_header(sink: &mut dyn RowSink) -> Result<()> {
    sink.write_values(&COLUMNS)
}

pub fn write_row(sink: &mut dyn RowSink, row: &OutputRow<'_>) -> Result<()> {
    sink.write_values(&row.values())
}

/// Sink that keeps rows in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    pub rows: Vec<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowSink for MemorySink {
    fn write_values(&mut self, values: &[&str]) -> Result<()> {
        self.rows.push(values.iter().map(|v| v.to_string()).collect());
        Ok(())
    }
}
