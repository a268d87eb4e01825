// Engine module - session reconstruction and query correlation
// This layer sits between normalized records (providers) and CLI output

pub mod correlate;
pub mod error;
pub mod pipeline;
pub mod schema;
pub mod tracker;

pub use correlate::{ProjectionStats, correlate, project};
pub use error::{Error, Result};
pub use pipeline::{RunOptions, RunSummary, run};
pub use schema::{COLUMN_COUNT, COLUMNS, MemorySink, OutputRow, RowSink, write_header, write_row};
pub use tracker::{BoundaryTracker, DuplicatePolicy, TrackedSessions, build_session_map};
