// Error types
pub mod error;

// Database Activity Streams format
pub mod das;

// Event filtering
pub mod filter;

// Re-iterable record sources
pub mod source;

pub use das::normalize_line;
pub use error::{Error, Result};
pub use filter::{DEFAULT_ADMIN_USER, EventFilter};
pub use source::{
    AuditSource, BufferedSource, DEFAULT_PROGRESS_INTERVAL, FileSource, LineSource, RecordIter,
    SourceOptions,
};
