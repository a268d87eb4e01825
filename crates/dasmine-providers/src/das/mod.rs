//! Amazon RDS Database Activity Streams, decoded to one JSON object per line.
//!
//! Each line wraps a `databaseActivityEventList`; only entries of type
//! `record` describe database activity.

mod normalize;
mod schema;

pub use normalize::normalize_line;
