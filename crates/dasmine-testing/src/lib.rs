//! Testing infrastructure for dasmine integration tests.
//!
//! This crate provides utilities for writing integration tests:
//! - `fixtures`: Builders for activity-stream lines and bundled sample logs
//! - `assertions`: CSV output checks
//! - `world`: Isolated temp directories for CLI runs

pub mod assertions;
pub mod fixtures;
pub mod world;

pub use fixtures::{DasEvent, SampleFiles, das_line, raw_log_time};
pub use world::TestWorld;
