// dasmine CLI: wires sources, the session engine and the CSV sink together.
// Data goes to the output file or stdout; diagnostics always go to stderr.

mod args;
mod commands;
pub mod config;
mod handlers;
mod logging;
mod services;
pub mod types;

pub use args::{Cli, Commands};
pub use commands::run;
