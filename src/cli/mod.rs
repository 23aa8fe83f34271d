//! Command-line interface components
//!
//! This module contains CLI-specific code for the vod_fetcher application:
//! argument parsing and validation, the command handler, and transfer
//! progress display.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::Cli;
pub use commands::run;
pub use progress::TransferBar;
