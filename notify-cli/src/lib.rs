//! # notify-cli
//!
//! The `notify` command: argument parsing, config source selection, command handlers and terminal output.

pub mod cli;
pub mod commands;
pub mod output;

pub use cli::{Cli, Commands, ConfigArgs};
pub use commands::{report_error, run};
