//! CLI module for the Almanac command-line interface.
//!
//! Commands run against the calendars declared in the configuration file.

mod commands;
mod output;

pub use commands::*;
