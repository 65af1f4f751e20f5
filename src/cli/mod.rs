//! CLI module for gyre - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for running a loop
//! and checking actuator availability.

pub mod commands;

pub use commands::Cli;
