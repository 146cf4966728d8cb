//! Herd breeding tracker CLI library.
//!
//! This crate provides the command-line interface over the breeding cycle
//! engine and its storage layer.

mod cli;
pub mod commands;
mod config;

pub use cli::{AnimalAction, Cli, Commands, RecordEvent, SettingsAction};
pub use config::Config;
