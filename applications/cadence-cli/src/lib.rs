//! Cadence CLI
//!
//! Terminal front-end for `cadence-control`: a text control surface bound to
//! a simulated engine, driven by typed commands.

pub mod commands;
pub mod config;
pub mod demo;
pub mod error;
pub mod terminal;

pub use commands::DemoCommand;
pub use config::{AppConfig, DemoSettings};
pub use error::{CliError, Result};
pub use terminal::TerminalSurface;
