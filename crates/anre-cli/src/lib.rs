//! Command-line front end for the Anre launcher.
//!
//! Stands in for the desktop window: it drives the supervisor through the
//! bridge and prints bridge events to the terminal.
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Dependencies used only by the binary target
use anyhow as _;
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod window;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, LoginMethod};
pub use error::CliError;
pub use parser::Cli;
pub use window::HeadlessWindow;
