//! Path utilities for the external server and the launcher's own files.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle reporting separately
//! - OS-specific logic is kept private in `platform`

mod error;
mod platform;
mod server;

pub use error::PathError;
pub use platform::{RESOURCE_DIR_ENV, executable_name, resolve_against, resource_root};
pub use server::ServerPaths;
