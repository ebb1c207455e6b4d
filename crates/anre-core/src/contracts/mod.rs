//! Transport contract constants.
//!
//! This module contains string constants for the external server's HTTP
//! routes and the bridge signal names shared between the privileged process
//! and the UI surface. Keep these string-only with no framework-specific
//! types to avoid dependency creep.

pub mod bridge;
pub mod http;
