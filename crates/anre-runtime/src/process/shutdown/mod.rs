//! Process termination for the external server.
//!
//! `shutdown_child` sends a polite termination request and escalates to a
//! hard kill when the grace period runs out.

mod child;

pub use child::{DEFAULT_GRACE_PERIOD, shutdown_child};
