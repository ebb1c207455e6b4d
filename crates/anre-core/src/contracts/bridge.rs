//! Bridge signal names.
//!
//! Inbound signals flow from the UI surface to the privileged process,
//! outbound signals flow the other way. The names are part of the wire
//! contract with the frontend and must not change.

/// UI asks the supervisor to start the local server (no payload).
pub const REQUEST_START: &str = "start-local-server";

/// Supervisor reports the outcome of a start attempt.
pub const START_RESULT: &str = "local-server-result";

/// One decoded line of server output.
pub const OUTPUT_LINE: &str = "local-server-output";

/// Request/response: is the server library present on disk.
pub const CHECK_EXISTS: &str = "check-local-server";

/// Port announced by the server.
pub const PORT_DISCOVERED: &str = "local-server-port";

/// Health monitor status change.
pub const HEALTH_CHANGED: &str = "local-server-health";

/// Server process exited.
pub const SERVER_EXITED: &str = "local-server-exited";

pub const MINIMIZE_WINDOW: &str = "minimize-window";
pub const MAXIMIZE_WINDOW: &str = "maximize-window";
pub const CLOSE_WINDOW: &str = "close-window";
pub const OPEN_EXTERNAL_URL: &str = "open-external-url";

/// Signals the UI surface may send.
pub const INBOUND: &[&str] = &[
    REQUEST_START,
    CHECK_EXISTS,
    MINIMIZE_WINDOW,
    MAXIMIZE_WINDOW,
    CLOSE_WINDOW,
    OPEN_EXTERNAL_URL,
];

/// Signals the UI surface may listen to.
pub const OUTBOUND: &[&str] = &[
    START_RESULT,
    OUTPUT_LINE,
    PORT_DISCOVERED,
    HEALTH_CHANGED,
    SERVER_EXITED,
];

/// Whether a signal name is accepted from the UI surface.
pub fn is_inbound(channel: &str) -> bool {
    INBOUND.contains(&channel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_whitelist() {
        assert!(is_inbound("start-local-server"));
        assert!(is_inbound("open-external-url"));
        assert!(!is_inbound("local-server-output"));
        assert!(!is_inbound("delete-everything"));
    }

    #[test]
    fn test_inbound_and_outbound_are_disjoint() {
        for name in OUTBOUND {
            assert!(!INBOUND.contains(name), "{name} is in both lists");
        }
    }
}
