//! Port announcement detection.
//!
//! Once its listener is bound the server prints `Running on port => <port>`.
//! The port is chosen at runtime, so scraping this line is the only way to
//! learn it.

use std::sync::LazyLock;

use regex::Regex;

static PORT_ANNOUNCEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Running\s*on\s*port\s*=>\s*(\d+)").expect("port announcement pattern is valid")
});

/// Extract the announced port from one decoded line.
///
/// Returns `None` for lines without an announcement and for digit runs that
/// do not fit a TCP port.
pub fn extract_port(line: &str) -> Option<u16> {
    PORT_ANNOUNCEMENT
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}
