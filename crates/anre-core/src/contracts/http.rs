//! External proxy server route constants.

/// Liveness probe endpoint.
pub const PING_PATH: &str = "/Base/Ping";

/// Literal value the liveness probe answers with.
pub const PING_REPLY: &str = "Pong";

/// 4399 account login.
pub const AUTH_4399_PATH: &str = "/Netease/Auth/4399";

/// SAuth token login.
pub const AUTH_SAUTH_PATH: &str = "/Netease/Auth/SAuth";

/// Official Netease account login.
pub const AUTH_OFFICIAL_PATH: &str = "/Netease/Auth/Official";

/// Loopback host the external server binds to.
pub const LOCAL_HOST: &str = "127.0.0.1";

/// Build the base URL of a locally running server.
pub fn local_base_url(port: u16) -> String {
    format!("http://{LOCAL_HOST}:{port}")
}
