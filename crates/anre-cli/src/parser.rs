//! Main CLI parser and top-level argument handling.
//!
//! Global options override the launcher settings. Each one can also come
//! from an `ANRE_*` environment variable or a `.env` file.

use clap::Parser;

use anre_core::settings::SettingsUpdate;

use crate::commands::Commands;

/// Command-line interface for the Anre launcher.
#[derive(Parser)]
#[command(name = "anre")]
#[command(about = "Launch and supervise the local Anre proxy server")]
#[command(version)]
pub struct Cli {
    /// Directory containing the server files
    #[arg(long = "server-dir", env = "ANRE_SERVER_DIR", global = true)]
    pub server_dir: Option<String>,

    /// Server entry library inside the server directory
    #[arg(long = "library", env = "ANRE_SERVER_LIBRARY", global = true)]
    pub library: Option<String>,

    /// Runtime program used to run the library
    #[arg(long = "runtime", env = "ANRE_RUNTIME", global = true)]
    pub runtime: Option<String>,

    /// Server log file
    #[arg(long = "log-file", env = "ANRE_LOG_FILE", global = true)]
    pub log_file: Option<String>,

    /// Milliseconds of silence after which the server counts as started
    #[arg(long = "startup-window-ms", env = "ANRE_STARTUP_WINDOW_MS", global = true)]
    pub startup_window_ms: Option<u64>,

    /// Milliseconds between liveness probes
    #[arg(long = "health-interval-ms", env = "ANRE_HEALTH_INTERVAL_MS", global = true)]
    pub health_interval_ms: Option<u64>,

    /// Give up on the liveness probe after this many attempts
    #[arg(long = "health-max-attempts", env = "ANRE_HEALTH_MAX_ATTEMPTS", global = true)]
    pub health_max_attempts: Option<u32>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Settings overrides given on the command line or in the environment.
    pub fn settings_update(&self) -> SettingsUpdate {
        SettingsUpdate {
            server_dir: self.server_dir.clone().map(Some),
            server_library: self.library.clone().map(Some),
            runtime_program: self.runtime.clone().map(Some),
            runtime_dir: None,
            log_file: self.log_file.clone().map(Some),
            startup_window_ms: self.startup_window_ms.map(Some),
            health_interval_ms: self.health_interval_ms.map(Some),
            health_max_attempts: self.health_max_attempts.map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args_become_settings() {
        let cli = Cli::parse_from([
            "anre",
            "--server-dir",
            "/opt/anre/server",
            "--startup-window-ms",
            "2000",
            "check",
        ]);
        let update = cli.settings_update();
        assert_eq!(update.server_dir, Some(Some("/opt/anre/server".to_string())));
        assert_eq!(update.startup_window_ms, Some(Some(2000)));
        assert_eq!(update.server_library, None);
    }
}
