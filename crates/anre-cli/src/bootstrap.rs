//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter:
//! - Settings (defaults, `ANRE_*` environment, flags)
//! - Path resolution (via anre-core)
//! - Supervisor, bridge, log sink and probe (via anre-runtime)

use std::sync::Arc;

use anre_core::paths::ServerPaths;
use anre_core::ports::{ServerLogSinkPort, ShellEventEmitter};
use anre_core::settings::{LauncherSettings, validate_settings};
use anre_runtime::{
    FileLogSink, HttpPingProbe, ProcessSupervisor, ShellBridge, ShellEventBroadcaster,
    SupervisorConfig,
};

use crate::error::CliError;
use crate::parser::Cli;
use crate::window::HeadlessWindow;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub settings: LauncherSettings,
}

impl CliConfig {
    /// Defaults overridden by flags and environment, validated.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut settings = LauncherSettings::with_defaults();
        settings.merge(&cli.settings_update());
        validate_settings(&settings).map_err(|e| CliError::Config(e.to_string()))?;
        Ok(Self { settings })
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    pub settings: LauncherSettings,
    pub paths: ServerPaths,
    pub broadcaster: ShellEventBroadcaster,
    pub bridge: ShellBridge,
}

impl CliContext {
    pub const fn supervisor(&self) -> &ProcessSupervisor {
        self.bridge.supervisor()
    }
}

/// Bootstrap the CLI context.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let settings = config.settings;
    let paths = ServerPaths::resolve(&settings).map_err(|e| CliError::Config(e.to_string()))?;

    let broadcaster = ShellEventBroadcaster::new();
    let emitter: Arc<dyn ShellEventEmitter> = Arc::new(broadcaster.clone());
    let log_sink: Arc<dyn ServerLogSinkPort> = Arc::new(FileLogSink::new(&paths.log_file));
    let probe = HttpPingProbe::new().map_err(|e| CliError::Core(e.to_string()))?;

    let supervisor = ProcessSupervisor::new(
        paths.clone(),
        SupervisorConfig::from_settings(&settings),
        Arc::clone(&emitter),
        log_sink,
        Arc::new(probe),
    );
    let bridge = ShellBridge::new(supervisor, Arc::new(HeadlessWindow::new()), emitter);

    Ok(CliContext {
        settings,
        paths,
        broadcaster,
        bridge,
    })
}
