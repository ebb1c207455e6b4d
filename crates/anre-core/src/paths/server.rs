//! External server path resolution.

use std::path::PathBuf;

use serde::Serialize;

use super::error::PathError;
use super::platform::{executable_name, resolve_against, resource_root};
use crate::settings::LauncherSettings;

/// All on-disk locations the supervisor needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerPaths {
    /// Directory the server runs in.
    pub server_dir: PathBuf,
    /// Entry library passed to the runtime.
    pub library: PathBuf,
    /// Runtime shipped next to the server, if the distribution bundles one.
    pub bundled_runtime: PathBuf,
    /// Runtime program name used for the `PATH` lookup fallback.
    pub runtime_program: String,
    /// Persistent server log.
    pub log_file: PathBuf,
}

impl ServerPaths {
    /// Resolve paths from settings against the resource root and the
    /// current working directory.
    pub fn resolve(settings: &LauncherSettings) -> Result<Self, PathError> {
        let root = resource_root()?;
        let cwd = std::env::current_dir().map_err(|e| PathError::CurrentDirError(e.to_string()))?;
        Self::resolve_with_roots(settings, &root, &cwd)
    }

    /// Resolve paths with explicit roots.
    pub fn resolve_with_roots(
        settings: &LauncherSettings,
        resource_root: &std::path::Path,
        working_dir: &std::path::Path,
    ) -> Result<Self, PathError> {
        let server_dir = resolve_against(resource_root, settings.effective_server_dir())?;
        if server_dir.exists() && !server_dir.is_dir() {
            return Err(PathError::NotADirectory(server_dir));
        }

        let library = resolve_against(&server_dir, settings.effective_server_library())?;
        let runtime_program = settings.effective_runtime_program().trim().to_string();
        if runtime_program.is_empty() {
            return Err(PathError::EmptyPath);
        }
        let bundled_runtime = server_dir
            .join(settings.effective_runtime_dir())
            .join(executable_name(&runtime_program));
        let log_file = resolve_against(working_dir, settings.effective_log_file())?;

        Ok(Self {
            server_dir,
            library,
            bundled_runtime,
            runtime_program,
            log_file,
        })
    }
}
