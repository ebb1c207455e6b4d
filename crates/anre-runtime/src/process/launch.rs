//! Launch plan resolution and spawning for the external server.
//!
//! The server is a library run by a separate runtime program:
//! `<runtime> <library>` with the library's directory as working directory.
//! A runtime bundled next to the server wins; otherwise the program is
//! looked up on `PATH`.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use anre_core::paths::ServerPaths;
use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Errors that can occur before the server process exists.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The server entry library is not on disk.
    #[error("Server library not found at: {path}")]
    LibraryMissing { path: PathBuf },

    /// The OS refused to start the runtime.
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Where the runtime binary came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeSource {
    /// Shipped inside the server directory.
    Bundled,
    /// Found on `PATH`.
    SearchPath,
    /// Not found anywhere; the bare program name is handed to the OS.
    Unresolved,
}

/// Everything needed to spawn the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub runtime: PathBuf,
    pub runtime_source: RuntimeSource,
    pub library: PathBuf,
    pub working_dir: PathBuf,
}

/// Select the runtime binary.
///
/// 1. The bundled runtime, if present
/// 2. The program resolved from `PATH`
/// 3. The bare program name (spawning will report the failure)
fn select_runtime(bundled: &Path, program: &str) -> (PathBuf, RuntimeSource) {
    if bundled.is_file() {
        debug!("Using bundled runtime: {}", bundled.display());
        return (bundled.to_path_buf(), RuntimeSource::Bundled);
    }

    match which::which(program) {
        Ok(path) => {
            debug!(
                "Bundled runtime missing at {}, using {} from PATH",
                bundled.display(),
                path.display()
            );
            (path, RuntimeSource::SearchPath)
        }
        Err(e) => {
            warn!(program = %program, error = %e, "Runtime not found on PATH");
            (PathBuf::from(program), RuntimeSource::Unresolved)
        }
    }
}

/// Resolve the launch plan, failing early when the library is missing.
pub fn resolve_launch_plan(paths: &ServerPaths) -> Result<LaunchPlan, LaunchError> {
    if !paths.library.is_file() {
        return Err(LaunchError::LibraryMissing {
            path: paths.library.clone(),
        });
    }

    let (runtime, runtime_source) = select_runtime(&paths.bundled_runtime, &paths.runtime_program);
    let working_dir = paths
        .library
        .parent()
        .map_or_else(|| paths.server_dir.clone(), Path::to_path_buf);

    Ok(LaunchPlan {
        runtime,
        runtime_source,
        library: paths.library.clone(),
        working_dir,
    })
}

/// Build the command for a launch plan.
///
/// stdout and stderr are piped for the stream readers; the child is killed
/// if its handle is dropped without an explicit shutdown.
pub fn build_command(plan: &LaunchPlan) -> Command {
    let mut cmd = Command::new(&plan.runtime);
    cmd.arg(&plan.library)
        .current_dir(&plan.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

/// Spawn the server described by `plan`.
pub fn spawn(plan: &LaunchPlan) -> Result<Child, LaunchError> {
    build_command(plan)
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            program: plan.runtime.display().to_string(),
            source,
        })
}
