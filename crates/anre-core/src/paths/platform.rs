//! Platform-specific path resolution.

use std::env;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Environment variable overriding the resource root.
pub const RESOURCE_DIR_ENV: &str = "ANRE_RESOURCE_DIR";

/// Get the root directory relative paths are resolved against.
///
/// Resolution order:
/// 1. `ANRE_RESOURCE_DIR` environment variable
/// 2. The current working directory
pub fn resource_root() -> Result<PathBuf, PathError> {
    if let Ok(path) = env::var(RESOURCE_DIR_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    env::current_dir().map_err(|e| PathError::CurrentDirError(e.to_string()))
}

/// Resolve `path` against `root` unless it is already absolute.
pub fn resolve_against(root: &Path, path: &str) -> Result<PathBuf, PathError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }
    let candidate = Path::new(trimmed);
    if candidate.is_absolute() {
        Ok(candidate.to_path_buf())
    } else {
        Ok(root.join(candidate))
    }
}

/// Platform executable file name for a program.
pub fn executable_name(program: &str) -> String {
    #[cfg(target_os = "windows")]
    {
        if Path::new(program).extension().is_none() {
            return format!("{program}.exe");
        }
    }

    program.to_string()
}
