//! Paths command handler.
//!
//! Displays all resolved paths for diagnostics in `key = value` format.

use anre_core::paths::{RESOURCE_DIR_ENV, ServerPaths};

use crate::bootstrap::CliContext;

/// Render resolved paths, one `key = value` per line.
pub fn render(paths: &ServerPaths) -> String {
    let rows = [
        ("server_dir", paths.server_dir.display().to_string()),
        ("library", paths.library.display().to_string()),
        ("bundled_runtime", paths.bundled_runtime.display().to_string()),
        ("runtime_program", paths.runtime_program.clone()),
        ("log_file", paths.log_file.display().to_string()),
    ];
    rows.iter()
        .map(|(key, value)| format!("{key} = {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn execute(ctx: &CliContext) {
    println!("{}", render(&ctx.paths));
    if let Ok(root) = std::env::var(RESOURCE_DIR_ENV) {
        println!("{RESOURCE_DIR_ENV} = {root}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anre_core::settings::LauncherSettings;
    use std::path::Path;

    #[test]
    fn test_render_lists_every_path() {
        let paths = ServerPaths::resolve_with_roots(
            &LauncherSettings::with_defaults(),
            Path::new("/opt/anre"),
            Path::new("/home/user"),
        )
        .unwrap();

        let text = render(&paths);
        assert!(text.contains("library = /opt/anre/server/AnreProxy.dll"));
        assert!(text.contains("runtime_program = dotnet"));
        assert_eq!(text.lines().count(), 5);
    }
}
