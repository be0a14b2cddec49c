//! Platform-specific directory utilities
//!
//! Provides consistent directory paths across different operating systems,
//! following platform conventions for cache and data directories.

use std::path::PathBuf;

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "gearplan")
}

/// Get the platform-specific directory gearsets are saved to
///
/// - macOS: `~/Library/Application Support/gearplan/gearsets`
/// - Linux: `~/.local/share/gearplan/gearsets` (or `$XDG_DATA_HOME/gearplan/gearsets`)
/// - Windows: `%APPDATA%\gearplan\gearsets`
/// - Fallback: `./save_data/gearsets`
pub fn save_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
        .join("gearsets")
}

/// Static content bundled with the workspace.
pub fn bundled_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../gear/content/data")
}
