//! Platform-specific directory utilities
//!
//! Content (catalog, config, agents) and saved profiles live in different
//! places: content ships with the repository, profiles belong to the user.

use std::path::PathBuf;

/// Get the content directory holding `catalog.ron`, `config.toml` and friends
///
/// `LOADOUT_DATA_DIR` wins; otherwise the data shipped with `loadout-content`.
pub fn content_dir() -> PathBuf {
    std::env::var_os("LOADOUT_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../loadout/content/data")
        })
}

/// Get the platform-specific profile directory
///
/// Follows platform conventions:
/// - macOS: `~/Library/Application Support/loadout/profiles`
/// - Linux: `~/.local/share/loadout/profiles` (or `$XDG_DATA_HOME/loadout/profiles`)
/// - Windows: `%APPDATA%\loadout\profiles`
/// - Fallback: `./profiles`
///
/// `LOADOUT_PROFILE_DIR` overrides all of the above.
pub fn profile_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("LOADOUT_PROFILE_DIR") {
        return PathBuf::from(dir);
    }
    directories::ProjectDirs::from("", "", "loadout")
        .map(|dirs| dirs.data_dir().join("profiles"))
        .unwrap_or_else(|| PathBuf::from("./profiles"))
}
