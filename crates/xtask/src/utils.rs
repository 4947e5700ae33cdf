//! Utility functions for xtask commands

use std::path::{Path, PathBuf};

use anyhow::Result;
use console::{StyledObject, style};
use loadout_content::{ProfileFormat, ProfileStore};
use loadout_core::LoadoutManager;

/// Resolves a profile argument that is either a file path or a profile name.
///
/// Names are looked up in `profile_dir` (RON first, then bincode).
pub fn resolve_profile(arg: &str, profile_dir: &Path) -> Result<PathBuf> {
    let direct = PathBuf::from(arg);
    if direct.is_file() {
        return Ok(direct);
    }

    for format in ProfileFormat::ALL {
        let candidate = profile_dir.join(format!("{}.{}", arg, format.extension()));
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    let known = if profile_dir.is_dir() {
        ProfileStore::new(profile_dir)
            .and_then(|store| store.list())
            .unwrap_or_default()
    } else {
        Vec::new()
    };
    if known.is_empty() {
        anyhow::bail!(
            "Profile not found: {}\n\nHint: no profiles in {}",
            arg,
            profile_dir.display()
        );
    }
    anyhow::bail!(
        "Profile not found: {}\n\nHint: available profiles: {}",
        arg,
        known.join(", ")
    )
}

/// Loads the profile named or located by `arg`.
pub fn load_profile(arg: &str, profile_dir: &Path) -> Result<(PathBuf, LoadoutManager)> {
    let path = resolve_profile(arg, profile_dir)?;
    let manager = ProfileStore::load_path(&path)?;
    Ok((path, manager))
}

/// Colours a ratio: green under 75%, yellow up to 100%, red beyond.
pub fn styled_ratio(ratio: f32) -> StyledObject<String> {
    let text = format!("{:>6.1}%", ratio * 100.0);
    if ratio > 1.0 {
        style(text).red().bold()
    } else if ratio >= 0.75 {
        style(text).yellow()
    } else {
        style(text).green()
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
