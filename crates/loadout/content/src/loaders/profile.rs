//! Player profile persistence.
//!
//! A profile is a whole [`LoadoutManager`]: every tag, state and per-agent
//! loadout. Profiles are stored as `{name}.ron` (readable, hand-editable) or
//! `{name}.bin` (compact bincode) inside one directory.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use loadout_core::LoadoutManager;

use crate::loaders::{LoadResult, read_file};

/// On-disk encoding of a profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileFormat {
    Ron,
    Bincode,
}

impl ProfileFormat {
    pub const ALL: [ProfileFormat; 2] = [ProfileFormat::Ron, ProfileFormat::Bincode];

    pub fn extension(self) -> &'static str {
        match self {
            ProfileFormat::Ron => "ron",
            ProfileFormat::Bincode => "bin",
        }
    }

    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ron") => Some(ProfileFormat::Ron),
            Some("bin") => Some(ProfileFormat::Bincode),
            _ => None,
        }
    }

    pub fn encode(self, manager: &LoadoutManager) -> LoadResult<Vec<u8>> {
        match self {
            ProfileFormat::Ron => {
                let text = ron::ser::to_string_pretty(manager, ron::ser::PrettyConfig::default())
                    .map_err(|e| anyhow::anyhow!("Failed to encode profile RON: {}", e))?;
                Ok(text.into_bytes())
            }
            ProfileFormat::Bincode => bincode::serialize(manager)
                .map_err(|e| anyhow::anyhow!("Failed to encode profile bincode: {}", e)),
        }
    }

    /// Decodes and validates a profile. Profiles that the editing API could
    /// not have produced are rejected.
    pub fn decode(self, bytes: &[u8]) -> LoadResult<LoadoutManager> {
        let manager: LoadoutManager = match self {
            ProfileFormat::Ron => {
                let text = std::str::from_utf8(bytes)
                    .map_err(|e| anyhow::anyhow!("Profile RON is not UTF-8: {}", e))?;
                ron::from_str(text)
                    .map_err(|e| anyhow::anyhow!("Failed to parse profile RON: {}", e))?
            }
            ProfileFormat::Bincode => bincode::deserialize(bytes)
                .map_err(|e| anyhow::anyhow!("Failed to parse profile bincode: {}", e))?,
        };
        manager
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid profile: {}", e))?;
        Ok(manager)
    }
}

/// Directory of saved profiles.
pub struct ProfileStore {
    base_dir: PathBuf,
}

impl ProfileStore {
    /// Opens (creating if needed) a profile directory.
    pub fn new(base_dir: impl AsRef<Path>) -> LoadResult<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(|e| {
            anyhow::anyhow!("Failed to create profile dir {}: {}", base_dir.display(), e)
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of `name` in `format`. Names must be a single plain file name.
    fn profile_path(&self, name: &str, format: ProfileFormat) -> LoadResult<PathBuf> {
        let plain = !name.trim().is_empty()
            && !name.contains(['/', '\\'])
            && Path::new(name).file_name() == Some(OsStr::new(name));
        if !plain {
            anyhow::bail!("Invalid profile name '{}'", name);
        }
        Ok(self
            .base_dir
            .join(format!("{}.{}", name, format.extension())))
    }

    /// Writes `manager` under `name`, replacing any previous profile atomically.
    pub fn save(
        &self,
        name: &str,
        manager: &LoadoutManager,
        format: ProfileFormat,
    ) -> LoadResult<PathBuf> {
        let path = self.profile_path(name, format)?;
        let temp_path = path.with_extension(format!("{}.tmp", format.extension()));

        let bytes = format.encode(manager)?;
        fs::write(&temp_path, bytes)
            .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", temp_path.display(), e))?;
        fs::rename(&temp_path, &path)
            .map_err(|e| anyhow::anyhow!("Failed to replace {}: {}", path.display(), e))?;

        tracing::debug!("Saved profile '{}' to {}", name, path.display());
        Ok(path)
    }

    /// Loads `name`, trying RON before bincode. `None` if neither exists.
    pub fn load(&self, name: &str) -> LoadResult<Option<LoadoutManager>> {
        for format in ProfileFormat::ALL {
            let path = self.profile_path(name, format)?;
            if path.exists() {
                let manager = Self::load_path(&path)?;
                tracing::debug!("Loaded profile '{}' from {}", name, path.display());
                return Ok(Some(manager));
            }
        }
        Ok(None)
    }

    /// Loads a profile from an explicit path, picking the format by extension.
    pub fn load_path(path: &Path) -> LoadResult<LoadoutManager> {
        let format = ProfileFormat::from_path(path).ok_or_else(|| {
            anyhow::anyhow!("Unknown profile extension for {}", path.display())
        })?;
        match format {
            ProfileFormat::Ron => ProfileFormat::Ron.decode(read_file(path)?.as_bytes()),
            ProfileFormat::Bincode => {
                let bytes = fs::read(path)
                    .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))?;
                ProfileFormat::Bincode.decode(&bytes)
            }
        }
    }

    /// False for names that are not valid profile names.
    pub fn exists(&self, name: &str) -> bool {
        ProfileFormat::ALL.iter().any(|format| {
            self.profile_path(name, *format)
                .is_ok_and(|path| path.exists())
        })
    }

    pub fn delete(&self, name: &str) -> LoadResult<()> {
        for format in ProfileFormat::ALL {
            let path = self.profile_path(name, format)?;
            if path.exists() {
                fs::remove_file(&path)
                    .map_err(|e| anyhow::anyhow!("Failed to delete {}: {}", path.display(), e))?;
                tracing::debug!("Deleted profile '{}' ({})", name, format.extension());
            }
        }
        Ok(())
    }

    /// Names of every stored profile, sorted and deduplicated.
    pub fn list(&self) -> LoadResult<Vec<String>> {
        let entries = fs::read_dir(&self.base_dir).map_err(|e| {
            anyhow::anyhow!("Failed to list {}: {}", self.base_dir.display(), e)
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if ProfileFormat::from_path(&path).is_none() {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort_unstable();
        names.dedup();
        Ok(names)
    }
}
