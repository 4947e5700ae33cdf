//! Engine configuration loader.

use std::path::Path;

use loadout_core::LoadoutConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`LoadoutConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their built-in defaults.
    pub fn load(path: &Path) -> LoadResult<LoadoutConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<LoadoutConfig> {
        let config: LoadoutConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !is_positive(config.mass_per_body_size)
            || !is_positive(config.alternate_mass_per_body_size)
        {
            anyhow::bail!("Mass per body size must be positive and finite");
        }
        if !is_positive(config.bulk_per_body_size) {
            anyhow::bail!("Bulk per body size must be positive and finite");
        }

        Ok(config)
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("mass_per_body_size = 30.0\n").unwrap();
        assert_eq!(config.mass_per_body_size, 30.0);
        assert_eq!(
            config.alternate_mass_per_body_size,
            LoadoutConfig::DEFAULT_ALTERNATE_MASS_PER_BODY_SIZE
        );
        assert_eq!(
            config.alternate_capacity_module,
            LoadoutConfig::DEFAULT_ALTERNATE_CAPACITY_MODULE
        );
    }

    #[test]
    fn rejects_non_positive_constants() {
        assert!(ConfigLoader::parse("bulk_per_body_size = 0.0\n").is_err());
        assert!(ConfigLoader::parse("mass_per_body_size = -1.0\n").is_err());
    }

    #[test]
    fn rejects_nan_and_infinite_constants() {
        for line in [
            "mass_per_body_size = nan\n",
            "alternate_mass_per_body_size = nan\n",
            "bulk_per_body_size = nan\n",
            "mass_per_body_size = inf\n",
            "bulk_per_body_size = -inf\n",
        ] {
            let err = ConfigLoader::parse(line).expect_err(line);
            assert!(err.to_string().contains("positive and finite"), "{line}");
        }
    }
}
