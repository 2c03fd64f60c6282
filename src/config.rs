use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

use crate::error::Result;
use crate::utils::constants::{DEFAULT_OUTPUT_DIR, ENV_PREFIX};

/// What to do when a quantity's metadata disagrees between files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Stop the build; no catalog is produced
    #[default]
    Abort,
    /// Drop the offending inventory whole and carry on
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CatalogConfig {
    #[validate(range(min = 1, max = 1024))]
    pub max_workers: usize,
    pub on_conflict: ConflictPolicy,
    pub output_dir: PathBuf,
    pub show_progress: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_workers: num_cpus::get(),
            on_conflict: ConflictPolicy::Abort,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            show_progress: true,
        }
    }
}

impl CatalogConfig {
    /// Defaults, then the optional settings file, then `MERRA_CATALOG_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("max_workers", defaults.max_workers as i64)?
            .set_default("on_conflict", "abort")?
            .set_default("output_dir", DEFAULT_OUTPUT_DIR)?
            .set_default("show_progress", defaults.show_progress)?;

        if let Some(path) = path {
            debug!("Loading settings from {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Apply command-line flags, which win over every other layer
    pub fn with_overrides(
        mut self,
        max_workers: Option<usize>,
        on_conflict: Option<ConflictPolicy>,
    ) -> Result<Self> {
        if let Some(max_workers) = max_workers {
            self.max_workers = max_workers;
        }
        if let Some(on_conflict) = on_conflict {
            self.on_conflict = on_conflict;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::default();

        assert!(config.max_workers >= 1);
        assert_eq!(config.on_conflict, ConflictPolicy::Abort);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert!(config.show_progress);
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "max_workers = 3\non_conflict = \"skip\"\noutput_dir = \"catalogs\"\n",
        )?;

        let config = CatalogConfig::load(Some(&path))?;

        assert_eq!(config.max_workers, 3);
        assert_eq!(config.on_conflict, ConflictPolicy::Skip);
        assert_eq!(config.output_dir, PathBuf::from("catalogs"));
        assert!(config.show_progress);
        Ok(())
    }

    #[test]
    fn test_missing_settings_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(CatalogConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_overrides_are_validated() {
        let config = CatalogConfig::default();

        let overridden = config
            .clone()
            .with_overrides(Some(2), Some(ConflictPolicy::Skip))
            .unwrap();
        assert_eq!(overridden.max_workers, 2);
        assert_eq!(overridden.on_conflict, ConflictPolicy::Skip);

        assert!(config.with_overrides(Some(0), None).is_err());
    }
}
