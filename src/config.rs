//! Configuration
//!
//! Data paths and display options load from `lrpscope.toml` in the working
//! directory (or an explicit `--config` path). CLI flags override the config
//! file; the config file overrides built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::render::Colormap;

/// Config filename looked up in the working directory
pub const CONFIG_FILE: &str = "lrpscope.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSection,
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSection {
    /// Pickled baseline attribution records
    pub baseline: PathBuf,
    /// Pickled augmented attribution records
    pub augmented: PathBuf,
    /// Reference translations, one subword-tokenized sentence per line
    pub references: PathBuf,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            baseline: PathBuf::from("lrp_results/baseline"),
            augmented: PathBuf::from("lrp_results/yolov5"),
            references: PathBuf::from("ref/test.spm.trim50.pt"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// hot | viridis | grayscale
    pub colormap: String,
    /// Label for the extra EOS row/column on heatmap axes
    pub eos_label: String,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            colormap: "hot".to_string(),
            eos_label: "<EOS>".to_string(),
        }
    }
}

impl Config {
    /// Load from an explicit path (must exist) or `./lrpscope.toml` (may not)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILE), false),
        };
        if !path.exists() {
            if required {
                anyhow::bail!("config file not found: {}", path.display());
            }
            debug!("no {CONFIG_FILE} found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

/// Effective options after merging defaults, config file, and CLI flags
#[derive(Debug, Clone)]
pub struct Settings {
    pub baseline: PathBuf,
    pub augmented: PathBuf,
    pub references: PathBuf,
    pub colormap: Colormap,
    pub eos_label: String,
}

impl Settings {
    pub fn resolve(
        config: Config,
        baseline: Option<PathBuf>,
        augmented: Option<PathBuf>,
        references: Option<PathBuf>,
    ) -> Self {
        let colormap = match config.display.colormap.parse::<Colormap>() {
            Ok(c) => c,
            Err(_) => {
                warn!(
                    value = %config.display.colormap,
                    "unknown colormap in config, falling back to hot"
                );
                Colormap::Hot
            }
        };
        Self {
            baseline: baseline.unwrap_or(config.data.baseline),
            augmented: augmented.unwrap_or(config.data.augmented),
            references: references.unwrap_or(config.data.references),
            colormap,
            eos_label: config.display.eos_label,
        }
    }
}
