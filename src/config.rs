//! Configuration management for the anomaly explorer

use crate::control::Contamination;
use anyhow::{bail, Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the optional configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub detector: DetectorConfig,
    pub control: ControlConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Input dataset configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the transaction CSV file
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/transactions.csv"),
        }
    }
}

/// Isolation forest configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Number of trees in the ensemble
    pub n_estimators: usize,
    /// Rows sampled per tree (capped at the dataset size)
    pub max_samples: usize,
    /// Random seed; a fixed seed makes every run reproducible
    pub seed: u64,
    /// Feature plotted on the x-axis
    pub feature_x: String,
    /// Feature plotted on the y-axis
    pub feature_y: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_samples: 256,
            seed: 42,
            feature_x: "amount".to_string(),
            feature_y: "dist_from_home".to_string(),
        }
    }
}

/// Interactive control configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Contamination used when the prompt is left empty
    pub default_contamination: f64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            default_contamination: Contamination::DEFAULT,
        }
    }
}

/// Rendered output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the scatter chart and the anomaly export
    pub dir: PathBuf,
    /// Scatter chart file name
    pub scatter_file: String,
    /// Suspicious rows export file name
    pub export_file: String,
    /// Rows shown in the data preview after loading
    pub preview_rows: usize,
}

impl OutputConfig {
    pub fn scatter_path(&self) -> PathBuf {
        self.dir.join(&self.scatter_file)
    }

    pub fn export_path(&self) -> PathBuf {
        self.dir.join(&self.export_file)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            scatter_file: "anomalies.svg".to_string(),
            export_file: "detected_anomalies.csv".to_string(),
            preview_rows: 5,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path. A missing file yields defaults.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .build()
            .context("Failed to build configuration")?;

        let config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the detector or the control surface cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.detector.n_estimators == 0 {
            bail!("detector.n_estimators must be at least 1");
        }
        if self.detector.max_samples < 2 {
            bail!("detector.max_samples must be at least 2");
        }
        if self.detector.feature_x == self.detector.feature_y {
            bail!(
                "detector.feature_x and detector.feature_y must differ (both are `{}`)",
                self.detector.feature_x
            );
        }
        Contamination::new(self.control.default_contamination)
            .context("control.default_contamination is out of range")?;
        Ok(())
    }
}
