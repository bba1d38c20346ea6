//! Configuration structures for the news-labeler system.

use crate::error::{Error, Result};
use crate::types::PriceField;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for a labeling run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Alignment and labeling parameters.
    pub aligner: AlignerConfig,
    /// Price history loading.
    pub loader: LoaderConfig,
    /// Column names of the event file.
    pub events: EventColumns,
    /// Output configuration.
    pub output: OutputConfig,
    /// Price-window normalization.
    pub windows: WindowConfig,
}

impl Config {
    /// Load configuration from a TOML file, or JSON when the extension is `.json`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config: Config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&text)?,
            _ => toml::from_str(&text)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.aligner.validate()?;
        self.windows.validate()?;
        if self.events.title.is_empty() || self.events.symbol.is_empty() || self.events.date.is_empty() {
            return Err(Error::config("event column names must not be empty"));
        }
        Ok(())
    }
}

/// Alignment and labeling parameters, fixed for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignerConfig {
    /// Forward offset from the event day to the target day, in calendar days.
    pub horizon_days: i64,
    /// Label threshold (tau) on the relative change.
    pub threshold: f64,
    /// Field read at the anchor observation.
    pub anchor_field: PriceField,
    /// Field read at the target observation.
    pub target_field: PriceField,
    /// Log interim stats every N successes (0 = never).
    pub progress_interval: u64,
    /// Events per work unit in parallel runs.
    pub chunk_size: usize,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            horizon_days: 3,
            threshold: 0.01,
            anchor_field: PriceField::Open,
            target_field: PriceField::Close,
            progress_interval: 100_000,
            chunk_size: 4096,
        }
    }
}

impl AlignerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.horizon_days < 0 {
            return Err(Error::config(format!(
                "horizon_days must be >= 0, got {}",
                self.horizon_days
            )));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(Error::config(format!(
                "threshold must be a finite value >= 0, got {}",
                self.threshold
            )));
        }
        if self.chunk_size == 0 {
            return Err(Error::config("chunk_size must be > 0"));
        }
        Ok(())
    }
}

/// Price history loading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Directory holding one `{SYMBOL}.csv` per symbol.
    pub data_dir: PathBuf,
    /// Log and skip symbol files with malformed rows instead of failing.
    pub skip_malformed: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("full_history"),
            skip_malformed: false,
        }
    }
}

/// Column names of the event (news) file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventColumns {
    pub title: String,
    pub symbol: String,
    pub date: String,
}

impl Default for EventColumns {
    fn default() -> Self {
        Self {
            title: "Article_title".to_string(),
            symbol: "Stock_symbol".to_string(),
            date: "Date".to_string(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Labeled dataset path.
    pub path: PathBuf,
    /// Use the parallel aligner.
    pub parallel: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("news_labels_open_vs_close_h3_tau001.csv"),
            parallel: false,
        }
    }
}

/// Price-window normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Trailing price columns per row.
    pub width: usize,
    /// Bins of the score histogram logged after normalization.
    pub histogram_bins: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 11,
            histogram_bins: 50,
        }
    }
}

impl WindowConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(Error::config("window width must be > 0"));
        }
        if self.histogram_bins == 0 {
            return Err(Error::config("histogram_bins must be > 0"));
        }
        Ok(())
    }
}
