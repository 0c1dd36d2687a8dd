//! Run configuration for the `centroidtrack` binary.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::tracker::{ClassFilter, TrackerConfig};

/// One feed to replay.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Identifier written to every record as `Device ID`
    pub id: String,
    /// JSON-lines detection replay file
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Class ids to track; COCO person by default
    #[serde(default = "default_classes")]
    pub classes: Vec<u32>,
    pub feeds: Vec<FeedConfig>,
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_classes() -> Vec<u32> {
    vec![0]
}

fn default_output() -> PathBuf {
    PathBuf::from("output.json")
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tracker.validate()?;
        if self.feeds.is_empty() {
            return Err(ConfigError::Invalid("no feeds configured".into()));
        }
        let mut seen = HashSet::new();
        for feed in &self.feeds {
            if !seen.insert(feed.id.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate feed id `{}`", feed.id)));
            }
        }
        Ok(())
    }

    pub fn class_filter(&self) -> ClassFilter {
        ClassFilter::only(self.classes.iter().copied())
    }
}
