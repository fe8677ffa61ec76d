//! Runner configuration loaded from TOML.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;
use wizardiuz_abilities::FeedbackStyle;

pub const DEFAULT_CONFIG_PATH: &str = "config/wizardiuz.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Seed for ability selection. Same seed + same script = same casts.
    pub rng_seed: u64,
    /// Render action-bar text without color codes.
    pub plain_feedback: bool,
    /// Ticks simulated after the last script step so deferred tasks drain.
    pub max_ticks: u64,
    /// Where to write the JSONL outcome log, if anywhere.
    pub event_log: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            rng_seed: 0x5741_5a44,
            plain_feedback: false,
            max_ticks: 40,
            event_log: None,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<RunnerConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    RunnerConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                RunnerConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Action-bar style selected by `plain_feedback`.
    pub fn feedback_style(&self) -> FeedbackStyle {
        if self.plain_feedback {
            FeedbackStyle::Plain
        } else {
            FeedbackStyle::Formatted
        }
    }
}
