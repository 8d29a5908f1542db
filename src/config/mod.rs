//! Configuration management for mastery-report

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::StudentId;
use crate::mastery::{MasteryPolicy, StarScores};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Student whose progress is reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<StudentId>,

    /// Platform base URL
    pub base_url: String,

    /// Minimum score (0-1) for a lesson to count as mastered
    pub mastery_threshold: f64,

    /// Completed attempts needed before mastery is judged
    pub min_attempts: usize,

    /// Most recent completed attempts that are averaged
    pub recent_attempts: usize,

    /// Fill drill scores below three stars
    pub star_scores: StarScores,

    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        let policy = MasteryPolicy::default();
        Self {
            student_id: None,
            base_url: "https://beastacademy.com".to_string(),
            mastery_threshold: policy.threshold,
            min_attempts: policy.min_attempts,
            recent_attempts: policy.recent_attempts,
            star_scores: policy.star_scores,
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from disk, or create default if not exists
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific file, creating it if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {:?}", path))?;
            let config: Self =
                serde_json::from_str(&contents).with_context(|| "Failed to parse config.json")?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!(?path, "created default config");
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "mastery-report")
            .context("Failed to determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Reject values the scorer cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.mastery_threshold) {
            bail!("mastery_threshold must be between 0 and 1, got {}", self.mastery_threshold);
        }
        if self.recent_attempts == 0 {
            bail!("recent_attempts must be at least 1");
        }
        let stars = &self.star_scores;
        for score in [stars.two_stars, stars.one_star, stars.no_stars] {
            if !(0.0..=1.0).contains(&score) {
                bail!("star scores must be between 0 and 1, got {}", score);
            }
        }
        Ok(())
    }

    /// Mastery rules for this run
    pub fn policy(&self) -> MasteryPolicy {
        MasteryPolicy {
            threshold: self.mastery_threshold,
            min_attempts: self.min_attempts,
            recent_attempts: self.recent_attempts,
            star_scores: self.star_scores,
        }
    }

    /// HTTP timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
