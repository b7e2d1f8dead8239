use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tournament::DrawScoring;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub training: TrainingConfig,
    pub tournament: TournamentConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub learning_rate: f64,
    pub discount_rate: f64,
    pub epsilon: f64,
    pub episodes: usize,
    /// Progress is logged every this many episodes; 0 disables it.
    pub log_every: usize,
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            learning_rate: 0.1,
            discount_rate: 1.0,
            epsilon: 0.2,
            episodes: 5000,
            log_every: 1000,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Games per seating order.
    pub games: usize,
    pub k_factor: f64,
    pub draw_scoring: DrawScoring,
    pub seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        TournamentConfig {
            games: 5,
            k_factor: 30.0,
            draw_scoring: DrawScoring::BothWin,
            seed: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`AppConfig::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!(
                "config file '{}' not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        let training = &self.training;
        if !(training.learning_rate > 0.0 && training.learning_rate <= 1.0) {
            return Err(invalid("training.learning_rate must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&training.discount_rate) {
            return Err(invalid("training.discount_rate must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&training.epsilon) {
            return Err(invalid("training.epsilon must be in [0, 1]"));
        }
        if training.episodes == 0 {
            return Err(invalid("training.episodes must be > 0"));
        }
        if self.tournament.games == 0 {
            return Err(invalid("tournament.games must be > 0"));
        }
        if !(self.tournament.k_factor.is_finite() && self.tournament.k_factor > 0.0) {
            return Err(invalid("tournament.k_factor must be > 0"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> Error {
    Error::Config {
        message: message.to_string(),
    }
}
