//! Runtime tuning knobs, resolved once at startup from a small JSON file.
//!
//! The bot persists its remotely adjustable values in one flat file. Missing
//! keys fall back to defaults at load time; callers receive a complete
//! [`BotConfig`] and never touch the disk again during a pass.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{DEFAULT_CONTEXT_COUNT, DEFAULT_MAX_CHANCE, DEFAULT_MIN_CHANCE, DEFAULT_THRESHOLD_HOURS};

/// The bot's adjustable behavior values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Reply probability right after the bot has posted.
    pub min_chance: f64,
    /// Reply probability once the threshold window has fully elapsed.
    pub max_chance: f64,
    /// Hours over which the reply chance ramps from min to max.
    pub threshold_hours: f64,
    /// Number of history messages assembled into the reply context.
    pub context_count: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            min_chance: DEFAULT_MIN_CHANCE,
            max_chance: DEFAULT_MAX_CHANCE,
            threshold_hours: DEFAULT_THRESHOLD_HOURS,
            context_count: DEFAULT_CONTEXT_COUNT,
        }
    }
}

impl BotConfig {
    /// Load the config file, treating an absent file as all-defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Persist the full config to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Update one key from its string form, with the same validation the bot
    /// applies to remote `/set` requests: chances must lie in [0, 1], the
    /// threshold must be non-negative, the context count a non-negative
    /// integer. Key matching is case-insensitive.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || Error::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key.to_ascii_lowercase().as_str() {
            "min_chance" | "max_chance" => {
                let v: f64 = value.parse().map_err(|_| invalid())?;
                if !(0.0..=1.0).contains(&v) {
                    return Err(invalid());
                }
                if key.eq_ignore_ascii_case("min_chance") {
                    self.min_chance = v;
                } else {
                    self.max_chance = v;
                }
            }
            "threshold_hours" => {
                let v: f64 = value.parse().map_err(|_| invalid())?;
                if v < 0.0 {
                    return Err(invalid());
                }
                self.threshold_hours = v;
            }
            "context_count" => {
                self.context_count = value.parse().map_err(|_| invalid())?;
            }
            other => return Err(Error::UnknownConfigKey(other.to_string())),
        }
        Ok(())
    }

    /// Human-readable listing of the current values.
    pub fn describe(&self) -> String {
        format!(
            "min_chance      = {}\nmax_chance      = {}\nthreshold_hours = {}\ncontext_count   = {}",
            self.min_chance, self.max_chance, self.threshold_hours, self.context_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = BotConfig::default();
        assert_eq!(config.min_chance, 0.05);
        assert_eq!(config.max_chance, 0.95);
        assert_eq!(config.threshold_hours, 10.0);
        assert_eq!(config.context_count, 5);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = BotConfig::load_or_default(&temp.path().join("absent.json")).unwrap();
        assert_eq!(config, BotConfig::default());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fileconst.json");
        std::fs::write(&path, r#"{"min_chance": 0.2}"#).unwrap();

        let config = BotConfig::load_or_default(&path).unwrap();
        assert_eq!(config.min_chance, 0.2);
        assert_eq!(config.max_chance, 0.95);
        assert_eq!(config.context_count, 5);
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fileconst.json");

        let mut config = BotConfig::default();
        config.set("MAX_CHANCE", "0.8").unwrap();
        config.set("context_count", "12").unwrap();
        config.save(&path).unwrap();

        let loaded = BotConfig::load_or_default(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.max_chance, 0.8);
        assert_eq!(loaded.context_count, 12);
    }

    #[test]
    fn test_set_validation() {
        let mut config = BotConfig::default();
        assert!(config.set("min_chance", "1.5").is_err());
        assert!(config.set("min_chance", "-0.1").is_err());
        assert!(config.set("threshold_hours", "-2").is_err());
        assert!(config.set("context_count", "-1").is_err());
        assert!(config.set("context_count", "2.5").is_err());
        assert!(matches!(
            config.set("volume", "11"),
            Err(Error::UnknownConfigKey(_))
        ));
        // Nothing was mutated along the way.
        assert_eq!(config, BotConfig::default());
    }
}
