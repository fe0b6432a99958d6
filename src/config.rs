//! Roadlog configuration.
//!
//! Loaded from `~/.roadlog/config.toml`. A missing file means defaults.
//! The HOS limits themselves are fixed by the boundary contract and are
//! deliberately not configurable here — only the offline route
//! estimator's knobs live in the config.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

/// Roadlog configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Average highway speed assumed by the offline route estimator.
    pub average_speed_mph: f64,

    /// Multiplier from great-circle distance to road distance.
    pub road_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            average_speed_mph: 50.0,
            road_factor: 1.2,
        }
    }
}

impl Config {
    /// Load config from `~/.roadlog/config.toml`, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self, String> {
        let Some(path) = Self::path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;
        config.validate().map_err(|e| format!("{}: {e}", path.display()))?;
        Ok(config)
    }

    /// The config file path: `~/.roadlog/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".roadlog").join("config.toml"))
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.average_speed_mph.is_finite() && self.average_speed_mph > 0.0) {
            return Err("average-speed-mph must be positive".to_string());
        }
        if !(self.road_factor.is_finite() && self.road_factor >= 1.0) {
            return Err("road-factor must be at least 1.0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!((config.average_speed_mph - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_kebab_case_keys() {
        let config: Config = toml::from_str(
            "average-speed-mph = 55.0\n\
             road-factor = 1.3\n",
        )
        .unwrap();
        assert!((config.average_speed_mph - 55.0).abs() < f64::EPSILON);
        assert!((config.road_factor - 1.3).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let config: Config = toml::from_str("average-speed-mph = 60.0\n").unwrap();
        assert!((config.road_factor - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_nonsense_speed() {
        let config: Config = toml::from_str("average-speed-mph = 0.0\n").unwrap();
        assert!(config.validate().is_err());
    }
}
