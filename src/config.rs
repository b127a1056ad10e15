//! Environment configuration
//!
//! Fixed at construction. Loadable from a JSON file for the demo driver.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, EnvError};
use crate::sim::{SensorAlgorithm, SensorGeometry, WorldParams};

/// Construction-time environment configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Sensor algorithm
    pub algorithm: SensorAlgorithm,
    /// Beams on each side of straight-ahead, in `1..=MAX_BEAM_COUNT`.
    /// `NearestBeam` fans out 3° per beam and accepts at most 29.
    pub beam_count: usize,

    // === World ===
    /// Lower world bound
    pub min: i32,
    /// Upper world bound
    pub max: i32,
    /// Distance moved per tick
    pub speed: f64,

    // === Sensor ===
    /// Projection distance for beam footprints
    pub sensing_distance: f64,
    /// Detection tolerance; the algorithm's tuned value when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_size: Option<f64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::for_algorithm(SensorAlgorithm::default())
    }
}

impl EnvConfig {
    /// Defaults for an algorithm
    pub fn for_algorithm(algorithm: SensorAlgorithm) -> Self {
        Self {
            algorithm,
            beam_count: DEFAULT_BEAM_COUNT,
            min: MIN,
            max: MAX,
            speed: SPEED,
            sensing_distance: SENSING_DISTANCE,
            window_size: None,
        }
    }

    pub fn with_beam_count(mut self, beam_count: usize) -> Self {
        self.beam_count = beam_count;
        self
    }

    pub fn with_window_size(mut self, window_size: f64) -> Self {
        self.window_size = Some(window_size);
        self
    }

    /// Configured window size, falling back to the algorithm default
    pub fn effective_window_size(&self) -> f64 {
        self.window_size.unwrap_or_else(|| self.algorithm.default_window_size())
    }

    /// World bounds and speed
    pub fn world_params(&self) -> WorldParams {
        WorldParams {
            min: self.min,
            max: self.max,
            speed: self.speed,
        }
    }

    /// Beam geometry described by this config
    pub fn sensor_geometry(&self) -> Result<SensorGeometry, EnvError> {
        SensorGeometry::new(
            self.algorithm,
            self.beam_count,
            self.effective_window_size(),
            self.sensing_distance,
        )
    }

    /// Check the config can drive an environment
    pub fn validate(&self) -> Result<(), EnvError> {
        if self.beam_count == 0 {
            return Err(EnvError::InvalidConfiguration(
                "beam_count must be greater than zero".into(),
            ));
        }
        // Reset draws from [min + 1, max), which must not be empty
        if i64::from(self.min) + 1 >= i64::from(self.max) {
            return Err(EnvError::InvalidConfiguration(format!(
                "world bounds [{}, {}] leave no room to spawn",
                self.min, self.max
            )));
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(EnvError::InvalidConfiguration(format!(
                "speed must be positive and finite, got {}",
                self.speed
            )));
        }
        self.sensor_geometry().map(|_| ())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!(
            "Loaded {} config from {} ({} beams per side)",
            config.algorithm,
            path.as_ref().display(),
            config.beam_count
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_threshold_window() {
        let config = EnvConfig::default();
        assert_eq!(config.algorithm, SensorAlgorithm::ThresholdWindow);
        assert_eq!(config.beam_count, 2);
        assert_eq!(config.effective_window_size(), 0.1);
        assert_eq!((config.min, config.max), (0, 100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_for_algorithm_window_size() {
        let config = EnvConfig::for_algorithm(SensorAlgorithm::NearestBeam);
        assert_eq!(config.effective_window_size(), 5.0);
        assert_eq!(config.sensing_distance, 100.0);
        assert_eq!(config.with_window_size(2.5).effective_window_size(), 2.5);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            EnvConfig::default().with_beam_count(0),
            EnvConfig::default().with_window_size(0.0),
            EnvConfig {
                min: 10,
                max: 11,
                ..EnvConfig::default()
            },
            EnvConfig {
                speed: f64::NAN,
                ..EnvConfig::default()
            },
            EnvConfig {
                sensing_distance: -1.0,
                ..EnvConfig::default()
            },
            EnvConfig::for_algorithm(SensorAlgorithm::NearestBeam).with_beam_count(30),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(EnvError::InvalidConfiguration(_))),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config = EnvConfig::from_json_str(r#"{"algorithm": "nearest_beam", "beam_count": 4}"#)
            .unwrap();
        assert_eq!(config.algorithm, SensorAlgorithm::NearestBeam);
        assert_eq!(config.beam_count, 4);
        assert_eq!(config.window_size, None);
        assert_eq!(config.effective_window_size(), 5.0);
        assert_eq!(config.max, 100);
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(
            EnvConfig::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EnvConfig::from_json_str(r#"{"beam_count": 0}"#),
            Err(ConfigError::Invalid(EnvError::InvalidConfiguration(_)))
        ));
        assert!(matches!(
            EnvConfig::from_json_file("/nonexistent/follow-the-leader.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_json_huge_beam_count_rejected() {
        for json in [
            r#"{"beam_count": 18446744073709551615}"#,
            r#"{"beam_count": 65537}"#,
        ] {
            assert!(
                matches!(
                    EnvConfig::from_json_str(json),
                    Err(ConfigError::Invalid(EnvError::InvalidConfiguration(_)))
                ),
                "{json} should be rejected"
            );
        }
        assert!(EnvConfig::default().with_beam_count(MAX_BEAM_COUNT).validate().is_ok());
    }

    #[test]
    fn test_json_round_trip() {
        let config = EnvConfig::for_algorithm(SensorAlgorithm::NearestBeam).with_beam_count(6);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"nearest_beam\""));
        assert_eq!(EnvConfig::from_json_str(&json).unwrap(), config);
    }
}
