//! Configuration for the exact search engine.

use serde::{Deserialize, Serialize};

use crate::distance_measures::DistanceMeasure;
use crate::error::{ExactError, Result};

/// Default query count at which per-query work is spread over the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// Configuration for [`ExactSearchEngine`](crate::brute_force::ExactSearchEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExactConfig {
    /// Number of neighbors `top_n` extracts per query.
    pub num_neighbors: u32,

    /// Initial radius for range queries.
    pub radius: f32,

    /// Distance measure the harness should pass to query operations.
    pub distance_measure: DistanceMeasure,

    /// Enable parallel execution across queries.
    pub parallel: bool,

    /// Minimum number of queries before parallel execution kicks in.
    pub parallel_threshold: usize,
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            num_neighbors: 1,
            radius: 1.0,
            distance_measure: DistanceMeasure::L2,
            parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ExactConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of neighbors to extract.
    pub fn with_num_neighbors(mut self, n: u32) -> Self {
        self.num_neighbors = n;
        self
    }

    /// Set the initial radius.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set the distance measure.
    pub fn with_distance_measure(mut self, measure: DistanceMeasure) -> Self {
        self.distance_measure = measure;
        self
    }

    /// Enable or disable parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the query count at which execution goes parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Check that the values describe a usable engine.
    pub fn validate(&self) -> Result<()> {
        validate_radius(self.radius)
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ExactError::invalid_argument(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ExactError::invalid_argument(format!("unserializable config: {e}")))
    }
}

pub(crate) fn validate_radius(radius: f32) -> Result<()> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(ExactError::invalid_argument(format!(
            "radius must be finite and non-negative, got {radius}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExactConfig::default();
        assert_eq!(config.num_neighbors, 1);
        assert_eq!(config.distance_measure, DistanceMeasure::L2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ExactConfig::new()
            .with_num_neighbors(5)
            .with_radius(2.5)
            .with_distance_measure(DistanceMeasure::L1)
            .with_parallel(false)
            .with_parallel_threshold(8);

        assert_eq!(config.num_neighbors, 5);
        assert_eq!(config.radius, 2.5);
        assert_eq!(config.distance_measure, DistanceMeasure::L1);
        assert!(!config.parallel);
        assert_eq!(config.parallel_threshold, 8);
    }

    #[test]
    fn test_invalid_radius() {
        assert!(ExactConfig::new().with_radius(-1.0).validate().is_err());
        assert!(ExactConfig::new().with_radius(f32::NAN).validate().is_err());
        assert!(ExactConfig::new().with_radius(f32::INFINITY).validate().is_err());
        assert!(ExactConfig::new().with_radius(0.0).validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = ExactConfig::new()
            .with_num_neighbors(20)
            .with_distance_measure(DistanceMeasure::Cosine);

        let json = config.to_json().unwrap();
        let deserialized = ExactConfig::from_json(&json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ExactConfig::from_json(r#"{ "num_neighbors": 3 }"#).unwrap();
        assert_eq!(config.num_neighbors, 3);
        assert_eq!(config.radius, 1.0);

        assert!(ExactConfig::from_json(r#"{ "radius": -2.0 }"#).is_err());
        assert!(ExactConfig::from_json("not json").is_err());
    }
}
