use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::core::error::RewardError;

/// Top-level configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RewardConfig {
    /// Per-function reward weights
    #[serde(default)]
    pub weights: RewardWeights,

    /// Correctness sample logging
    #[serde(default)]
    pub sample_log: SampleLogConfig,
}

/// Weights applied to each reward function before summation
#[derive(Debug, Deserialize, Clone)]
pub struct RewardWeights {
    /// Weight for the correctness reward
    #[serde(default = "default_correctness_weight")]
    pub correctness: f64,

    /// Weight for the integer-format reward
    #[serde(default = "default_integer_weight")]
    pub integer: f64,

    /// Weight for the strict-format reward
    #[serde(default = "default_strict_format_weight")]
    pub strict_format: f64,

    /// Weight for the soft-format reward
    #[serde(default = "default_soft_format_weight")]
    pub soft_format: f64,

    /// Weight for the tag-count reward
    #[serde(default = "default_tag_count_weight")]
    pub tag_count: f64,
}

/// Configuration for the correctness sample log
#[derive(Debug, Deserialize, Clone)]
pub struct SampleLogConfig {
    /// Whether sample logging is enabled at all
    #[serde(default)]
    pub enabled: bool,

    /// Fraction of scoring calls that write a sample
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,

    /// Base directory for sample files
    #[serde(default = "default_sample_dir")]
    pub base_dir: String,
}

// Default values for optional configuration
fn default_correctness_weight() -> f64 {
    8.0
}

fn default_integer_weight() -> f64 {
    2.0
}

fn default_strict_format_weight() -> f64 {
    2.0
}

fn default_soft_format_weight() -> f64 {
    2.0
}

fn default_tag_count_weight() -> f64 {
    4.0
}

fn default_sample_rate() -> f64 {
    0.01
}

fn default_sample_dir() -> String {
    "model_output_samples".to_string()
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            correctness: default_correctness_weight(),
            integer: default_integer_weight(),
            strict_format: default_strict_format_weight(),
            soft_format: default_soft_format_weight(),
            tag_count: default_tag_count_weight(),
        }
    }
}

impl Default for SampleLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_rate: default_sample_rate(),
            base_dir: default_sample_dir(),
        }
    }
}

impl RewardConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: RewardConfig = toml::from_str(&config_text)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate weights and sampling knobs
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("correctness", self.weights.correctness),
            ("integer", self.weights.integer),
            ("strict_format", self.weights.strict_format),
            ("soft_format", self.weights.soft_format),
            ("tag_count", self.weights.tag_count),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() {
                return Err(RewardError::ConfigError(format!(
                    "weight '{}' must be finite, got {}",
                    name, weight
                ))
                .into());
            }
        }

        if !self.sample_log.sample_rate.is_finite()
            || !(0.0..=1.0).contains(&self.sample_log.sample_rate)
        {
            return Err(RewardError::ConfigError(format!(
                "sample_rate must be in [0, 1], got {}",
                self.sample_log.sample_rate
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_match_training_stack() {
        let weights = RewardWeights::default();
        assert_eq!(weights.correctness, 8.0);
        assert_eq!(weights.integer, 2.0);
        assert_eq!(weights.strict_format, 2.0);
        assert_eq!(weights.soft_format, 2.0);
        assert_eq!(weights.tag_count, 4.0);
    }

    #[test]
    fn test_parse_partial_toml_uses_defaults() {
        let config: RewardConfig = toml::from_str(
            r#"
[weights]
correctness = 10.0

[sample_log]
enabled = true
"#,
        )
        .unwrap();

        assert_eq!(config.weights.correctness, 10.0);
        assert_eq!(config.weights.tag_count, 4.0);
        assert!(config.sample_log.enabled);
        assert_eq!(config.sample_log.sample_rate, 0.01);
        assert_eq!(config.sample_log.base_dir, "model_output_samples");
    }

    #[test]
    fn test_validate_rejects_bad_sample_rate() {
        let mut config = RewardConfig::default();
        config.sample_log.sample_rate = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_weight() {
        let mut config = RewardConfig::default();
        config.weights.soft_format = f64::NAN;
        assert!(config.validate().is_err());
    }
}
