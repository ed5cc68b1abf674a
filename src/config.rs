//! Analysis configuration with TOML loading.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::Error;

/// Thresholds steering the comparator and window engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Total float at or below this value marks an activity critical
    #[serde(default = "default_critical_path_threshold")]
    pub critical_path_threshold: f64,

    /// Minimum delay magnitude (days) for a delay event
    #[serde(default = "default_significant_delay_threshold")]
    pub significant_delay_threshold: f64,

    /// Minimum absolute float change (days) worth tracking; a noise filter,
    /// not a zero test
    #[serde(default = "default_float_change_threshold")]
    pub float_change_threshold: f64,

    /// Finish variance within this many days counts as on time
    #[serde(default = "default_on_time_tolerance_days")]
    pub on_time_tolerance_days: f64,

    /// Default custom-window length in days
    #[serde(default = "default_window_period_days")]
    pub window_period_days: u32,
}

fn default_critical_path_threshold() -> f64 {
    0.0
}

fn default_significant_delay_threshold() -> f64 {
    5.0
}

fn default_float_change_threshold() -> f64 {
    0.1
}

fn default_on_time_tolerance_days() -> f64 {
    2.0
}

fn default_window_period_days() -> u32 {
    30
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            critical_path_threshold: default_critical_path_threshold(),
            significant_delay_threshold: default_significant_delay_threshold(),
            float_change_threshold: default_float_change_threshold(),
            on_time_tolerance_days: default_on_time_tolerance_days(),
            window_period_days: default_window_period_days(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.significant_delay_threshold < 0.0 {
            return Err("significant_delay_threshold must be non-negative".to_string());
        }
        if self.float_change_threshold < 0.0 {
            return Err("float_change_threshold must be non-negative".to_string());
        }
        if self.on_time_tolerance_days < 0.0 {
            return Err("on_time_tolerance_days must be non-negative".to_string());
        }
        if self.window_period_days == 0 {
            return Err("window_period_days must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Top-level configuration file shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DelaymapConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Load configuration from a TOML file, or the defaults when no path is
/// given.
pub fn load_config(path: Option<&Path>) -> Result<DelaymapConfig> {
    let Some(path) = path else {
        return Ok(DelaymapConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    let config: DelaymapConfig = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    config.analysis.validate().map_err(Error::Configuration)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn defaults_are_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
        assert_eq!(AnalysisConfig::default().significant_delay_threshold, 5.0);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let raw = indoc! {r#"
            [analysis]
            significant_delay_threshold = 10.0
        "#};
        let config: DelaymapConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.analysis.significant_delay_threshold, 10.0);
        assert_eq!(config.analysis.float_change_threshold, 0.1);
    }

    #[test]
    fn zero_period_is_rejected() {
        let config = AnalysisConfig {
            window_period_days: 0,
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
