//! Engine configuration.
//!
//! Timing and penalty knobs for the match engine, loadable from a YAML
//! file. Durations are written in human form (`"30s"`, `"1m"`) and parsed
//! with `humantime`; loading validates the timer ordering so a bad file is
//! refused up front instead of misfiring mid-match.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

// ============================================================================
// Typed configuration
// ============================================================================

/// Validated engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// First warning, relative to delivery start
    pub first_warning: Duration,
    /// Final warning, relative to delivery start
    pub final_warning: Duration,
    /// Hard forfeiture deadline, relative to delivery start
    pub forfeit_deadline: Duration,
    /// Runs moved by a forfeiture (+ for bowler miss, − for batter miss)
    pub forfeit_runs: u32,
    /// Consecutive misses before escalation (suspension / neglect wicket)
    pub miss_escalation: u32,
    /// Extra overs a suspension covers beyond the current one
    pub suspension_overs: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            first_warning: Duration::from_secs(30),
            final_warning: Duration::from_secs(50),
            forfeit_deadline: Duration::from_secs(60),
            forfeit_runs: 6,
            miss_escalation: 2,
            suspension_overs: 1,
        }
    }
}

impl EngineConfig {
    /// Loads and validates a configuration file.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, malformed, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        let raw: RawEngineConfig =
            serde_yaml::from_str(&text).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::from_raw(raw)
    }

    /// Seconds remaining at the first warning.
    #[must_use]
    pub const fn first_warning_seconds_left(&self) -> u64 {
        self.forfeit_deadline
            .saturating_sub(self.first_warning)
            .as_secs()
    }

    /// Seconds remaining at the final warning.
    #[must_use]
    pub const fn final_warning_seconds_left(&self) -> u64 {
        self.forfeit_deadline
            .saturating_sub(self.final_warning)
            .as_secs()
    }

    fn from_raw(raw: RawEngineConfig) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            first_warning: parse_duration_field("first_warning", raw.first_warning)?
                .unwrap_or(defaults.first_warning),
            final_warning: parse_duration_field("final_warning", raw.final_warning)?
                .unwrap_or(defaults.final_warning),
            forfeit_deadline: parse_duration_field("forfeit_deadline", raw.forfeit_deadline)?
                .unwrap_or(defaults.forfeit_deadline),
            forfeit_runs: raw.forfeit_runs.unwrap_or(defaults.forfeit_runs),
            miss_escalation: raw.miss_escalation.unwrap_or(defaults.miss_escalation),
            suspension_overs: raw.suspension_overs.unwrap_or(defaults.suspension_overs),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.first_warning >= self.final_warning {
            return Err(ConfigError::InvalidValue {
                field: "first_warning".to_string(),
                value: format!("{:?}", self.first_warning),
                expected: "a duration before final_warning".to_string(),
            });
        }
        if self.final_warning >= self.forfeit_deadline {
            return Err(ConfigError::InvalidValue {
                field: "final_warning".to_string(),
                value: format!("{:?}", self.final_warning),
                expected: "a duration before forfeit_deadline".to_string(),
            });
        }
        if self.miss_escalation == 0 {
            return Err(ConfigError::InvalidValue {
                field: "miss_escalation".to_string(),
                value: "0".to_string(),
                expected: "at least 1".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Raw (file) representation
// ============================================================================

/// The on-disk shape: human-readable durations, everything optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEngineConfig {
    first_warning: Option<String>,
    final_warning: Option<String>,
    forfeit_deadline: Option<String>,
    forfeit_runs: Option<u32>,
    miss_escalation: Option<u32>,
    suspension_overs: Option<u32>,
}

fn parse_duration_field(
    field: &str,
    value: Option<String>,
) -> Result<Option<Duration>, ConfigError> {
    value
        .map(|s| {
            humantime::parse_duration(&s).map_err(|e| ConfigError::InvalidDuration {
                field: field.to_string(),
                message: e.to_string(),
            })
        })
        .transpose()
}
