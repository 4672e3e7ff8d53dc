// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Ensures configuration values are within ranges the engine can integrate
//! stably. All problems are collected and reported together.

use crate::{ConfigError, ConfigResult, LeabraConfig};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every failed check
pub fn validate_config(config: &LeabraConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_engine(config, &mut errors);
    validate_time_constants(config, &mut errors);
    validate_learning(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn invalid(field: &str, reason: &str) -> ConfigValidationError {
    ConfigValidationError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_engine(config: &LeabraConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.engine.threads == 0 {
        errors.push(invalid("engine.threads", "must be at least 1"));
    }
    if config.engine.cycles_per_quarter == 0 {
        errors.push(invalid("engine.cycles_per_quarter", "must be at least 1"));
    }
    if config.engine.wt_bal_interval == 0 {
        errors.push(invalid("engine.wt_bal_interval", "must be at least 1"));
    }
    if config.engine.time_per_cycle <= 0.0 {
        errors.push(invalid("engine.time_per_cycle", "must be positive"));
    }
}

fn validate_time_constants(config: &LeabraConfig, errors: &mut Vec<ConfigValidationError>) {
    let act = &config.activation;
    if !(0.0..=1.0).contains(&act.decay) {
        errors.push(invalid("activation.decay", "must be between 0.0 and 1.0"));
    }
    if act.vm_tau < 1.0 {
        errors.push(invalid("activation.vm_tau", "must be >= 1"));
    }
    if act.g_tau < 1.0 {
        errors.push(invalid("activation.g_tau", "must be >= 1"));
    }
    if act.clamp_gain < 0.0 {
        errors.push(invalid("activation.clamp_gain", "must be non-negative"));
    }

    let inhib = &config.inhibition;
    if inhib.fb_tau <= 0.0 {
        errors.push(invalid("inhibition.fb_tau", "must be positive"));
    }
    if inhib.layer_gi < 0.0 {
        errors.push(invalid("inhibition.layer_gi", "must be non-negative"));
    }
    if let Some(gi) = inhib.pool_gi {
        if gi < 0.0 {
            errors.push(invalid("inhibition.pool_gi", "must be non-negative"));
        }
    }
}

fn validate_learning(config: &LeabraConfig, errors: &mut Vec<ConfigValidationError>) {
    let lrn = &config.learning;
    if !(lrn.lrate > 0.0 && lrn.lrate <= 1.0) {
        errors.push(invalid("learning.lrate", "must be in (0.0, 1.0]"));
    }
    if lrn.m_lrn < 0.0 {
        errors.push(invalid("learning.m_lrn", "must be non-negative"));
    }
}

fn validate_logging(config: &LeabraConfig, errors: &mut Vec<ConfigValidationError>) {
    const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
    let level = config.logging.level.to_lowercase();
    if level.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "logging.level".to_string(),
        });
    } else if !LEVELS.contains(&level.as_str()) {
        errors.push(invalid(
            "logging.level",
            "must be one of error, warn, info, debug, trace",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LeabraConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_threads_rejected() {
        let mut config = LeabraConfig::default();
        config.engine.threads = 0;

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("engine.threads"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_all_errors_reported_together() {
        let mut config = LeabraConfig::default();
        config.learning.lrate = 0.0;
        config.activation.decay = 1.5;
        config.logging.level = "verbose".to_string();

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("learning.lrate"));
                assert!(msg.contains("activation.decay"));
                assert!(msg.contains("logging.level"));
                assert_eq!(msg.matches("  - ").count(), 3);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_log_level() {
        let mut config = LeabraConfig::default();
        config.logging.level = String::new();

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("Missing required configuration: logging.level"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
