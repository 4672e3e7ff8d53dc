// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later tiers win:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, LeabraConfig, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Find the Leabra configuration file
///
/// Search order:
/// 1. `LEABRA_CONFIG_PATH` environment variable
/// 2. Current working directory: `./leabra_config.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("LEABRA_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by LEABRA_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Leabra configuration file '{}' not found in any of these locations:\n{}\n\nSet LEABRA_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Range validation is separate, see [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<LeabraConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: LeabraConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

fn parse_bool(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower == "true" || lower == "1" || lower == "yes"
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `LEABRA_THREADS` -> `engine.threads`
/// - `LEABRA_WT_BAL_INTERVAL` -> `engine.wt_bal_interval`
/// - `LEABRA_SEED` -> `engine.seed`
/// - `LEABRA_LRATE` -> `learning.lrate`
/// - `LEABRA_WT_BAL` -> `learning.wt_bal`
/// - `LEABRA_LOG_LEVEL` -> `logging.level`
///
/// Unparseable values are ignored.
pub fn apply_environment_overrides(config: &mut LeabraConfig) {
    if let Ok(value) = env::var("LEABRA_THREADS") {
        if let Ok(threads) = value.parse::<usize>() {
            config.engine.threads = threads;
        }
    }
    if let Ok(value) = env::var("LEABRA_WT_BAL_INTERVAL") {
        if let Ok(interval) = value.parse::<u32>() {
            config.engine.wt_bal_interval = interval;
        }
    }
    if let Ok(value) = env::var("LEABRA_SEED") {
        if let Ok(seed) = value.parse::<u64>() {
            config.engine.seed = seed;
        }
    }
    if let Ok(value) = env::var("LEABRA_LRATE") {
        if let Ok(lrate) = value.parse::<f32>() {
            config.learning.lrate = lrate;
        }
    }
    if let Ok(value) = env::var("LEABRA_WT_BAL") {
        config.learning.wt_bal = parse_bool(&value);
    }
    if let Ok(value) = env::var("LEABRA_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"threads": "4", "lrate": "0.02"}`)
pub fn apply_cli_overrides(config: &mut LeabraConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("threads") {
        if let Ok(threads) = value.parse::<usize>() {
            config.engine.threads = threads;
        }
    }
    if let Some(value) = cli_args.get("cycles_per_quarter") {
        if let Ok(cycles) = value.parse::<u32>() {
            config.engine.cycles_per_quarter = cycles;
        }
    }
    if let Some(value) = cli_args.get("seed") {
        if let Ok(seed) = value.parse::<u64>() {
            config.engine.seed = seed;
        }
    }
    if let Some(value) = cli_args.get("lrate") {
        if let Ok(lrate) = value.parse::<f32>() {
            config.learning.lrate = lrate;
        }
    }
    if let Some(value) = cli_args.get("wt_bal") {
        config.learning.wt_bal = parse_bool(value);
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}
