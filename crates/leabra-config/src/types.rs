// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `leabra_config.toml`. Every section is optional in the file; missing
//! fields fall back to the defaults below, which match the engine's own
//! parameter defaults.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LeabraConfig {
    pub engine: EngineConfig,
    pub activation: ActivationConfig,
    pub inhibition: InhibitionConfig,
    pub learning: LearningConfig,
    pub logging: LoggingConfig,
}

/// Scheduler and worker-pool configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of persistent layer workers (1 = sequential)
    pub threads: usize,
    /// Number of weight commits between weight-balance recomputations
    pub wt_bal_interval: u32,
    pub cycles_per_quarter: u32,
    /// Simulated seconds per cycle
    pub time_per_cycle: f32,
    /// Seed for weight initialization
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            wt_bal_interval: 10,
            cycles_per_quarter: 25,
            time_per_cycle: 0.001,
            seed: 42,
        }
    }
}

/// Unit activation parameters applied to every layer
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ActivationConfig {
    /// Proportion of state decayed toward init at each trial start
    pub decay: f32,
    pub clamp_hard: bool,
    /// Soft clamp gain (used when `clamp_hard` is false)
    pub clamp_gain: f32,
    pub vm_tau: f32,
    pub g_tau: f32,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        Self {
            decay: 1.0,
            clamp_hard: true,
            clamp_gain: 0.2,
            vm_tau: 3.3,
            g_tau: 1.4,
        }
    }
}

/// FFFB inhibition parameters applied to every layer
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InhibitionConfig {
    pub layer_gi: f32,
    /// Sub-pool inhibition gain; `None` leaves pool inhibition off
    pub pool_gi: Option<f32>,
    pub ff: f32,
    pub fb: f32,
    pub fb_tau: f32,
    pub ff0: f32,
    pub self_inhib: bool,
}

impl Default for InhibitionConfig {
    fn default() -> Self {
        Self {
            layer_gi: 1.8,
            pool_gi: None,
            ff: 1.0,
            fb: 1.0,
            fb_tau: 1.4,
            ff0: 0.1,
            self_inhib: false,
        }
    }
}

/// Synaptic learning parameters applied to every pathway
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LearningConfig {
    pub lrate: f32,
    pub m_lrn: f32,
    pub norm: bool,
    pub momentum: bool,
    pub wt_bal: bool,
    pub err_mod: bool,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            lrate: 0.04,
            m_lrn: 1.0,
            norm: true,
            momentum: true,
            wt_bal: false,
            err_mod: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level ("error", "warn", "info", "debug", "trace")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
