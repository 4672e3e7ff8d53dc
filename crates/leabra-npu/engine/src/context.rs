// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Simulation time counters, passed by reference to every update

use leabra_config::EngineConfig;
use serde::{Deserialize, Serialize};

/// Number of quarters in one alpha trial
pub const QUARTERS_PER_TRIAL: usize = 4;

/// Time state for the quarter / cycle scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    /// Accumulated time in seconds
    pub time: f32,
    /// Cycle within the current trial
    pub cycle: usize,
    /// Cycles since the last reset, never rewound by a trial start
    pub cycle_tot: usize,
    /// Quarter within the trial, 0..=3
    pub quarter: usize,
    /// True during quarter 3
    pub plus_phase: bool,
    pub time_per_cycle: f32,
    pub cycles_per_quarter: usize,
    /// Completed trials
    pub trial: usize,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            time: 0.0,
            cycle: 0,
            cycle_tot: 0,
            quarter: 0,
            plus_phase: false,
            time_per_cycle: 0.001,
            cycles_per_quarter: 25,
            trial: 0,
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timing parameters from the `[engine]` config section
    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self {
            time_per_cycle: cfg.time_per_cycle,
            cycles_per_quarter: cfg.cycles_per_quarter.max(1) as usize,
            ..Self::default()
        }
    }

    /// Zero every counter, keeping the timing parameters
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.cycle = 0;
        self.cycle_tot = 0;
        self.quarter = 0;
        self.plus_phase = false;
        self.trial = 0;
        if self.cycles_per_quarter == 0 {
            self.cycles_per_quarter = 25;
        }
    }

    pub fn alpha_cyc_start(&mut self) {
        self.cycle = 0;
        self.quarter = 0;
        self.plus_phase = false;
    }

    pub fn cycle_inc(&mut self) {
        self.cycle += 1;
        self.cycle_tot += 1;
        self.time += self.time_per_cycle;
    }

    pub fn quarter_inc(&mut self) {
        self.quarter += 1;
        self.plus_phase = self.quarter == QUARTERS_PER_TRIAL - 1;
    }

    /// Cycles into the current quarter
    pub fn quarter_cycle(&self) -> usize {
        self.cycle.saturating_sub(self.quarter * self.cycles_per_quarter)
    }
}
