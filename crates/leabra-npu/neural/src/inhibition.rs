// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pooled feedforward / feedback (FFFB) inhibition
//!
//! Inhibition for a pool is computed from the pool's average (or max)
//! excitatory conductance and its average activation. This yields a graded
//! k-winners-take-all dynamic without sorting.

use serde::{Deserialize, Serialize};

use crate::types::AvgMax;

/// FFFB parameters for one level (layer or sub-pool)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FffbParams {
    pub on: bool,
    /// Overall inhibition gain
    pub gi: f32,
    /// Feedforward weight on Ge
    pub ff: f32,
    /// Feedback weight on Act
    pub fb: f32,
    pub fb_tau: f32,
    /// 0 = average Ge, 1 = max Ge
    pub max_vs_avg: f32,
    /// Feedforward zero point
    pub ff0: f32,

    #[serde(skip)]
    pub fb_dt: f32,
}

impl Default for FffbParams {
    fn default() -> Self {
        let mut p = Self {
            on: true,
            gi: 1.8,
            ff: 1.0,
            fb: 1.0,
            fb_tau: 1.4,
            max_vs_avg: 0.0,
            ff0: 0.1,
            fb_dt: 0.0,
        };
        p.update();
        p
    }
}

impl FffbParams {
    pub fn update(&mut self) {
        self.fb_dt = 1.0 / self.fb_tau;
    }

    #[inline]
    pub fn ff_inhib(&self, avg_ge: f32, max_ge: f32) -> f32 {
        let ff_netin = avg_ge + self.max_vs_avg * (max_ge - avg_ge);
        if ff_netin > self.ff0 {
            self.ff * (ff_netin - self.ff0)
        } else {
            0.0
        }
    }

    #[inline]
    pub fn fb_inhib(&self, avg_act: f32) -> f32 {
        self.fb * avg_act
    }

    /// Compute `inh.gi` from the pool statistics already in `inh`
    pub fn inhib(&self, inh: &mut Inhib) {
        if !self.on {
            inh.init();
            return;
        }
        let ffi = self.ff_inhib(inh.ge.avg, inh.ge.max);
        let fbi = self.fb_inhib(inh.act.avg);

        inh.ffi = ffi;
        inh.fbi += self.fb_dt * (fbi - inh.fbi);
        inh.gi = self.gi * (ffi + inh.fbi);
        inh.gi_orig = inh.gi;
    }
}

/// Inhibition state of one pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Inhib {
    pub ffi: f32,
    pub fbi: f32,
    /// Pool inhibitory conductance added to each unit
    pub gi: f32,
    /// Gi before being floored by the layer level
    pub gi_orig: f32,
    /// Layer-level Gi, for sub-pools
    pub lay_gi: f32,
    pub ge: AvgMax,
    pub act: AvgMax,
}

impl Inhib {
    pub fn init(&mut self) {
        *self = Self::default();
    }

    /// Scale the transient state toward zero by `decay`
    pub fn decay(&mut self, decay: f32) {
        self.ge.decay(decay);
        self.act.decay(decay);
        self.ffi -= decay * self.ffi;
        self.fbi -= decay * self.fbi;
        self.gi -= decay * self.gi;
    }
}

/// Per-unit self inhibition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelfInhibParams {
    pub on: bool,
    pub gi: f32,
    pub tau: f32,

    #[serde(skip)]
    pub dt: f32,
}

impl Default for SelfInhibParams {
    fn default() -> Self {
        let mut p = Self { on: false, gi: 0.4, tau: 1.4, dt: 0.0 };
        p.update();
        p
    }
}

impl SelfInhibParams {
    pub fn update(&mut self) {
        self.dt = 1.0 / self.tau;
    }

    #[inline]
    pub fn inhib(&self, gi_self: &mut f32, act: f32) {
        if self.on {
            *gi_self += self.dt * (self.gi * act - *gi_self);
        } else {
            *gi_self = 0.0;
        }
    }
}

/// Running-average layer activity, used for conductance scaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActAvgParams {
    /// Initial estimate of average activity
    pub init: f32,
    /// Use `init` as a constant instead of the running average
    pub fixed: bool,
    /// Replace `init` with the first real average seen
    pub use_first: bool,
    /// Time constant in trials
    pub tau: f32,
    /// Multiplier on the running average for the effective value
    pub adjust: f32,

    #[serde(skip)]
    pub dt: f32,
}

impl Default for ActAvgParams {
    fn default() -> Self {
        let mut p = Self {
            init: 0.15,
            fixed: false,
            use_first: true,
            tau: 100.0,
            adjust: 1.0,
            dt: 0.0,
        };
        p.update();
        p
    }
}

impl ActAvgParams {
    pub fn update(&mut self) {
        self.dt = 1.0 / self.tau;
    }

    pub fn eff_init(&self) -> f32 {
        if self.fixed {
            self.init
        } else {
            self.adjust * self.init
        }
    }

    /// Update a running average from this trial's pool average
    pub fn avg_from_act(&self, avg: &mut f32, act: f32) {
        if act == 0.0 {
            return;
        }
        if self.use_first && *avg == self.init {
            *avg += 0.5 * (act - *avg);
        } else {
            *avg += self.dt * (act - *avg);
        }
    }

    pub fn eff_from_avg(&self, eff: &mut f32, avg: f32) {
        *eff = if self.fixed { self.init } else { self.adjust * avg };
    }
}

/// Inhibition parameter block for a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InhibParams {
    /// Whole-layer inhibition
    pub layer: FffbParams,
    /// Sub-pool inhibition, 4D layers only
    pub pool: FffbParams,
    pub self_inhib: SelfInhibParams,
    pub act_avg: ActAvgParams,
}

impl Default for InhibParams {
    fn default() -> Self {
        Self {
            layer: FffbParams::default(),
            pool: FffbParams { on: false, ..FffbParams::default() },
            self_inhib: SelfInhibParams::default(),
            act_avg: ActAvgParams::default(),
        }
    }
}

impl InhibParams {
    pub fn update(&mut self) {
        self.layer.update();
        self.pool.update();
        self.self_inhib.update();
        self.act_avg.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_stats(ge_avg: f32, act_avg: f32) -> Inhib {
        let mut inh = Inhib::default();
        inh.ge.update(ge_avg, 0);
        inh.ge.calc_avg();
        inh.act.update(act_avg, 0);
        inh.act.calc_avg();
        inh
    }

    #[test]
    fn test_ffi_zero_below_ff0() {
        let p = FffbParams::default();
        let mut inh = pool_stats(0.05, 0.0);
        p.inhib(&mut inh);
        assert_eq!(inh.ffi, 0.0);
        assert_eq!(inh.gi, 0.0);
    }

    #[test]
    fn test_gi_combines_ff_and_fb() {
        let p = FffbParams::default();
        let mut inh = pool_stats(0.6, 0.2);
        p.inhib(&mut inh);
        let fbi = p.fb_dt * 0.2;
        let want = 1.8 * (0.5 + fbi);
        assert!((inh.gi - want).abs() < 1e-6);
        assert_eq!(inh.gi, inh.gi_orig);
    }

    #[test]
    fn test_off_resets_state() {
        let p = FffbParams { on: false, ..FffbParams::default() };
        let mut inh = pool_stats(0.6, 0.2);
        inh.fbi = 0.3;
        p.inhib(&mut inh);
        assert_eq!(inh, Inhib::default());
    }

    #[test]
    fn test_self_inhib_off_zeroes() {
        let p = SelfInhibParams::default();
        let mut g = 0.7;
        p.inhib(&mut g, 1.0);
        assert_eq!(g, 0.0);
    }

    #[test]
    fn test_act_avg_use_first() {
        let p = ActAvgParams::default();
        let mut avg = p.init;
        p.avg_from_act(&mut avg, 0.35);
        assert!((avg - 0.25).abs() < 1e-6);
        p.avg_from_act(&mut avg, 0.0);
        assert!((avg - 0.25).abs() < 1e-6);
        p.avg_from_act(&mut avg, 0.35);
        assert!((avg - (0.25 + 0.01 * 0.1)).abs() < 1e-6);
    }
}
