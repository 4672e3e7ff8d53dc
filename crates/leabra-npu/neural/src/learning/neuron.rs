// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unit-level running averages that drive learning

use serde::{Deserialize, Serialize};

use crate::types::Neuron;

/// Cascade of short / medium running averages of `act_lrn`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LrnActAvgParams {
    pub ss_tau: f32,
    pub s_tau: f32,
    pub m_tau: f32,
    /// Share of AvgM mixed into AvgSLrn
    pub lrn_m: f32,
    pub init: f32,

    #[serde(skip)]
    pub ss_dt: f32,
    #[serde(skip)]
    pub s_dt: f32,
    #[serde(skip)]
    pub m_dt: f32,
    #[serde(skip)]
    pub lrn_s: f32,
}

impl Default for LrnActAvgParams {
    fn default() -> Self {
        let mut p = Self {
            ss_tau: 2.0,
            s_tau: 2.0,
            m_tau: 10.0,
            lrn_m: 0.1,
            init: 0.15,
            ss_dt: 0.0,
            s_dt: 0.0,
            m_dt: 0.0,
            lrn_s: 0.0,
        };
        p.update();
        p
    }
}

impl LrnActAvgParams {
    pub fn update(&mut self) {
        self.ss_dt = 1.0 / self.ss_tau;
        self.s_dt = 1.0 / self.s_tau;
        self.m_dt = 1.0 / self.m_tau;
        self.lrn_s = 1.0 - self.lrn_m;
    }

    #[inline]
    pub fn avgs_from_act(&self, nrn: &mut Neuron) {
        nrn.avg_ss += self.ss_dt * (nrn.act_lrn - nrn.avg_ss);
        nrn.avg_s += self.s_dt * (nrn.avg_ss - nrn.avg_s);
        nrn.avg_m += self.m_dt * (nrn.avg_s - nrn.avg_m);
        nrn.avg_s_lrn = self.lrn_s * nrn.avg_s + self.lrn_m * nrn.avg_m;
    }
}

/// Long-term average (BCM threshold) and its learning-rate factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvgLParams {
    pub init: f32,
    pub gain: f32,
    pub min: f32,
    /// Time constant in trials
    pub tau: f32,
    pub lrn_max: f32,
    pub lrn_min: f32,
    /// Modulate AvgLLrn by the layer's error level
    pub err_mod: bool,
    pub mod_min: f32,

    #[serde(skip)]
    pub dt: f32,
    #[serde(skip)]
    pub lrn_fact: f32,
}

impl Default for AvgLParams {
    fn default() -> Self {
        let mut p = Self {
            init: 0.4,
            gain: 2.5,
            min: 0.2,
            tau: 10.0,
            lrn_max: 0.5,
            lrn_min: 0.0001,
            err_mod: true,
            mod_min: 0.01,
            dt: 0.0,
            lrn_fact: 0.0,
        };
        p.update();
        p
    }
}

impl AvgLParams {
    pub fn update(&mut self) {
        self.dt = 1.0 / self.tau;
        self.lrn_fact = (self.lrn_max - self.lrn_min) / (self.gain - self.min);
    }

    /// Trial-level AvgL update from AvgM
    pub fn avg_l_from_avg_m(&self, nrn: &mut Neuron) {
        nrn.avg_l += self.dt * (self.gain * nrn.avg_m - nrn.avg_l);
        if nrn.avg_l < self.min {
            nrn.avg_l = self.min;
        }
        nrn.avg_l_lrn = self.lrn_fact * (nrn.avg_l - self.min);
    }

    /// Multiplier on AvgLLrn from the layer's `1 - cos_diff_avg`
    pub fn err_mod_from_lay_err(&self, lay_cos_diff_avg: f32) -> f32 {
        if !self.err_mod {
            return 1.0;
        }
        lay_cos_diff_avg.max(self.mod_min)
    }
}

/// Running statistics of the minus/plus cosine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosDiffParams {
    pub tau: f32,

    #[serde(skip)]
    pub dt: f32,
    #[serde(skip)]
    pub dt_c: f32,
}

impl Default for CosDiffParams {
    fn default() -> Self {
        let mut p = Self { tau: 100.0, dt: 0.0, dt_c: 0.0 };
        p.update();
        p
    }
}

impl CosDiffParams {
    pub fn update(&mut self) {
        self.dt = 1.0 / self.tau;
        self.dt_c = 1.0 - self.dt;
    }

    pub fn avg_var_from_cos(&self, avg: &mut f32, var: &mut f32, cos: f32) {
        if *avg == 0.0 {
            *avg = cos;
            *var = 0.0;
            return;
        }
        let del = cos - *avg;
        let incr = self.dt * del;
        *avg += incr;
        if *var == 0.0 {
            *var = 2.0 * self.dt_c * del * incr;
        } else {
            *var = self.dt_c * (*var + del * incr);
        }
    }
}

/// Per-layer cosine statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CosDiffStats {
    /// Zero-mean cosine between ActM and ActP on the last trial
    pub cos: f32,
    pub avg: f32,
    pub var: f32,
    /// `1 - avg` for hidden layers, 0 otherwise
    pub avg_lrn: f32,
    /// Multiplier applied to each unit's AvgLLrn
    pub mod_avg_l_lrn: f32,
}

impl CosDiffStats {
    pub fn init(&mut self) {
        *self = Self::default();
    }
}

/// Unit-level learning parameter block for a layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnNeurParams {
    pub act_avg: LrnActAvgParams,
    pub avg_l: AvgLParams,
    pub cos_diff: CosDiffParams,
}

impl LearnNeurParams {
    pub fn update(&mut self) {
        self.act_avg.update();
        self.avg_l.update();
        self.cos_diff.update();
    }

    pub fn init_act_avg(&self, nrn: &mut Neuron) {
        nrn.avg_ss = self.act_avg.init;
        nrn.avg_s = self.act_avg.init;
        nrn.avg_m = self.act_avg.init;
        nrn.avg_l = self.avg_l.init;
        nrn.avg_s_lrn = 0.0;
        nrn.act_avg = self.act_avg.init;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avgs_track_act() {
        let p = LrnActAvgParams::default();
        let mut n = Neuron { act_lrn: 1.0, ..Default::default() };
        for _ in 0..200 {
            p.avgs_from_act(&mut n);
        }
        assert!(n.avg_ss > 0.99 && n.avg_s > 0.99 && n.avg_m > 0.99);
        assert!((n.avg_s_lrn - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_avg_l_floor() {
        let p = AvgLParams::default();
        let mut n = Neuron { avg_l: 0.2, avg_m: 0.0, ..Default::default() };
        p.avg_l_from_avg_m(&mut n);
        assert_eq!(n.avg_l, p.min);
        assert_eq!(n.avg_l_lrn, 0.0);
    }

    #[test]
    fn test_cos_diff_first_value_sets_avg() {
        let p = CosDiffParams::default();
        let (mut avg, mut var) = (0.0, 0.0);
        p.avg_var_from_cos(&mut avg, &mut var, 0.8);
        assert_eq!(avg, 0.8);
        p.avg_var_from_cos(&mut avg, &mut var, 0.6);
        assert!((avg - 0.798).abs() < 1e-6);
        assert!(var > 0.0);
    }

    #[test]
    fn test_err_mod() {
        let p = AvgLParams::default();
        assert_eq!(p.err_mod_from_lay_err(0.001), 0.01);
        assert_eq!(p.err_mod_from_lay_err(0.3), 0.3);
        let off = AvgLParams { err_mod: false, ..AvgLParams::default() };
        assert_eq!(off.err_mod_from_lay_err(0.3), 1.0);
    }
}
