// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Noisy X-over-X-plus-1 rate code
//!
//! `x / (x + 1)` convolved with gaussian noise, approximated piecewise:
//! a sigmoid below threshold, a short linear bridge just above it, and a
//! gain-corrected XX1 beyond that.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nxx1Params {
    /// Firing threshold on Vm / Ge
    pub thr: f32,
    pub gain: f32,
    /// Variance of the convolved noise kernel
    pub n_var: f32,
    /// Below this activation the Vm-based branch is used
    pub vm_act_thr: f32,
    pub sig_mult: f32,
    pub sig_mult_pow: f32,
    pub sig_gain: f32,
    pub interp_range: f32,
    pub gain_cor_range: f32,
    pub gain_cor: f32,

    #[serde(skip)]
    pub sig_gain_n_var: f32,
    #[serde(skip)]
    pub sig_mult_eff: f32,
    #[serde(skip)]
    pub sig_val_at_0: f32,
    #[serde(skip)]
    pub interp_val: f32,
}

impl Default for Nxx1Params {
    fn default() -> Self {
        let mut p = Self {
            thr: 0.5,
            gain: 100.0,
            n_var: 0.005,
            vm_act_thr: 0.01,
            sig_mult: 0.33,
            sig_mult_pow: 0.8,
            sig_gain: 3.0,
            interp_range: 0.01,
            gain_cor_range: 10.0,
            gain_cor: 0.1,
            sig_gain_n_var: 0.0,
            sig_mult_eff: 0.0,
            sig_val_at_0: 0.0,
            interp_val: 0.0,
        };
        p.update();
        p
    }
}

impl Nxx1Params {
    /// Recompute derived constants
    pub fn update(&mut self) {
        self.sig_gain_n_var = self.sig_gain / self.n_var;
        self.sig_mult_eff = self.sig_mult * (self.gain * self.n_var).powf(self.sig_mult_pow);
        self.sig_val_at_0 = 0.5 * self.sig_mult_eff;
        self.interp_val = self.xx1_gain_cor(self.interp_range) - self.sig_val_at_0;
    }

    #[inline]
    pub fn xx1(x: f32) -> f32 {
        x / (x + 1.0)
    }

    /// XX1 with the gain reduced near threshold to offset the convolution
    pub fn xx1_gain_cor(&self, x: f32) -> f32 {
        let gain_cor_fact = (self.gain_cor_range - (x / self.n_var)) / self.gain_cor_range;
        if gain_cor_fact < 0.0 {
            return Self::xx1(self.gain * x);
        }
        let new_gain = self.gain * (1.0 - self.gain_cor * gain_cor_fact);
        Self::xx1(new_gain * x)
    }

    /// Activation for a value relative to threshold
    pub fn noisy_xx1(&self, x: f32) -> f32 {
        if x < 0.0 {
            self.sig_mult_eff / (1.0 + (-(x * self.sig_gain_n_var)).exp())
        } else if x < self.interp_range {
            let interp = 1.0 - ((self.interp_range - x) / self.interp_range);
            self.sig_val_at_0 + interp * self.interp_val
        } else {
            self.xx1_gain_cor(x)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noisy_xx1_reference_curve() {
        let p = Nxx1Params::default();
        let xs = [
            -0.05, -0.04, -0.03, -0.02, -0.01, 0.0, 0.01, 0.02, 0.03, 0.04, 0.05, 0.1, 0.2, 0.3,
            0.4, 0.5,
        ];
        let ys = [
            1.7735989e-14,
            7.155215e-12,
            2.8866178e-09,
            1.1645374e-06,
            0.00046864923,
            0.094767615,
            0.47916666,
            0.65277773,
            0.742268,
            0.7967479,
            0.8333333,
            0.90909094,
            0.95238096,
            0.96774197,
            0.9756098,
            0.98039216,
        ];
        for (x, y) in xs.iter().zip(ys.iter()) {
            let got = p.noisy_xx1(*x);
            assert!((got - y).abs() < 1e-5, "x={} got={} want={}", x, got, y);
        }
    }

    #[test]
    fn test_monotonic() {
        let p = Nxx1Params::default();
        let mut prev = p.noisy_xx1(-0.1);
        for i in -99..100 {
            let y = p.noisy_xx1(i as f32 * 0.001);
            assert!(y >= prev);
            prev = y;
        }
    }
}
