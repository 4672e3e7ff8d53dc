// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Synapse-level learning rules
//!
//! Pure functions over scalar synapse fields; the pathway kernels in the
//! plasticity crate iterate them over storage.

use serde::{Deserialize, Serialize};

/// XCAL check-mark learning function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XCalParams {
    /// Weight on the error-driven (medium-term) term
    pub m_lrn: f32,
    /// Use `l_lrn` instead of each receiver's AvgLLrn for the BCM term
    pub set_l_lrn: bool,
    pub l_lrn: f32,
    /// Reversal point as a proportion of the threshold
    pub d_rev: f32,
    /// Values below this produce no change
    pub d_thr: f32,
    /// Sender AvgS and AvgM both below this skip learning
    pub lrn_thr: f32,

    #[serde(skip)]
    pub d_rev_ratio: f32,
}

impl Default for XCalParams {
    fn default() -> Self {
        let mut p = Self {
            m_lrn: 1.0,
            set_l_lrn: false,
            l_lrn: 1.0,
            d_rev: 0.1,
            d_thr: 0.0001,
            lrn_thr: 0.01,
            d_rev_ratio: 0.0,
        };
        p.update();
        p
    }
}

impl XCalParams {
    pub fn update(&mut self) {
        self.d_rev_ratio = if self.d_rev > 0.0 {
            -(1.0 - self.d_rev) / self.d_rev
        } else {
            -1.0
        };
    }

    /// Check-mark function of a co-product against a threshold
    #[inline]
    pub fn dwt(&self, sr_val: f32, thr_p: f32) -> f32 {
        if sr_val < self.d_thr {
            0.0
        } else if sr_val > thr_p * self.d_rev {
            sr_val - thr_p
        } else {
            sr_val * self.d_rev_ratio
        }
    }

    #[inline]
    pub fn long_lrate(&self, avg_l_lrn: f32) -> f32 {
        if self.set_l_lrn {
            self.l_lrn
        } else {
            avg_l_lrn
        }
    }
}

/// Sigmoidal contrast enhancement between linear and effective weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WtSigParams {
    pub gain: f32,
    pub off: f32,
    /// Scale increases by `1 - lwt` and decreases by `lwt`
    pub soft_bound: bool,
}

impl Default for WtSigParams {
    fn default() -> Self {
        Self { gain: 6.0, off: 1.0, soft_bound: true }
    }
}

/// Contrast function: linear weight to effective weight
///
/// # Example
/// ```
/// use leabra_npu_neural::learning::sig_fun;
///
/// assert_eq!(sig_fun(0.5, 6.0, 1.0), 0.5);
/// assert_eq!(sig_fun(-0.1, 6.0, 1.0), 0.0);
/// assert!(sig_fun(0.7, 6.0, 1.0) > 0.9);
/// ```
#[inline]
pub fn sig_fun(w: f32, gain: f32, off: f32) -> f32 {
    if w <= 0.0 {
        return 0.0;
    }
    if w >= 1.0 {
        return 1.0;
    }
    1.0 / (1.0 + ((off * (1.0 - w)) / w).powf(gain))
}

/// Inverse contrast function: effective weight to linear weight
///
/// # Example
/// ```
/// use leabra_npu_neural::learning::{sig_fun, sig_inv_fun};
///
/// let lw = 0.62;
/// assert!((sig_inv_fun(sig_fun(lw, 6.0, 1.0), 6.0, 1.0) - lw).abs() < 1e-5);
/// ```
#[inline]
pub fn sig_inv_fun(w: f32, gain: f32, off: f32) -> f32 {
    if w <= 0.0 {
        return 0.0;
    }
    if w >= 1.0 {
        return 1.0;
    }
    1.0 / (1.0 + ((1.0 - w) / w).powf(1.0 / gain) / off)
}

#[inline]
fn sig_fun_61(w: f32) -> f32 {
    if w <= 0.0 {
        return 0.0;
    }
    if w >= 1.0 {
        return 1.0;
    }
    let pw = (1.0 - w) / w;
    1.0 / (1.0 + pw * pw * pw * pw * pw * pw)
}

impl WtSigParams {
    pub fn sig_from_lin_wt(&self, lw: f32) -> f32 {
        if self.gain == 1.0 && self.off == 1.0 {
            lw
        } else if self.gain == 6.0 && self.off == 1.0 {
            sig_fun_61(lw)
        } else {
            sig_fun(lw, self.gain, self.off)
        }
    }

    pub fn lin_from_sig_wt(&self, sw: f32) -> f32 {
        if self.gain == 1.0 && self.off == 1.0 {
            sw
        } else {
            sig_inv_fun(sw, self.gain, self.off)
        }
    }
}

/// Adaptive normalization by a decaying max of |dwt|
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DWtNormParams {
    pub on: bool,
    pub decay_tau: f32,
    pub norm_min: f32,
    /// Learning rate compensation for the normalization
    pub lr_comp: f32,

    #[serde(skip)]
    pub decay_dt: f32,
    #[serde(skip)]
    pub decay_dt_c: f32,
}

impl Default for DWtNormParams {
    fn default() -> Self {
        let mut p = Self {
            on: true,
            decay_tau: 1000.0,
            norm_min: 0.001,
            lr_comp: 0.15,
            decay_dt: 0.0,
            decay_dt_c: 0.0,
        };
        p.update();
        p
    }
}

impl DWtNormParams {
    pub fn update(&mut self) {
        self.decay_dt = 1.0 / self.decay_tau;
        self.decay_dt_c = 1.0 - self.decay_dt;
    }

    /// Update `norm` and return the multiplier for this step's dwt
    #[inline]
    pub fn norm_from_abs_dwt(&self, norm: &mut f32, abs_dwt: f32) -> f32 {
        *norm = (self.decay_dt_c * *norm).max(abs_dwt);
        if *norm == 0.0 {
            return 1.0;
        }
        self.lr_comp / norm.max(self.norm_min)
    }
}

/// Momentum on dwt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumParams {
    pub on: bool,
    pub m_tau: f32,
    pub lr_comp: f32,

    #[serde(skip)]
    pub m_dt: f32,
    #[serde(skip)]
    pub m_dt_c: f32,
}

impl Default for MomentumParams {
    fn default() -> Self {
        let mut p = Self { on: true, m_tau: 10.0, lr_comp: 0.1, m_dt: 0.0, m_dt_c: 0.0 };
        p.update();
        p
    }
}

impl MomentumParams {
    pub fn update(&mut self) {
        self.m_dt = 1.0 / self.m_tau;
        self.m_dt_c = 1.0 - self.m_dt;
    }

    #[inline]
    pub fn moment_from_dwt(&self, moment: &mut f32, dwt: f32) -> f32 {
        *moment = self.m_dt_c * *moment + dwt;
        self.lr_comp * *moment
    }
}

/// Weight balance: homeostatic scaling of increases vs decreases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WtBalParams {
    pub on: bool,
    /// Also balance weights into Target layers
    pub targs: bool,
    /// Only weights at or above this enter the average
    pub avg_thr: f32,
    pub hi_thr: f32,
    pub hi_gain: f32,
    pub lo_thr: f32,
    pub lo_gain: f32,
}

impl Default for WtBalParams {
    fn default() -> Self {
        Self {
            on: false,
            targs: false,
            avg_thr: 0.25,
            hi_thr: 0.4,
            hi_gain: 4.0,
            lo_thr: 0.4,
            lo_gain: 6.0,
        }
    }
}

impl WtBalParams {
    /// Returns `(fact, inc, dec)` for a receiver's average weight
    ///
    /// # Example
    /// ```
    /// use leabra_npu_neural::WtBalParams;
    ///
    /// let wb = WtBalParams::default();
    /// let (_, inc, dec) = wb.wt_bal(0.6);
    /// assert!(inc < 1.0 && dec > 1.0);
    /// assert!((inc - 1.0 / (1.0 + 4.0 * 0.2)).abs() < 1e-6);
    /// ```
    pub fn wt_bal(&self, avg: f32) -> (f32, f32, f32) {
        if avg < self.lo_thr {
            let avg = avg.max(self.avg_thr);
            let fact = self.lo_gain * (self.lo_thr - avg);
            let dec = 1.0 / (1.0 + fact);
            (fact, 2.0 - dec, dec)
        } else if avg > self.hi_thr {
            let fact = self.hi_gain * (avg - self.hi_thr);
            let inc = 1.0 / (1.0 + fact);
            (fact, inc, 2.0 - inc)
        } else {
            (0.0, 1.0, 1.0)
        }
    }
}

/// Per-receiver weight balance state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WtBalRecv {
    pub avg: f32,
    pub fact: f32,
    pub inc: f32,
    pub dec: f32,
}

impl Default for WtBalRecv {
    fn default() -> Self {
        Self { avg: 0.0, fact: 0.0, inc: 1.0, dec: 1.0 }
    }
}

/// Synaptic learning parameter block for a pathway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnSynParams {
    pub learn: bool,
    pub lrate: f32,
    /// Base rate for [`LearnSynParams::lrate_mult`]
    pub lrate_init: f32,
    pub xcal: XCalParams,
    pub wt_sig: WtSigParams,
    pub norm: DWtNormParams,
    pub momentum: MomentumParams,
    pub wt_bal: WtBalParams,
}

impl Default for LearnSynParams {
    fn default() -> Self {
        Self {
            learn: true,
            lrate: 0.04,
            lrate_init: 0.04,
            xcal: XCalParams::default(),
            wt_sig: WtSigParams::default(),
            norm: DWtNormParams::default(),
            momentum: MomentumParams::default(),
            wt_bal: WtBalParams::default(),
        }
    }
}

impl LearnSynParams {
    pub fn update(&mut self) {
        self.xcal.update();
        self.norm.update();
        self.momentum.update();
    }

    pub fn lrate_mult(&mut self, mult: f32) {
        self.lrate = self.lrate_init * mult;
    }

    /// Linear weight for an effective weight, factoring out `scale`
    ///
    /// A zero scale carries no weight, so its linear weight is 0.
    #[inline]
    pub fn lwt_from_wt(&self, wt: f32, scale: f32) -> f32 {
        if scale > 0.0 {
            self.wt_sig.lin_from_sig_wt(wt / scale)
        } else {
            0.0
        }
    }

    #[inline]
    pub fn wt_from_lwt(&self, lwt: f32, scale: f32) -> f32 {
        scale * self.wt_sig.sig_from_lin_wt(lwt)
    }

    /// Error-driven and BCM terms, returned as `(err, bcm)`
    #[inline]
    pub fn chl_dwt(
        &self,
        su_avg_s_lrn: f32,
        su_avg_m: f32,
        ru_avg_s_lrn: f32,
        ru_avg_m: f32,
        ru_avg_l: f32,
    ) -> (f32, f32) {
        let srs = su_avg_s_lrn * ru_avg_s_lrn;
        let srm = su_avg_m * ru_avg_m;
        (self.xcal.dwt(srs, srm), self.xcal.dwt(srs, ru_avg_l))
    }

    /// Commit a pending dwt into lwt / wt with balance factors `inc` / `dec`
    pub fn wt_from_dwt(
        &self,
        inc: f32,
        dec: f32,
        dwt: &mut f32,
        wt: &mut f32,
        lwt: &mut f32,
        scale: f32,
    ) {
        if *dwt == 0.0 {
            return;
        }
        if self.wt_sig.soft_bound {
            if *dwt > 0.0 {
                *dwt *= inc * (1.0 - *lwt);
            } else {
                *dwt *= dec * *lwt;
            }
        } else if *dwt > 0.0 {
            *dwt *= inc;
        } else {
            *dwt *= dec;
        }
        *lwt = (*lwt + *dwt).clamp(0.0, 1.0);
        *wt = self.wt_from_lwt(*lwt, scale);
        *dwt = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xcal_check_mark() {
        let x = XCalParams::default();
        assert_eq!(x.dwt(0.00001, 0.5), 0.0);
        assert!((x.dwt(0.8, 0.5) - 0.3).abs() < 1e-6);
        // below d_rev * thr the function reverses toward zero
        let v = x.dwt(0.02, 0.5);
        assert!((v - 0.02 * -9.0).abs() < 1e-6);
    }

    #[test]
    fn test_sig_61_matches_general() {
        for i in 1..20 {
            let w = i as f32 / 20.0;
            assert!((sig_fun_61(w) - sig_fun(w, 6.0, 1.0)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_wt_from_dwt_clamps() {
        let p = LearnSynParams {
            wt_sig: WtSigParams { soft_bound: false, ..WtSigParams::default() },
            ..LearnSynParams::default()
        };
        let (mut dwt, mut wt, mut lwt) = (2.0, 0.9, 0.9);
        p.wt_from_dwt(1.0, 1.0, &mut dwt, &mut wt, &mut lwt, 1.0);
        assert_eq!(lwt, 1.0);
        assert_eq!(wt, 1.0);
        assert_eq!(dwt, 0.0);

        let (mut dwt, mut wt, mut lwt) = (-2.0, 0.1, 0.1);
        p.wt_from_dwt(1.0, 1.0, &mut dwt, &mut wt, &mut lwt, 1.0);
        assert_eq!(lwt, 0.0);
        assert_eq!(wt, 0.0);
    }

    #[test]
    fn test_wt_from_dwt_zero_is_noop() {
        let p = LearnSynParams::default();
        let lw0 = 0.37;
        let (mut dwt, mut wt, mut lwt) = (0.0, p.wt_from_lwt(lw0, 1.0), lw0);
        let wt0 = wt;
        p.wt_from_dwt(1.0, 1.0, &mut dwt, &mut wt, &mut lwt, 1.0);
        assert_eq!(wt, wt0);
        assert_eq!(lwt, lw0);
        assert!((p.lwt_from_wt(wt, 1.0) - lw0).abs() < 1e-5);
    }

    #[test]
    fn test_wt_bal_regions() {
        let wb = WtBalParams::default();
        assert_eq!(wb.wt_bal(0.4), (0.0, 1.0, 1.0));

        let (fact, inc, dec) = wb.wt_bal(0.3);
        assert!((fact - 0.6).abs() < 1e-6);
        assert!(inc > 1.0 && dec < 1.0);
        assert!((inc + dec - 2.0).abs() < 1e-6);

        // averages below avg_thr are floored
        assert_eq!(wb.wt_bal(0.0), wb.wt_bal(0.25));
    }

    #[test]
    fn test_norm_and_momentum() {
        let n = DWtNormParams::default();
        let mut norm = 0.0;
        assert_eq!(n.norm_from_abs_dwt(&mut norm, 0.0), 1.0);
        let f = n.norm_from_abs_dwt(&mut norm, 0.5);
        assert_eq!(norm, 0.5);
        assert!((f - 0.3).abs() < 1e-6);

        let m = MomentumParams::default();
        let mut moment = 0.0;
        assert!((m.moment_from_dwt(&mut moment, 1.0) - 0.1).abs() < 1e-6);
        assert!((m.moment_from_dwt(&mut moment, 1.0) - 0.19).abs() < 1e-6);
    }
}
