// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Activation parameters and the per-unit update steps of a cycle

use serde::{Deserialize, Serialize};

use super::nxx1::Nxx1Params;
use crate::types::{Neuron, NeuronFlags};

/// One value per channel: excitatory, leak, inhibitory, potassium
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Chans {
    pub e: f32,
    pub l: f32,
    pub i: f32,
    pub k: f32,
}

impl Chans {
    pub const fn new(e: f32, l: f32, i: f32, k: f32) -> Self {
        Self { e, l, i, k }
    }

    /// Each channel minus a scalar
    pub fn minus(&self, v: f32) -> Self {
        Self::new(self.e - v, self.l - v, self.i - v, self.k - v)
    }

    /// A scalar minus each channel
    pub fn sub_from(&self, v: f32) -> Self {
        Self::new(v - self.e, v - self.l, v - self.i, v - self.k)
    }
}

/// Thresholds for sending activation changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptThreshParams {
    /// Activation at or below this is not sent
    pub send: f32,
    /// Changes smaller than this are not sent
    pub delta: f32,
}

impl Default for OptThreshParams {
    fn default() -> Self {
        Self { send: 0.1, delta: 0.005 }
    }
}

/// Initial and decay targets for unit state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitParams {
    /// Proportion decayed toward init at the start of each trial
    pub decay: f32,
    pub vm: f32,
    pub act: f32,
    pub ge: f32,
}

impl Default for InitParams {
    fn default() -> Self {
        Self { decay: 1.0, vm: 0.4, act: 0.0, ge: 0.0 }
    }
}

/// Integration rate constants, in cycles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DtParams {
    pub integ: f32,
    pub vm_tau: f32,
    pub g_tau: f32,
    /// Time constant in trials for ActAvg
    pub avg_tau: f32,

    #[serde(skip)]
    pub vm_dt: f32,
    #[serde(skip)]
    pub g_dt: f32,
    #[serde(skip)]
    pub avg_dt: f32,
}

impl Default for DtParams {
    fn default() -> Self {
        let mut p = Self {
            integ: 1.0,
            vm_tau: 3.3,
            g_tau: 1.4,
            avg_tau: 200.0,
            vm_dt: 0.0,
            g_dt: 0.0,
            avg_dt: 0.0,
        };
        p.update();
        p
    }
}

impl DtParams {
    pub fn update(&mut self) {
        self.vm_dt = self.integ / self.vm_tau;
        self.g_dt = self.integ / self.g_tau;
        self.avg_dt = 1.0 / self.avg_tau;
    }

    #[inline]
    pub fn g_from_raw(&self, raw: f32, g: &mut f32) {
        *g += self.g_dt * (raw - *g);
    }
}

/// How external input drives clamped units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClampParams {
    /// Set activation directly to the input instead of adding it to Ge
    pub hard: bool,
    pub range_min: f32,
    pub range_max: f32,
    /// Soft clamp gain: `Ge += gain * ext`
    pub gain: f32,
    /// Soft clamp averages current and clamp Ge instead of summing
    pub avg: bool,
    pub avg_gain: f32,
}

impl Default for ClampParams {
    fn default() -> Self {
        Self {
            hard: true,
            range_min: 0.0,
            range_max: 0.95,
            gain: 0.2,
            avg: false,
            avg_gain: 0.2,
        }
    }
}

impl ClampParams {
    #[inline]
    pub fn avg_ge(&self, ext: f32, ge: f32) -> f32 {
        self.avg_gain * self.gain * ext + (1.0 - self.avg_gain) * ge
    }
}

/// Full activation parameter block for a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActParams {
    pub xx1: Nxx1Params,
    pub opt_thresh: OptThreshParams,
    pub init: InitParams,
    pub dt: DtParams,
    /// Maximal conductances
    pub gbar: Chans,
    /// Reversal potentials
    pub erev: Chans,
    pub clamp: ClampParams,
    pub vm_min: f32,
    pub vm_max: f32,

    #[serde(skip)]
    pub erev_sub_thr: Chans,
    #[serde(skip)]
    pub thr_sub_erev: Chans,
}

impl Default for ActParams {
    fn default() -> Self {
        let mut p = Self {
            xx1: Nxx1Params::default(),
            opt_thresh: OptThreshParams::default(),
            init: InitParams::default(),
            dt: DtParams::default(),
            gbar: Chans::new(1.0, 0.1, 1.0, 1.0),
            erev: Chans::new(1.0, 0.3, 0.25, 0.25),
            clamp: ClampParams::default(),
            vm_min: 0.0,
            vm_max: 2.0,
            erev_sub_thr: Chans::default(),
            thr_sub_erev: Chans::default(),
        };
        p.update();
        p
    }
}

impl ActParams {
    /// Recompute every derived constant; call after changing any field
    pub fn update(&mut self) {
        self.erev_sub_thr = self.erev.minus(self.xx1.thr);
        self.thr_sub_erev = self.erev.sub_from(self.xx1.thr);
        self.xx1.update();
        self.dt.update();
    }

    /// Zero the delta-send bookkeeping and conductance accumulators
    pub fn init_g_inc(&self, nrn: &mut Neuron) {
        nrn.act_sent = 0.0;
        nrn.ge_raw = 0.0;
        nrn.ge_inc = 0.0;
        nrn.gi_raw = 0.0;
        nrn.gi_inc = 0.0;
    }

    /// Decay transient state toward init by proportion `decay`
    pub fn decay_state(&self, nrn: &mut Neuron, decay: f32) {
        if decay > 0.0 {
            nrn.act -= decay * (nrn.act - self.init.act);
            nrn.ge -= decay * (nrn.ge - self.init.ge);
            nrn.gi -= decay * nrn.gi;
            nrn.gi_self -= decay * nrn.gi_self;
            nrn.gk -= decay * nrn.gk;
            nrn.vm -= decay * (nrn.vm - self.init.vm);
        }
        nrn.act_del = 0.0;
        nrn.inet = 0.0;
    }

    /// Full reset of activation state, including phase snapshots
    pub fn init_acts(&self, nrn: &mut Neuron) {
        nrn.act = self.init.act;
        nrn.act_lrn = self.init.act;
        nrn.ge = self.init.ge;
        nrn.gi = 0.0;
        nrn.gk = 0.0;
        nrn.gi_self = 0.0;
        nrn.gi_syn = 0.0;
        nrn.inet = 0.0;
        nrn.vm = self.init.vm;
        nrn.targ = 0.0;
        nrn.ext = 0.0;
        nrn.act_del = 0.0;
        nrn.act_q0 = 0.0;
        nrn.act_q1 = 0.0;
        nrn.act_q2 = 0.0;
        nrn.act_m = 0.0;
        nrn.act_p = 0.0;
        nrn.act_dif = 0.0;
        self.init_g_inc(nrn);
    }

    #[inline]
    pub fn g_raw_from_inc(&self, nrn: &mut Neuron) {
        nrn.ge_raw += nrn.ge_inc;
        nrn.ge_inc = 0.0;
        nrn.gi_raw += nrn.gi_inc;
        nrn.gi_inc = 0.0;
    }

    /// Integrate Ge from the raw excitatory input, adding soft-clamped input
    pub fn ge_from_raw(&self, nrn: &mut Neuron) {
        let mut ge_raw = nrn.ge_raw;
        if !self.clamp.hard && nrn.has_flag(NeuronFlags::HAS_EXT) {
            if self.clamp.avg {
                ge_raw = self.clamp.avg_ge(nrn.ext, ge_raw);
            } else {
                ge_raw += nrn.ext * self.clamp.gain;
            }
        }
        self.dt.g_from_raw(ge_raw, &mut nrn.ge);
    }

    /// Integrate synaptic inhibition from the raw inhibitory input
    pub fn gi_from_raw(&self, nrn: &mut Neuron) {
        self.dt.g_from_raw(nrn.gi_raw, &mut nrn.gi_syn);
        nrn.gi_syn = nrn.gi_syn.max(0.0);
    }

    #[inline]
    pub fn inet_from_g(&self, vm: f32, ge: f32, gi: f32, gk: f32) -> f32 {
        ge * (self.erev.e - vm)
            + self.gbar.l * (self.erev.l - vm)
            + gi * (self.erev.i - vm)
            + gk * (self.erev.k - vm)
    }

    /// Membrane potential step
    pub fn vm_from_g(&self, nrn: &mut Neuron) {
        let ge = nrn.ge * self.gbar.e;
        let gi = nrn.gi * self.gbar.i;
        let gk = nrn.gk * self.gbar.k;
        nrn.inet = self.inet_from_g(nrn.vm, ge, gi, gk);
        let vm = nrn.vm + self.dt.vm_dt * nrn.inet;
        nrn.vm = vm.clamp(self.vm_min, self.vm_max);
    }

    /// Excitatory conductance at which the unit sits exactly at threshold
    pub fn ge_thr_from_g(&self, nrn: &Neuron) -> f32 {
        (self.gbar.i * nrn.gi * self.erev_sub_thr.i
            + self.gbar.l * self.erev_sub_thr.l
            + self.gbar.k * nrn.gk * self.erev_sub_thr.k)
            / self.thr_sub_erev.e
    }

    /// Threshold conductance ignoring adaptation, used for `act_lrn`
    pub fn ge_thr_from_g_no_k(&self, nrn: &Neuron) -> f32 {
        (self.gbar.i * nrn.gi * self.erev_sub_thr.i + self.gbar.l * self.erev_sub_thr.l)
            / self.thr_sub_erev.e
    }

    #[inline]
    pub fn has_hard_clamp(&self, nrn: &Neuron) -> bool {
        self.clamp.hard && nrn.has_flag(NeuronFlags::HAS_EXT)
    }

    /// Rate-code activation step
    pub fn act_from_g(&self, nrn: &mut Neuron) {
        if self.has_hard_clamp(nrn) {
            self.hard_clamp(nrn);
            return;
        }

        let (nw_act, nw_act_lrn) = if nrn.act < self.xx1.vm_act_thr && nrn.vm <= self.xx1.thr {
            let a = self.xx1.noisy_xx1(nrn.vm - self.xx1.thr);
            (a, a)
        } else {
            let ge = nrn.ge * self.gbar.e;
            let a = self.xx1.noisy_xx1(ge - self.ge_thr_from_g(nrn));
            let l = self.xx1.noisy_xx1(ge - self.ge_thr_from_g_no_k(nrn));
            (a, l)
        };

        let cur = nrn.act;
        let act = cur + self.dt.vm_dt * (nw_act - cur);
        nrn.act_del = act - cur;
        nrn.act = act;
        nrn.act_lrn += self.dt.vm_dt * (nw_act_lrn - nrn.act_lrn);
    }

    /// Set activation directly from the external input
    pub fn hard_clamp(&self, nrn: &mut Neuron) {
        let clamped = nrn.ext.clamp(self.clamp.range_min, self.clamp.range_max);
        nrn.act = clamped;
        nrn.act_lrn = clamped;
        nrn.vm = self.xx1.thr + nrn.act / self.xx1.gain;
        nrn.act_del = 0.0;
        nrn.inet = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_constants() {
        let p = ActParams::default();
        assert!((p.dt.vm_dt - 1.0 / 3.3).abs() < 1e-6);
        assert!((p.dt.g_dt - 1.0 / 1.4).abs() < 1e-6);
        assert!((p.erev_sub_thr.l - (0.3 - 0.5)).abs() < 1e-6);
        assert!((p.thr_sub_erev.e - (0.5 - 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_hard_clamp_limits_range() {
        let p = ActParams::default();
        let mut n = Neuron { ext: 1.0, ..Default::default() };
        n.set_flag(NeuronFlags::HAS_EXT);
        p.act_from_g(&mut n);
        assert_eq!(n.act, 0.95);
        assert_eq!(n.act_lrn, 0.95);
        assert!((n.vm - (0.5 + 0.95 / 100.0)).abs() < 1e-6);
    }

    #[test]
    fn test_soft_clamp_adds_to_ge() {
        let mut p = ActParams::default();
        p.clamp.hard = false;
        let mut n = Neuron { ext: 1.0, ..Default::default() };
        n.set_flag(NeuronFlags::HAS_EXT);
        p.ge_from_raw(&mut n);
        assert!((n.ge - p.dt.g_dt * 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_strong_input_drives_activation() {
        let p = ActParams::default();
        let mut n = Neuron::default();
        p.init_acts(&mut n);
        for _ in 0..50 {
            n.ge_raw = 1.0;
            p.ge_from_raw(&mut n);
            p.vm_from_g(&mut n);
            p.act_from_g(&mut n);
        }
        assert!(n.act > 0.5, "act = {}", n.act);
        assert!(n.vm <= p.vm_max);
    }

    #[test]
    fn test_decay_state() {
        let p = ActParams::default();
        let mut n = Neuron { act: 0.8, vm: 1.0, gi: 0.5, act_del: 0.1, ..Default::default() };
        p.decay_state(&mut n, 0.5);
        assert!((n.act - 0.4).abs() < 1e-6);
        assert!((n.vm - 0.7).abs() < 1e-6);
        assert!((n.gi - 0.25).abs() < 1e-6);
        assert_eq!(n.act_del, 0.0);
    }
}
