// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Layer
//!
//! A layer owns its units and pools and runs every per-unit step of the
//! cycle pipeline. Anything that touches a pathway (delta-send, receiving
//! conductance, conductance scaling, learning) is wired up by the network,
//! which hands the layer a callback or the values it needs.

use leabra_config::LeabraConfig;
use leabra_npu_neural::{
    ActParams, CosDiffStats, InhibParams, LearnNeurParams, NeuralError, Neuron, NeuronFlags,
    NeuronVar, Shape,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::context::Context;
use crate::pool::Pool;
use crate::trace::cycle_trace_cfg;

/// Functional role of a layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    /// Internal layer; the only kind whose BCM learning is error-modulated
    #[default]
    Hidden,
    /// Receives external input in `ext`
    Input,
    /// Clamped to `targ` in the plus phase
    Target,
    /// Holds `targ` for statistics only, never clamped
    Compare,
}

/// One layer of rate-coded units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    /// Position in the network's layer list
    pub index: usize,
    pub kind: LayerKind,
    pub shape: Shape,
    /// Excluded from every computation
    pub off: bool,

    pub act: ActParams,
    pub inhib: InhibParams,
    pub learn: LearnNeurParams,

    pub neurons: Vec<Neuron>,
    /// Pool 0 is the whole layer; sub-pools follow for 4D shapes
    pub pools: Vec<Pool>,
    pub cos_diff: CosDiffStats,

    /// Pathways this layer sends on, by network pathway index
    pub send_paths: Vec<usize>,
    /// Pathways this layer receives from, by network pathway index
    pub recv_paths: Vec<usize>,
}

impl Layer {
    pub fn new(name: impl Into<String>, index: usize, shape: Shape, kind: LayerKind) -> Self {
        let mut ly = Self {
            name: name.into(),
            index,
            kind,
            neurons: vec![Neuron::default(); shape.len()],
            shape,
            off: false,
            act: ActParams::default(),
            inhib: InhibParams::default(),
            learn: LearnNeurParams::default(),
            pools: Vec::new(),
            cos_diff: CosDiffStats::default(),
            send_paths: Vec::new(),
            recv_paths: Vec::new(),
        };
        ly.build_pools();
        ly
    }

    /// Lay out pool 0 and, for 4D shapes, one sub-pool per unit group
    pub fn build_pools(&mut self) {
        let nn = self.neurons.len();
        self.pools.clear();
        self.pools.push(Pool::new(0, nn));
        if !self.shape.is_4d() {
            return;
        }
        let dims = self.shape.dims().to_vec();
        let (npy, npx) = (dims[0], dims[1]);
        let pool_size = self.shape.pool_size();
        for py in 0..npy {
            for px in 0..npx {
                // groups are contiguous in row-major order
                let st = (py * npx + px) * pool_size;
                let pi = self.pools.len();
                self.pools.push(Pool::new(st, st + pool_size));
                for nrn in &mut self.neurons[st..st + pool_size] {
                    nrn.sub_pool = pi;
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// Recompute every derived parameter constant
    pub fn update_params(&mut self) {
        self.act.update();
        self.inhib.update();
        self.learn.update();
    }

    /// Copy the configured parameter values onto this layer
    pub fn apply_config(&mut self, cfg: &LeabraConfig) {
        let a = &cfg.activation;
        self.act.init.decay = a.decay;
        self.act.clamp.hard = a.clamp_hard;
        self.act.clamp.gain = a.clamp_gain;
        self.act.dt.vm_tau = a.vm_tau;
        self.act.dt.g_tau = a.g_tau;

        let i = &cfg.inhibition;
        for fffb in [&mut self.inhib.layer, &mut self.inhib.pool] {
            fffb.ff = i.ff;
            fffb.fb = i.fb;
            fffb.fb_tau = i.fb_tau;
            fffb.ff0 = i.ff0;
        }
        self.inhib.layer.gi = i.layer_gi;
        match i.pool_gi {
            Some(gi) => {
                self.inhib.pool.on = true;
                self.inhib.pool.gi = gi;
            }
            None => self.inhib.pool.on = false,
        }
        self.inhib.self_inhib.on = i.self_inhib;

        self.learn.avg_l.err_mod = cfg.learning.err_mod;
        self.update_params();
    }

    // === Initialization ===

    /// Reset long-term unit and pool state; called after pathway weights are drawn
    pub fn init_weights_state(&mut self) {
        let init = self.inhib.act_avg.init;
        let eff = self.inhib.act_avg.eff_init();
        for pl in &mut self.pools {
            pl.act_avg.act_m_avg = init;
            pl.act_avg.act_p_avg = init;
            pl.act_avg.act_p_avg_eff = eff;
        }
        self.init_act_avg();
        self.init_acts();
        self.cos_diff.init();
    }

    pub fn init_act_avg(&mut self) {
        for nrn in &mut self.neurons {
            self.learn.init_act_avg(nrn);
        }
    }

    /// Full reset of activation state and pool inhibition
    pub fn init_acts(&mut self) {
        for nrn in &mut self.neurons {
            self.act.init_acts(nrn);
        }
        for pl in &mut self.pools {
            pl.inhib.init();
            pl.act_m.init();
            pl.act_p.init();
        }
    }

    // === External Input ===

    /// Clear external input, targets and their flags
    pub fn init_ext(&mut self) {
        for nrn in &mut self.neurons {
            nrn.ext = 0.0;
            nrn.targ = 0.0;
            nrn.clear_flag(NeuronFlags::EXT_MASK);
        }
    }

    /// Flag set by [`Layer::apply_ext`] and whether values go to `targ`
    pub fn ext_flags(&self) -> (NeuronFlags, bool) {
        match self.kind {
            LayerKind::Target => (NeuronFlags::HAS_TARG, true),
            LayerKind::Compare => (NeuronFlags::HAS_CMPR, true),
            LayerKind::Hidden | LayerKind::Input => (NeuronFlags::HAS_EXT, false),
        }
    }

    /// Apply one value per unit; extra values or units are ignored
    pub fn apply_ext(&mut self, values: &[f32]) {
        let (flag, to_targ) = self.ext_flags();
        for (nrn, &v) in self.neurons.iter_mut().zip(values) {
            if nrn.is_off() {
                continue;
            }
            if to_targ {
                nrn.targ = v;
            } else {
                nrn.ext = v;
            }
            nrn.clear_flag(NeuronFlags::EXT_MASK);
            nrn.set_flag(flag);
        }
    }

    // === Trial Start ===

    /// First half of the trial start: long-term averages and phase snapshots
    pub fn alpha_cyc_init_avgs(&mut self, update_act_avg: bool) {
        let err_mod = self.learn.avg_l.err_mod;
        let mod_avg_l_lrn = self.cos_diff.mod_avg_l_lrn;
        for nrn in self.neurons.iter_mut().filter(|n| !n.is_off()) {
            self.learn.avg_l.avg_l_from_avg_m(nrn);
            if err_mod {
                nrn.avg_l_lrn *= mod_avg_l_lrn;
            }
        }
        if update_act_avg {
            let params = &self.inhib.act_avg;
            for pl in &mut self.pools {
                params.avg_from_act(&mut pl.act_avg.act_m_avg, pl.act_m.avg);
                params.avg_from_act(&mut pl.act_avg.act_p_avg, pl.act_p.avg);
                params.eff_from_avg(&mut pl.act_avg.act_p_avg_eff, pl.act_avg.act_p_avg);
            }
        }
        for nrn in self.neurons.iter_mut().filter(|n| !n.is_off()) {
            nrn.act_q0 = nrn.act_p;
        }
    }

    /// Second half of the trial start, after conductance scales are set
    pub fn alpha_cyc_init_state(&mut self) {
        self.decay_state(self.act.init.decay);
        self.init_g_inc();
        if self.act.clamp.hard && self.kind == LayerKind::Input {
            self.hard_clamp();
        }
    }

    /// Decay unit state and pool inhibition toward their initial values
    pub fn decay_state(&mut self, decay: f32) {
        for nrn in self.neurons.iter_mut().filter(|n| !n.is_off()) {
            self.act.decay_state(nrn, decay);
        }
        for pl in &mut self.pools {
            pl.inhib.decay(decay);
        }
    }

    pub fn init_g_inc(&mut self) {
        for nrn in self.neurons.iter_mut().filter(|n| !n.is_off()) {
            self.act.init_g_inc(nrn);
        }
    }

    pub fn hard_clamp(&mut self) {
        for nrn in self.neurons.iter_mut().filter(|n| !n.is_off()) {
            self.act.hard_clamp(nrn);
        }
    }

    // === Cycle ===

    /// Decide which units send this cycle and report each delta
    ///
    /// `send(unit, delta)` is called once per sending unit. A unit that
    /// fell below the send threshold retracts everything it sent.
    pub fn send_g_delta(&mut self, mut send: impl FnMut(usize, f32)) {
        let thr = &self.act.opt_thresh;
        for (ni, nrn) in self.neurons.iter_mut().enumerate() {
            if nrn.is_off() {
                continue;
            }
            if nrn.act > thr.send {
                let delta = nrn.act - nrn.act_sent;
                if delta.abs() > thr.delta {
                    send(ni, delta);
                    nrn.act_sent = nrn.act;
                }
            } else if nrn.act_sent > thr.send {
                send(ni, -nrn.act_sent);
                nrn.act_sent = 0.0;
            }
        }
    }

    /// Add a pathway's accumulated conductance into the receiving units
    pub fn recv_g_inc(&mut self, g_inc: &[f32], inhibitory: bool) {
        for (nrn, &g) in self.neurons.iter_mut().zip(g_inc) {
            if inhibitory {
                nrn.gi_inc += g;
            } else {
                nrn.ge_inc += g;
            }
        }
    }

    /// Integrate raw conductances into Ge and GiSyn
    pub fn g_from_inc_neur(&mut self) {
        for nrn in self.neurons.iter_mut().filter(|n| !n.is_off()) {
            self.act.g_raw_from_inc(nrn);
            self.act.ge_from_raw(nrn);
            self.act.gi_from_raw(nrn);
        }
    }

    pub fn avg_max_ge(&mut self) {
        for pl in &mut self.pools {
            pl.inhib.ge.init();
            for ni in pl.range() {
                let nrn = &self.neurons[ni];
                if nrn.is_off() {
                    continue;
                }
                pl.inhib.ge.update(nrn.ge, ni);
            }
            pl.inhib.ge.calc_avg();
        }
    }

    /// FFFB inhibition per pool, then each unit's total Gi
    pub fn inhib_from_ge_act(&mut self) {
        let (layer_pool, sub_pools) = self.pools.split_at_mut(1);
        let lpl = &mut layer_pool[0];
        self.inhib.layer.inhib(&mut lpl.inhib);
        let lay_gi = lpl.inhib.gi;
        let self_inhib = &self.inhib.self_inhib;

        if sub_pools.is_empty() {
            for nrn in self.neurons[lpl.range()].iter_mut().filter(|n| !n.is_off()) {
                self_inhib.inhib(&mut nrn.gi_self, nrn.act);
                nrn.gi = lay_gi + nrn.gi_self + nrn.gi_syn;
            }
            return;
        }

        for pl in sub_pools.iter_mut() {
            self.inhib.pool.inhib(&mut pl.inhib);
            pl.inhib.lay_gi = lay_gi;
            pl.inhib.gi = pl.inhib.gi.max(lay_gi);
            let pool_gi = pl.inhib.gi;
            for nrn in self.neurons[pl.range()].iter_mut().filter(|n| !n.is_off()) {
                self_inhib.inhib(&mut nrn.gi_self, nrn.act);
                nrn.gi = pool_gi + nrn.gi_self + nrn.gi_syn;
            }
        }
    }

    /// Membrane potential, activation and learning averages for every unit
    pub fn act_from_g(&mut self) {
        for nrn in self.neurons.iter_mut().filter(|n| !n.is_off()) {
            self.act.vm_from_g(nrn);
            self.act.act_from_g(nrn);
            self.learn.act_avg.avgs_from_act(nrn);
        }
    }

    pub fn avg_max_act(&mut self) {
        for pl in &mut self.pools {
            pl.inhib.act.init();
            for ni in pl.range() {
                let nrn = &self.neurons[ni];
                if nrn.is_off() {
                    continue;
                }
                pl.inhib.act.update(nrn.act, ni);
            }
            pl.inhib.act.calc_avg();
        }
    }

    /// Trace the layer pool after a cycle when cycle tracing selects this layer
    pub(crate) fn trace_cycle(&self, ctx: &Context) {
        if !cycle_trace_cfg().wants(&self.name) {
            return;
        }
        let lpl = &self.pools[0];
        trace!(
            target: "leabra-npu-engine",
            "[CYCLE] {} q{} c{}: ge_avg={:.4} act_avg={:.4} act_max={:.4} gi={:.4}",
            self.name,
            ctx.quarter,
            ctx.cycle,
            lpl.inhib.ge.avg,
            lpl.inhib.act.avg,
            lpl.inhib.act.max,
            lpl.inhib.gi
        );
    }

    // === Quarter Final ===

    /// Snapshot activations at the end of a quarter
    pub fn quarter_final(&mut self, ctx: &Context) {
        for pl in &mut self.pools {
            match ctx.quarter {
                2 => pl.act_m = pl.inhib.act,
                3 => pl.act_p = pl.inhib.act,
                _ => {}
            }
        }
        let avg_dt = self.act.dt.avg_dt;
        for nrn in self.neurons.iter_mut().filter(|n| !n.is_off()) {
            match ctx.quarter {
                0 => nrn.act_q1 = nrn.act,
                1 => nrn.act_q2 = nrn.act,
                2 => {
                    nrn.act_m = nrn.act;
                    // clamped to the target in the plus phase
                    if nrn.has_flag(NeuronFlags::HAS_TARG) {
                        nrn.ext = nrn.targ;
                        nrn.set_flag(NeuronFlags::HAS_EXT);
                    }
                }
                3 => {
                    nrn.act_p = nrn.act;
                    nrn.act_dif = nrn.act_p - nrn.act_m;
                    nrn.act_avg += avg_dt * (nrn.act - nrn.act_avg);
                }
                _ => {}
            }
        }
        if ctx.quarter == 3 {
            self.cos_diff_from_acts();
        }
    }

    /// Zero-mean cosine between minus and plus phase activations
    pub fn cos_diff_from_acts(&mut self) {
        let avg_m = self.pools[0].act_m.avg;
        let avg_p = self.pools[0].act_p.avg;
        let (mut cos, mut ssm, mut ssp) = (0.0f32, 0.0f32, 0.0f32);
        for nrn in self.neurons.iter().filter(|n| !n.is_off()) {
            let ap = nrn.act_p - avg_p;
            let am = nrn.act_m - avg_m;
            cos += ap * am;
            ssm += am * am;
            ssp += ap * ap;
        }
        let dist = (ssm * ssp).sqrt();
        if dist != 0.0 {
            cos /= dist;
        }
        let cd = &mut self.cos_diff;
        cd.cos = cos;
        self.learn.cos_diff.avg_var_from_cos(&mut cd.avg, &mut cd.var, cos);

        if self.kind == LayerKind::Hidden {
            cd.avg_lrn = 1.0 - cd.avg;
            cd.mod_avg_l_lrn = self.learn.avg_l.err_mod_from_lay_err(cd.avg_lrn);
        } else {
            cd.avg_lrn = 0.0;
            cd.mod_avg_l_lrn = 0.0;
        }
    }

    // === Statistics ===

    /// Sum and mean squared error, ignoring differences below `tol`
    ///
    /// Compare layers measure `targ - act_m`, all others `act_p - act_m`.
    /// The mean divides by the full unit count.
    pub fn mse(&self, tol: f32) -> (f64, f64) {
        let nn = self.neurons.len();
        if nn == 0 {
            return (0.0, 0.0);
        }
        let mut sse = 0.0f64;
        for nrn in self.neurons.iter().filter(|n| !n.is_off()) {
            let d = if self.kind == LayerKind::Compare {
                nrn.targ - nrn.act_m
            } else {
                nrn.act_p - nrn.act_m
            };
            if d.abs() < tol {
                continue;
            }
            sse += (d * d) as f64;
        }
        (sse, sse / nn as f64)
    }

    pub fn sse(&self, tol: f32) -> f64 {
        self.mse(tol).0
    }

    // === Lesioning ===

    pub fn unlesion_units(&mut self) {
        for nrn in &mut self.neurons {
            nrn.clear_flag(NeuronFlags::OFF);
        }
    }

    /// Lesion a random `prop` of the units, after clearing earlier lesions
    ///
    /// Returns the number of units lesioned.
    pub fn lesion_units<R: Rng + ?Sized>(&mut self, prop: f32, rng: &mut R) -> usize {
        self.unlesion_units();
        if !(0.0..=1.0).contains(&prop) {
            warn!(
                target: "leabra-npu-engine",
                "[LESION] {}: proportion {} outside [0, 1], nothing lesioned",
                self.name,
                prop
            );
            return 0;
        }
        let nn = self.neurons.len();
        let n = (prop * nn as f32) as usize;
        let mut order: Vec<usize> = (0..nn).collect();
        order.shuffle(rng);
        for &ni in &order[..n] {
            self.neurons[ni].set_flag(NeuronFlags::OFF);
        }
        n
    }

    // === Variable Access ===

    /// One variable for every unit, in unit order
    pub fn unit_values(&self, var: NeuronVar) -> Vec<f32> {
        self.neurons.iter().map(|n| n.var(var)).collect()
    }

    pub fn unit_value_try(&self, var_name: &str, idx: usize) -> Result<f32, NeuralError> {
        let var = NeuronVar::from_name(var_name)?;
        self.neurons
            .get(idx)
            .map(|n| n.var(var))
            .ok_or(NeuralError::IndexOutOfRange {
                index: idx,
                len: self.neurons.len(),
            })
    }

    /// Like [`Layer::unit_value_try`], with NaN for any error
    pub fn unit_value(&self, var_name: &str, idx: usize) -> f32 {
        self.unit_value_try(var_name, idx).unwrap_or(f32::NAN)
    }

    pub fn set_unit_value(&mut self, var_name: &str, idx: usize, val: f32) -> Result<(), NeuralError> {
        let var = NeuronVar::from_name(var_name)?;
        let len = self.neurons.len();
        let nrn = self
            .neurons
            .get_mut(idx)
            .ok_or(NeuralError::IndexOutOfRange { index: idx, len })?;
        *nrn.var_mut(var) = val;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn layer(dims: &[usize], kind: LayerKind) -> Layer {
        let mut ly = Layer::new("L", 0, Shape::new(dims).unwrap(), kind);
        ly.init_weights_state();
        ly
    }

    #[test]
    fn test_pools_partition_4d() {
        let ly = layer(&[2, 2, 3, 1], LayerKind::Hidden);
        assert_eq!(ly.pools.len(), 1 + 4);
        assert_eq!(ly.pools[0].range(), 0..12);
        let mut covered = 0;
        for (pi, pl) in ly.pools.iter().enumerate().skip(1) {
            assert_eq!(pl.start, covered);
            covered = pl.end;
            assert!(ly.neurons[pl.range()].iter().all(|n| n.sub_pool == pi));
        }
        assert_eq!(covered, 12);
    }

    #[test]
    fn test_send_g_delta_threshold_and_retract() {
        let mut ly = layer(&[1], LayerKind::Hidden);
        let mut sent = Vec::new();

        ly.neurons[0].act = 0.6;
        ly.send_g_delta(|ni, d| sent.push((ni, d)));
        assert_eq!(sent, vec![(0, 0.6)]);

        // change below delta threshold: nothing
        ly.neurons[0].act = 0.603;
        ly.send_g_delta(|ni, d| sent.push((ni, d)));
        assert_eq!(sent.len(), 1);

        ly.neurons[0].act = 0.0;
        ly.send_g_delta(|ni, d| sent.push((ni, d)));
        assert_eq!(sent, vec![(0, 0.6), (0, -0.6)]);
        assert_eq!(ly.neurons[0].act_sent, 0.0);
    }

    #[test]
    fn test_apply_ext_by_kind() {
        let mut input = layer(&[3], LayerKind::Input);
        input.apply_ext(&[0.1, 0.9]);
        assert_eq!(input.neurons[1].ext, 0.9);
        assert!(input.neurons[1].has_flag(NeuronFlags::HAS_EXT));
        assert!(!input.neurons[2].has_flag(NeuronFlags::HAS_EXT));

        let mut target = layer(&[2], LayerKind::Target);
        target.neurons[1].set_flag(NeuronFlags::OFF);
        target.apply_ext(&[1.0, 1.0]);
        assert_eq!(target.neurons[0].targ, 1.0);
        assert!(target.neurons[0].has_flag(NeuronFlags::HAS_TARG));
        assert_eq!(target.neurons[1].targ, 0.0);

        target.init_ext();
        assert!(!target.neurons[0].has_flag(NeuronFlags::HAS_TARG));
    }

    #[test]
    fn test_target_clamped_after_minus_phase() {
        let mut ly = layer(&[1], LayerKind::Target);
        ly.apply_ext(&[0.8]);
        let mut ctx = Context::new();
        ctx.quarter = 2;
        ly.neurons[0].act = 0.3;
        ly.quarter_final(&ctx);
        assert_eq!(ly.neurons[0].act_m, 0.3);
        assert_eq!(ly.neurons[0].ext, 0.8);
        assert!(ly.act.has_hard_clamp(&ly.neurons[0]));
    }

    #[test]
    fn test_inhibition_subpool_floor() {
        let mut ly = layer(&[1, 2, 1, 2], LayerKind::Hidden);
        for (i, nrn) in ly.neurons.iter_mut().enumerate() {
            nrn.ge = if i < 2 { 0.8 } else { 0.0 };
        }
        ly.avg_max_ge();
        ly.inhib_from_ge_act();
        let lay_gi = ly.pools[0].inhib.gi;
        assert!(lay_gi > 0.0);
        // pool inhibition is off by default: sub-pools take the layer value
        assert_eq!(ly.pools[1].inhib.gi, lay_gi);
        assert_eq!(ly.pools[2].inhib.gi, lay_gi);
        assert!(ly.neurons.iter().all(|n| n.gi == lay_gi));
    }

    #[test]
    fn test_cos_diff_identical_phases() {
        let mut ly = layer(&[4], LayerKind::Hidden);
        for (i, nrn) in ly.neurons.iter_mut().enumerate() {
            nrn.act_m = i as f32 * 0.2;
            nrn.act_p = i as f32 * 0.2;
        }
        ly.pools[0].act_m.avg = 0.3;
        ly.pools[0].act_p.avg = 0.3;
        ly.cos_diff_from_acts();
        assert!((ly.cos_diff.cos - 1.0).abs() < 1e-6);
        assert!(ly.cos_diff.avg_lrn.abs() < 1e-6);
        assert_eq!(ly.cos_diff.mod_avg_l_lrn, ly.learn.avg_l.mod_min);

        let mut out = layer(&[4], LayerKind::Target);
        out.cos_diff_from_acts();
        assert_eq!(out.cos_diff.mod_avg_l_lrn, 0.0);
    }

    #[test]
    fn test_mse_tolerance() {
        let mut ly = layer(&[4], LayerKind::Hidden);
        ly.neurons[0].act_p = 1.0;
        ly.neurons[1].act_p = 0.4;
        ly.neurons[2].act_p = 0.01;
        let (sse, mse) = ly.mse(0.02);
        assert!((sse - 1.16).abs() < 1e-6);
        assert!((mse - 0.29).abs() < 1e-6);

        let mut cmp = layer(&[2], LayerKind::Compare);
        cmp.neurons[0].targ = 1.0;
        cmp.neurons[0].act_m = 0.5;
        assert!((cmp.sse(0.0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_lesion_counts() {
        let mut ly = layer(&[10], LayerKind::Hidden);
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(ly.lesion_units(0.3, &mut rng), 3);
        assert_eq!(ly.neurons.iter().filter(|n| n.is_off()).count(), 3);
        assert_eq!(ly.lesion_units(1.5, &mut rng), 0);
        assert_eq!(ly.neurons.iter().filter(|n| n.is_off()).count(), 0);
    }

    #[test]
    fn test_unit_value_access() {
        let mut ly = layer(&[3], LayerKind::Hidden);
        ly.set_unit_value("Act", 2, 0.5).unwrap();
        assert_eq!(ly.unit_value("Act", 2), 0.5);
        assert!(ly.unit_value("Act", 3).is_nan());
        assert!(ly.unit_value("Bogus", 0).is_nan());
        assert!(matches!(
            ly.unit_value_try("Bogus", 0),
            Err(NeuralError::UnknownVariable(_))
        ));
        assert_eq!(ly.unit_values(NeuronVar::Act), vec![0.0, 0.0, 0.5]);
    }
}
