// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Network
//!
//! Owns the layers and pathways and drives the trial:
//!
//! ```text
//! AlphaCycInit  avgs | gscale + decay
//! Cycle x 25    SendGDelta | GFromInc | InhibAct      (x 4 quarters)
//! QuarterFinal  after every quarter
//! Learn         DWt | WtFromDWt | WtBal every WtBalInterval commits
//! ```
//!
//! Every `|` is a barrier. Within a step each layer job writes only its own
//! layer and the pathways it owns for that step, so the result does not
//! depend on how layers are spread across workers.
//!
//! | Step | Writes | Reads |
//! |------|--------|-------|
//! | SendGDelta | layer, send pathways | |
//! | GFromInc | layer, recv pathways | |
//! | InhibAct, QuarterFinal | layer | |
//! | AlphaCycInit (gscale) | recv pathways, then layer | sender layers |
//! | DWt, WtFromDWt | send pathways | sender and receiver layers |
//! | WtBal | recv pathways | layer |

use std::sync::Arc;
use std::time::Instant;

use ahash::AHashMap;
use leabra_config::{validate_config, LeabraConfig};
use leabra_npu_neural::Shape;
use leabra_npu_plasticity::init_wt_sym;
use leabra_npu_runtime::{ConnectivityPattern, SynapseStorage};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::context::{Context, QUARTERS_PER_TRIAL};
use crate::error::{EngineError, Result};
use crate::layer::{Layer, LayerKind};
use crate::pathway::{Pathway, PathwayKind};
use crate::stats::{EngineStats, Step};
use crate::weights::{LayerWeights, NetworkWeights, PathwayWeights};
use crate::worker_pool::WorkerPool;

/// Default number of weight commits between weight balance passes
pub const DEFAULT_WT_BAL_INTERVAL: u32 = 10;

/// Layers and pathways, shared with the workers
#[derive(Default)]
pub struct NetworkState {
    pub layers: Vec<RwLock<Layer>>,
    pub paths: Vec<RwLock<Pathway>>,
}

impl NetworkState {
    fn send_g_delta(&self, li: usize) {
        let mut ly = self.layers[li].write();
        if ly.off {
            return;
        }
        let mut paths: Vec<_> = ly
            .send_paths
            .iter()
            .map(|&pi| self.paths[pi].write())
            .filter(|p| !p.off)
            .collect();
        ly.send_g_delta(|ni, delta| {
            for p in paths.iter_mut() {
                p.send_g_delta(ni, delta);
            }
        });
    }

    fn g_from_inc(&self, li: usize) {
        let mut ly = self.layers[li].write();
        if ly.off {
            return;
        }
        for k in 0..ly.recv_paths.len() {
            let mut p = self.paths[ly.recv_paths[k]].write();
            if p.off {
                continue;
            }
            ly.recv_g_inc(&p.g_inc, p.is_inhib());
            p.init_g_inc();
        }
        ly.g_from_inc_neur();
    }

    fn inhib_act(&self, li: usize, ctx: &Context) {
        let mut ly = self.layers[li].write();
        if ly.off {
            return;
        }
        ly.avg_max_ge();
        ly.inhib_from_ge_act();
        ly.act_from_g();
        ly.avg_max_act();
        ly.trace_cycle(ctx);
    }

    fn alpha_cyc_init_avgs(&self, li: usize, update_act_avg: bool) {
        let mut ly = self.layers[li].write();
        if !ly.off {
            ly.alpha_cyc_init_avgs(update_act_avg);
        }
    }

    fn alpha_cyc_init_state(&self, li: usize) {
        let recv_paths = {
            let ly = self.layers[li].read();
            if ly.off {
                return;
            }
            ly.recv_paths.clone()
        };
        self.g_scale_from_avg_act(&recv_paths);
        self.layers[li].write().alpha_cyc_init_state();
    }

    /// Conductance scale of each incoming pathway from its sender's expected activity
    ///
    /// Scales are normalized by the summed relative weight, separately for
    /// excitatory and inhibitory pathways. Only one lock is held at a time.
    fn g_scale_from_avg_act(&self, recv_paths: &[usize]) {
        let mut scales = Vec::with_capacity(recv_paths.len());
        let (mut tot_ge_rel, mut tot_gi_rel) = (0.0f32, 0.0f32);
        for &pi in recv_paths {
            let (send, inhib, ncon, wt_scale) = {
                let p = self.paths[pi].read();
                if p.off {
                    scales.push(None);
                    continue;
                }
                (p.send, p.is_inhib(), p.cons.recv_stats.avg, p.wt_scale.clone())
            };
            let (savg, snu) = {
                let sl = self.layers[send].read();
                (sl.pools[0].act_avg.act_p_avg_eff, sl.len() as f32)
            };
            if inhib {
                tot_gi_rel += wt_scale.rel;
            } else {
                tot_ge_rel += wt_scale.rel;
            }
            scales.push(Some((wt_scale.full_scale(savg, snu, ncon), inhib)));
        }
        for (&pi, scale) in recv_paths.iter().zip(scales) {
            let Some((scale, inhib)) = scale else {
                continue;
            };
            let tot = if inhib { tot_gi_rel } else { tot_ge_rel };
            let mut p = self.paths[pi].write();
            p.g_scale = if tot > 0.0 { scale / tot } else { scale };
            p.init_g_inc();
        }
    }

    fn quarter_final(&self, li: usize, ctx: &Context) {
        let mut ly = self.layers[li].write();
        if !ly.off {
            ly.quarter_final(ctx);
        }
    }

    fn dwt(&self, li: usize) {
        let sl = self.layers[li].read();
        if sl.off {
            return;
        }
        for &pi in &sl.send_paths {
            let mut p = self.paths[pi].write();
            if p.recv == li {
                p.dwt(&sl.neurons, &sl.neurons);
                continue;
            }
            let rl = self.layers[p.recv].read();
            if !rl.off {
                p.dwt(&sl.neurons, &rl.neurons);
            }
        }
    }

    fn wt_from_dwt(&self, li: usize) {
        let ly = self.layers[li].read();
        for &pi in &ly.send_paths {
            self.paths[pi].write().wt_from_dwt();
        }
    }

    fn wt_bal(&self, li: usize) {
        let ly = self.layers[li].read();
        let is_target = ly.kind == LayerKind::Target;
        let mut skipped = 0;
        for &pi in &ly.recv_paths {
            skipped += self.paths[pi].write().wt_bal_from_wt(is_target);
        }
        if skipped > 0 {
            debug!(
                target: "leabra-npu-engine",
                "[WT-BAL] {}: {} receivers without connections skipped",
                ly.name,
                skipped
            );
        }
    }
}

/// A Leabra network
pub struct Network {
    pub name: String,
    state: Arc<NetworkState>,
    layer_map: AHashMap<String, usize>,
    path_map: AHashMap<String, usize>,
    built: bool,
    threads: usize,
    pool: Option<WorkerPool>,
    wt_bal_interval: u32,
    wt_bal_ctr: u32,
    seed: u64,
    stats: EngineStats,
}

impl Network {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(NetworkState::default()),
            layer_map: AHashMap::new(),
            path_map: AHashMap::new(),
            built: false,
            threads: 1,
            pool: None,
            wt_bal_interval: DEFAULT_WT_BAL_INTERVAL,
            wt_bal_ctr: 0,
            seed: 42,
            stats: EngineStats::default(),
        }
    }

    /// Number of workers started by [`Network::build`]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn state_mut(&mut self) -> Result<&mut NetworkState> {
        Arc::get_mut(&mut self.state).ok_or(EngineError::Busy)
    }

    // === Construction ===

    pub fn add_layer(&mut self, name: &str, dims: &[usize], kind: LayerKind) -> Result<usize> {
        if self.layer_map.contains_key(name) {
            return Err(EngineError::DuplicateLayer(name.to_string()));
        }
        let shape = Shape::new(dims)?;
        let state = self.state_mut()?;
        let li = state.layers.len();
        state.layers.push(RwLock::new(Layer::new(name, li, shape, kind)));
        self.layer_map.insert(name.to_string(), li);
        self.built = false;
        Ok(li)
    }

    /// Add a pathway from `send` to `recv`, named `<send>To<recv>`
    pub fn connect_layers(
        &mut self,
        send: &str,
        recv: &str,
        pattern: Arc<dyn ConnectivityPattern>,
        kind: PathwayKind,
    ) -> Result<usize> {
        let si = self.layer_index(send)?;
        let ri = self.layer_index(recv)?;
        let name = format!("{}To{}", send, recv);
        let state = self.state_mut()?;
        let pi = state.paths.len();
        state
            .paths
            .push(RwLock::new(Pathway::new(name.clone(), pi, si, ri, kind, pattern)));
        state.layers[si].get_mut().send_paths.push(pi);
        state.layers[ri].get_mut().recv_paths.push(pi);
        self.path_map.entry(name).or_insert(pi);
        self.built = false;
        Ok(pi)
    }

    /// Build every pathway's connectivity and start the workers
    ///
    /// Failures are collected across all pathways; the network stays
    /// unusable until a later build succeeds.
    pub fn build(&mut self) -> Result<()> {
        self.built = false;
        self.stop_workers();
        self.pool = None;

        let state = self.state_mut()?;
        let mut errors = Vec::new();
        let mut total_syns = 0;
        for p in &state.paths {
            let mut p = p.write();
            let send = state.layers[p.send].read().shape.clone();
            let recv = state.layers[p.recv].read().shape.clone();
            match p.build(&send, &recv) {
                Ok(()) => total_syns += p.syns.count(),
                Err(e) => errors.push(format!("{}: {}", p.name, e)),
            }
        }
        if !errors.is_empty() {
            warn!(
                target: "leabra-npu-engine",
                "[BUILD] {}: {} pathways failed",
                self.name,
                errors.len()
            );
            return Err(EngineError::Build(errors));
        }
        self.update_params();

        let sizes: Vec<usize> = self.state.layers.iter().map(|l| l.read().len()).collect();
        let units: usize = sizes.iter().sum();
        if self.threads > 1 {
            self.pool = Some(WorkerPool::start(self.threads, &sizes)?);
        }
        self.built = true;
        info!(
            target: "leabra-npu-engine",
            "[BUILD] {}: {} layers, {} units, {} pathways, {} synapses, {} workers",
            self.name,
            sizes.len(),
            units,
            self.state.paths.len(),
            total_syns,
            self.threads
        );
        Ok(())
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    // === Workers ===

    /// Change the worker count, restarting the pool if the network is built
    pub fn set_threads(&mut self, threads: usize) -> Result<()> {
        self.threads = threads.max(1);
        if !self.built {
            return Ok(());
        }
        self.stop_workers();
        self.pool = None;
        if self.threads > 1 {
            let sizes: Vec<usize> = self.state.layers.iter().map(|l| l.read().len()).collect();
            self.pool = Some(WorkerPool::start(self.threads, &sizes)?);
        }
        Ok(())
    }

    /// Join every worker; steps fail with [`EngineError::WorkerPoolStopped`] until restarted
    pub fn stop_workers(&mut self) {
        if let Some(pool) = self.pool.as_mut() {
            pool.stop();
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Layer indices run by each worker; empty when running sequentially
    pub fn worker_assignment(&self) -> Vec<Vec<usize>> {
        self.pool.as_ref().map(|p| p.assignment()).unwrap_or_default()
    }

    fn run_step<F>(&mut self, step: Step, f: F) -> Result<()>
    where
        F: Fn(&NetworkState, usize) + Send + Sync + 'static,
    {
        if !self.built {
            return Err(EngineError::NotBuilt);
        }
        let start = Instant::now();
        match &self.pool {
            Some(pool) => {
                let state = Arc::clone(&self.state);
                let busy = pool.run(Arc::new(move |li| f(&*state, li)))?;
                self.stats.record_busy(&busy);
            }
            None => {
                for li in 0..self.state.layers.len() {
                    f(&*self.state, li);
                }
            }
        }
        self.stats.record_step(step, start.elapsed());
        Ok(())
    }

    // === Access ===

    pub fn num_layers(&self) -> usize {
        self.state.layers.len()
    }

    pub fn num_pathways(&self) -> usize {
        self.state.paths.len()
    }

    pub fn layer_index(&self, name: &str) -> Result<usize> {
        self.layer_map
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::LayerNotFound(name.to_string()))
    }

    pub fn layer(&self, name: &str) -> Result<RwLockReadGuard<'_, Layer>> {
        Ok(self.state.layers[self.layer_index(name)?].read())
    }

    pub fn layer_mut(&self, name: &str) -> Result<RwLockWriteGuard<'_, Layer>> {
        Ok(self.state.layers[self.layer_index(name)?].write())
    }

    pub fn layer_at(&self, li: usize) -> Option<RwLockReadGuard<'_, Layer>> {
        self.state.layers.get(li).map(|l| l.read())
    }

    pub fn layer_names(&self) -> Vec<String> {
        self.state.layers.iter().map(|l| l.read().name.clone()).collect()
    }

    fn path_index(&self, name: &str) -> Result<usize> {
        self.path_map
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::PathwayNotFound(name.to_string()))
    }

    /// Pathway by name, `<send>To<recv>`
    pub fn pathway(&self, name: &str) -> Result<RwLockReadGuard<'_, Pathway>> {
        Ok(self.state.paths[self.path_index(name)?].read())
    }

    pub fn pathway_mut(&self, name: &str) -> Result<RwLockWriteGuard<'_, Pathway>> {
        Ok(self.state.paths[self.path_index(name)?].write())
    }

    pub fn pathway_at(&self, pi: usize) -> Option<RwLockReadGuard<'_, Pathway>> {
        self.state.paths.get(pi).map(|p| p.read())
    }

    // === Parameters ===

    /// Recompute derived parameters; call after changing any parameter field
    pub fn update_params(&mut self) {
        for ly in &self.state.layers {
            ly.write().update_params();
        }
        for p in &self.state.paths {
            p.write().update_params();
        }
    }

    /// Validate `cfg` and apply it to every layer, pathway and the scheduler
    pub fn apply_config(&mut self, cfg: &LeabraConfig) -> Result<()> {
        validate_config(cfg).map_err(|e| EngineError::Config(e.to_string()))?;
        for ly in &self.state.layers {
            ly.write().apply_config(cfg);
        }
        for p in &self.state.paths {
            p.write().apply_config(cfg);
        }
        self.wt_bal_interval = cfg.engine.wt_bal_interval;
        self.seed = cfg.engine.seed;
        if cfg.engine.threads != self.threads {
            self.set_threads(cfg.engine.threads)?;
        }
        debug!(
            target: "leabra-npu-engine",
            "[CONFIG] {}: applied to {} layers and {} pathways",
            self.name,
            self.num_layers(),
            self.num_pathways()
        );
        Ok(())
    }

    /// Set every pathway's learning rate to its initial rate times `mult`
    pub fn lrate_mult(&mut self, mult: f32) {
        for p in &self.state.paths {
            p.write().learn.lrate_mult(mult);
        }
    }

    // === Initialization ===

    /// Draw all weights from the network seed and reset every layer
    ///
    /// Each pathway gets its own generator seeded from the network seed
    /// and its index, so weights do not depend on the worker count.
    pub fn init_weights(&mut self) -> Result<()> {
        if !self.built {
            return Err(EngineError::NotBuilt);
        }
        for (pi, p) in self.state.paths.iter().enumerate() {
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(pi as u64));
            p.write().init_weights(&mut rng);
        }
        for ly in &self.state.layers {
            ly.write().init_weights_state();
        }
        self.wt_bal_ctr = 0;
        let copied = self.init_wt_sym();
        debug!(
            target: "leabra-npu-engine",
            "[INIT] {}: weights drawn with seed {}, {} symmetric copies",
            self.name,
            self.seed,
            copied
        );
        Ok(())
    }

    /// Copy forward weights into reciprocal pathways whose receiver comes first
    fn init_wt_sym(&self) -> usize {
        let mut copied = 0;
        for li in 0..self.state.layers.len() {
            let (send_paths, recv_paths) = {
                let ly = self.state.layers[li].read();
                (ly.send_paths.clone(), ly.recv_paths.clone())
            };
            for &pi in &send_paths {
                let fwd = self.state.paths[pi].read();
                if fwd.off || !fwd.wt_init.sym || fwd.recv < li {
                    continue;
                }
                let recip = recv_paths
                    .iter()
                    .copied()
                    .find(|&rp| rp != pi && self.state.paths[rp].read().send == fwd.recv);
                let Some(rpi) = recip else {
                    continue;
                };
                let mut guard = self.state.paths[rpi].write();
                let rev = &mut *guard;
                if rev.off || !rev.wt_init.sym {
                    continue;
                }
                copied += init_wt_sym(&fwd.cons, &fwd.syns, &rev.cons, &mut rev.syns);
            }
        }
        copied
    }

    /// Reset activations and pending conductances, keeping weights
    pub fn init_acts(&mut self) {
        for ly in &self.state.layers {
            ly.write().init_acts();
        }
        for p in &self.state.paths {
            p.write().init_g_inc();
        }
    }

    // === External Input ===

    pub fn init_ext(&mut self) {
        for ly in &self.state.layers {
            ly.write().init_ext();
        }
    }

    pub fn apply_ext(&mut self, layer: &str, values: &[f32]) -> Result<()> {
        self.layer_mut(layer)?.apply_ext(values);
        Ok(())
    }

    // === Trial ===

    /// Start a trial; `update_act_avg` also advances the pools' running averages
    pub fn alpha_cyc_init(&mut self, update_act_avg: bool) -> Result<()> {
        self.run_step(Step::AlphaCycInit, move |st, li| {
            st.alpha_cyc_init_avgs(li, update_act_avg)
        })?;
        self.run_step(Step::AlphaCycInit, |st, li| st.alpha_cyc_init_state(li))
    }

    /// One cycle of conductance, inhibition and activation updates
    pub fn cycle(&mut self, ctx: &Context) -> Result<()> {
        self.run_step(Step::SendGDelta, |st, li| st.send_g_delta(li))?;
        self.run_step(Step::GFromInc, |st, li| st.g_from_inc(li))?;
        let ctx = ctx.clone();
        self.run_step(Step::InhibAct, move |st, li| st.inhib_act(li, &ctx))?;
        self.stats.cycles += 1;
        Ok(())
    }

    pub fn quarter_final(&mut self, ctx: &Context) -> Result<()> {
        let ctx = ctx.clone();
        self.run_step(Step::QuarterFinal, move |st, li| st.quarter_final(li, &ctx))
    }

    /// Accumulate weight changes for every pathway
    pub fn dwt(&mut self) -> Result<()> {
        self.run_step(Step::DWt, |st, li| st.dwt(li))
    }

    /// Commit weight changes, then rebalance every `wt_bal_interval` commits
    pub fn wt_from_dwt(&mut self) -> Result<()> {
        self.run_step(Step::WtFromDWt, |st, li| st.wt_from_dwt(li))?;
        self.wt_bal_ctr += 1;
        if self.wt_bal_ctr >= self.wt_bal_interval {
            self.wt_bal_ctr = 0;
            self.run_step(Step::WtBal, |st, li| st.wt_bal(li))?;
        }
        Ok(())
    }

    /// Run one full trial of four quarters; learn when `train` is set
    pub fn run_alpha_trial(&mut self, ctx: &mut Context, train: bool) -> Result<()> {
        self.alpha_cyc_init(train)?;
        ctx.alpha_cyc_start();
        for qtr in 0..QUARTERS_PER_TRIAL {
            for _ in 0..ctx.cycles_per_quarter {
                self.cycle(ctx)?;
                ctx.cycle_inc();
            }
            self.quarter_final(ctx)?;
            if qtr + 1 < QUARTERS_PER_TRIAL {
                ctx.quarter_inc();
            }
        }
        if train {
            self.dwt()?;
            self.wt_from_dwt()?;
        }
        ctx.trial += 1;
        self.stats.trials += 1;
        Ok(())
    }

    // === Weights ===

    /// Snapshot of every learned value, receivers in order
    pub fn weights(&self) -> NetworkWeights {
        let names = self.layer_names();
        let layers = self
            .state
            .layers
            .iter()
            .map(|l| {
                let ly = l.read();
                let pathways = ly
                    .recv_paths
                    .iter()
                    .map(|&pi| {
                        let p = self.state.paths[pi].read();
                        PathwayWeights {
                            from: names[p.send].clone(),
                            kind: p.kind,
                            g_scale: p.g_scale,
                            recvs: p.recv_weights(),
                        }
                    })
                    .collect();
                LayerWeights {
                    layer: ly.name.clone(),
                    act_m_avg: ly.pools[0].act_avg.act_m_avg,
                    act_p_avg: ly.pools[0].act_avg.act_p_avg,
                    pathways,
                }
            })
            .collect();
        NetworkWeights {
            network: self.name.clone(),
            layers,
        }
    }

    /// Load a snapshot; weights go through `Wt` so linear weights follow
    ///
    /// Every entry is resolved before anything is written, so a snapshot
    /// that does not fit leaves the network unchanged. Pathways are matched
    /// on sender, kind and order among the receiver's pathways.
    pub fn set_weights(&mut self, weights: &NetworkWeights) -> Result<()> {
        let mut plan = Vec::with_capacity(weights.layers.len());
        for lw in &weights.layers {
            let li = self.layer_index(&lw.layer)?;
            let recv_paths = self.state.layers[li].read().recv_paths.clone();
            let mut paths: Vec<(usize, Vec<usize>)> = Vec::with_capacity(lw.pathways.len());
            for pw in &lw.pathways {
                let si = self.layer_index(&pw.from)?;
                let pi = recv_paths
                    .iter()
                    .copied()
                    .filter(|pi| !paths.iter().any(|(u, _)| u == pi))
                    .find(|&pi| {
                        let p = self.state.paths[pi].read();
                        p.send == si && p.kind == pw.kind
                    })
                    .ok_or_else(|| {
                        EngineError::PathwayNotFound(format!("{}To{} ({:?})", pw.from, lw.layer, pw.kind))
                    })?;
                let slots = self.state.paths[pi].read().weight_slots(&pw.recvs)?;
                paths.push((pi, slots));
            }
            plan.push((li, paths));
        }

        for (lw, (li, paths)) in weights.layers.iter().zip(plan) {
            {
                let mut guard = self.state.layers[li].write();
                let ly = &mut *guard;
                let act_avg = &mut ly.pools[0].act_avg;
                act_avg.act_m_avg = lw.act_m_avg;
                act_avg.act_p_avg = lw.act_p_avg;
                ly.inhib
                    .act_avg
                    .eff_from_avg(&mut act_avg.act_p_avg_eff, lw.act_p_avg);
            }
            for (pw, (pi, slots)) in lw.pathways.iter().zip(paths) {
                let mut p = self.state.paths[pi].write();
                p.g_scale = pw.g_scale;
                let wts = pw.recvs.iter().flat_map(|rw| rw.wt.iter().copied());
                for (syn, wt) in slots.into_iter().zip(wts) {
                    p.set_wt(syn, wt);
                }
            }
        }
        Ok(())
    }

    // === Lesioning ===

    pub fn lesion_units<R: Rng + ?Sized>(&mut self, layer: &str, prop: f32, rng: &mut R) -> Result<usize> {
        Ok(self.layer_mut(layer)?.lesion_units(prop, rng))
    }

    pub fn unlesion_units(&mut self) {
        for ly in &self.state.layers {
            ly.write().unlesion_units();
        }
    }

    // === Statistics ===

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }
}
