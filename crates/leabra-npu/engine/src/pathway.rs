// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Pathway
//!
//! A directed sparse relation between two layers. The pathway owns its
//! synapses in sender order, both CSR views of the connectivity, and the
//! per-receiver conductance accumulator that delta-sends write into.

use std::fmt;
use std::sync::Arc;

use leabra_config::LeabraConfig;
use leabra_npu_neural::{
    LearnSynParams, Neuron, Shape, SynapseVar, WtBalRecv, WtInitParams, WtScaleParams,
};
use leabra_npu_plasticity::{dwt, init_weights, wt_bal_from_wt, wt_from_dwt};
use leabra_npu_runtime::{
    ConnectivityPattern, PathwayIndex, RuntimeError, SynapseArray, SynapseStorage,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::weights::RecvWeights;

/// Which receiver conductance a pathway drives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathwayKind {
    #[default]
    Excite,
    Inhib,
}

pub struct Pathway {
    /// `<send>To<recv>`
    pub name: String,
    /// Position in the network's pathway list
    pub index: usize,
    /// Sending layer index
    pub send: usize,
    /// Receiving layer index
    pub recv: usize,
    pub kind: PathwayKind,
    pub off: bool,

    pub pattern: Arc<dyn ConnectivityPattern>,
    pub cons: PathwayIndex,
    pub syns: SynapseArray,

    /// Conductance scale, recomputed at every trial start
    pub g_scale: f32,
    /// Per-receiver conductance accumulated by delta-sends this cycle
    pub g_inc: Vec<f32>,
    pub wb_recv: Vec<WtBalRecv>,

    pub learn: LearnSynParams,
    pub wt_init: WtInitParams,
    pub wt_scale: WtScaleParams,
}

impl fmt::Debug for Pathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pathway")
            .field("name", &self.name)
            .field("send", &self.send)
            .field("recv", &self.recv)
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.name())
            .field("syns", &self.syns.count())
            .field("g_scale", &self.g_scale)
            .finish()
    }
}

impl Pathway {
    pub fn new(
        name: impl Into<String>,
        index: usize,
        send: usize,
        recv: usize,
        kind: PathwayKind,
        pattern: Arc<dyn ConnectivityPattern>,
    ) -> Self {
        Self {
            name: name.into(),
            index,
            send,
            recv,
            kind,
            off: false,
            pattern,
            cons: PathwayIndex::default(),
            syns: SynapseArray::default(),
            g_scale: 1.0,
            g_inc: Vec::new(),
            wb_recv: Vec::new(),
            learn: LearnSynParams::default(),
            wt_init: WtInitParams::default(),
            wt_scale: WtScaleParams::default(),
        }
    }

    pub fn is_self(&self) -> bool {
        self.send == self.recv
    }

    pub fn is_inhib(&self) -> bool {
        self.kind == PathwayKind::Inhib
    }

    /// Build both connectivity views and allocate synapse storage
    pub fn build(&mut self, send: &Shape, recv: &Shape) -> std::result::Result<(), RuntimeError> {
        let cons = PathwayIndex::build(self.pattern.as_ref(), send, recv, self.is_self())?;
        self.syns = SynapseArray::new(cons.num_syns());
        self.g_inc = vec![0.0; cons.num_recv()];
        self.wb_recv = vec![WtBalRecv::default(); cons.num_recv()];
        debug!(
            target: "leabra-npu-engine",
            "[BUILD] {} ({}): {} synapses, recv avg {:.1} max {}",
            self.name,
            self.pattern.name(),
            cons.num_syns(),
            cons.recv_stats.avg,
            cons.recv_stats.max
        );
        self.cons = cons;
        Ok(())
    }

    pub fn update_params(&mut self) {
        self.learn.update();
    }

    pub fn apply_config(&mut self, cfg: &LeabraConfig) {
        let l = &cfg.learning;
        self.learn.lrate = l.lrate;
        self.learn.lrate_init = l.lrate;
        self.learn.xcal.m_lrn = l.m_lrn;
        self.learn.norm.on = l.norm;
        self.learn.momentum.on = l.momentum;
        self.learn.wt_bal.on = l.wt_bal;
        self.update_params();
    }

    // === Weights ===

    /// Draw fresh weights and reset the per-trial state
    pub fn init_weights<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        init_weights(&self.learn, &self.wt_init, &mut self.syns, rng);
        self.wb_recv.fill(WtBalRecv::default());
        self.init_g_inc();
    }

    pub fn init_g_inc(&mut self) {
        self.g_inc.fill(0.0);
    }

    // === Cycle ===

    /// Send a scaled activation change from sender `si` to its receivers
    #[inline]
    pub fn send_g_delta(&mut self, si: usize, delta: f32) {
        let scdel = delta * self.g_scale;
        let wt = self.syns.wt();
        for syn in self.cons.send_range(si) {
            self.g_inc[self.cons.send_idx[syn]] += scdel * wt[syn];
        }
    }

    // === Learning ===

    pub fn dwt(&mut self, send: &[Neuron], recv: &[Neuron]) {
        if self.off {
            return;
        }
        dwt(&self.learn, &self.cons, &mut self.syns, send, recv);
    }

    pub fn wt_from_dwt(&mut self) {
        if self.off {
            return;
        }
        wt_from_dwt(&self.learn, &self.cons, &mut self.syns, &self.wb_recv);
    }

    /// Recompute the balance factors; target receivers only with `targs`
    pub fn wt_bal_from_wt(&mut self, recv_is_target: bool) -> usize {
        if self.off || (recv_is_target && !self.learn.wt_bal.targs) {
            return 0;
        }
        wt_bal_from_wt(&self.learn, &self.cons, &self.syns, &mut self.wb_recv)
    }

    // === Variable Access ===

    pub fn syn_value_try(&self, var_name: &str, send: usize, recv: usize) -> Result<f32> {
        let var = SynapseVar::from_name(var_name)?;
        let syn = self.cons.syn_index_try(send, recv)?;
        Ok(self.syns.value(var, syn)?)
    }

    /// Value of a synapse variable, NaN if the name or connection is invalid
    pub fn syn_value(&self, var_name: &str, send: usize, recv: usize) -> f32 {
        self.syn_value_try(var_name, send, recv).unwrap_or(f32::NAN)
    }

    /// Set a synapse variable; setting `Wt` also recomputes `LWt`
    pub fn set_syn_value(&mut self, var_name: &str, send: usize, recv: usize, val: f32) -> Result<()> {
        let var = SynapseVar::from_name(var_name)?;
        let syn = self.cons.syn_index_try(send, recv)?;
        if var == SynapseVar::Wt {
            self.set_wt(syn, val);
        } else {
            self.syns.set_value(var, syn, val)?;
        }
        Ok(())
    }

    /// Set one weight by synapse index, recomputing its linear weight
    pub fn set_wt(&mut self, syn: usize, wt: f32) {
        self.syns.wt[syn] = wt;
        self.syns.lwt[syn] = self.learn.lwt_from_wt(wt, self.syns.scale[syn]);
    }

    /// Synapse index of every weight in `recvs`, in snapshot order
    pub fn weight_slots(&self, recvs: &[RecvWeights]) -> Result<Vec<usize>> {
        let mut slots = Vec::with_capacity(recvs.iter().map(|rw| rw.wt.len()).sum());
        for rw in recvs {
            if rw.si.len() != rw.wt.len() {
                return Err(EngineError::InvalidWeights(format!(
                    "{} receiver {}: {} senders but {} weights",
                    self.name,
                    rw.ri,
                    rw.si.len(),
                    rw.wt.len()
                )));
            }
            for &si in &rw.si {
                slots.push(self.cons.syn_index_try(si, rw.ri)?);
            }
        }
        Ok(slots)
    }

    /// Every receiver's incoming weights, in receiver order
    pub fn recv_weights(&self) -> Vec<RecvWeights> {
        (0..self.cons.num_recv())
            .map(|ri| {
                let range = self.cons.recv_range(ri);
                RecvWeights {
                    ri,
                    si: range.clone().map(|slot| self.cons.recv_idx[slot]).collect(),
                    wt: range
                        .map(|slot| self.syns.wt[self.cons.recv_syn[slot]])
                        .collect(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leabra_npu_runtime::FullConnect;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn full(send: usize, recv: usize) -> Pathway {
        let mut p = Pathway::new("AToB", 0, 0, 1, PathwayKind::Excite, Arc::new(FullConnect::new()));
        p.build(&Shape::new(&[send]).unwrap(), &Shape::new(&[recv]).unwrap())
            .unwrap();
        p
    }

    #[test]
    fn test_build_full_three_to_two() {
        let p = full(3, 2);
        assert_eq!(p.syns.count(), 6);
        assert_eq!(p.cons.recv_n, vec![3, 3]);
        assert_eq!(p.cons.send_n, vec![2, 2, 2]);
        assert_eq!(p.g_inc.len(), 2);
    }

    #[test]
    fn test_send_g_delta_scaled_by_weight() {
        let mut p = full(2, 2);
        p.syns.wt.copy_from_slice(&[0.5, 0.25, 1.0, 0.0]);
        p.g_scale = 2.0;
        p.send_g_delta(0, 0.6);
        assert!((p.g_inc[0] - 0.6).abs() < 1e-6);
        assert!((p.g_inc[1] - 0.3).abs() < 1e-6);
        p.send_g_delta(0, -0.6);
        assert!(p.g_inc.iter().all(|g| g.abs() < 1e-6));
    }

    #[test]
    fn test_set_wt_updates_lwt() {
        let mut p = full(2, 2);
        p.set_syn_value("Wt", 1, 0, 0.5).unwrap();
        assert_eq!(p.syn_value("Wt", 1, 0), 0.5);
        assert!((p.syn_value("LWt", 1, 0) - 0.5).abs() < 1e-5);
        p.set_syn_value("Wt", 1, 0, 0.8).unwrap();
        assert!(p.syn_value("LWt", 1, 0) < 0.8);
    }

    #[test]
    fn test_set_wt_with_zero_scale() {
        let mut p = full(2, 2);
        p.set_syn_value("Scale", 0, 1, 0.0).unwrap();
        p.set_syn_value("Wt", 0, 1, 0.4).unwrap();
        assert_eq!(p.syn_value("Wt", 0, 1), 0.4);
        assert_eq!(p.syn_value("LWt", 0, 1), 0.0);
    }

    #[test]
    fn test_syn_value_errors() {
        let p = full(2, 2);
        assert!(p.syn_value("Wt", 5, 0).is_nan());
        assert!(p.syn_value("Nope", 0, 0).is_nan());
        assert!(p.syn_value_try("Wt", 0, 9).is_err());
    }

    #[test]
    fn test_init_weights_and_export() {
        let mut p = full(3, 2);
        let mut rng = StdRng::seed_from_u64(1);
        p.init_weights(&mut rng);
        let recvs = p.recv_weights();
        assert_eq!(recvs.len(), 2);
        for rw in &recvs {
            assert_eq!(rw.si, vec![0, 1, 2]);
            for (&si, &wt) in rw.si.iter().zip(&rw.wt) {
                assert_eq!(wt, p.syn_value("Wt", si, rw.ri));
                assert!((0.25..=0.75).contains(&wt));
            }
        }
    }

    #[test]
    fn test_wt_bal_skips_targets_without_targs() {
        let mut p = full(3, 2);
        p.learn.wt_bal.on = true;
        p.syns.wt.fill(0.9);
        assert_eq!(p.wt_bal_from_wt(true), 0);
        assert_eq!(p.wb_recv[0].inc, 1.0);
        p.wt_bal_from_wt(false);
        assert!(p.wb_recv[0].inc < 1.0);
        assert!(p.wb_recv[0].dec > 1.0);
    }
}
