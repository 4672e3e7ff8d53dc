// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Initial weights and reciprocal symmetry

use leabra_npu_neural::{LearnSynParams, WtInitParams};
use leabra_npu_runtime::{PathwayIndex, SynapseStorage};
use rand::Rng;

/// Draw fresh weights for every synapse and clear the learning accumulators
///
/// A zero scale is treated as unset and becomes 1.
pub fn init_weights<S, R>(learn: &LearnSynParams, wt_init: &WtInitParams, syns: &mut S, rng: &mut R)
where
    S: SynapseStorage + ?Sized,
    R: Rng + ?Sized,
{
    let cols = syns.columns_mut();
    for i in 0..cols.wt.len() {
        if cols.scale[i] == 0.0 {
            cols.scale[i] = 1.0;
        }
        let wt = wt_init.gen(rng);
        cols.lwt[i] = learn.wt_sig.lin_from_sig_wt(wt);
        cols.wt[i] = wt * cols.scale[i];
        cols.dwt[i] = 0.0;
        cols.norm[i] = 0.0;
        cols.moment[i] = 0.0;
    }
}

/// Copy Wt, LWt and Scale from `fwd` into the reciprocal pathway `rev`
///
/// `rev` runs from `fwd`'s receiving layer back to its sending layer. Each
/// synapse s -> r of `fwd` is mirrored onto r -> s of `rev` where that
/// synapse exists. Returns the number of synapses copied.
pub fn init_wt_sym<F, R>(
    fwd_index: &PathwayIndex,
    fwd: &F,
    rev_index: &PathwayIndex,
    rev: &mut R,
) -> usize
where
    F: SynapseStorage + ?Sized,
    R: SynapseStorage + ?Sized,
{
    let (wt, lwt, scale) = (fwd.wt(), fwd.lwt(), fwd.scale());
    let cols = rev.columns_mut();
    let mut copied = 0;
    for si in 0..fwd_index.num_send() {
        for syn in fwd_index.send_range(si) {
            let ri = fwd_index.send_idx[syn];
            if let Some(rsyn) = rev_index.syn_index(ri, si) {
                cols.wt[rsyn] = wt[syn];
                cols.lwt[rsyn] = lwt[syn];
                cols.scale[rsyn] = scale[syn];
                copied += 1;
            }
        }
    }
    copied
}
