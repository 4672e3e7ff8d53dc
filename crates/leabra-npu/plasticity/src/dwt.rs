// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Weight-change computation
//!
//! For each sender above the learning threshold, every one of its synapses
//! accumulates `lrate * norm * (bcm + err)`, optionally through momentum.

use leabra_npu_neural::{LearnSynParams, Neuron};
use leabra_npu_runtime::{PathwayIndex, SynapseStorage};

/// Accumulate DWt for every synapse of a pathway
///
/// `send` and `recv` are the sending and receiving layers' units. A
/// pathway with learning off is left untouched.
pub fn dwt<S: SynapseStorage + ?Sized>(
    learn: &LearnSynParams,
    index: &PathwayIndex,
    syns: &mut S,
    send: &[Neuron],
    recv: &[Neuron],
) {
    if !learn.learn {
        return;
    }
    let lrn_thr = learn.xcal.lrn_thr;
    let cols = syns.columns_mut();

    for (si, sn) in send.iter().enumerate().take(index.num_send()) {
        if sn.is_off() || (sn.avg_s < lrn_thr && sn.avg_m < lrn_thr) {
            continue;
        }
        let range = index.send_range(si);
        for syn in range.clone() {
            let rn = &recv[index.send_idx[syn]];
            let (mut err, mut bcm) =
                learn.chl_dwt(sn.avg_s_lrn, sn.avg_m, rn.avg_s_lrn, rn.avg_m, rn.avg_l);
            bcm *= learn.xcal.long_lrate(rn.avg_l_lrn);
            err *= learn.xcal.m_lrn;
            let mut dw = bcm + err;

            let norm = if learn.norm.on {
                learn.norm.norm_from_abs_dwt(&mut cols.norm[syn], dw.abs())
            } else {
                1.0
            };
            if learn.momentum.on {
                dw = norm * learn.momentum.moment_from_dwt(&mut cols.moment[syn], dw);
            } else {
                dw *= norm;
            }
            cols.dwt[syn] += learn.lrate * dw;
        }

        // all of a sender's synapses share its max norm
        if learn.norm.on {
            let norms = &mut cols.norm[range];
            let max_norm = norms.iter().copied().fold(0.0f32, f32::max);
            norms.iter_mut().for_each(|n| *n = max_norm);
        }
    }
}
