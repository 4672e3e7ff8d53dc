// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Weight commit: fold pending DWt into LWt / Wt

use leabra_npu_neural::{LearnSynParams, WtBalRecv};
use leabra_npu_runtime::{PathwayIndex, SynapseStorage};
use rayon::prelude::*;

/// Pathways with at least this many synapses commit in parallel
pub const PAR_COMMIT_THRESHOLD: usize = 16_384;

/// Apply every synapse's DWt and zero it
///
/// `wb_recv` holds the per-receiver balance factors; they are used only
/// when weight balance is on, otherwise increases and decreases are
/// unscaled. Norm and momentum are not reset.
pub fn wt_from_dwt<S: SynapseStorage + ?Sized>(
    learn: &LearnSynParams,
    index: &PathwayIndex,
    syns: &mut S,
    wb_recv: &[WtBalRecv],
) {
    if !learn.learn {
        return;
    }
    let use_bal = learn.wt_bal.on && wb_recv.len() == index.num_recv();
    let cols = syns.columns_mut();

    let commit = |(((dwt, wt), lwt), (&scale, &ri)): (
        ((&mut f32, &mut f32), &mut f32),
        (&f32, &usize),
    )| {
        let (inc, dec) = if use_bal {
            (wb_recv[ri].inc, wb_recv[ri].dec)
        } else {
            (1.0, 1.0)
        };
        learn.wt_from_dwt(inc, dec, dwt, wt, lwt, scale);
    };

    if cols.dwt.len() >= PAR_COMMIT_THRESHOLD {
        cols.dwt
            .par_iter_mut()
            .zip(cols.wt.par_iter_mut())
            .zip(cols.lwt.par_iter_mut())
            .zip(cols.scale.par_iter().zip(index.send_idx.par_iter()))
            .for_each(commit);
    } else {
        cols.dwt
            .iter_mut()
            .zip(cols.wt.iter_mut())
            .zip(cols.lwt.iter_mut())
            .zip(cols.scale.iter().zip(index.send_idx.iter()))
            .for_each(commit);
    }
}
