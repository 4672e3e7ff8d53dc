// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Weight balance: per-receiver increase / decrease factors from the
//! average of its stronger incoming weights

use leabra_npu_neural::{LearnSynParams, WtBalRecv};
use leabra_npu_runtime::{PathwayIndex, SynapseStorage};
use tracing::trace;

/// Recompute `wb_recv` from the current weights
///
/// Returns the number of receivers skipped for having no connections.
pub fn wt_bal_from_wt<S: SynapseStorage + ?Sized>(
    learn: &LearnSynParams,
    index: &PathwayIndex,
    syns: &S,
    wb_recv: &mut [WtBalRecv],
) -> usize {
    if !learn.learn || !learn.wt_bal.on {
        return 0;
    }
    let wts = syns.wt();
    let avg_thr = learn.wt_bal.avg_thr;
    let mut skipped = 0;

    for (ri, wb) in wb_recv.iter_mut().enumerate().take(index.num_recv()) {
        if index.recv_n[ri] < 1 {
            skipped += 1;
            continue;
        }
        let (sum, n) = index
            .recv_range(ri)
            .map(|slot| wts[index.recv_syn[slot]])
            .filter(|&wt| wt >= avg_thr)
            .fold((0.0f32, 0usize), |(s, n), wt| (s + wt, n + 1));
        let avg = if n > 0 { sum / n as f32 } else { 0.0 };

        let (fact, inc, dec) = learn.wt_bal.wt_bal(avg);
        *wb = WtBalRecv { avg, fact, inc, dec };
    }

    if skipped > 0 {
        trace!(
            target: "leabra-npu-plasticity",
            "[WT-BAL] {} receivers without connections skipped",
            skipped
        );
    }
    skipped
}

#[cfg(test)]
mod tests {
    use super::*;
    use leabra_npu_neural::Shape;
    use leabra_npu_runtime::{Connectivity, FullConnect, SynapseArray};

    fn learn_with_bal() -> LearnSynParams {
        let mut learn = LearnSynParams::default();
        learn.wt_bal.on = true;
        learn
    }

    #[test]
    fn test_high_average_reduces_increases() {
        let learn = learn_with_bal();
        let idx = PathwayIndex::build(
            &FullConnect::new(),
            &Shape::new(&[4]).unwrap(),
            &Shape::new(&[1]).unwrap(),
            false,
        )
        .unwrap();
        let mut syns = SynapseArray::new(4);
        // 0.1 is below avg_thr and ignored
        syns.wt.copy_from_slice(&[0.6, 0.6, 0.6, 0.1]);
        let mut wb = vec![WtBalRecv::default(); 1];
        assert_eq!(wt_bal_from_wt(&learn, &idx, &syns, &mut wb), 0);

        let avg = 0.6;
        assert!((wb[0].avg - avg).abs() < 1e-6);
        let want_inc = 1.0 / (1.0 + learn.wt_bal.hi_gain * (avg - learn.wt_bal.hi_thr));
        assert!((wb[0].inc - want_inc).abs() < 1e-6);
        assert!(wb[0].inc < 1.0 && 1.0 < wb[0].dec);
    }

    #[test]
    fn test_unconnected_receiver_skipped() {
        let learn = learn_with_bal();
        let con = Connectivity {
            send_n: vec![1],
            recv_n: vec![1, 0],
            cons: vec![true, false],
        };
        let idx = PathwayIndex::from_connectivity(&con, 1, 2).unwrap();
        let mut syns = SynapseArray::new(1);
        syns.wt[0] = 0.2;
        let mut wb = vec![WtBalRecv::default(); 2];
        assert_eq!(wt_bal_from_wt(&learn, &idx, &syns, &mut wb), 1);
        // no weight above threshold: low-average branch at avg_thr
        assert_eq!(wb[0].avg, 0.0);
        assert!(wb[0].inc > 1.0 && wb[0].dec < 1.0);
        assert_eq!(wb[1], WtBalRecv::default());
    }

    #[test]
    fn test_off_leaves_factors() {
        let learn = LearnSynParams::default();
        let idx = PathwayIndex::default();
        let syns = SynapseArray::new(0);
        let mut wb = vec![WtBalRecv { inc: 0.3, ..Default::default() }];
        wt_bal_from_wt(&learn, &idx, &syns, &mut wb);
        assert_eq!(wb[0].inc, 0.3);
    }
}
