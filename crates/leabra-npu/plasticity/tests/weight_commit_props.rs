// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Property tests for the weight commit and weight balance

use leabra_npu_neural::{LearnSynParams, Shape, WtBalRecv, WtSigParams};
use leabra_npu_plasticity::{wt_bal_from_wt, wt_from_dwt};
use leabra_npu_runtime::{FullConnect, PathwayIndex, SynapseArray};
use proptest::prelude::*;

fn single_synapse(lwt: f32, dwt: f32, learn: &LearnSynParams) -> (PathwayIndex, SynapseArray) {
    let sh = Shape::new(&[1]).unwrap();
    let idx = PathwayIndex::build(&FullConnect::new(), &sh, &sh, false).unwrap();
    let mut syns = SynapseArray::new(1);
    syns.lwt[0] = lwt;
    syns.wt[0] = learn.wt_from_lwt(lwt, 1.0);
    syns.dwt[0] = dwt;
    (idx, syns)
}

proptest! {
    #[test]
    fn prop_commit_stays_in_unit_range(lwt in 0.0f32..=1.0, dwt in -3.0f32..3.0, soft in any::<bool>()) {
        let learn = LearnSynParams {
            wt_sig: WtSigParams { soft_bound: soft, ..WtSigParams::default() },
            ..LearnSynParams::default()
        };
        let (idx, mut syns) = single_synapse(lwt, dwt, &learn);
        wt_from_dwt(&learn, &idx, &mut syns, &[]);
        prop_assert!((0.0..=1.0).contains(&syns.lwt[0]));
        prop_assert!((0.0..=1.0).contains(&syns.wt[0]));
        prop_assert_eq!(syns.dwt[0], 0.0);
    }

    #[test]
    fn prop_zero_dwt_round_trips(lwt in 0.05f32..0.95) {
        let learn = LearnSynParams::default();
        let (idx, mut syns) = single_synapse(lwt, 0.0, &learn);
        let wt0 = syns.wt[0];
        wt_from_dwt(&learn, &idx, &mut syns, &[]);
        prop_assert_eq!(syns.wt[0], wt0);
        prop_assert!((learn.lwt_from_wt(syns.wt[0], 1.0) - lwt).abs() < 1e-4);
    }

    #[test]
    fn prop_wt_bal_factors_are_complementary(wts in prop::collection::vec(0.0f32..=1.0, 1..12)) {
        let mut learn = LearnSynParams::default();
        learn.wt_bal.on = true;
        let send = Shape::new(&[wts.len()]).unwrap();
        let recv = Shape::new(&[1]).unwrap();
        let idx = PathwayIndex::build(&FullConnect::new(), &send, &recv, false).unwrap();
        let mut syns = SynapseArray::new(wts.len());
        syns.wt.copy_from_slice(&wts);
        let mut wb = vec![WtBalRecv::default(); 1];
        prop_assert_eq!(wt_bal_from_wt(&learn, &idx, &syns, &mut wb), 0);

        let wb = wb[0];
        prop_assert!(wb.inc > 0.0 && wb.inc <= 2.0);
        prop_assert!(wb.dec > 0.0 && wb.dec <= 2.0);
        prop_assert!((wb.inc + wb.dec - 2.0).abs() < 1e-5);
        if wb.avg > learn.wt_bal.hi_thr {
            prop_assert!(wb.inc < 1.0);
        } else if wb.avg < learn.wt_bal.lo_thr {
            prop_assert!(wb.dec < 1.0);
        } else {
            prop_assert_eq!((wb.inc, wb.dec), (1.0, 1.0));
        }
    }
}

#[test]
fn test_overshoot_clamps_exactly() {
    let learn = LearnSynParams {
        wt_sig: WtSigParams { soft_bound: false, ..WtSigParams::default() },
        ..LearnSynParams::default()
    };
    let (idx, mut syns) = single_synapse(0.95, 0.5, &learn);
    wt_from_dwt(&learn, &idx, &mut syns, &[]);
    assert_eq!(syns.lwt[0], 1.0);
    assert_eq!(syns.wt[0], 1.0);

    let (idx, mut syns) = single_synapse(0.05, -0.5, &learn);
    wt_from_dwt(&learn, &idx, &mut syns, &[]);
    assert_eq!(syns.lwt[0], 0.0);
    assert_eq!(syns.wt[0], 0.0);
}
