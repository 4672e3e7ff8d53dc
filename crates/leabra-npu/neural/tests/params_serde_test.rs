// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Parameter blocks load from partial JSON, filling the rest with defaults.

use leabra_npu_neural::{ActParams, InhibParams, LearnSynParams};

#[test]
fn test_act_params_partial_json() {
    let mut p: ActParams = serde_json::from_str(r#"{"vm_max": 1.5, "dt": {"vm_tau": 5.0}}"#).unwrap();
    p.update();

    let mut want = ActParams::default();
    want.vm_max = 1.5;
    want.dt.vm_tau = 5.0;
    want.update();
    assert_eq!(p, want);
    assert!((p.dt.vm_dt - want.dt.integ / 5.0).abs() < 1e-6);
}

#[test]
fn test_inhib_params_round_trip() {
    let mut p = InhibParams::default();
    p.layer.gi = 2.4;
    p.pool.on = true;
    p.update();

    let json = serde_json::to_string(&p).unwrap();
    assert!(!json.contains("fb_dt"));
    let mut back: InhibParams = serde_json::from_str(&json).unwrap();
    back.update();
    assert_eq!(back, p);
}

#[test]
fn test_learn_syn_params_partial_json() {
    let mut p: LearnSynParams =
        serde_json::from_str(r#"{"lrate": 0.1, "wt_bal": {"on": true}}"#).unwrap();
    p.update();

    assert_eq!(p.lrate, 0.1);
    assert_eq!(p.lrate_init, LearnSynParams::default().lrate_init);
    assert!(p.wt_bal.on);
    assert_eq!(p.wt_bal.hi_gain, 4.0);
    assert!(p.xcal.d_rev_ratio < 0.0);
}
