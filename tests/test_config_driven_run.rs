// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Loading a TOML config from disk and driving a network with it.

use std::fs;
use std::sync::Arc;

use leabra::config::ConfigError;
use leabra::prelude::*;
use tempfile::TempDir;

fn write_config(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(leabra::config::CONFIG_FILE_NAME);
    fs::write(&path, body).unwrap();
    path
}

fn three_layer_net() -> Network {
    let mut net = Network::new("cfg-run");
    net.add_layer("Input", &[3, 3], LayerKind::Input).unwrap();
    net.add_layer("Hidden", &[2, 2, 2, 2], LayerKind::Hidden).unwrap();
    net.add_layer("Output", &[3, 3], LayerKind::Target).unwrap();
    let full = Arc::new(FullConnect::new());
    net.connect_layers("Input", "Hidden", full.clone(), PathwayKind::Excite).unwrap();
    net.connect_layers("Hidden", "Output", full.clone(), PathwayKind::Excite).unwrap();
    net.connect_layers("Output", "Hidden", full, PathwayKind::Excite).unwrap();
    net.build().unwrap();
    net
}

#[test]
fn test_config_file_drives_trial_timing_and_workers() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [engine]
        threads = 2
        cycles_per_quarter = 10
        seed = 7

        [learning]
        lrate = 0.05
        "#,
    );

    let cfg = load_config(Some(&path), None).unwrap();
    validate_config(&cfg).unwrap();

    let mut net = three_layer_net();
    net.apply_config(&cfg).unwrap();
    net.init_weights().unwrap();
    assert_eq!(net.threads(), 2);

    let mut ctx = Context::from_config(&cfg.engine);
    assert_eq!(ctx.cycles_per_quarter, 10);

    let input = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
    let target = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
    for _ in 0..3 {
        net.init_ext();
        net.apply_ext("Input", &input).unwrap();
        net.apply_ext("Output", &target).unwrap();
        net.run_alpha_trial(&mut ctx, true).unwrap();
    }

    assert_eq!(ctx.trial, 3);
    assert_eq!(net.stats().trials, 3);
    assert_eq!(net.stats().cycles, 3 * 4 * 10);
    assert_eq!(net.stats().step(Step::DWt).calls, 3);
    assert_eq!(net.stats().worker_busy.len(), 2);
    assert_eq!(net.pathway("InputToHidden").unwrap().learn.lrate, 0.05);

    // hard-clamped inputs sit at their external values, capped by the clamp range
    let acts = net.layer("Input").unwrap().unit_values(NeuronVar::Act);
    for (a, e) in acts.iter().zip(&input) {
        assert!((a - e.min(0.95)).abs() < 1e-6, "act {} ext {}", a, e);
    }
}

#[test]
fn test_same_seed_same_weights() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[engine]\nseed = 99\n");
    let cfg = load_config(Some(&path), None).unwrap();

    let mut a = three_layer_net();
    let mut b = three_layer_net();
    a.apply_config(&cfg).unwrap();
    b.apply_config(&cfg).unwrap();
    a.init_weights().unwrap();
    b.init_weights().unwrap();
    assert_eq!(a.weights(), b.weights());
}

#[test]
fn test_invalid_config_rejected_before_apply() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[engine]\nthreads = 0\n\n[activation]\ndecay = 1.5\n");
    let cfg = load_config(Some(&path), None).unwrap();

    match validate_config(&cfg) {
        Err(ConfigError::ValidationError(msg)) => {
            assert!(msg.contains("threads"), "{}", msg);
            assert!(msg.contains("decay"), "{}", msg);
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    let mut net = three_layer_net();
    assert!(matches!(net.apply_config(&cfg), Err(EngineError::Config(_))));
    assert_eq!(net.threads(), 1);
}

#[test]
fn test_malformed_toml() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[engine\nthreads = ");
    assert!(matches!(
        load_config(Some(&path), None),
        Err(ConfigError::ParseError(_))
    ));
}
