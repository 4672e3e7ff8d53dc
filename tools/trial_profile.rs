// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Trial Profiler

Builds a four-layer network, runs timed training trials at several worker
counts and prints per-step timings and worker utilization.

Usage:
  cargo run --release --bin trial_profile -- [--config <path>] [--units <n>]
      [--trials <n>] [--threads <a,b,c>] [--json <path>] [--debug-<crate>]

Without `--config` the usual config discovery applies; when no file is
found the built-in defaults are used.
*/

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context as _, Result};
use leabra::config::{
    apply_environment_overrides, find_config_file, load_config, validate_config, LeabraConfig,
};
use leabra::engine::{Context, LayerKind, Network, PathwayKind, Step};
use leabra::observability::{
    debug_flags_help, init_logging, parse_debug_flags, LogLevel, LoggingOptions,
};
use leabra::runtime::FullConnect;
use serde_json::json;
use tracing::{info, warn};

struct Args {
    config: Option<PathBuf>,
    units: usize,
    trials: usize,
    threads: Vec<usize>,
    json: Option<PathBuf>,
}

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: trial_profile [--config <path>] [--units <n>] [--trials <n>] \
         [--threads <a,b,c>] [--json <path>]\n\n\
         Defaults:\n\
         - units: 400 per layer\n\
         - trials: 20\n\
         - threads: 1,2,4\n\n{}",
        debug_flags_help()
    );
    process::exit(2);
}

fn parse_num(v: Option<String>) -> usize {
    v.and_then(|s| s.parse().ok())
        .filter(|&n: &usize| n > 0)
        .unwrap_or_else(|| usage_and_exit())
}

fn parse_args() -> Args {
    let mut out = Args {
        config: None,
        units: 400,
        trials: 20,
        threads: vec![1, 2, 4],
        json: None,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => out.config = Some(PathBuf::from(args.next().unwrap_or_else(|| usage_and_exit()))),
            "--json" => out.json = Some(PathBuf::from(args.next().unwrap_or_else(|| usage_and_exit()))),
            "--units" => out.units = parse_num(args.next()),
            "--trials" => out.trials = parse_num(args.next()),
            "--threads" => {
                let list = args.next().unwrap_or_else(|| usage_and_exit());
                out.threads = list.split(',').map(|s| parse_num(Some(s.trim().to_string()))).collect();
            }
            "-h" | "--help" => usage_and_exit(),
            // consumed by parse_debug_flags
            other if other.starts_with("--debug-") => {}
            other => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
        }
    }
    out
}

fn load(args: &Args) -> Result<LeabraConfig> {
    let path = match &args.config {
        Some(p) => Some(p.clone()),
        None => find_config_file().ok(),
    };
    let cfg = match path {
        Some(p) => load_config(Some(&p), None).with_context(|| format!("loading {}", p.display()))?,
        None => {
            let mut cfg = LeabraConfig::default();
            apply_environment_overrides(&mut cfg);
            cfg
        }
    };
    validate_config(&cfg).context("invalid configuration")?;
    Ok(cfg)
}

fn build_network(cfg: &LeabraConfig, units: usize, threads: usize) -> Result<Network> {
    let side = ((units as f64).sqrt() as usize).max(2);
    let half = (side / 2).max(1);
    let mut net = Network::new("profile");
    net.add_layer("Input", &[side, side], LayerKind::Input)?;
    net.add_layer("Hidden1", &[2, 2, half, half], LayerKind::Hidden)?;
    net.add_layer("Hidden2", &[side, side], LayerKind::Hidden)?;
    net.add_layer("Output", &[side, side], LayerKind::Target)?;
    let full = Arc::new(FullConnect::new());
    for (s, r) in [
        ("Input", "Hidden1"),
        ("Hidden1", "Hidden2"),
        ("Hidden2", "Hidden1"),
        ("Hidden2", "Output"),
        ("Output", "Hidden2"),
    ] {
        net.connect_layers(s, r, full.clone(), PathwayKind::Excite)?;
    }
    net.build()?;

    let mut cfg = cfg.clone();
    cfg.engine.threads = threads;
    net.apply_config(&cfg)?;
    net.init_weights()?;
    Ok(net)
}

fn pattern(n: usize, phase: usize) -> Vec<f32> {
    (0..n).map(|i| if (i + phase) % 4 == 0 { 1.0 } else { 0.0 }).collect()
}

fn main() -> Result<()> {
    let args = parse_args();
    let cfg = load(&args)?;

    let options = LoggingOptions {
        level: cfg.logging.level.parse().unwrap_or(LogLevel::Info),
        ..LoggingOptions::default()
    };
    let _guard = init_logging(&parse_debug_flags(), &options)?;

    info!(
        "[PROFILE] units/layer={} trials={} threads={:?} cycles/quarter={}",
        args.units, args.trials, args.threads, cfg.engine.cycles_per_quarter
    );

    let mut runs = Vec::new();
    for &threads in &args.threads {
        let mut net = build_network(&cfg, args.units, threads)?;
        let n_in = net.layer("Input")?.len();
        let n_out = net.layer("Output")?.len();
        let mut ctx = Context::from_config(&cfg.engine);

        let start = Instant::now();
        for t in 0..args.trials {
            net.init_ext();
            net.apply_ext("Input", &pattern(n_in, t))?;
            net.apply_ext("Output", &pattern(n_out, t + 1))?;
            net.run_alpha_trial(&mut ctx, true)?;
        }
        let wall = start.elapsed();
        let stats = net.stats();
        let sse = net.layer("Output")?.sse(0.5);

        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!(
            "threads={} trials={} cycles={} wall={:.3}s trial={:.3}ms last_sse={:.3}",
            threads,
            stats.trials,
            stats.cycles,
            wall.as_secs_f64(),
            wall.as_secs_f64() * 1e3 / args.trials as f64,
            sse
        );
        let mut steps = serde_json::Map::new();
        for step in Step::ALL {
            let timing = stats.step(step);
            let Some(avg) = stats.avg_step_time(step) else {
                continue;
            };
            println!(
                "  {:<12} calls={:<7} total={:>9.3}ms avg={:>8.2}us",
                step.name(),
                timing.calls,
                timing.total.as_secs_f64() * 1e3,
                avg.as_secs_f64() * 1e6
            );
            steps.insert(
                step.name().to_string(),
                json!({ "calls": timing.calls, "total_ns": timing.total.as_nanos() as u64 }),
            );
        }
        let util = stats.worker_utilization();
        if !util.is_empty() {
            let shown: Vec<String> = util.iter().map(|u| format!("{:.0}%", u * 100.0)).collect();
            println!("  workers: {}", shown.join(" "));
            if util.iter().any(|&u| u < 0.25) {
                warn!("[PROFILE] threads={}: some workers are mostly idle", threads);
            }
        }

        runs.push(json!({
            "threads": threads,
            "trials": stats.trials,
            "cycles": stats.cycles,
            "wall_ns": wall.as_nanos() as u64,
            "avg_cycle_ns": stats.avg_cycle_time().map(|d| d.as_nanos() as u64),
            "steps": steps,
            "worker_utilization": util,
        }));
    }

    if let Some(path) = &args.json {
        let report = json!({ "units_per_layer": args.units, "runs": runs });
        fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("[PROFILE] report written to {}", path.display());
    }
    Ok(())
}
