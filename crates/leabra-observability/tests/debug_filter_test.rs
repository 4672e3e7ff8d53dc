// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Debug flags must raise events emitted under the crate targets.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use leabra_observability::CrateDebugFlags;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{EnvFilter, Layer, Registry};

struct CountingLayer(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for CountingLayer {
    fn on_event(&self, _event: &Event<'_>, _ctx: Context<'_, S>) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn count_events(args: &[&str], emit: impl FnOnce()) -> usize {
    let flags = CrateDebugFlags::from_args(args.iter().map(|a| a.to_string()));
    let seen = Arc::new(AtomicUsize::new(0));
    let subscriber = Registry::default()
        .with(EnvFilter::new(flags.to_filter_string("info")))
        .with(CountingLayer(seen.clone()));
    tracing::subscriber::with_default(subscriber, emit);
    seen.load(Ordering::SeqCst)
}

#[test]
fn test_engine_flag_enables_engine_debug() {
    let seen = count_events(&["--debug-leabra-npu-engine"], || {
        tracing::debug!(target: "leabra-npu-engine", "[WORKERS] stopped");
    });
    assert_eq!(seen, 1);
}

#[test]
fn test_debug_all_enables_plasticity_debug() {
    let seen = count_events(&["--debug-all"], || {
        tracing::debug!(target: "leabra-npu-plasticity", "[WTBAL] layer 0");
    });
    assert_eq!(seen, 1);
}

#[test]
fn test_debug_stays_off_without_flag() {
    let seen = count_events(&["--debug-leabra-npu-runtime"], || {
        tracing::debug!(target: "leabra-npu-engine", "[NET] quiet");
        tracing::info!(target: "leabra-npu-engine", "[NET] built");
    });
    assert_eq!(seen, 1);
}
