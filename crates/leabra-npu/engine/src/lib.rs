// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! # Leabra Network Engine
//!
//! Layers, pathways and the scheduler that drives them.
//!
//! This crate provides:
//! - **Layer**: units, pools, per-unit cycle steps, phase snapshots, statistics
//! - **Pathway**: synapses, CSR views, delta-send accumulator, learning calls
//! - **Network**: construction, parameter and config application, the
//!   quarter / cycle scheduler, weight snapshots, lesioning
//! - **WorkerPool**: persistent workers with a static layer assignment
//! - **Context**: time counters passed to every update
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use leabra_npu_engine::{Context, LayerKind, Network, PathwayKind};
//! use leabra_npu_runtime::FullConnect;
//!
//! let mut net = Network::new("demo");
//! net.add_layer("Input", &[5, 5], LayerKind::Input).unwrap();
//! net.add_layer("Output", &[5, 5], LayerKind::Target).unwrap();
//! net.connect_layers("Input", "Output", Arc::new(FullConnect::new()), PathwayKind::Excite)
//!     .unwrap();
//! net.build().unwrap();
//! net.init_weights().unwrap();
//!
//! let mut ctx = Context::new();
//! net.apply_ext("Input", &[1.0; 25]).unwrap();
//! net.run_alpha_trial(&mut ctx, true).unwrap();
//! assert_eq!(ctx.cycle, 100);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod context;
pub mod error;
pub mod layer;
pub mod network;
pub mod pathway;
pub mod pool;
pub mod stats;
mod trace;
pub mod weights;
pub mod worker_pool;

pub use context::{Context, QUARTERS_PER_TRIAL};
pub use error::{EngineError, Result};
pub use layer::{Layer, LayerKind};
pub use network::{Network, NetworkState, DEFAULT_WT_BAL_INTERVAL};
pub use pathway::{Pathway, PathwayKind};
pub use pool::{ActAvgState, Pool};
pub use stats::{EngineStats, Step, StepTiming};
pub use weights::{LayerWeights, NetworkWeights, PathwayWeights, RecvWeights};
pub use worker_pool::{assign_layers, LayerJob, WorkerPool};
