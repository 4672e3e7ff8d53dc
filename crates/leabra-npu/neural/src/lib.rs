// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Leabra Neural Computation
//!
//! Everything that operates on a single unit or a single synapse:
//! - **Types**: unit state, flags, average/max accumulators, shapes, errors
//! - **Vars**: name tables and indexed accessors for unit and synapse variables
//! - **Activation**: noisy-XX1 rate code, conductance integration, clamping
//! - **Inhibition**: FFFB pooled inhibition, self-inhibition, running layer averages
//! - **Learning**: running activation averages, XCAL, weight contrast, normalization,
//!   momentum, weight balance, conductance scaling and weight initialization
//!
//! Nothing here knows about layers or pathways; those live in the runtime and
//! engine crates.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod activation;
pub mod inhibition;
pub mod learning;
pub mod types;
pub mod vars;

pub use activation::{ActParams, Chans, ClampParams, DtParams, InitParams, Nxx1Params, OptThreshParams};
pub use inhibition::{ActAvgParams, FffbParams, Inhib, InhibParams, SelfInhibParams};
pub use learning::{
    AvgLParams, CosDiffParams, CosDiffStats, DWtNormParams, LearnNeurParams, LearnSynParams,
    LrnActAvgParams, MomentumParams, WtBalParams, WtBalRecv, WtDist, WtInitParams, WtScaleParams,
    WtSigParams, XCalParams,
};
pub use types::{AvgMax, NeuralError, Neuron, NeuronFlags, Result, Shape};
pub use vars::{NeuronVar, SynapseVar};
