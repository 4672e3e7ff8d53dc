// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Learning rules: unit-level averages and synapse-level XCAL updates

pub mod neuron;
pub mod scale;
pub mod synapse;

pub use neuron::{AvgLParams, CosDiffParams, CosDiffStats, LearnNeurParams, LrnActAvgParams};
pub use scale::{WtDist, WtInitParams, WtScaleParams};
pub use synapse::{
    sig_fun, sig_inv_fun, DWtNormParams, LearnSynParams, MomentumParams, WtBalParams, WtBalRecv,
    WtSigParams, XCalParams,
};
