// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unit activation: conductance integration, membrane potential and rate code

pub mod act;
pub mod nxx1;

pub use act::{ActParams, Chans, ClampParams, DtParams, InitParams, OptThreshParams};
pub use nxx1::Nxx1Params;
