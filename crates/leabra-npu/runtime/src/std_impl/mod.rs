// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Standard (Vec-backed) implementations
//!
//! - `SynapseArray`: the default `SynapseStorage`
//! - `FullConnect`, `OneToOne`: reference connectivity patterns

pub mod patterns;
pub mod synapse_array;

pub use patterns::{FullConnect, OneToOne};
pub use synapse_array::SynapseArray;
