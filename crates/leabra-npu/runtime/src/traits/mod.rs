// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Storage and connectivity abstractions for pathways
//!
//! - `SynapseStorage`: struct-of-arrays access to per-synapse fields
//! - `ConnectivityPattern`: the external generator a pathway is built from

pub mod connectivity;
pub mod storage;

pub use connectivity::{ConnectivityPattern, Connectivity};
pub use storage::{SynapseColumnsMut, SynapseStorage};
