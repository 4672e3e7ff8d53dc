// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Leabra Plasticity Kernels
//!
//! Pathway-level learning over any [`SynapseStorage`]:
//! - XCAL weight changes (error-driven + BCM) with normalization and momentum
//! - Weight commit with soft bounding and sigmoidal contrast
//! - Periodic weight balance per receiver
//! - Initial weights and reciprocal-pathway symmetry
//!
//! ## Architecture
//! - Kernels take the pathway index and the sending / receiving unit slices
//!   explicitly; nothing here holds a reference back to a layer
//! - The weight commit is synapse-independent and runs on rayon for large pathways
//!
//! [`SynapseStorage`]: leabra_npu_runtime::SynapseStorage

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod balance;
pub mod commit;
pub mod dwt;
pub mod init;

pub use balance::wt_bal_from_wt;
pub use commit::{wt_from_dwt, PAR_COMMIT_THRESHOLD};
pub use dwt::dwt;
pub use init::{init_weights, init_wt_sym};
