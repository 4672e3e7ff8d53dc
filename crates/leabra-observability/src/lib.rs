// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # leabra-observability
//!
//! Logging setup shared by the Leabra engine binaries and tests, with
//! per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: write a timestamped run directory next to console output

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known Leabra crate names for debug flags
///
/// Each name is also the tracing target its crate logs under.
pub const KNOWN_CRATES: &[&str] = &[
    "leabra",
    "leabra-config",
    "leabra-npu-neural",
    "leabra-npu-runtime",
    "leabra-npu-plasticity",
    "leabra-npu-engine",
];
