// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Connectivity generator interface

use leabra_npu_neural::Shape;

/// Output of a connectivity generator
///
/// `cons` is receiver-major: bit `recv * send_len + send` is set when the
/// sender connects to the receiver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connectivity {
    pub send_n: Vec<usize>,
    pub recv_n: Vec<usize>,
    pub cons: Vec<bool>,
}

/// Generates the connection mask between two layer shapes
///
/// Called once per pathway at build time; the result is validated by
/// [`crate::PathwayIndex::build`].
pub trait ConnectivityPattern: Send + Sync + std::fmt::Debug {
    /// Pattern name for logging
    fn name(&self) -> &'static str;

    /// `same` is true when sender and receiver are the same layer
    fn connect(&self, send: &Shape, recv: &Shape, same: bool) -> Connectivity;
}
