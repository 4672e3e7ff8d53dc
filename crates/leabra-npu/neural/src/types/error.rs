// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for unit and synapse level operations

/// Errors from variable lookup, indexing and shape construction
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NeuralError {
    #[error("unknown variable name: {0}")]
    UnknownVariable(String),

    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid shape: {0}")]
    InvalidShape(String),
}

pub type Result<T> = core::result::Result<T, NeuralError>;
