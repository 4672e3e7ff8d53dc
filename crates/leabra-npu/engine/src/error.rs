// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Engine error types

use leabra_npu_neural::NeuralError;
use leabra_npu_runtime::RuntimeError;
use thiserror::Error;

/// Errors raised by network construction, access and scheduling
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// One message per pathway that failed to build
    #[error("Network build failed:\n  - {}", .0.join("\n  - "))]
    Build(Vec<String>),

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Pathway not found: {0}")]
    PathwayNotFound(String),

    #[error("Duplicate layer name: {0}")]
    DuplicateLayer(String),

    #[error("Network is not built")]
    NotBuilt,

    #[error("Network state is shared with running workers")]
    Busy,

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Neural(#[from] NeuralError),

    #[error("Worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    #[error("Worker pool is stopped")]
    WorkerPoolStopped,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_lists_every_pathway() {
        let err = EngineError::Build(vec!["a -> b: bad".into(), "c -> d: worse".into()]);
        let msg = err.to_string();
        assert!(msg.contains("a -> b: bad"));
        assert!(msg.contains("c -> d: worse"));
    }

    #[test]
    fn test_runtime_error_converts() {
        let err: EngineError = RuntimeError::NotConnected { send: 1, recv: 2 }.into();
        assert!(matches!(err, EngineError::Runtime(_)));
    }
}
