// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Leabra - rate-coded neural network engine
//!
//! Leabra networks are layers of point-neuron units connected by
//! bidirectional pathways. Each trial is an alpha cycle of four quarters:
//! three minus-phase quarters where the network settles on its own
//! expectation, and a plus-phase quarter where targets are clamped. Learning
//! combines the error between the phases with a Hebbian-like term (XCAL).
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! leabra = "0.1"
//! ```
//!
//! ```rust
//! use leabra::prelude::*;
//! use std::sync::Arc;
//!
//! let mut net = Network::new("pattern-assoc");
//! net.add_layer("Input", &[2, 2], LayerKind::Input)?;
//! net.add_layer("Output", &[2, 2], LayerKind::Target)?;
//! net.connect_layers("Input", "Output", Arc::new(FullConnect::new()), PathwayKind::Excite)?;
//! net.build()?;
//! net.init_weights()?;
//!
//! let mut ctx = Context::new();
//! net.apply_ext("Input", &[1.0, 0.0, 0.0, 1.0])?;
//! net.apply_ext("Output", &[0.0, 1.0, 1.0, 0.0])?;
//! net.run_alpha_trial(&mut ctx, true)?;
//! # Ok::<(), leabra::engine::EngineError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: leabra-config, leabra-observability        │
//! │  (TOML config, logging setup)                           │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Neural: leabra-npu-neural                              │
//! │  (Unit state, parameter blocks, per-unit math)          │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Runtime + Plasticity                                   │
//! │  (Synapse storage, connectivity, learning kernels)      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Engine: leabra-npu-engine                              │
//! │  (Layers, pathways, scheduler, worker pool)             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use leabra_config as config;
pub use leabra_observability as observability;

// Re-export the NPU stack
pub use leabra_npu_engine as engine;
pub use leabra_npu_neural as neural;
pub use leabra_npu_plasticity as plasticity;
pub use leabra_npu_runtime as runtime;

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{load_config, validate_config, LeabraConfig};
    pub use crate::engine::{
        Context, EngineError, EngineStats, Layer, LayerKind, Network, NetworkWeights, Pathway,
        PathwayKind, Step,
    };
    pub use crate::neural::{NeuronVar, Shape, SynapseVar};
    pub use crate::runtime::{ConnectivityPattern, FullConnect, OneToOne};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        use crate::prelude::*;
        let net = Network::new("facade");
        assert_eq!(net.num_layers(), 0);
        assert_eq!(NeuronVar::from_name("Act").unwrap(), NeuronVar::Act);
    }
}
