// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Core type definitions

pub mod avg_max;
pub mod error;
pub mod neuron;
pub mod shape;

pub use avg_max::AvgMax;
pub use error::{NeuralError, Result};
pub use neuron::{Neuron, NeuronFlags};
pub use shape::Shape;
