// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! # Leabra Pathway Runtime
//!
//! Storage and index structures shared by every pathway.
//!
//! This crate provides:
//! - **Traits**: `SynapseStorage` (struct-of-arrays synapse fields),
//!   `ConnectivityPattern` (external connection generator)
//! - **Std Implementation**: `SynapseArray`, plus the `FullConnect` and
//!   `OneToOne` reference patterns
//! - **Index**: `PathwayIndex`, the mirrored send / recv CSR views
//!
//! ## Usage
//!
//! ```rust
//! use leabra_npu_neural::Shape;
//! use leabra_npu_runtime::{FullConnect, PathwayIndex, SynapseArray, SynapseStorage};
//!
//! let send = Shape::new(&[3]).unwrap();
//! let recv = Shape::new(&[2]).unwrap();
//! let index = PathwayIndex::build(&FullConnect::new(), &send, &recv, false).unwrap();
//! let syns = SynapseArray::new(index.num_syns());
//! assert_eq!(syns.count(), 6);
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod index;
pub mod std_impl;
pub mod traits;

pub use error::{ConDirection, Result, RuntimeError};
pub use index::{ConStats, PathwayIndex};
pub use std_impl::{FullConnect, OneToOne, SynapseArray};
pub use traits::{Connectivity, ConnectivityPattern, SynapseColumnsMut, SynapseStorage};
