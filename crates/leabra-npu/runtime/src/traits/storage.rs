// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synapse storage trait: struct-of-arrays over the six synapse fields
//!
//! Synapses are stored in sender order. Kernels that need several fields
//! mutably at once take a [`SynapseColumnsMut`] split borrow.

use leabra_npu_neural::SynapseVar;

use crate::error::{Result, RuntimeError};

/// Simultaneous mutable views of every synapse field
pub struct SynapseColumnsMut<'a> {
    pub wt: &'a mut [f32],
    pub lwt: &'a mut [f32],
    pub dwt: &'a mut [f32],
    pub norm: &'a mut [f32],
    pub moment: &'a mut [f32],
    pub scale: &'a mut [f32],
}

/// Synapse storage trait
///
/// # Design Notes
///
/// - Slice-based API for zero-copy batch access
/// - Mutations are explicit via `_mut()` methods
/// - Named access goes through [`SynapseVar`] so callers never compute offsets
pub trait SynapseStorage: Send + Sync {
    // === Synapse Properties (Read-Only) ===

    /// Effective weights
    fn wt(&self) -> &[f32];

    /// Linear weights
    fn lwt(&self) -> &[f32];

    /// Pending weight changes
    fn dwt(&self) -> &[f32];

    /// Normalization accumulators
    fn norm(&self) -> &[f32];

    /// Momentum accumulators
    fn moment(&self) -> &[f32];

    /// Per-synapse scale factors
    fn scale(&self) -> &[f32];

    // === Mutable Access ===

    fn wt_mut(&mut self) -> &mut [f32];

    fn lwt_mut(&mut self) -> &mut [f32];

    fn dwt_mut(&mut self) -> &mut [f32];

    fn scale_mut(&mut self) -> &mut [f32];

    /// Split borrow of every field
    fn columns_mut(&mut self) -> SynapseColumnsMut<'_>;

    // === Metadata ===

    /// Number of synapses stored
    fn count(&self) -> usize;

    /// Reset to `n` zeroed synapses with scale 1
    fn resize(&mut self, n: usize);

    // === Named Access ===

    /// Field slice for a variable
    fn column(&self, var: SynapseVar) -> &[f32] {
        match var {
            SynapseVar::Wt => self.wt(),
            SynapseVar::LWt => self.lwt(),
            SynapseVar::DWt => self.dwt(),
            SynapseVar::Norm => self.norm(),
            SynapseVar::Moment => self.moment(),
            SynapseVar::Scale => self.scale(),
        }
    }

    /// Value of one variable at synapse `idx`
    fn value(&self, var: SynapseVar, idx: usize) -> Result<f32> {
        let col = self.column(var);
        col.get(idx).copied().ok_or(RuntimeError::IndexOutOfRange {
            index: idx,
            len: col.len(),
        })
    }

    /// Set one variable at synapse `idx`
    fn set_value(&mut self, var: SynapseVar, idx: usize, val: f32) -> Result<()> {
        let len = self.count();
        if idx >= len {
            return Err(RuntimeError::IndexOutOfRange { index: idx, len });
        }
        let cols = self.columns_mut();
        let col = match var {
            SynapseVar::Wt => cols.wt,
            SynapseVar::LWt => cols.lwt,
            SynapseVar::DWt => cols.dwt,
            SynapseVar::Norm => cols.norm,
            SynapseVar::Moment => cols.moment,
            SynapseVar::Scale => cols.scale,
        };
        col[idx] = val;
        Ok(())
    }
}
