// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Standard synapse array implementation
//!
//! One `Vec<f32>` per field, all the same length.

use serde::{Deserialize, Serialize};

use crate::traits::{SynapseColumnsMut, SynapseStorage};

/// Dynamic synapse array for a single pathway
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynapseArray {
    /// Effective weights (`scale * sig(lwt)`)
    pub wt: Vec<f32>,

    /// Linear weights, learning happens here
    pub lwt: Vec<f32>,

    /// Pending weight changes
    pub dwt: Vec<f32>,

    /// Decaying max of |dwt|
    pub norm: Vec<f32>,

    /// Momentum accumulator
    pub moment: Vec<f32>,

    /// Fixed per-synapse multiplier on the effective weight
    pub scale: Vec<f32>,
}

impl SynapseArray {
    /// Create `n` zeroed synapses with scale 1
    pub fn new(n: usize) -> Self {
        let mut arr = Self::default();
        arr.resize(n);
        arr
    }
}

impl SynapseStorage for SynapseArray {
    // Read-only property accessors
    fn wt(&self) -> &[f32] {
        &self.wt
    }

    fn lwt(&self) -> &[f32] {
        &self.lwt
    }

    fn dwt(&self) -> &[f32] {
        &self.dwt
    }

    fn norm(&self) -> &[f32] {
        &self.norm
    }

    fn moment(&self) -> &[f32] {
        &self.moment
    }

    fn scale(&self) -> &[f32] {
        &self.scale
    }

    // Mutable property accessors
    fn wt_mut(&mut self) -> &mut [f32] {
        &mut self.wt
    }

    fn lwt_mut(&mut self) -> &mut [f32] {
        &mut self.lwt
    }

    fn dwt_mut(&mut self) -> &mut [f32] {
        &mut self.dwt
    }

    fn scale_mut(&mut self) -> &mut [f32] {
        &mut self.scale
    }

    fn columns_mut(&mut self) -> SynapseColumnsMut<'_> {
        SynapseColumnsMut {
            wt: &mut self.wt,
            lwt: &mut self.lwt,
            dwt: &mut self.dwt,
            norm: &mut self.norm,
            moment: &mut self.moment,
            scale: &mut self.scale,
        }
    }

    // Metadata
    fn count(&self) -> usize {
        self.wt.len()
    }

    fn resize(&mut self, n: usize) {
        for col in [
            &mut self.wt,
            &mut self.lwt,
            &mut self.dwt,
            &mut self.norm,
            &mut self.moment,
        ] {
            col.clear();
            col.resize(n, 0.0);
        }
        self.scale.clear();
        self.scale.resize(n, 1.0);
    }
}
