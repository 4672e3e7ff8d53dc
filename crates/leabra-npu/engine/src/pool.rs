// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Inhibitory pools: contiguous unit ranges with shared inhibition

use leabra_npu_neural::{AvgMax, Inhib};
use serde::{Deserialize, Serialize};

/// Running averages of a pool's phase activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActAvgState {
    pub act_m_avg: f32,
    pub act_p_avg: f32,
    /// Effective plus-phase average used for conductance scaling
    pub act_p_avg_eff: f32,
}

/// One pool of units
///
/// Pool 0 covers the whole layer; sub-pools of a 4D layer partition it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub start: usize,
    pub end: usize,
    pub inhib: Inhib,
    /// Activity statistics at the end of the minus phase
    pub act_m: AvgMax,
    /// Activity statistics at the end of the plus phase
    pub act_p: AvgMax,
    pub act_avg: ActAvgState,
}

impl Pool {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            ..Default::default()
        }
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}
