// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Weight snapshots
//!
//! Plain serde types describing every learned value of a network. The
//! engine produces and consumes them; writing them anywhere is up to the
//! caller.

use serde::{Deserialize, Serialize};

use crate::pathway::PathwayKind;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkWeights {
    pub network: String,
    pub layers: Vec<LayerWeights>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerWeights {
    pub layer: String,
    /// Running average of the minus-phase pool activity
    pub act_m_avg: f32,
    /// Running average of the plus-phase pool activity
    pub act_p_avg: f32,
    /// Incoming pathways
    pub pathways: Vec<PathwayWeights>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathwayWeights {
    /// Sending layer name
    pub from: String,
    #[serde(default)]
    pub kind: PathwayKind,
    pub g_scale: f32,
    pub recvs: Vec<RecvWeights>,
}

/// Incoming weights of one receiving unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecvWeights {
    pub ri: usize,
    /// Sending unit of each weight
    pub si: Vec<usize>,
    pub wt: Vec<f32>,
}

impl NetworkWeights {
    pub fn layer(&self, name: &str) -> Option<&LayerWeights> {
        self.layers.iter().find(|l| l.layer == name)
    }

    /// Total number of weights in the snapshot
    pub fn num_weights(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|l| &l.pathways)
            .flat_map(|p| &p.recvs)
            .map(|r| r.wt.len())
            .sum()
    }
}
