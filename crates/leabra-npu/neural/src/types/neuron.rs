// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Rate-coded unit state

use serde::{Deserialize, Serialize};

/// Per-unit status bits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeuronFlags(u8);

impl NeuronFlags {
    /// Unit is lesioned and skipped by every computation
    pub const OFF: NeuronFlags = NeuronFlags(1 << 0);
    /// `ext` holds an external input
    pub const HAS_EXT: NeuronFlags = NeuronFlags(1 << 1);
    /// `targ` holds a training target
    pub const HAS_TARG: NeuronFlags = NeuronFlags(1 << 2);
    /// `targ` holds a comparison value (not clamped)
    pub const HAS_CMPR: NeuronFlags = NeuronFlags(1 << 3);
    /// All external-input bits
    pub const EXT_MASK: NeuronFlags =
        NeuronFlags(Self::HAS_EXT.0 | Self::HAS_TARG.0 | Self::HAS_CMPR.0);

    pub const fn empty() -> Self {
        NeuronFlags(0)
    }

    #[inline]
    pub fn contains(self, other: NeuronFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: NeuronFlags) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: NeuronFlags) {
        self.0 &= !other.0;
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

/// State of one unit
///
/// Field groups: activation and conductances, running averages used by
/// learning, phase snapshots, and the delta-send bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Neuron {
    pub flags: NeuronFlags,
    /// Sub-pool index (0 = whole layer)
    pub sub_pool: usize,

    /// Rate-code activation
    pub act: f32,
    /// Activation without adaptation currents, drives learning averages
    pub act_lrn: f32,
    /// Integrated excitatory conductance
    pub ge: f32,
    /// Total inhibitory conductance (pool + self + synaptic)
    pub gi: f32,
    /// Adaptation (potassium) conductance
    pub gk: f32,
    /// Net current
    pub inet: f32,
    /// Membrane potential
    pub vm: f32,

    /// Target value, for Target / Compare layers
    pub targ: f32,
    /// External input value
    pub ext: f32,

    pub avg_ss: f32,
    pub avg_s: f32,
    pub avg_m: f32,
    pub avg_l: f32,
    /// AvgL-based BCM learning rate factor
    pub avg_l_lrn: f32,
    /// Mix of AvgS and AvgM used as the short-term learning signal
    pub avg_s_lrn: f32,

    pub act_q0: f32,
    pub act_q1: f32,
    pub act_q2: f32,
    /// Minus-phase activation
    pub act_m: f32,
    /// Plus-phase activation
    pub act_p: f32,
    pub act_dif: f32,
    pub act_del: f32,
    /// Slow running average of plus-phase activation
    pub act_avg: f32,

    /// Integrated synaptic inhibition
    pub gi_syn: f32,
    pub gi_self: f32,

    /// Last activation value sent to receivers
    pub act_sent: f32,
    pub ge_raw: f32,
    pub gi_raw: f32,
    pub ge_inc: f32,
    pub gi_inc: f32,
}

impl Neuron {
    #[inline]
    pub fn is_off(&self) -> bool {
        self.flags.contains(NeuronFlags::OFF)
    }

    #[inline]
    pub fn has_flag(&self, flag: NeuronFlags) -> bool {
        self.flags.contains(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: NeuronFlags) {
        self.flags.insert(flag);
    }

    #[inline]
    pub fn clear_flag(&mut self, flag: NeuronFlags) {
        self.flags.remove(flag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags() {
        let mut n = Neuron::default();
        assert!(!n.is_off());
        n.set_flag(NeuronFlags::HAS_EXT);
        n.set_flag(NeuronFlags::OFF);
        assert!(n.is_off());
        assert!(n.has_flag(NeuronFlags::HAS_EXT));

        n.clear_flag(NeuronFlags::EXT_MASK);
        assert!(!n.has_flag(NeuronFlags::HAS_EXT));
        assert!(n.is_off());
    }
}
