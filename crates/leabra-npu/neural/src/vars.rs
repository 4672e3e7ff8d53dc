// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Named access to unit and synapse variables
//!
//! Each variable is an enum variant with a fixed index; names are resolved
//! through a process-wide table built on first use.

use std::sync::OnceLock;

use ahash::AHashMap;

use crate::types::{NeuralError, Neuron, Result};

macro_rules! var_enum {
    ($(#[$meta:meta])* $name:ident, $table:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variable, in index order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Variable names, in index order
            pub const NAMES: &'static [&'static str] = &[$($label),+];

            pub fn name(self) -> &'static str {
                Self::NAMES[self as usize]
            }

            pub fn index(self) -> usize {
                self as usize
            }

            pub fn from_index(idx: usize) -> Result<Self> {
                Self::ALL
                    .get(idx)
                    .copied()
                    .ok_or(NeuralError::IndexOutOfRange { index: idx, len: Self::ALL.len() })
            }

            /// Resolve a variable by name
            pub fn from_name(name: &str) -> Result<Self> {
                static $table: OnceLock<AHashMap<&'static str, $name>> = OnceLock::new();
                let table = $table.get_or_init(|| {
                    Self::ALL.iter().map(|&v| (v.name(), v)).collect()
                });
                table
                    .get(name)
                    .copied()
                    .ok_or_else(|| NeuralError::UnknownVariable(name.to_string()))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

var_enum!(
    /// Unit-level state variables
    NeuronVar, NEURON_VAR_TABLE {
        Act => "Act",
        ActLrn => "ActLrn",
        Ge => "Ge",
        Gi => "Gi",
        Gk => "Gk",
        Inet => "Inet",
        Vm => "Vm",
        Targ => "Targ",
        Ext => "Ext",
        AvgSS => "AvgSS",
        AvgS => "AvgS",
        AvgM => "AvgM",
        AvgL => "AvgL",
        AvgLLrn => "AvgLLrn",
        AvgSLrn => "AvgSLrn",
        ActQ0 => "ActQ0",
        ActQ1 => "ActQ1",
        ActQ2 => "ActQ2",
        ActM => "ActM",
        ActP => "ActP",
        ActDif => "ActDif",
        ActDel => "ActDel",
        ActAvg => "ActAvg",
        GiSyn => "GiSyn",
        GiSelf => "GiSelf",
        ActSent => "ActSent",
        GeRaw => "GeRaw",
        GiRaw => "GiRaw",
        GeInc => "GeInc",
        GiInc => "GiInc",
    }
);

var_enum!(
    /// Synapse-level state variables
    SynapseVar, SYNAPSE_VAR_TABLE {
        Wt => "Wt",
        LWt => "LWt",
        DWt => "DWt",
        Norm => "Norm",
        Moment => "Moment",
        Scale => "Scale",
    }
);

impl Neuron {
    /// Read one variable
    pub fn var(&self, var: NeuronVar) -> f32 {
        match var {
            NeuronVar::Act => self.act,
            NeuronVar::ActLrn => self.act_lrn,
            NeuronVar::Ge => self.ge,
            NeuronVar::Gi => self.gi,
            NeuronVar::Gk => self.gk,
            NeuronVar::Inet => self.inet,
            NeuronVar::Vm => self.vm,
            NeuronVar::Targ => self.targ,
            NeuronVar::Ext => self.ext,
            NeuronVar::AvgSS => self.avg_ss,
            NeuronVar::AvgS => self.avg_s,
            NeuronVar::AvgM => self.avg_m,
            NeuronVar::AvgL => self.avg_l,
            NeuronVar::AvgLLrn => self.avg_l_lrn,
            NeuronVar::AvgSLrn => self.avg_s_lrn,
            NeuronVar::ActQ0 => self.act_q0,
            NeuronVar::ActQ1 => self.act_q1,
            NeuronVar::ActQ2 => self.act_q2,
            NeuronVar::ActM => self.act_m,
            NeuronVar::ActP => self.act_p,
            NeuronVar::ActDif => self.act_dif,
            NeuronVar::ActDel => self.act_del,
            NeuronVar::ActAvg => self.act_avg,
            NeuronVar::GiSyn => self.gi_syn,
            NeuronVar::GiSelf => self.gi_self,
            NeuronVar::ActSent => self.act_sent,
            NeuronVar::GeRaw => self.ge_raw,
            NeuronVar::GiRaw => self.gi_raw,
            NeuronVar::GeInc => self.ge_inc,
            NeuronVar::GiInc => self.gi_inc,
        }
    }

    /// Mutable access to one variable
    pub fn var_mut(&mut self, var: NeuronVar) -> &mut f32 {
        match var {
            NeuronVar::Act => &mut self.act,
            NeuronVar::ActLrn => &mut self.act_lrn,
            NeuronVar::Ge => &mut self.ge,
            NeuronVar::Gi => &mut self.gi,
            NeuronVar::Gk => &mut self.gk,
            NeuronVar::Inet => &mut self.inet,
            NeuronVar::Vm => &mut self.vm,
            NeuronVar::Targ => &mut self.targ,
            NeuronVar::Ext => &mut self.ext,
            NeuronVar::AvgSS => &mut self.avg_ss,
            NeuronVar::AvgS => &mut self.avg_s,
            NeuronVar::AvgM => &mut self.avg_m,
            NeuronVar::AvgL => &mut self.avg_l,
            NeuronVar::AvgLLrn => &mut self.avg_l_lrn,
            NeuronVar::AvgSLrn => &mut self.avg_s_lrn,
            NeuronVar::ActQ0 => &mut self.act_q0,
            NeuronVar::ActQ1 => &mut self.act_q1,
            NeuronVar::ActQ2 => &mut self.act_q2,
            NeuronVar::ActM => &mut self.act_m,
            NeuronVar::ActP => &mut self.act_p,
            NeuronVar::ActDif => &mut self.act_dif,
            NeuronVar::ActDel => &mut self.act_del,
            NeuronVar::ActAvg => &mut self.act_avg,
            NeuronVar::GiSyn => &mut self.gi_syn,
            NeuronVar::GiSelf => &mut self.gi_self,
            NeuronVar::ActSent => &mut self.act_sent,
            NeuronVar::GeRaw => &mut self.ge_raw,
            NeuronVar::GiRaw => &mut self.gi_raw,
            NeuronVar::GeInc => &mut self.ge_inc,
            NeuronVar::GiInc => &mut self.gi_inc,
        }
    }
}
