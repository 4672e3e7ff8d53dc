// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Runtime-gated cycle tracing

use std::sync::OnceLock;

/// Runtime-gated tracing config for the cycle pipeline.
/// Enable with:
/// - LEABRA_NPU_TRACE_CYCLE=1
/// Optional filters:
/// - LEABRA_NPU_TRACE_LAYER=<layer name> (single layer)
pub(crate) struct CycleTraceCfg {
    pub enabled: bool,
    pub layer_filter: Option<String>,
}

impl CycleTraceCfg {
    pub fn wants(&self, layer: &str) -> bool {
        self.enabled && self.layer_filter.as_deref().map_or(true, |f| f == layer)
    }
}

pub(crate) fn cycle_trace_cfg() -> &'static CycleTraceCfg {
    static CFG: OnceLock<CycleTraceCfg> = OnceLock::new();
    CFG.get_or_init(|| {
        let enabled = std::env::var("LEABRA_NPU_TRACE_CYCLE")
            .ok()
            .as_deref()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let layer_filter = std::env::var("LEABRA_NPU_TRACE_LAYER").ok();

        CycleTraceCfg {
            enabled,
            layer_filter,
        }
    })
}
