// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Engine execution statistics

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One barrier-separated step of the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    AlphaCycInit,
    SendGDelta,
    GFromInc,
    InhibAct,
    QuarterFinal,
    DWt,
    WtFromDWt,
    WtBal,
}

const NUM_STEPS: usize = 8;

impl Step {
    pub const ALL: [Step; NUM_STEPS] = [
        Step::AlphaCycInit,
        Step::SendGDelta,
        Step::GFromInc,
        Step::InhibAct,
        Step::QuarterFinal,
        Step::DWt,
        Step::WtFromDWt,
        Step::WtBal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Step::AlphaCycInit => "AlphaCycInit",
            Step::SendGDelta => "SendGDelta",
            Step::GFromInc => "GFromInc",
            Step::InhibAct => "InhibAct",
            Step::QuarterFinal => "QuarterFinal",
            Step::DWt => "DWt",
            Step::WtFromDWt => "WtFromDWt",
            Step::WtBal => "WtBal",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StepTiming {
    pub calls: u64,
    pub total: Duration,
}

/// Cumulative counters and timings; averages are computed on demand
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineStats {
    pub trials: u64,
    pub cycles: u64,
    steps: [StepTiming; NUM_STEPS],
    /// Busy time per worker, empty when running sequentially
    pub worker_busy: Vec<Duration>,
}

impl EngineStats {
    pub fn record_step(&mut self, step: Step, elapsed: Duration) {
        let t = &mut self.steps[step.slot()];
        t.calls += 1;
        t.total += elapsed;
    }

    pub fn record_busy(&mut self, busy: &[Duration]) {
        if self.worker_busy.len() < busy.len() {
            self.worker_busy.resize(busy.len(), Duration::ZERO);
        }
        for (acc, b) in self.worker_busy.iter_mut().zip(busy) {
            *acc += *b;
        }
    }

    pub fn step(&self, step: Step) -> StepTiming {
        self.steps[step.slot()]
    }

    pub fn avg_step_time(&self, step: Step) -> Option<Duration> {
        let t = self.step(step);
        (t.calls > 0).then(|| t.total / t.calls as u32)
    }

    /// Wall time of the three cycle steps, averaged per cycle
    pub fn avg_cycle_time(&self) -> Option<Duration> {
        if self.cycles == 0 {
            return None;
        }
        let total: Duration = [Step::SendGDelta, Step::GFromInc, Step::InhibAct]
            .iter()
            .map(|&s| self.step(s).total)
            .sum();
        Some(total / self.cycles as u32)
    }

    pub fn total_time(&self) -> Duration {
        self.steps.iter().map(|t| t.total).sum()
    }

    /// Share of the total step time each worker spent running jobs
    pub fn worker_utilization(&self) -> Vec<f64> {
        let total = self.total_time().as_secs_f64();
        self.worker_busy
            .iter()
            .map(|b| if total > 0.0 { b.as_secs_f64() / total } else { 0.0 })
            .collect()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_averages() {
        let mut stats = EngineStats::default();
        assert_eq!(stats.avg_cycle_time(), None);
        stats.record_step(Step::SendGDelta, Duration::from_millis(2));
        stats.record_step(Step::SendGDelta, Duration::from_millis(4));
        stats.record_step(Step::InhibAct, Duration::from_millis(6));
        stats.cycles = 2;
        assert_eq!(stats.avg_step_time(Step::SendGDelta), Some(Duration::from_millis(3)));
        assert_eq!(stats.avg_step_time(Step::DWt), None);
        assert_eq!(stats.avg_cycle_time(), Some(Duration::from_millis(6)));
    }

    #[test]
    fn test_worker_busy_accumulates() {
        let mut stats = EngineStats::default();
        stats.record_step(Step::DWt, Duration::from_millis(10));
        stats.record_busy(&[Duration::from_millis(5), Duration::from_millis(10)]);
        let util = stats.worker_utilization();
        assert_eq!(util.len(), 2);
        assert!((util[0] - 0.5).abs() < 1e-9);
        assert!((util[1] - 1.0).abs() < 1e-9);
        stats.reset();
        assert!(stats.worker_busy.is_empty());
    }
}
