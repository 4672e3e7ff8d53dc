// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Running average / maximum accumulator used for pool statistics

use serde::{Deserialize, Serialize};

/// Average and maximum over a set of values, with the index of the max
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvgMax {
    pub avg: f32,
    pub max: f32,
    /// Index of the max value, `None` until a value is seen
    pub max_idx: Option<usize>,
    pub sum: f32,
    pub n: usize,
}

impl Default for AvgMax {
    fn default() -> Self {
        Self {
            avg: 0.0,
            max: -f32::MAX,
            max_idx: None,
            sum: 0.0,
            n: 0,
        }
    }
}

impl AvgMax {
    /// Reset for a new accumulation pass
    pub fn init(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn update(&mut self, val: f32, idx: usize) {
        self.sum += val;
        self.n += 1;
        if val > self.max {
            self.max = val;
            self.max_idx = Some(idx);
        }
    }

    /// Finalize the average. With no values seen both avg and max are 0.
    pub fn calc_avg(&mut self) {
        if self.n > 0 {
            self.avg = self.sum / self.n as f32;
        } else {
            self.avg = self.sum;
            self.max = self.avg;
        }
    }

    /// Scale avg and max toward zero by `decay`
    pub fn decay(&mut self, decay: f32) {
        self.avg -= decay * self.avg;
        self.max -= decay * self.max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avg_and_max() {
        let mut am = AvgMax::default();
        for (i, v) in [0.2, 0.8, 0.5].into_iter().enumerate() {
            am.update(v, i);
        }
        am.calc_avg();
        assert!((am.avg - 0.5).abs() < 1e-6);
        assert_eq!(am.max, 0.8);
        assert_eq!(am.max_idx, Some(1));
    }

    #[test]
    fn test_empty_is_zero() {
        let mut am = AvgMax::default();
        am.calc_avg();
        assert_eq!(am.avg, 0.0);
        assert_eq!(am.max, 0.0);
        assert_eq!(am.max_idx, None);
    }
}
