// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pathway conductance scaling and initial weight distribution

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Absolute and relative conductance scaling for a pathway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WtScaleParams {
    /// Absolute multiplier, not normalized across pathways
    pub abs: f32,
    /// Relative weight, normalized across a receiver's pathways
    pub rel: f32,
}

impl Default for WtScaleParams {
    fn default() -> Self {
        Self { abs: 1.0, rel: 1.0 }
    }
}

impl WtScaleParams {
    /// Scale that compensates for the expected number of active senders
    ///
    /// `savg` is the sending layer's expected activity, `snu` its unit
    /// count and `ncon` the average receiver connection count.
    pub fn sl_act_scale(savg: f32, snu: f32, ncon: f32) -> f32 {
        let ncon = ncon.max(1.0);
        let slay_act_n = (savg * snu).round().max(1.0);
        if ncon == snu {
            return 1.0 / slay_act_n;
        }
        let r_max = ncon.min(slay_act_n).trunc();
        let r_avg = (savg * ncon).round().max(1.0);
        let r_exp = (r_avg + 2.0).min(r_max);
        1.0 / r_exp
    }

    pub fn full_scale(&self, savg: f32, snu: f32, ncon: f32) -> f32 {
        self.abs * self.rel * Self::sl_act_scale(savg, snu, ncon)
    }
}

/// Shape of the initial weight distribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WtDist {
    /// Uniform on `[mean - var, mean + var]`
    #[default]
    Uniform,
    /// Every weight set to `mean`
    Mean,
}

/// Initial weight distribution for a pathway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WtInitParams {
    pub mean: f32,
    pub var: f32,
    pub dist: WtDist,
    /// Mirror weights from the reciprocal pathway after init
    pub sym: bool,
}

impl Default for WtInitParams {
    fn default() -> Self {
        Self { mean: 0.5, var: 0.25, dist: WtDist::Uniform, sym: true }
    }
}

impl WtInitParams {
    /// Draw one initial effective weight, clamped to `[0, 1]`
    pub fn gen<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let w = match self.dist {
            WtDist::Mean => self.mean,
            WtDist::Uniform => {
                if self.var > 0.0 {
                    rng.gen_range((self.mean - self.var)..=(self.mean + self.var))
                } else {
                    self.mean
                }
            }
        };
        w.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_full_connectivity_scale() {
        // every sender connected: 1 / expected active senders
        assert!((WtScaleParams::sl_act_scale(0.2, 25.0, 25.0) - 0.2).abs() < 1e-6);
        // expected activity rounds to zero senders, floored at one
        assert_eq!(WtScaleParams::sl_act_scale(0.01, 10.0, 10.0), 1.0);
    }

    #[test]
    fn test_sparse_connectivity_scale() {
        // ncon = 10 of 100 senders at 20% activity: r_avg = 2, r_exp = 4
        let s = WtScaleParams::sl_act_scale(0.2, 100.0, 10.0);
        assert!((s - 0.25).abs() < 1e-6);
        let p = WtScaleParams { abs: 2.0, rel: 0.5 };
        assert!((p.full_scale(0.2, 100.0, 10.0) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_gen_in_range() {
        let p = WtInitParams::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let w = p.gen(&mut rng);
            assert!((0.25..=0.75).contains(&w));
        }
        let wide = WtInitParams { mean: 0.9, var: 0.5, ..WtInitParams::default() };
        for _ in 0..1000 {
            assert!(wide.gen(&mut rng) <= 1.0);
        }
        let fixed = WtInitParams { dist: WtDist::Mean, ..WtInitParams::default() };
        assert_eq!(fixed.gen(&mut rng), 0.5);
    }
}
