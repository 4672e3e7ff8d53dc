// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Pathway Connectivity Index
//!
//! Two mirrored compressed-sparse-row views of one pathway's connections:
//!
//! - **Send view**: for sender `s`, `send_idx[send_start[s]..][..send_n[s]]`
//!   lists its receivers. Synapse storage uses this order, so the synapse
//!   for send slot `k` is synapse `k`.
//! - **Recv view**: for receiver `r`, `recv_idx[recv_start[r]..][..recv_n[r]]`
//!   lists its senders and `recv_syn` at the same slot gives the synapse.
//!
//! Both are filled in one receiver-major pass over the connection mask.

use std::ops::Range;

use leabra_npu_neural::Shape;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConDirection, Result, RuntimeError};
use crate::traits::{Connectivity, ConnectivityPattern};

/// Average and maximum connection count per unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConStats {
    pub avg: f32,
    pub max: usize,
}

impl ConStats {
    fn from_counts(counts: &[usize]) -> Self {
        if counts.is_empty() {
            return Self::default();
        }
        let sum: usize = counts.iter().sum();
        Self {
            avg: sum as f32 / counts.len() as f32,
            max: counts.iter().copied().max().unwrap_or(0),
        }
    }
}

/// Bidirectional index of a pathway's synapses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathwayIndex {
    pub send_n: Vec<usize>,
    pub send_start: Vec<usize>,
    /// Receiver index for each send slot
    pub send_idx: Vec<usize>,
    pub recv_n: Vec<usize>,
    pub recv_start: Vec<usize>,
    /// Sender index for each recv slot
    pub recv_idx: Vec<usize>,
    /// Synapse index for each recv slot
    pub recv_syn: Vec<usize>,
    pub send_stats: ConStats,
    pub recv_stats: ConStats,
}

fn prefix_starts(counts: &[usize]) -> Vec<usize> {
    let mut start = 0;
    counts
        .iter()
        .map(|&n| {
            let st = start;
            start += n;
            st
        })
        .collect()
}

impl PathwayIndex {
    /// Run the pattern once and index its output
    pub fn build(
        pattern: &dyn ConnectivityPattern,
        send: &Shape,
        recv: &Shape,
        same: bool,
    ) -> Result<Self> {
        let con = pattern.connect(send, recv, same);
        let index = Self::from_connectivity(&con, send.len(), recv.len())?;
        debug!(
            target: "leabra-npu-runtime",
            "[INDEX] {} pattern: {} senders x {} receivers -> {} synapses",
            pattern.name(),
            send.len(),
            recv.len(),
            index.num_syns()
        );
        Ok(index)
    }

    /// Index a generator's output for layers of `slen` senders and `rlen` receivers
    pub fn from_connectivity(con: &Connectivity, slen: usize, rlen: usize) -> Result<Self> {
        if con.send_n.len() != slen {
            return Err(RuntimeError::LengthMismatch {
                what: "send counts",
                expected: slen,
                actual: con.send_n.len(),
            });
        }
        if con.recv_n.len() != rlen {
            return Err(RuntimeError::LengthMismatch {
                what: "recv counts",
                expected: rlen,
                actual: con.recv_n.len(),
            });
        }
        if con.cons.len() != slen * rlen {
            return Err(RuntimeError::LengthMismatch {
                what: "connection mask",
                expected: slen * rlen,
                actual: con.cons.len(),
            });
        }

        let send_total: usize = con.send_n.iter().sum();
        let recv_total: usize = con.recv_n.iter().sum();
        let connections = con.cons.iter().filter(|&&b| b).count();
        if send_total != recv_total || send_total != connections {
            return Err(RuntimeError::CountMismatch {
                send_total,
                recv_total,
                connections,
            });
        }

        let send_start = prefix_starts(&con.send_n);
        let recv_start = prefix_starts(&con.recv_n);
        let mut send_idx = vec![0; send_total];
        let mut recv_idx = vec![0; recv_total];
        let mut recv_syn = vec![0; recv_total];
        let mut send_cursor = vec![0usize; slen];

        for ri in 0..rlen {
            let rst = recv_start[ri];
            let rtcn = con.recv_n[ri];
            let mut rci = 0;
            for si in 0..slen {
                if !con.cons[ri * slen + si] {
                    continue;
                }
                if rci >= rtcn {
                    return Err(RuntimeError::CountExceeded {
                        direction: ConDirection::Recv,
                        recv: ri,
                        send: si,
                        limit: rtcn,
                    });
                }
                let sci = send_cursor[si];
                let stcn = con.send_n[si];
                if sci >= stcn {
                    return Err(RuntimeError::CountExceeded {
                        direction: ConDirection::Send,
                        recv: ri,
                        send: si,
                        limit: stcn,
                    });
                }
                let syn = send_start[si] + sci;
                recv_idx[rst + rci] = si;
                send_idx[syn] = ri;
                recv_syn[rst + rci] = syn;
                send_cursor[si] += 1;
                rci += 1;
            }
        }

        Ok(Self {
            send_stats: ConStats::from_counts(&con.send_n),
            recv_stats: ConStats::from_counts(&con.recv_n),
            send_n: con.send_n.clone(),
            send_start,
            send_idx,
            recv_n: con.recv_n.clone(),
            recv_start,
            recv_idx,
            recv_syn,
        })
    }

    /// Total synapse count
    pub fn num_syns(&self) -> usize {
        self.send_idx.len()
    }

    pub fn num_send(&self) -> usize {
        self.send_n.len()
    }

    pub fn num_recv(&self) -> usize {
        self.recv_n.len()
    }

    /// Synapse range of sender `si`
    #[inline]
    pub fn send_range(&self, si: usize) -> Range<usize> {
        let st = self.send_start[si];
        st..st + self.send_n[si]
    }

    /// Recv-slot range of receiver `ri`
    #[inline]
    pub fn recv_range(&self, ri: usize) -> Range<usize> {
        let st = self.recv_start[ri];
        st..st + self.recv_n[ri]
    }

    /// Synapse from `si` to `ri`, if connected
    pub fn syn_index(&self, si: usize, ri: usize) -> Option<usize> {
        if si >= self.num_send() {
            return None;
        }
        self.send_range(si).find(|&syn| self.send_idx[syn] == ri)
    }

    /// Like [`PathwayIndex::syn_index`], with range and connection errors
    pub fn syn_index_try(&self, si: usize, ri: usize) -> Result<usize> {
        if si >= self.num_send() {
            return Err(RuntimeError::IndexOutOfRange {
                index: si,
                len: self.num_send(),
            });
        }
        if ri >= self.num_recv() {
            return Err(RuntimeError::IndexOutOfRange {
                index: ri,
                len: self.num_recv(),
            });
        }
        self.syn_index(si, ri)
            .ok_or(RuntimeError::NotConnected { send: si, recv: ri })
    }

    /// Verify that both views describe the same connections
    pub fn check(&self) -> Result<()> {
        let send_total: usize = self.send_n.iter().sum();
        let recv_total: usize = self.recv_n.iter().sum();
        if send_total != recv_total || send_total != self.num_syns() {
            return Err(RuntimeError::CountMismatch {
                send_total,
                recv_total,
                connections: self.num_syns(),
            });
        }
        for ri in 0..self.num_recv() {
            for slot in self.recv_range(ri) {
                let si = self.recv_idx[slot];
                let syn = self.recv_syn[slot];
                if !self.send_range(si).contains(&syn) || self.send_idx[syn] != ri {
                    return Err(RuntimeError::NotConnected { send: si, recv: ri });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::std_impl::FullConnect;

    fn shape(n: usize) -> Shape {
        Shape::new(&[n]).unwrap()
    }

    #[test]
    fn test_full_three_to_two() {
        let idx = PathwayIndex::build(&FullConnect::new(), &shape(3), &shape(2), false).unwrap();
        assert_eq!(idx.num_syns(), 6);
        assert_eq!(idx.recv_n, vec![3, 3]);
        assert_eq!(idx.send_n, vec![2, 2, 2]);
        assert_eq!(idx.send_start, vec![0, 2, 4]);
        assert_eq!(idx.recv_start, vec![0, 3]);
        // receiver 1's second source is sender 1, stored at sender 1's second slot
        assert_eq!(idx.recv_idx[4], 1);
        assert_eq!(idx.recv_syn[4], 3);
        assert_eq!(idx.syn_index(2, 0), Some(4));
        assert!((idx.recv_stats.avg - 3.0).abs() < 1e-6);
        assert_eq!(idx.send_stats.max, 2);
        idx.check().unwrap();
    }

    #[test]
    fn test_count_exceeded() {
        let con = Connectivity {
            send_n: vec![1, 1],
            recv_n: vec![2, 0],
            cons: vec![true, true, false, false],
        };
        assert!(PathwayIndex::from_connectivity(&con, 2, 2).is_ok());

        let recv_full = Connectivity {
            send_n: vec![1, 1],
            recv_n: vec![1, 1],
            cons: vec![true, true, false, false],
        };
        assert_eq!(
            PathwayIndex::from_connectivity(&recv_full, 2, 2),
            Err(RuntimeError::CountExceeded {
                direction: ConDirection::Recv,
                recv: 0,
                send: 1,
                limit: 1,
            })
        );

        let send_full = Connectivity {
            send_n: vec![2, 0],
            recv_n: vec![1, 1],
            cons: vec![false, true, true, false],
        };
        assert_eq!(
            PathwayIndex::from_connectivity(&send_full, 2, 2),
            Err(RuntimeError::CountExceeded {
                direction: ConDirection::Send,
                recv: 0,
                send: 1,
                limit: 0,
            })
        );
    }

    #[test]
    fn test_length_and_total_mismatch() {
        let short = Connectivity {
            send_n: vec![1],
            recv_n: vec![1],
            cons: vec![true],
        };
        assert!(matches!(
            PathwayIndex::from_connectivity(&short, 2, 1),
            Err(RuntimeError::LengthMismatch { what: "send counts", .. })
        ));

        let totals = Connectivity {
            send_n: vec![1, 1],
            recv_n: vec![1],
            cons: vec![true, false],
        };
        assert!(matches!(
            PathwayIndex::from_connectivity(&totals, 2, 1),
            Err(RuntimeError::CountMismatch { .. })
        ));
    }

    #[test]
    fn test_syn_index_errors() {
        let idx = PathwayIndex::build(&FullConnect::new(), &shape(2), &shape(2), true).unwrap();
        assert_eq!(idx.syn_index(0, 0), None);
        assert_eq!(
            idx.syn_index_try(0, 0),
            Err(RuntimeError::NotConnected { send: 0, recv: 0 })
        );
        assert!(matches!(
            idx.syn_index_try(5, 0),
            Err(RuntimeError::IndexOutOfRange { index: 5, len: 2 })
        ));
        assert_eq!(idx.syn_index_try(0, 1), Ok(0));
    }
}
