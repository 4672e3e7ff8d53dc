// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Reference connectivity patterns

use leabra_npu_neural::Shape;
use serde::{Deserialize, Serialize};

use crate::traits::{Connectivity, ConnectivityPattern};

/// Every sender connects to every receiver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullConnect {
    /// For a layer projecting to itself, also connect each unit to itself
    pub self_con: bool,
}

impl FullConnect {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConnectivityPattern for FullConnect {
    fn name(&self) -> &'static str {
        "Full"
    }

    fn connect(&self, send: &Shape, recv: &Shape, same: bool) -> Connectivity {
        let slen = send.len();
        let rlen = recv.len();
        let mut cons = vec![true; slen * rlen];
        let mut send_n = vec![rlen; slen];
        let mut recv_n = vec![slen; rlen];

        if same && !self.self_con {
            for i in 0..rlen.min(slen) {
                cons[i * slen + i] = false;
            }
            send_n.iter_mut().for_each(|n| *n -= 1);
            recv_n.iter_mut().for_each(|n| *n -= 1);
        }

        Connectivity {
            send_n,
            recv_n,
            cons,
        }
    }
}

/// Sender `i` connects to receiver `i`, for `i` below the smaller size
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneToOne;

impl ConnectivityPattern for OneToOne {
    fn name(&self) -> &'static str {
        "OneToOne"
    }

    fn connect(&self, send: &Shape, recv: &Shape, _same: bool) -> Connectivity {
        let slen = send.len();
        let rlen = recv.len();
        let n = slen.min(rlen);
        let mut cons = vec![false; slen * rlen];
        let mut send_n = vec![0; slen];
        let mut recv_n = vec![0; rlen];

        for i in 0..n {
            cons[i * slen + i] = true;
            send_n[i] = 1;
            recv_n[i] = 1;
        }

        Connectivity {
            send_n,
            recv_n,
            cons,
        }
    }
}
