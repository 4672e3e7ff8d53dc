// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Connectivity index integration tests

use leabra_npu_neural::Shape;
use leabra_npu_runtime::{
    Connectivity, ConnectivityPattern, FullConnect, OneToOne, PathwayIndex, RuntimeError,
};

/// Every third sender/receiver pair, for an irregular mask
#[derive(Debug)]
struct Sparse;

impl ConnectivityPattern for Sparse {
    fn name(&self) -> &'static str {
        "Sparse"
    }

    fn connect(&self, send: &Shape, recv: &Shape, _same: bool) -> Connectivity {
        let (slen, rlen) = (send.len(), recv.len());
        let mut con = Connectivity {
            send_n: vec![0; slen],
            recv_n: vec![0; rlen],
            cons: vec![false; slen * rlen],
        };
        for ri in 0..rlen {
            for si in 0..slen {
                if (ri + 2 * si) % 3 == 0 {
                    con.cons[ri * slen + si] = true;
                    con.send_n[si] += 1;
                    con.recv_n[ri] += 1;
                }
            }
        }
        con
    }
}

/// Reports one more connection than it sets
#[derive(Debug)]
struct Miscounted;

impl ConnectivityPattern for Miscounted {
    fn name(&self) -> &'static str {
        "Miscounted"
    }

    fn connect(&self, send: &Shape, recv: &Shape, same: bool) -> Connectivity {
        let mut con = FullConnect::new().connect(send, recv, same);
        con.send_n[0] += 1;
        con
    }
}

fn assert_views_agree(idx: &PathwayIndex) {
    idx.check().unwrap();
    let total: usize = idx.send_n.iter().sum();
    assert_eq!(total, idx.recv_n.iter().sum::<usize>());
    assert_eq!(total, idx.num_syns());

    // every synapse appears exactly once in the recv view
    let mut seen = vec![0; idx.num_syns()];
    for &syn in &idx.recv_syn {
        seen[syn] += 1;
    }
    assert!(seen.iter().all(|&n| n == 1));

    for ri in 0..idx.num_recv() {
        for slot in idx.recv_range(ri) {
            let si = idx.recv_idx[slot];
            assert_eq!(idx.syn_index(si, ri), Some(idx.recv_syn[slot]));
        }
    }
}

#[test]
fn test_views_agree_for_irregular_mask() {
    let send = Shape::new(&[4, 5]).unwrap();
    let recv = Shape::new(&[7]).unwrap();
    let idx = PathwayIndex::build(&Sparse, &send, &recv, false).unwrap();
    assert!(idx.num_syns() > 0);
    assert_views_agree(&idx);
}

#[test]
fn test_self_pathway_counts_once() {
    let sh = Shape::new(&[2, 2, 2, 2]).unwrap();
    let idx = PathwayIndex::build(&FullConnect::new(), &sh, &sh, true).unwrap();
    assert_eq!(idx.num_syns(), 16 * 15);
    assert!(idx.send_n.iter().all(|&n| n == 15));
    for u in 0..16 {
        assert_eq!(idx.syn_index(u, u), None);
    }
    assert_views_agree(&idx);
}

#[test]
fn test_one_to_one_views() {
    let idx = PathwayIndex::build(
        &OneToOne,
        &Shape::new(&[5]).unwrap(),
        &Shape::new(&[5]).unwrap(),
        false,
    )
    .unwrap();
    assert_eq!(idx.num_syns(), 5);
    assert_eq!(idx.recv_idx, vec![0, 1, 2, 3, 4]);
    assert_views_agree(&idx);
}

#[test]
fn test_miscounted_generator_is_rejected() {
    let err = PathwayIndex::build(
        &Miscounted,
        &Shape::new(&[3]).unwrap(),
        &Shape::new(&[2]).unwrap(),
        false,
    )
    .unwrap_err();
    assert!(matches!(err, RuntimeError::CountMismatch { send_total: 7, .. }));
    assert!(err.to_string().contains("mismatch"));
}
