//! Bridge-graph construction: turns an undirected CSR graph into one
//! undirected edge per incidence, used to derive edges from the
//! vertex-vertex star and faces from the element-element dual.
//!
//! Ported from the original core's `bridge_graph` (`bridge.c`): for
//! every vertex `i`, count how many neighbours `j` satisfy `i < j`
//! (the "half degree"), exclusive-scan those counts into edge offsets,
//! then make a second pass writing each such pair in order.

use crate::error::{fatal, Invariant};
use crate::ints::{exscan, Index};

/// One undirected edge per ordered incidence `(i, j)` with `i < j`.
pub struct BridgeGraph {
    pub verts_of_edges: Vec<Index>,
}

/// Build the bridge graph of an undirected CSR graph on `n` vertices.
///
/// The input must be symmetric (every `(i, j)` incidence has a matching
/// `(j, i)`), so `offsets[n]` must be even; an odd half-edge count is a
/// fatal invariant violation, matching the `assert` in the original.
pub fn bridge_graph(n: usize, offsets: &[Index], adj: &[Index]) -> BridgeGraph {
    let nhalf = offsets[n] as usize;
    if nhalf % 2 != 0 {
        fatal(Invariant::OddHalfEdgeCount);
    }
    let nedges = nhalf / 2;
    let half_degree: Vec<Index> = (0..n)
        .map(|i| {
            let first = offsets[i] as usize;
            let end = offsets[i + 1] as usize;
            adj[first..end].iter().filter(|&&j| (i as Index) < j).count() as Index
        })
        .collect();
    let bridge_offsets = exscan(&half_degree);
    debug_assert_eq!(bridge_offsets[n] as usize, nedges);
    let mut verts_of_edges = vec![0; nedges * 2];
    for i in 0..n {
        let first = offsets[i] as usize;
        let end = offsets[i + 1] as usize;
        let mut edge = bridge_offsets[i] as usize;
        for &j in &adj[first..end] {
            if (i as Index) < j {
                verts_of_edges[edge * 2] = i as Index;
                verts_of_edges[edge * 2 + 1] = j;
                edge += 1;
            }
        }
    }
    BridgeGraph { verts_of_edges }
}

#[cfg(test)]
#[path = "bridge_test.rs"]
mod bridge_test;
