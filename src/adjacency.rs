//! Derivation of every adjacency relation from a mesh's raw
//! element-to-vertex table: intermediate entities, downward tables for
//! them, upward incidence, the low-entity star, and the element-element
//! dual.
//!
//! Every function here is a pure derivation from its inputs (bulk
//! arrays in, bulk arrays out) so that [`crate::mesh::Mesh`] can treat
//! each one as a cacheable, idempotent query.

use std::collections::HashMap;

use crate::error::{fatal, Invariant};
use crate::ints::{exscan, Index};
use crate::tables::canonical_order;

/// No neighbour occupies this dual slot (boundary face).
pub const SENTINEL: Index = Index::MAX;

/// Upward incidence of an `l`-entity into its `d`-entities, CSR over
/// `offsets`/`adj`, with a parallel `directions` array recording which
/// local slot of the `d`-entity each incidence occupies.
#[derive(Clone)]
pub struct Up {
    pub offsets: Vec<Index>,
    pub adj: Vec<Index>,
    pub directions: Vec<Index>,
}

/// The low-entity star: a CSR graph on `l`-entities where `(a, b)` is an
/// edge iff `a` and `b` are distinct `l`-subentities of some shared
/// `d`-entity.
#[derive(Clone)]
pub struct Star {
    pub offsets: Vec<Index>,
    pub adj: Vec<Index>,
}

/// Derive upward adjacency `l -> d` from the downward table `d -> l`.
///
/// `down` has `n_d * subs` entries, `down[e * subs + k]` the `l`-entity
/// at local slot `k` of `d`-entity `e`. Mirrors the original core's
/// two-pass "count then scatter" construction: an exclusive scan of
/// per-`l`-entity incidence counts gives offsets, then a second pass
/// scatters `(d, direction)` pairs using those offsets as write cursors.
pub fn upward_from_downward(n_l: usize, n_d: usize, subs: usize, down: &[Index]) -> Up {
    let mut counts = vec![0 as Index; n_l];
    for &a in down {
        counts[a as usize] += 1;
    }
    let offsets = exscan(&counts);
    let total = offsets[n_l] as usize;
    let mut adj = vec![0 as Index; total];
    let mut directions = vec![0 as Index; total];
    let mut cursor: Vec<Index> = offsets[..n_l].to_vec();
    for e in 0..n_d {
        for k in 0..subs {
            let a = down[e * subs + k] as usize;
            let slot = cursor[a] as usize;
            adj[slot] = e as Index;
            directions[slot] = k as Index;
            cursor[a] += 1;
        }
    }
    Up {
        offsets,
        adj,
        directions,
    }
}

/// Derive the star of `l`-entities across shared `d`-entities, from the
/// upward table `l -> d` and the downward table `d -> l`.
pub fn star_from_up_down(n_l: usize, up: &Up, down: &[Index], subs: usize) -> Star {
    let mut neighbours: Vec<Vec<Index>> = vec![Vec::new(); n_l];
    for a in 0..n_l {
        let first = up.offsets[a] as usize;
        let end = up.offsets[a + 1] as usize;
        for idx in first..end {
            let e = up.adj[idx] as usize;
            let k = up.directions[idx] as usize;
            for k2 in 0..subs {
                if k2 == k {
                    continue;
                }
                let b = down[e * subs + k2];
                if b as usize != a {
                    neighbours[a].push(b);
                }
            }
        }
        neighbours[a].sort_unstable();
        neighbours[a].dedup();
    }
    let counts: Vec<Index> = neighbours.iter().map(|v| v.len() as Index).collect();
    let offsets = exscan(&counts);
    let adj: Vec<Index> = neighbours.into_iter().flatten().collect();
    Star { offsets, adj }
}

/// Derive the element-element dual: `dual[e * (d+1) + i]` is the
/// neighbour sharing the facet opposite local vertex `i` of element `e`,
/// or [`SENTINEL`] on the boundary.
///
/// For each element, every other element incident to at least one of
/// its vertices (via `vert_up`, the vertex upward table) is tallied by
/// shared-vertex count; a neighbour sharing exactly `d` vertices shares
/// exactly one facet, identified by the single element vertex not in
/// the shared set.
pub fn dual_from_elem_verts(d: usize, n_elems: usize, elem_verts: &[Index], vert_up: &Up) -> Vec<Index> {
    let w = d + 1;
    let mut dual = vec![SENTINEL; n_elems * w];
    for e in 0..n_elems {
        let verts = &elem_verts[e * w..(e + 1) * w];
        let mut tally: HashMap<Index, Index> = HashMap::new();
        for &v in verts {
            let first = vert_up.offsets[v as usize] as usize;
            let end = vert_up.offsets[v as usize + 1] as usize;
            for &e2 in &vert_up.adj[first..end] {
                if e2 as usize != e {
                    *tally.entry(e2).or_insert(0) += 1;
                }
            }
        }
        for (&e2, &count) in &tally {
            if count as usize != d {
                continue;
            }
            let e2_verts = &elem_verts[e2 as usize * w..(e2 as usize + 1) * w];
            let mut excluded = None;
            for (i, &v) in verts.iter().enumerate() {
                if !e2_verts.contains(&v) {
                    excluded = Some(i);
                    break;
                }
            }
            let i = match excluded {
                Some(i) => i,
                None => fatal(Invariant::DualFaceAmbiguous),
            };
            let slot = e * w + i;
            if dual[slot] != SENTINEL && dual[slot] != e2 {
                fatal(Invariant::DualFaceAmbiguous);
            }
            dual[slot] = e2;
        }
    }
    dual
}

/// Derive intermediate `l`-entities (`0 < l < d`) from a `d`-entity
/// vertex table: for every `(d, l)`-subentity of every `d`-entity,
/// canonicalise its vertex tuple by sorting, and deduplicate by that
/// sorted key. The first occurrence in scan order fixes both the new
/// entity's id and its vertex ordering (taken un-sorted, from the
/// canonical subentity ordering of the element that introduced it).
///
/// Returns `(l_verts, down)`: `l_verts` is the new entity-to-vertex
/// table (`n_l * (l+1)` entries), `down` is the downward table
/// `d -> l` (`n_d * subs_per_ent(d,l)` entries).
pub fn derive_entities(
    d: usize,
    l: usize,
    n_d: usize,
    subs: usize,
    width: usize,
    elem_verts: &[Index],
) -> (Vec<Index>, Vec<Index>) {
    let mut ids: HashMap<Vec<Index>, Index> = HashMap::new();
    let mut l_verts: Vec<Index> = Vec::new();
    let mut down = vec![0 as Index; n_d * subs];
    for e in 0..n_d {
        for i in 0..subs {
            let row: Vec<Index> = (0..width)
                .map(|k| elem_verts[e * (d + 1) + canonical_order(d, l, i, k)])
                .collect();
            let mut key = row.clone();
            key.sort_unstable();
            let id = *ids.entry(key).or_insert_with(|| {
                let new_id = (l_verts.len() / width) as Index;
                l_verts.extend_from_slice(&row);
                new_id
            });
            down[e * subs + i] = id;
        }
    }
    (l_verts, down)
}

#[cfg(test)]
#[path = "adjacency_test.rs"]
mod adjacency_test;
