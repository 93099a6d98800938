//! Edge-swap pipeline (3D only): for each interior edge, build its ring
//! by walking tetrahedra across shared faces, retriangulate with a
//! single fan from the ring's first vertex, and replace the edge's
//! incident tets when the result both clears the quality floor and
//! improves on the edge's current worst tet.
//!
//! Ring retriangulation here is a single fan rather than an
//! enumeration of every combinatorial retriangulation of the r-gon (a
//! full Catalan-number swap catalogue) — documented as a
//! simplification in DESIGN.md.

use std::collections::VecDeque;

use crate::adjacency::{self, Up};
use crate::error::MeshError;
use crate::indset;
use crate::ints::Index;
use crate::mesh::Mesh;
use crate::quality;
use crate::tag::{Tag, TagData, COORDINATES};

const MAX_RING: usize = 7;

/// "require-better" mode is always on: a swap is only admitted if it
/// strictly improves the edge's current worst tet by more than this
/// epsilon — the same threshold `swap_qualities.c` folds into its own
/// require-better floor (`good_qual = old_minq + 1e-10`).
const REQUIRE_BETTER_EPS: f64 = 1e-10;

fn vertex_coords(coords: &[f64], v: Index) -> [f64; 3] {
    let i = v as usize * 3;
    [coords[i], coords[i + 1], coords[i + 2]]
}

fn tet_quality(coords: &[f64], verts: &[Index]) -> f64 {
    let pts: Vec<[f64; 3]> = verts.iter().map(|&v| vertex_coords(coords, v)).collect();
    quality::quality(3, &pts)
}

/// The ordered cycle of vertices opposite an interior edge, walking
/// tetrahedra across their shared faces starting from `start_tet`.
/// `None` for a boundary edge (the walk falls off the mesh) or a ring
/// exceeding [`MAX_RING`].
fn build_ring(tet_verts: &[Index], dual: &[Index], start_tet: Index, v0: Index, v1: Index) -> Option<Vec<Index>> {
    let start_tet = start_tet as usize;
    let row0 = &tet_verts[start_tet * 4..start_tet * 4 + 4];
    let others: Vec<Index> = row0.iter().copied().filter(|&v| v != v0 && v != v1).collect();
    if others.len() != 2 {
        return None;
    }
    let (mut a, mut b) = (others[0], others[1]);
    let mut ring = vec![a, b];
    let mut cur_tet = start_tet;
    loop {
        let row = &tet_verts[cur_tet * 4..cur_tet * 4 + 4];
        let pos_a = row.iter().position(|&v| v == a)?;
        let next_tet = dual[cur_tet * 4 + pos_a];
        if next_tet == adjacency::SENTINEL {
            return None;
        }
        let next_tet = next_tet as usize;
        let next_row = &tet_verts[next_tet * 4..next_tet * 4 + 4];
        let c = *next_row.iter().find(|&&v| v != v0 && v != v1 && v != b)?;
        if c == ring[0] {
            return Some(ring);
        }
        ring.push(c);
        if ring.len() > MAX_RING {
            return None;
        }
        a = b;
        b = c;
        cur_tet = next_tet;
    }
}

/// The `r - 2` triangles of a single fan from `ring[0]`, each paired
/// with both edge endpoints to produce `2 * (r - 2)` replacement tets.
fn fan_tets(ring: &[Index], v0: Index, v1: Index) -> Vec<[Index; 4]> {
    let r = ring.len();
    let mut out = Vec::with_capacity(2 * (r - 2));
    for i in 1..r - 1 {
        let (p, q, s) = (ring[0], ring[i], ring[i + 1]);
        out.push([v0, p, q, s]);
        out.push([v1, p, q, s]);
    }
    out
}

struct SwapCandidate {
    ring: Vec<Index>,
    replacement: Vec<[Index; 4]>,
    quality: f64,
}

fn evaluate_edge(
    e: usize,
    edge_verts: &[Index],
    tet_verts: &[Index],
    dual: &[Index],
    edge_up: &Up,
    coords: &[f64],
    good_quality: f64,
) -> Option<SwapCandidate> {
    let v0 = edge_verts[e * 2];
    let v1 = edge_verts[e * 2 + 1];
    let first = edge_up.offsets[e] as usize;
    let end = edge_up.offsets[e + 1] as usize;
    if end <= first {
        return None;
    }
    let start_tet = edge_up.adj[first];
    let ring = build_ring(tet_verts, dual, start_tet, v0, v1)?;
    if ring.len() < 3 || ring.len() != end - first {
        return None;
    }
    let old_min = (first..end)
        .map(|idx| {
            let t = edge_up.adj[idx] as usize;
            tet_quality(coords, &tet_verts[t * 4..t * 4 + 4])
        })
        .fold(f64::INFINITY, f64::min);
    let replacement = fan_tets(&ring, v0, v1);
    let new_min = replacement
        .iter()
        .map(|verts| tet_quality(coords, verts))
        .fold(f64::INFINITY, f64::min);
    if new_min >= good_quality && new_min > old_min + REQUIRE_BETTER_EPS {
        Some(SwapCandidate {
            ring,
            replacement,
            quality: new_min,
        })
    } else {
        None
    }
}

/// Swap every candidate-marked interior edge that admits a fan
/// retriangulation clearing the quality floor and strictly improving
/// on its current worst incident tet, subject to a non-conflicting
/// independent-set selection. Returns the rebuilt mesh and whether
/// anything changed. A no-op (returning the input unchanged) on any
/// mesh that is not 3-dimensional.
pub fn swap_by_quality(mesh: &Mesh, candidate_mask: &[u8], good_quality: f64) -> Result<(Mesh, bool), MeshError> {
    if mesh.dim() != 3 {
        return Ok((clone_mesh(mesh)?, false));
    }
    let n1 = mesh.count(1)?;
    let n_elems = mesh.count(3)?;
    let coords = mesh.require_f64_tag(0, COORDINATES);
    let edge_verts = mesh.ask_down(1, 0)?;
    let tet_verts = mesh.ask_down(3, 0)?;
    let dual = mesh.ask_dual()?;
    let edge_up = mesh.ask_up(1, 3)?;

    let mut candidates: Vec<Option<SwapCandidate>> = (0..n1).map(|_| None).collect();
    let mut goodness = vec![0.0f64; n1];
    let mut filter = vec![0u8; n1];
    for e in 0..n1 {
        if candidate_mask[e] == 0 {
            continue;
        }
        if let Some(c) = evaluate_edge(e, &edge_verts, &tet_verts, &dual, &edge_up, &coords, good_quality) {
            goodness[e] = c.quality;
            filter[e] = 1;
            candidates[e] = Some(c);
        }
    }

    if filter.iter().all(|&f| f == 0) {
        #[cfg(feature = "tracing")]
        tracing::trace!(n1, "swap: no candidate edge admitted an improving retriangulation");
        return Ok((clone_mesh(mesh)?, false));
    }

    // Two candidate edges conflict whenever they share an incident
    // tet, which swapping one would destroy out from under the other.
    let star = mesh.ask_star(1, 3)?;
    let selected = indset::select(n1, &star.offsets, &star.adj, &filter, &goodness);

    let mut removed_tet = vec![false; n_elems];
    let mut new_tet_verts: Vec<Index> = Vec::new();
    let mut new_tet_parent: Vec<usize> = Vec::new();
    for e in 0..n1 {
        if selected[e] == 0 {
            continue;
        }
        let c = candidates[e].as_ref().unwrap();
        let first = edge_up.offsets[e] as usize;
        let end = edge_up.offsets[e + 1] as usize;
        let parent = edge_up.adj[first] as usize;
        for idx in first..end {
            removed_tet[edge_up.adj[idx] as usize] = true;
        }
        for verts in &c.replacement {
            new_tet_verts.extend_from_slice(verts);
            new_tet_parent.push(parent);
        }
    }

    let mut kept_elems: Vec<Index> = Vec::new();
    let mut out_elem_verts: Vec<Index> = Vec::new();
    for elem in 0..n_elems {
        if removed_tet[elem] {
            continue;
        }
        kept_elems.push(elem as Index);
        out_elem_verts.extend_from_slice(&tet_verts[elem * 4..(elem + 1) * 4]);
    }
    let n_kept = kept_elems.len();
    out_elem_verts.extend_from_slice(&new_tet_verts);
    let n_new_elems = n_kept + new_tet_parent.len();

    let mut out = Mesh::new(3);
    out.set_ents(0, mesh.count(0)?, vec![])?;
    out.set_ents(3, n_new_elems, out_elem_verts)?;
    for i in 0..mesh.count_tags(0) {
        out.add_tag(0, mesh.get_tag(0, i).unwrap())?;
    }
    replicate_elem_tags(mesh, &out, &kept_elems, &new_tet_parent)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(elems_before = n_elems, elems_after = n_new_elems, "swap pass retriangulated edge rings");

    Ok((out, true))
}

/// The candidate-restriction wrapper `adapt` drives: only edges within
/// `nsliver_layers` hops (across the element dual) of a sub-floor
/// ("sliver") tet are considered for swapping.
pub fn swap_slivers(mesh: &Mesh, good_quality: f64, nsliver_layers: u8) -> Result<(Mesh, bool), MeshError> {
    if mesh.dim() != 3 {
        return Ok((clone_mesh(mesh)?, false));
    }
    let n_elems = mesh.count(3)?;
    let n1 = mesh.count(1)?;
    let coords = mesh.require_f64_tag(0, COORDINATES);
    let tet_verts = mesh.ask_down(3, 0)?;
    let dual = mesh.ask_dual()?;
    let down_3_1 = mesh.ask_down(3, 1)?;

    let mut frontier: VecDeque<usize> = VecDeque::new();
    let mut reachable = vec![false; n_elems];
    for t in 0..n_elems {
        let q = tet_quality(&coords, &tet_verts[t * 4..(t + 1) * 4]);
        if q < good_quality {
            reachable[t] = true;
            frontier.push_back(t);
        }
    }
    for _ in 0..nsliver_layers {
        let mut next: Vec<usize> = Vec::new();
        for &t in &frontier {
            for k in 0..4 {
                let nb = dual[t * 4 + k];
                if nb == adjacency::SENTINEL {
                    continue;
                }
                let nb = nb as usize;
                if !reachable[nb] {
                    reachable[nb] = true;
                    next.push(nb);
                }
            }
        }
        if next.is_empty() {
            break;
        }
        frontier = next.into();
    }

    let subs = down_3_1.len() / n_elems.max(1);
    let mut candidate_mask = vec![0u8; n1];
    for t in 0..n_elems {
        if !reachable[t] {
            continue;
        }
        for k in 0..subs {
            candidate_mask[down_3_1[t * subs + k] as usize] = 1;
        }
    }

    swap_by_quality(mesh, &candidate_mask, good_quality)
}

fn replicate_elem_tags(src: &Mesh, dst: &Mesh, kept_elems: &[Index], new_parents: &[usize]) -> Result<(), MeshError> {
    for i in 0..src.count_tags(3) {
        let tag = src.get_tag(3, i).unwrap();
        let width = tag.ncomps();
        let gathered = match tag.data() {
            TagData::F64(v) => TagData::F64(gather_then_replicate_f64(v, width, kept_elems, new_parents)),
            TagData::U32(v) => TagData::U32(gather_then_replicate_u32(v, width, kept_elems, new_parents)),
        };
        dst.add_tag(3, Tag::new(tag.name(), width, gathered))?;
    }
    Ok(())
}

fn gather_then_replicate_f64(a: &[f64], width: usize, kept: &[Index], new_parents: &[usize]) -> Vec<f64> {
    let mut out = Vec::with_capacity((kept.len() + new_parents.len()) * width);
    for &i in kept {
        out.extend_from_slice(&a[i as usize * width..(i as usize + 1) * width]);
    }
    for &p in new_parents {
        out.extend_from_slice(&a[p * width..(p + 1) * width]);
    }
    out
}

fn gather_then_replicate_u32(a: &[u32], width: usize, kept: &[Index], new_parents: &[usize]) -> Vec<u32> {
    let mut out = Vec::with_capacity((kept.len() + new_parents.len()) * width);
    for &i in kept {
        out.extend_from_slice(&a[i as usize * width..(i as usize + 1) * width]);
    }
    for &p in new_parents {
        out.extend_from_slice(&a[p * width..(p + 1) * width]);
    }
    out
}

fn clone_mesh(mesh: &Mesh) -> Result<Mesh, MeshError> {
    let d = mesh.dim();
    let n0 = mesh.count(0)?;
    let n_elems = mesh.count(d)?;
    let mut out = Mesh::new(d);
    out.set_ents(0, n0, vec![])?;
    out.set_ents(d, n_elems, mesh.ask_down(d, 0)?.to_vec())?;
    for dim in [0, d] {
        for i in 0..mesh.count_tags(dim) {
            let tag = mesh.get_tag(dim, i).unwrap();
            out.add_tag(dim, tag)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "swap_test.rs"]
mod swap_test;
