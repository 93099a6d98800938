//! Entity-split refinement: mark over-long edges, evaluate the quality
//! each split would produce, pick a non-conflicting set, and rebuild.
//!
//! Only source dimension `s = 1` (edge splitting) is implemented —
//! splitting at higher source dimensions is combinatorially optional
//! and this crate never marks candidates above `s = 1`.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::error::MeshError;
use crate::floats;
use crate::indset;
use crate::ints::{exscan, Index};
use crate::mesh::Mesh;
use crate::quality;
use crate::tag::{Tag, TagData, ADAPT_SIZE, CLASS_DIM, CLASS_ID, COORDINATES};

/// A simplex's vertex row. `D + 1` entries for `D` in `{1, 2, 3}`, so
/// this never spills to the heap.
type Row = SmallVec<[Index; 4]>;

fn vertex_coords(coords: &[f64], v: Index) -> [f64; 3] {
    let i = v as usize * 3;
    [coords[i], coords[i + 1], coords[i + 2]]
}

/// Recursively bisect a `D`-simplex (given as `D+1` vertex ids) at any
/// of its original edges found in `edge_mid`, propagating the
/// remaining selections into each half. Works for every dimension in
/// `{1, 2, 3}` uniformly: an edge bisection of a `D`-simplex replaces
/// it by two `D`-simplices sharing the face opposite the split edge.
fn split_simplex(verts: Row, edge_mid: &HashMap<(Index, Index), Index>) -> Vec<Row> {
    let n = verts.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let key = (verts[i].min(verts[j]), verts[i].max(verts[j]));
            if let Some(&m) = edge_mid.get(&key) {
                let mut child_a = verts.clone();
                child_a[j] = m;
                let mut child_b = verts.clone();
                child_b[i] = m;
                let mut out = split_simplex(child_a, edge_mid);
                out.extend(split_simplex(child_b, edge_mid));
                return out;
            }
        }
    }
    vec![verts]
}

/// Minimum quality over the children produced by splitting `elem` at
/// `edge` (endpoints `va`, `vb`) with a hypothetical midpoint at
/// `mid_coords`, evaluated in isolation from every other candidate.
fn preview_split_quality(
    d: usize,
    elem_verts: &[Index],
    coords: &[f64],
    va: Index,
    vb: Index,
    mid_coords: [f64; 3],
) -> f64 {
    const PREVIEW_ID: Index = Index::MAX - 1;
    let mut edge_mid = HashMap::new();
    edge_mid.insert((va.min(vb), va.max(vb)), PREVIEW_ID);
    let children = split_simplex(Row::from_slice(elem_verts), &edge_mid);
    children
        .iter()
        .map(|child| {
            let pts: Vec<[f64; 3]> = child
                .iter()
                .map(|&v| {
                    if v == PREVIEW_ID {
                        mid_coords
                    } else {
                        vertex_coords(coords, v)
                    }
                })
                .collect();
            quality::quality(d, &pts)
        })
        .fold(f64::INFINITY, f64::min)
}

/// Refine a mesh by splitting every edge whose length exceeds the
/// target length implied by the `adapt_size` tag, subject to a quality
/// floor. Returns the refined mesh and whether anything changed.
pub fn refine_by_size(mesh: &Mesh, good_quality: f64) -> Result<(Mesh, bool), MeshError> {
    let d = mesh.dim();
    let n0 = mesh.count(0)?;
    let n_elems = mesh.count(d)?;
    let n1 = mesh.count(1)?;
    let coords = mesh.require_f64_tag(0, COORDINATES);
    let sizes = mesh.require_f64_tag(0, ADAPT_SIZE);
    let class_dim = mesh.require_u32_tag(0, CLASS_DIM).unwrap_or_default();
    let class_id = mesh.require_u32_tag(0, CLASS_ID).unwrap_or_default();

    let edge_verts = mesh.ask_down(1, 0)?;
    let elem_verts = mesh.ask_down(d, 0)?;
    // For a 1D mesh the elements are the edges themselves (same ids, same
    // order), so there is no separate down(d, 1) table to derive.
    let (down_elem_edges, subs): (Vec<Index>, usize) = if d == 1 {
        ((0..n_elems as Index).collect(), 1)
    } else {
        let t = mesh.ask_down(d, 1)?;
        let subs = t.len() / n_elems.max(1);
        (t.to_vec(), subs)
    };

    // Step 1-2: mark and quality-check candidates.
    let mut candidate = vec![0u8; n1];
    let mut goodness = vec![0.0f64; n1];
    // A 1D mesh's edges are its elements: each is incident to exactly
    // itself, and no two edges ever compete for the same element.
    let edge_up: crate::adjacency::Up = if d == 1 {
        crate::adjacency::Up {
            offsets: (0..=n1 as Index).collect(),
            adj: (0..n1 as Index).collect(),
            directions: vec![0; n1],
        }
    } else {
        (*mesh.ask_up(1, d)?).clone()
    };
    for e in 0..n1 {
        let va = edge_verts[e * 2];
        let vb = edge_verts[e * 2 + 1];
        let pa = vertex_coords(&coords, va);
        let pb = vertex_coords(&coords, vb);
        let length = ((pa[0] - pb[0]).powi(2) + (pa[1] - pb[1]).powi(2) + (pa[2] - pb[2]).powi(2)).sqrt();
        let target = 0.5 * (sizes[va as usize] + sizes[vb as usize]);
        if length <= target {
            continue;
        }
        let mid = [
            0.5 * (pa[0] + pb[0]),
            0.5 * (pa[1] + pb[1]),
            0.5 * (pa[2] + pb[2]),
        ];
        let first = edge_up.offsets[e] as usize;
        let end = edge_up.offsets[e + 1] as usize;
        let mut min_q = f64::INFINITY;
        for idx in first..end {
            let elem = edge_up.adj[idx] as usize;
            let row = &elem_verts[elem * (d + 1)..(elem + 1) * (d + 1)];
            let q = preview_split_quality(d, row, &coords, va, vb, mid);
            min_q = min_q.min(q);
        }
        // Unlike coarsen and swap, refine has no require-better check: it
        // only rejects a split that falls below the floor. Bisecting an
        // edge replaces one element by several smaller ones, and on an
        // already-decent element (the common case, since refine fires on
        // size, not quality) the best those children can do is match the
        // parent's quality, never beat it — a strict-improvement gate
        // here would reject most legal splits and defeat refine's actual
        // job of growing resolution where the size field demands it.
        if min_q >= good_quality {
            candidate[e] = 1;
            goodness[e] = min_q;
        }
    }

    if candidate.iter().all(|&c| c == 0) {
        #[cfg(feature = "tracing")]
        tracing::trace!(n1, "refine: no edge cleared the length/quality bar");
        return Ok((clone_mesh(mesh)?, false));
    }

    // Step 3: independent set on the edge star across D-elements. In a
    // 1D mesh every edge is its own element, so no two candidates ever
    // conflict.
    let star: crate::adjacency::Star = if d == 1 {
        crate::adjacency::Star {
            offsets: vec![0; n1 + 1],
            adj: vec![],
        }
    } else {
        (*mesh.ask_star(1, d)?).clone()
    };
    let selected = indset::select(n1, &star.offsets, &star.adj, &candidate, &goodness);

    // Step 4: new vertex indices.
    let gen_offset = exscan(&selected.iter().map(|&s| s as Index).collect::<Vec<_>>());
    let n_new_verts = gen_offset[n1] as usize;

    let mut new_coords = coords.clone();
    let mut new_sizes = sizes.clone();
    let mut new_class_dim = class_dim.clone();
    let mut new_class_id = class_id.clone();
    let mut edge_mid: HashMap<(Index, Index), Index> = HashMap::new();
    for e in 0..n1 {
        if selected[e] == 0 {
            continue;
        }
        let new_v = (n0 + gen_offset[e] as usize) as Index;
        let va = edge_verts[e * 2];
        let vb = edge_verts[e * 2 + 1];
        edge_mid.insert((va.min(vb), va.max(vb)), new_v);
        new_coords.extend_from_slice(&floats::average_rows(&coords, 3, &[va, vb]));
        new_sizes.push(0.5 * (sizes[va as usize] + sizes[vb as usize]));
        if !class_dim.is_empty() {
            let (cd, ci) = quality::inherit_classification(&[
                (va, class_dim[va as usize], class_id[va as usize]),
                (vb, class_dim[vb as usize], class_id[vb as usize]),
            ]);
            new_class_dim.push(cd);
            new_class_id.push(ci);
        }
    }

    // Step 5-8: rebuild elements, replicate element tags, concatenate.
    let mut new_elem_verts: Vec<Index> = Vec::new();
    let mut children_per_elem: Vec<usize> = Vec::with_capacity(n_elems);
    for elem in 0..n_elems {
        let row: Row = Row::from_slice(&elem_verts[elem * (d + 1)..(elem + 1) * (d + 1)]);
        let local_edges = &down_elem_edges[elem * subs..(elem + 1) * subs];
        let local_edge_mid: HashMap<(Index, Index), Index> = local_edges
            .iter()
            .filter_map(|&e| {
                edge_mid
                    .get(&(edge_verts[e as usize * 2].min(edge_verts[e as usize * 2 + 1]),
                           edge_verts[e as usize * 2].max(edge_verts[e as usize * 2 + 1])))
                    .map(|&m| {
                        let a = edge_verts[e as usize * 2];
                        let b = edge_verts[e as usize * 2 + 1];
                        ((a.min(b), a.max(b)), m)
                    })
            })
            .collect();
        let children = split_simplex(row, &local_edge_mid);
        children_per_elem.push(children.len());
        for child in children {
            new_elem_verts.extend(child);
        }
    }
    let n_new_elems = new_elem_verts.len() / (d + 1);

    let mut out = Mesh::new(d);
    out.set_ents(0, n0 + n_new_verts, vec![])?;
    out.set_ents(d, n_new_elems, new_elem_verts)?;
    out.add_tag(0, Tag::new(COORDINATES, 3, TagData::F64(new_coords)))?;
    out.add_tag(0, Tag::new(ADAPT_SIZE, 1, TagData::F64(new_sizes)))?;
    if !new_class_dim.is_empty() {
        out.add_tag(0, Tag::new(CLASS_DIM, 1, TagData::U32(new_class_dim)))?;
        out.add_tag(0, Tag::new(CLASS_ID, 1, TagData::U32(new_class_id)))?;
    }
    replicate_elem_tags(mesh, &out, d, &children_per_elem)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(split = n_new_verts, elems_before = n_elems, elems_after = n_new_elems, "refine pass split edges");

    Ok((out, true))
}

fn replicate_elem_tags(src: &Mesh, dst: &Mesh, d: usize, children_per_elem: &[usize]) -> Result<(), MeshError> {
    for i in 0..src.count_tags(d) {
        let tag = src.get_tag(d, i).unwrap();
        if tag.name() == COORDINATES || tag.name() == ADAPT_SIZE {
            continue;
        }
        let expanded = match tag.data() {
            TagData::F64(v) => TagData::F64(replicate_rows_f64(v, tag.ncomps(), children_per_elem)),
            TagData::U32(v) => TagData::U32(replicate_rows_u32(v, tag.ncomps(), children_per_elem)),
        };
        dst.add_tag(d, Tag::new(tag.name(), tag.ncomps(), expanded))?;
    }
    Ok(())
}

fn replicate_rows_f64(a: &[f64], width: usize, counts: &[usize]) -> Vec<f64> {
    let mut out = Vec::new();
    for (i, &c) in counts.iter().enumerate() {
        let row = &a[i * width..(i + 1) * width];
        for _ in 0..c {
            out.extend_from_slice(row);
        }
    }
    out
}

fn replicate_rows_u32(a: &[u32], width: usize, counts: &[usize]) -> Vec<u32> {
    let mut out = Vec::new();
    for (i, &c) in counts.iter().enumerate() {
        let row = &a[i * width..(i + 1) * width];
        for _ in 0..c {
            out.extend_from_slice(row);
        }
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
#[path = "refine_test.rs"]
mod refine_test;
