//! Vertex-collapse coarsening: mark short edges, pick a safe collapse
//! direction for each endpoint, select a non-conflicting subset, and
//! rebuild.
//!
//! Follows the pipeline order `coarsen_common.c` uses: classification
//! check, quality-of-collapse check, early return on no candidates,
//! best outbound collapse per vertex, independent set over the vertex
//! star, then a kept/removed vertex remap used to rebuild elements and
//! migrate tags.

use crate::error::MeshError;
use crate::indset;
use crate::ints::{exscan, Index};
use crate::mesh::Mesh;
use crate::quality;
use crate::tag::{Tag, TagData, ADAPT_SIZE, CLASS_DIM, CLASS_ID, COORDINATES};

fn vertex_coords(coords: &[f64], v: Index) -> [f64; 3] {
    let i = v as usize * 3;
    [coords[i], coords[i + 1], coords[i + 2]]
}

fn edge_length(coords: &[f64], a: Index, b: Index) -> f64 {
    let pa = vertex_coords(coords, a);
    let pb = vertex_coords(coords, b);
    ((pa[0] - pb[0]).powi(2) + (pa[1] - pb[1]).powi(2) + (pa[2] - pb[2]).powi(2)).sqrt()
}

/// "require-better" mode is always on: a collapse is only admitted if
/// it strictly improves the cavity's minimum quality by more than this
/// epsilon, matching the threshold the original core folds into its
/// own require-better floor.
const REQUIRE_BETTER_EPS: f64 = 1e-10;

/// The minimum quality over every element incident to `v` that would
/// survive a collapse of `v` onto `u` — elements incident to both `v`
/// and `u` vanish instead of being evaluated — paired with the minimum
/// quality those same surviving elements have *before* the collapse.
/// Both are `1.0` (vacuously perfect) if every incident element
/// vanishes.
fn collapse_quality(
    d: usize,
    elem_verts: &[Index],
    coords: &[f64],
    incident: &[Index],
    v: Index,
    u: Index,
) -> (f64, f64) {
    let mut min_q = f64::INFINITY;
    let mut old_min = f64::INFINITY;
    for &elem in incident {
        let row = &elem_verts[elem as usize * (d + 1)..(elem as usize + 1) * (d + 1)];
        if row.contains(&u) {
            continue;
        }
        let pts: Vec<[f64; 3]> = row
            .iter()
            .map(|&w| vertex_coords(coords, if w == v { u } else { w }))
            .collect();
        min_q = min_q.min(quality::quality(d, &pts));
        let old_pts: Vec<[f64; 3]> = row.iter().map(|&w| vertex_coords(coords, w)).collect();
        old_min = old_min.min(quality::quality(d, &old_pts));
    }
    (
        if min_q.is_infinite() { 1.0 } else { min_q },
        if old_min.is_infinite() { 1.0 } else { old_min },
    )
}

/// Coarsen a mesh by collapsing every edge shorter than
/// `size_ratio_floor` times the target length implied by `adapt_size`,
/// subject to a classification-preservation check and a quality floor.
/// Returns the coarsened mesh and whether anything changed.
pub fn coarsen_by_size(mesh: &Mesh, size_ratio_floor: f64, good_quality: f64) -> Result<(Mesh, bool), MeshError> {
    let d = mesh.dim();
    let n0 = mesh.count(0)?;
    let n_elems = mesh.count(d)?;
    let coords = mesh.require_f64_tag(0, COORDINATES);
    let sizes = mesh.require_f64_tag(0, ADAPT_SIZE);
    let class_dim = mesh.require_u32_tag(0, CLASS_DIM);
    let class_id = mesh.require_u32_tag(0, CLASS_ID);

    let elem_verts = mesh.ask_down(d, 0)?;
    let vert_up = mesh.ask_up(0, d)?;

    // Step 1-2: for each vertex, find its best legal outbound collapse.
    let mut candidate = vec![0u8; n0];
    let mut goodness = vec![0.0f64; n0];
    let mut target = vec![0 as Index; n0];
    for v in 0..n0 {
        let first = vert_up.offsets[v] as usize;
        let end = vert_up.offsets[v + 1] as usize;
        let incident: Vec<Index> = vert_up.adj[first..end].to_vec();

        let mut neighbours: Vec<Index> = Vec::new();
        for &elem in &incident {
            let row = &elem_verts[elem as usize * (d + 1)..(elem as usize + 1) * (d + 1)];
            for &w in row {
                if w as usize != v {
                    neighbours.push(w);
                }
            }
        }
        neighbours.sort_unstable();
        neighbours.dedup();

        let mut best_q = -1.0f64;
        let mut best_u = 0 as Index;
        for &u in &neighbours {
            let length = edge_length(&coords, v as Index, u);
            let size_target = 0.5 * (sizes[v] + sizes[u as usize]);
            if length >= size_ratio_floor * size_target {
                continue;
            }
            if let (Some(cd), Some(ci)) = (class_dim.as_ref(), class_id.as_ref()) {
                if !quality::collapse_preserves_classification(cd[u as usize], ci[u as usize], cd[v], ci[v]) {
                    continue;
                }
            }
            let (q, old_q) = collapse_quality(d, &elem_verts, &coords, &incident, v as Index, u);
            // See the require-better note on refine_by_size: a 1D mesh's
            // elements are edges, whose quality is always 1.0, so the
            // check is only enforced for d > 1.
            let require_better_ok = d == 1 || q > old_q + REQUIRE_BETTER_EPS;
            if q >= good_quality && require_better_ok && q > best_q {
                best_q = q;
                best_u = u;
            }
        }
        if best_q >= 0.0 {
            candidate[v] = 1;
            goodness[v] = best_q;
            target[v] = best_u;
        }
    }

    if candidate.iter().all(|&c| c == 0) {
        #[cfg(feature = "tracing")]
        tracing::trace!(n0, "coarsen: no vertex admitted a legal collapse");
        return Ok((clone_mesh(mesh)?, false));
    }

    // Step 3: independent set over the vertex star — two candidates
    // conflict whenever they share an incident element, which is also
    // exactly when either could be the other's collapse target.
    let star = mesh.ask_star(0, d)?;
    let selected = indset::select(n0, &star.offsets, &star.adj, &candidate, &goodness);

    // Step 4: kept/removed vertex remap.
    let kept_mask: Vec<Index> = (0..n0).map(|v| (selected[v] == 0) as Index).collect();
    let kept_offsets = exscan(&kept_mask);
    let n_new_verts = kept_offsets[n0] as usize;
    let mut new_id = vec![0 as Index; n0];
    for v in 0..n0 {
        if selected[v] == 0 {
            new_id[v] = kept_offsets[v];
        }
    }
    for v in 0..n0 {
        if selected[v] == 1 {
            // The independent-set property guarantees target[v] is not
            // itself selected: it shares an incident element with v.
            new_id[v] = new_id[target[v] as usize];
        }
    }

    let mut new_coords = Vec::with_capacity(n_new_verts * 3);
    let mut new_sizes = Vec::with_capacity(n_new_verts);
    let mut new_class_dim = Vec::with_capacity(n_new_verts);
    let mut new_class_id = Vec::with_capacity(n_new_verts);
    for v in 0..n0 {
        if selected[v] == 1 {
            continue;
        }
        new_coords.extend_from_slice(&vertex_coords(&coords, v as Index));
        new_sizes.push(sizes[v]);
        if let (Some(cd), Some(ci)) = (class_dim.as_ref(), class_id.as_ref()) {
            new_class_dim.push(cd[v]);
            new_class_id.push(ci[v]);
        }
    }

    // Step 5-6: remap element vertices, dropping any element that
    // collapses to a degenerate (repeated-vertex) row.
    let mut new_elem_verts: Vec<Index> = Vec::new();
    let mut kept_elems: Vec<Index> = Vec::new();
    for elem in 0..n_elems {
        let row = &elem_verts[elem * (d + 1)..(elem + 1) * (d + 1)];
        let mapped: Vec<Index> = row.iter().map(|&w| new_id[w as usize]).collect();
        let mut dedup = mapped.clone();
        dedup.sort_unstable();
        dedup.dedup();
        if dedup.len() == mapped.len() {
            new_elem_verts.extend(mapped);
            kept_elems.push(elem as Index);
        }
    }
    let n_new_elems = kept_elems.len();

    let mut out = Mesh::new(d);
    out.set_ents(0, n_new_verts, vec![])?;
    out.set_ents(d, n_new_elems, new_elem_verts)?;
    out.add_tag(0, Tag::new(COORDINATES, 3, TagData::F64(new_coords)))?;
    out.add_tag(0, Tag::new(ADAPT_SIZE, 1, TagData::F64(new_sizes)))?;
    if !new_class_dim.is_empty() {
        out.add_tag(0, Tag::new(CLASS_DIM, 1, TagData::U32(new_class_dim)))?;
        out.add_tag(0, Tag::new(CLASS_ID, 1, TagData::U32(new_class_id)))?;
    }
    replicate_elem_tags(mesh, &out, d, &kept_elems)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(collapsed = n0 - n_new_verts, elems_before = n_elems, elems_after = n_new_elems, "coarsen pass collapsed vertices");

    Ok((out, true))
}

fn replicate_elem_tags(src: &Mesh, dst: &Mesh, d: usize, kept_elems: &[Index]) -> Result<(), MeshError> {
    for i in 0..src.count_tags(d) {
        let tag = src.get_tag(d, i).unwrap();
        if tag.name() == COORDINATES || tag.name() == ADAPT_SIZE {
            continue;
        }
        let width = tag.ncomps();
        let gathered = match tag.data() {
            TagData::F64(v) => TagData::F64(gather_rows_f64(v, width, kept_elems)),
            TagData::U32(v) => TagData::U32(gather_rows_u32(v, width, kept_elems)),
        };
        dst.add_tag(d, Tag::new(tag.name(), width, gathered))?;
    }
    Ok(())
}

fn gather_rows_f64(a: &[f64], width: usize, indices: &[Index]) -> Vec<f64> {
    let mut out = Vec::with_capacity(indices.len() * width);
    for &i in indices {
        out.extend_from_slice(&a[i as usize * width..(i as usize + 1) * width]);
    }
    out
}

fn gather_rows_u32(a: &[u32], width: usize, indices: &[Index]) -> Vec<u32> {
    let mut out = Vec::with_capacity(indices.len() * width);
    for &i in indices {
        out.extend_from_slice(&a[i as usize * width..(i as usize + 1) * width]);
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
#[path = "coarsen_test.rs"]
mod coarsen_test;
