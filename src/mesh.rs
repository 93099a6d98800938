//! The mesh container: a fixed-dimension simplicial complex with
//! lazily-derived, cached adjacencies and a per-dimension tag
//! collection.
//!
//! Mirrors the ownership model of the teacher's `octree` module — one
//! struct holds every derived table behind interior mutability so
//! queries stay `&self` while still memoising, the same shape as an
//! octree node lazily materialising its children.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::adjacency::{self, Star, Up};
use crate::error::{fatal, Invariant, MeshError};
use crate::ints::Index;
use crate::tables::{self, canonical_order};
use crate::tag::{Tag, TagSet};

/// A simplicial mesh of fixed dimension `D ∈ {1, 2, 3}`.
///
/// Vertices (dimension 0) and elements (dimension `D`) are set once by
/// [`Mesh::set_ents`]; every dimension strictly between them is derived
/// on first query and cached for the mesh's lifetime. Modification
/// operators never mutate a `Mesh` in place — they build a fresh one.
pub struct Mesh {
    dim: usize,
    n0: Option<usize>,
    elem_verts: Option<Vec<Index>>,
    n_elems: Option<usize>,
    dim_counts: RefCell<HashMap<usize, usize>>,
    ent_verts: RefCell<HashMap<usize, Rc<Vec<Index>>>>,
    down: RefCell<HashMap<(usize, usize), Rc<Vec<Index>>>>,
    up: RefCell<HashMap<(usize, usize), Rc<Up>>>,
    star: RefCell<HashMap<(usize, usize), Rc<Star>>>,
    dual: RefCell<Option<Rc<Vec<Index>>>>,
    tags: RefCell<Vec<TagSet>>,
}

impl Mesh {
    /// Create an empty mesh of dimension `dim` (1, 2 or 3).
    pub fn new(dim: usize) -> Self {
        Mesh {
            dim,
            n0: None,
            elem_verts: None,
            n_elems: None,
            dim_counts: RefCell::new(HashMap::new()),
            ent_verts: RefCell::new(HashMap::new()),
            down: RefCell::new(HashMap::new()),
            up: RefCell::new(HashMap::new()),
            star: RefCell::new(HashMap::new()),
            dual: RefCell::new(None),
            tags: RefCell::new((0..=dim).map(|_| TagSet::new()).collect()),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    fn check_dim(&self, d: usize) -> Result<(), MeshError> {
        if d > self.dim {
            Err(MeshError::DimensionOutOfRange(d, self.dim))
        } else {
            Ok(())
        }
    }

    /// Set the vertex-to-vertex-index count (`dim = 0`) or the
    /// element-to-vertex table (`dim = self.dim()`). Every other
    /// dimension is derived, never set directly.
    pub fn set_ents(&mut self, dim: usize, n: usize, verts_of_ents: Vec<Index>) -> Result<(), MeshError> {
        self.check_dim(dim)?;
        if dim == 0 {
            self.n0 = Some(n);
            return Ok(());
        }
        if dim != self.dim {
            return Err(MeshError::DimensionOutOfRange(dim, self.dim));
        }
        let n0 = self.n0.ok_or(MeshError::EntitiesNotSet { dim: 0 })?;
        for &v in &verts_of_ents {
            if v as usize >= n0 {
                return Err(MeshError::VertexIndexOutOfRange {
                    index: v,
                    n_verts: n0 as u32,
                });
            }
        }
        debug_assert_eq!(verts_of_ents.len(), n * (dim + 1));
        self.elem_verts = Some(verts_of_ents);
        self.n_elems = Some(n);
        Ok(())
    }

    /// Entity count for dimension `d`. Forces derivation for any `d`
    /// strictly between 0 and `self.dim()`.
    pub fn count(&self, d: usize) -> Result<usize, MeshError> {
        self.check_dim(d)?;
        if d == 0 {
            return self.n0.ok_or(MeshError::EntitiesNotSet { dim: 0 });
        }
        if d == self.dim {
            return self.n_elems.ok_or(MeshError::EntitiesNotSet { dim: d });
        }
        if let Some(&n) = self.dim_counts.borrow().get(&d) {
            return Ok(n);
        }
        let verts = self.ask_ent_verts(d)?;
        let n = verts.len() / (d + 1);
        self.dim_counts.borrow_mut().insert(d, n);
        Ok(n)
    }

    /// The entity-to-vertex table for dimension `d` (width `d + 1`).
    /// Dimension 0 is the identity map; dimension `self.dim()` is the
    /// input element table; everything in between is derived directly
    /// from the elements and cached.
    fn ask_ent_verts(&self, d: usize) -> Result<Rc<Vec<Index>>, MeshError> {
        self.check_dim(d)?;
        if d == 0 {
            let n0 = self.n0.ok_or(MeshError::EntitiesNotSet { dim: 0 })?;
            return Ok(Rc::new((0..n0 as Index).collect()));
        }
        if d == self.dim {
            let ev = self
                .elem_verts
                .as_ref()
                .ok_or(MeshError::EntitiesNotSet { dim: d })?;
            return Ok(Rc::new(ev.clone()));
        }
        if let Some(v) = self.ent_verts.borrow().get(&d) {
            return Ok(v.clone());
        }
        let (verts, down_table) = self.derive_from_elems(d)?;
        let verts = Rc::new(verts);
        self.ent_verts.borrow_mut().insert(d, verts.clone());
        self.down
            .borrow_mut()
            .insert((self.dim, d), Rc::new(down_table));
        Ok(verts)
    }

    fn derive_from_elems(&self, l: usize) -> Result<(Vec<Index>, Vec<Index>), MeshError> {
        let d = self.dim;
        let n_d = self.n_elems.ok_or(MeshError::EntitiesNotSet { dim: d })?;
        let elem_verts = self
            .elem_verts
            .as_ref()
            .ok_or(MeshError::EntitiesNotSet { dim: d })?;
        let subs = tables::subs_per_ent(d, l);
        Ok(adjacency::derive_entities(d, l, n_d, subs, l + 1, elem_verts))
    }

    /// The downward table `d -> l`: the `(d+1 choose l+1)` `l`-subentities
    /// of each `d`-entity, by local ordinal.
    pub fn ask_down(&self, d: usize, l: usize) -> Result<Rc<Vec<Index>>, MeshError> {
        self.check_dim(d)?;
        if l >= d {
            return Err(MeshError::DimensionOutOfRange(l, d));
        }
        if l == 0 {
            return self.ask_ent_verts(d);
        }
        if let Some(t) = self.down.borrow().get(&(d, l)) {
            return Ok(t.clone());
        }
        if d == self.dim {
            // Deriving dimension l from the elements also produces the
            // down(dim, l) table as a side effect; route through it.
            let _ = self.ask_ent_verts(l)?;
            return Ok(self.down.borrow().get(&(d, l)).unwrap().clone());
        }
        // 0 < l < d < dim: match the d-entity's canonical l-subentity
        // vertex tuples against the already-derived l-entity set.
        let d_verts = self.ask_ent_verts(d)?;
        let l_verts = self.ask_ent_verts(l)?;
        let width = l + 1;
        let mut by_key: HashMap<Vec<Index>, Index> = HashMap::new();
        for i in 0..(l_verts.len() / width) {
            let mut key: Vec<Index> = l_verts[i * width..(i + 1) * width].to_vec();
            key.sort_unstable();
            by_key.insert(key, i as Index);
        }
        let subs = tables::subs_per_ent(d, l);
        let n_d = d_verts.len() / (d + 1);
        let mut table = vec![0 as Index; n_d * subs];
        for e in 0..n_d {
            for i in 0..subs {
                let mut key: Vec<Index> = (0..width)
                    .map(|k| d_verts[e * (d + 1) + canonical_order(d, l, i, k)])
                    .collect();
                key.sort_unstable();
                table[e * subs + i] = *by_key
                    .get(&key)
                    .unwrap_or_else(|| fatal(Invariant::UpDownMismatch));
            }
        }
        let table = Rc::new(table);
        self.down.borrow_mut().insert((d, l), table.clone());
        Ok(table)
    }

    /// Upward incidence `l -> d`, CSR with a parallel local-direction array.
    pub fn ask_up(&self, l: usize, d: usize) -> Result<Rc<Up>, MeshError> {
        if let Some(u) = self.up.borrow().get(&(l, d)) {
            return Ok(u.clone());
        }
        let n_l = self.count(l)?;
        let n_d = self.count(d)?;
        let subs = tables::subs_per_ent(d, l);
        let down = self.ask_down(d, l)?;
        let up = Rc::new(adjacency::upward_from_downward(n_l, n_d, subs, &down));
        self.up.borrow_mut().insert((l, d), up.clone());
        Ok(up)
    }

    /// The star of `l`-entities across shared `d`-entities.
    pub fn ask_star(&self, l: usize, d: usize) -> Result<Rc<Star>, MeshError> {
        if let Some(s) = self.star.borrow().get(&(l, d)) {
            return Ok(s.clone());
        }
        let n_l = self.count(l)?;
        let subs = tables::subs_per_ent(d, l);
        let up = self.ask_up(l, d)?;
        let down = self.ask_down(d, l)?;
        let star = Rc::new(adjacency::star_from_up_down(n_l, &up, &down, subs));
        self.star.borrow_mut().insert((l, d), star.clone());
        Ok(star)
    }

    /// The element-element dual across shared `(D-1)`-faces.
    pub fn ask_dual(&self) -> Result<Rc<Vec<Index>>, MeshError> {
        if let Some(d) = self.dual.borrow().as_ref() {
            return Ok(d.clone());
        }
        let n_elems = self.n_elems.ok_or(MeshError::EntitiesNotSet { dim: self.dim })?;
        let elem_verts = self
            .elem_verts
            .as_ref()
            .ok_or(MeshError::EntitiesNotSet { dim: self.dim })?;
        let vert_up = self.ask_up(0, self.dim)?;
        let dual = Rc::new(adjacency::dual_from_elem_verts(
            self.dim, n_elems, elem_verts, &vert_up,
        ));
        *self.dual.borrow_mut() = Some(dual.clone());
        Ok(dual)
    }

    // -- tags --------------------------------------------------------

    pub fn add_tag(&self, dim: usize, tag: Tag) -> Result<(), MeshError> {
        self.check_dim(dim)?;
        let n = self.count(dim)?;
        let expected = n * tag.ncomps();
        if tag.data().len() != expected {
            return Err(MeshError::TagDataLengthMismatch {
                expected,
                actual: tag.data().len(),
            });
        }
        self.tags.borrow_mut()[dim].add(dim, tag)
    }

    pub fn find_tag(&self, dim: usize, name: &str) -> Option<Tag> {
        self.tags.borrow()[dim].find(name).cloned()
    }

    pub fn remove_tag(&self, dim: usize, name: &str) -> Result<Tag, MeshError> {
        self.tags.borrow_mut()[dim].remove(dim, name)
    }

    pub fn count_tags(&self, dim: usize) -> usize {
        self.tags.borrow()[dim].count()
    }

    pub fn get_tag(&self, dim: usize, i: usize) -> Option<Tag> {
        self.tags.borrow()[dim].get(i).cloned()
    }

    /// Shorthand used throughout the pipelines: the `coordinates` tag's
    /// backing data for a vertex, or a fatal invariant if absent —
    /// every mesh this crate produces carries it by construction.
    pub(crate) fn require_f64_tag(&self, dim: usize, name: &'static str) -> Vec<f64> {
        self.find_tag(dim, name)
            .and_then(|t| t.data().as_f64().map(|s| s.to_vec()))
            .unwrap_or_else(|| fatal(Invariant::MissingPipelineTag(name)))
    }

    pub(crate) fn require_u32_tag(&self, dim: usize, name: &'static str) -> Option<Vec<u32>> {
        self.find_tag(dim, name)
            .and_then(|t| t.data().as_u32().map(|s| s.to_vec()))
    }
}

#[cfg(test)]
#[path = "mesh_test.rs"]
mod mesh_test;
