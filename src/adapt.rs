//! The adaptation driver: alternates refinement, coarsening and
//! (in 3D) edge-swap until a pass produces no change or the pass
//! budget is exhausted.

use crate::coarsen;
use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::refine;
use crate::swap;

/// Tunable thresholds for [`adapt`]. All four fields are validated by
/// [`AdaptConfig::validate`] before a driver run begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptConfig {
    /// Edges shorter than `size_ratio_floor * target` trigger coarsening.
    pub size_ratio_floor: f64,
    /// Elements below this quality may be destroyed; the engine never
    /// creates one below it.
    pub good_quality: f64,
    /// Ring-neighbour radius considered when attempting sliver correction.
    pub nsliver_layers: u8,
    /// Hard cap on outer passes.
    pub max_passes: u32,
}

impl Default for AdaptConfig {
    fn default() -> Self {
        AdaptConfig {
            size_ratio_floor: 1.0 / 3.0,
            good_quality: 0.3,
            nsliver_layers: 4,
            max_passes: 50,
        }
    }
}

impl AdaptConfig {
    pub fn validate(&self) -> Result<(), MeshError> {
        check_range("size_ratio_floor", self.size_ratio_floor, 0.0, 0.5)?;
        check_range("good_quality", self.good_quality, 0.0, 1.0)?;
        check_range("nsliver_layers", self.nsliver_layers as f64, 0.0, 255.0)?;
        check_range("max_passes", self.max_passes as f64, 1.0, 100.0)?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, lo: f64, hi: f64) -> Result<(), MeshError> {
    if value < lo || value > hi {
        return Err(MeshError::ConfigOutOfRange { field, value, lo, hi });
    }
    Ok(())
}

/// Alternate refinement, coarsening and sliver-swap passes until a
/// pass changes nothing (converged, returns `true`) or `config.
/// max_passes` is exhausted without convergence (returns `false`).
/// `mesh` must already carry `coordinates` and `adapt_size`
/// vertex tags; classification tags are optional.
pub fn adapt(mesh: &Mesh, config: &AdaptConfig) -> Result<(Mesh, bool), MeshError> {
    config.validate()?;
    let mut current = clone_into(mesh)?;
    for pass in 0..config.max_passes {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("adapt_pass", pass).entered();
        let mut changed = false;

        let (next, did_refine) = refine::refine_by_size(&current, config.good_quality)?;
        current = next;
        changed |= did_refine;

        let (next, did_coarsen) = coarsen::coarsen_by_size(&current, config.size_ratio_floor, config.good_quality)?;
        current = next;
        changed |= did_coarsen;

        if current.dim() == 3 {
            let (next, did_swap) = swap::swap_slivers(&current, config.good_quality, config.nsliver_layers)?;
            current = next;
            changed |= did_swap;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(pass, changed, elems = current.count(current.dim())?, "adapt pass complete");

        if !changed {
            return Ok((current, true));
        }
    }
    #[cfg(feature = "tracing")]
    tracing::debug!(max_passes = config.max_passes, "adapt did not converge");
    Ok((current, false))
}

fn clone_into(mesh: &Mesh) -> Result<Mesh, MeshError> {
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
#[path = "adapt_test.rs"]
mod adapt_test;
