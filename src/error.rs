//! Error types for the mesh adaptation core.
//!
//! Two families, matching the split the rest of the crate relies on:
//!
//! - [`MeshError`] covers mistakes a caller can make at the external
//!   boundary (bad dimension, unknown tag, malformed config) and is
//!   returned as an ordinary `Result`.
//! - [`Invariant`] covers conditions that can only mean a bug in this
//!   crate or in a caller that bypassed the `mesh_*` API to hand-build
//!   connectivity. A violation is fatal: [`fatal`] panics with a
//!   diagnostic naming the predicate, mirroring the `abort()` calls in
//!   the original C core (e.g. `independent_set.c` aborting once its
//!   fixed-point iteration exceeds 100 rounds).

use thiserror::Error;

/// Caller-recoverable errors from the mesh container and adaptation driver.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    #[error("dimension {0} is out of range for a mesh of dimension {1}")]
    DimensionOutOfRange(usize, usize),

    #[error("tag '{name}' not found on dimension {dim}")]
    TagNotFound { dim: usize, name: String },

    #[error("tag '{name}' already exists on dimension {dim}")]
    TagAlreadyExists { dim: usize, name: String },

    #[error("tag '{name}' has width {actual}, expected {expected}")]
    TagWidthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("tag '{name}' has kind {actual:?}, expected {expected:?}")]
    TagKindMismatch {
        name: String,
        expected: crate::tag::TagKind,
        actual: crate::tag::TagKind,
    },

    #[error("vertex index {index} in element-to-vertex table is out of range (n_0 = {n_verts})")]
    VertexIndexOutOfRange { index: u32, n_verts: u32 },

    #[error("tag data length {actual} does not match expected length {expected}")]
    TagDataLengthMismatch { expected: usize, actual: usize },

    #[error(
        "config field '{field}' = {value} is out of its valid range {lo}..={hi}"
    )]
    ConfigOutOfRange {
        field: &'static str,
        value: f64,
        lo: f64,
        hi: f64,
    },

    #[error("required tag '{name}' missing on dimension {dim} for this operation")]
    RequiredTagMissing { dim: usize, name: String },

    #[error("entities for dimension {dim} have not been set on this mesh")]
    EntitiesNotSet { dim: usize },
}

/// Fatal-invariant conditions. A violation is a bug, not a caller mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invariant {
    /// `bridge_graph` was handed a star whose half-edge count is odd.
    OddHalfEdgeCount,
    /// the independent-set fixed point did not settle within 100 rounds.
    IndependentSetDidNotConverge,
    /// a downward table entry did not round-trip through the matching
    /// upward incidence.
    UpDownMismatch,
    /// the dual derivation found a face shared by more or fewer than
    /// two elements at exactly `D` shared vertices.
    DualFaceAmbiguous,
    /// a required tag was absent where the *pipeline* (not the caller)
    /// expects it to always exist by construction.
    MissingPipelineTag(&'static str),
}

impl std::fmt::Display for Invariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Invariant::OddHalfEdgeCount => {
                write!(f, "bridge graph: half-edge count is odd")
            }
            Invariant::IndependentSetDidNotConverge => {
                write!(f, "independent set: did not converge within 100 rounds")
            }
            Invariant::UpDownMismatch => {
                write!(f, "upward adjacency does not round-trip through downward table")
            }
            Invariant::DualFaceAmbiguous => {
                write!(f, "dual: a face matched an unexpected number of neighbours")
            }
            Invariant::MissingPipelineTag(name) => {
                write!(f, "pipeline expected tag '{name}' to exist but it was absent")
            }
        }
    }
}

/// Abort the process, identifying the violated predicate.
///
/// This never returns. Invariant violations are bugs; there is no
/// well-defined state to recover into.
#[cold]
pub fn fatal(inv: Invariant) -> ! {
    panic!("simplex_adapt: fatal invariant violation: {inv}");
}
