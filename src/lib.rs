//! A parallel-friendly, single-owner core for adapting simplicial
//! meshes (edges, triangles, tetrahedra) to a target edge-length field
//! and a minimum shape-quality floor.
//!
//! ```text
//!            ┌─────────────┐
//!            │    Mesh     │  vertices + D-elements, lazily
//!            │ (container) │  derived & cached adjacency, tags
//!            └──────┬──────┘
//!                   │ ask_down / ask_up / ask_star / ask_dual
//!         ┌─────────┼─────────┐
//!         ▼         ▼         ▼
//!     refine     coarsen     swap      ← one candidate-evaluate-
//!       │           │          │          select-rebuild pass each,
//!       └─────┬─────┴────┬─────┘          tied together by indset
//!             ▼          ▼
//!                adapt (driver loop)
//! ```
//!
//! Every pipeline follows the same shape: mark candidates, evaluate
//! the quality each would produce, resolve conflicts with a
//! deterministic independent-set selection, then rebuild the mesh in
//! one bulk pass rather than mutating it in place. [`adapt`] drives
//! [`refine_by_size`], [`coarsen_by_size`] and [`swap_slivers`] in
//! alternation until a pass changes nothing or the pass budget runs
//! out.

pub mod adapt;
pub mod adjacency;
pub mod bridge;
pub mod coarsen;
pub mod error;
pub mod floats;
pub mod indset;
pub mod ints;
pub mod mesh;
pub mod quality;
pub mod refine;
pub mod swap;
pub mod tables;
pub mod tag;

pub use adapt::{adapt, AdaptConfig};
pub use coarsen::coarsen_by_size;
pub use error::{fatal, Invariant, MeshError};
pub use ints::Index;
pub use mesh::Mesh;
pub use refine::refine_by_size;
pub use swap::{swap_by_quality, swap_slivers};
pub use tag::{Tag, TagData, TagKind, ADAPT_SIZE, CLASS_DIM, CLASS_ID, COORDINATES};
