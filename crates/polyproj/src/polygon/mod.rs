//! Expanding-polygon construction in the projection plane.
//!
//! Purpose
//! - Build the projected polygon from support-point queries alone: seed a
//!   triangle, then push each edge outward until no feasible point lies beyond
//!   it.
//!
//! Layout
//! - `cycle.rs`: index-arena vertex cycle (`VertexCycle`, `VertexId`).
//! - `expand.rs`: bootstrap, worklist expansion, budget accounting.
//! - `finalize.rs`: clockwise ordering and near-duplicate compaction.
//!
//! Invariants
//! - The cycle is counter-clockwise and convex after every insertion: each new
//!   vertex is a support point strictly outside the edge it splits.
//! - `expanded` flags are only ever set, so `all_expanded()` is monotone.

mod cycle;
mod expand;
mod finalize;

pub use cycle::{Vertex, VertexCycle, VertexId};
pub use expand::{
    bootstrap, compute_polygon, expand, ExpandStats, Expansion, ExpansionStatus,
};
pub use finalize::{export_vertices, sort_vertices};
