//! Curated surface for callers (UNSTABLE).
//!
//! - Flat re-exports of everything a projection caller or an alternative
//!   oracle/solver needs. Module paths behind it may move.

// Inputs
pub use crate::system::{AffineProjection, ConstraintSystem, Equalities, ExtendedSystem, Inequalities};
// Projection
pub use crate::cfg::{ProjectionCfg, DISTINCT_EPS, TIGHT_EPS};
pub use crate::project::{project_polygon, project_polygon_default, PolygonProjection};
// Engine pieces
pub use crate::oracle::{DirectionOracle, LpOracle};
pub use crate::polygon::{
    bootstrap, compute_polygon, expand, export_vertices, sort_vertices, ExpandStats, Expansion,
    ExpansionStatus, VertexCycle, VertexId,
};
// LP seam and helpers
pub use crate::lp::{solve_lp, DenseSimplex, LinearProgram, LpSolver, SimplexCfg};
pub use crate::polyhedron::{chebyshev_center, ChebyshevBall};
