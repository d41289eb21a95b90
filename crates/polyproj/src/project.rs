//! Projection front door: validate, build the extended system, expand, export.
//!
//! Purpose
//! - One call from `(ConstraintSystem, AffineProjection, ProjectionCfg)` to an
//!   ordered list of polygon vertices.
//!
//! Order of checks
//! - Configuration, then projection shape and column counts (inside
//!   `ExtendedSystem::build`), then the equality-block requirement. All of these
//!   fail before the solver is touched.

use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{info, info_span};

use crate::cfg::ProjectionCfg;
use crate::error::ProjectionError;
use crate::lp::{DenseSimplex, LpSolver};
use crate::oracle::LpOracle;
use crate::polygon::{compute_polygon, export_vertices, sort_vertices, ExpansionStatus};
use crate::system::{AffineProjection, ConstraintSystem, ExtendedSystem};

/// Result of one projection.
#[derive(Clone, Debug)]
pub struct PolygonProjection {
    /// Clockwise vertices starting at the bottom edge, compacted by `min_dist`.
    pub vertices: Vec<Vector2<f64>>,
    pub status: ExpansionStatus,
    /// Vertices inserted by the expansion loop.
    pub iterations: usize,
    /// LP solves issued (bootstrap and expansion).
    pub queries: usize,
    /// Expansion queries whose LP failed and were treated as boundary.
    pub failed_queries: usize,
}

impl PolygonProjection {
    /// `true` when every edge was certified tight.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.status == ExpansionStatus::Complete
    }
}

/// Project `system` through `proj` with an explicit solver and RNG.
pub fn project_polygon<S, R>(
    system: &ConstraintSystem,
    proj: &AffineProjection,
    cfg: &ProjectionCfg,
    solver: S,
    rng: &mut R,
) -> Result<PolygonProjection, ProjectionError>
where
    S: LpSolver,
    R: Rng + ?Sized,
{
    cfg.validate()?;
    let ext = ExtendedSystem::build(system, proj, cfg.max_radius)?;
    if cfg.require_equalities && system.eq.is_none() {
        return Err(ProjectionError::MissingEqualityConstraints);
    }

    let span = info_span!("project_polygon", n = system.dim(), max_iter = cfg.max_iter);
    let _guard = span.enter();

    let mut oracle = LpOracle::new(&ext, solver);
    let expansion = compute_polygon(&mut oracle, cfg, rng)?;
    let sorted = sort_vertices(&expansion.cycle)?;
    let vertices = export_vertices(&sorted, cfg.min_dist);

    info!(
        vertices = vertices.len(),
        raw = sorted.len(),
        queries = oracle.queries(),
        status = ?expansion.status,
        "projection done"
    );
    Ok(PolygonProjection {
        vertices,
        status: expansion.status,
        iterations: expansion.iterations,
        queries: oracle.queries(),
        failed_queries: expansion.failed_queries,
    })
}

/// Project with `DenseSimplex` and an RNG seeded from `cfg.seed` (entropy otherwise).
pub fn project_polygon_default(
    system: &ConstraintSystem,
    proj: &AffineProjection,
    cfg: &ProjectionCfg,
) -> Result<PolygonProjection, ProjectionError> {
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    project_polygon(system, proj, cfg, DenseSimplex::default(), &mut rng)
}
