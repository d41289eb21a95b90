//! Bootstrap and expansion loop of the expanding-polygon method.
//!
//! Bootstrap casts rays at angles `θ₀, θ₀ + 2π/3, …` until three distinct
//! support points are found, then seeds a counter-clockwise triangle.
//! Expansion keeps a worklist of vertices whose outgoing edge is not known to be
//! tight. For each popped vertex `v` the oracle is queried along the outward
//! normal of `v → v.next`; a point strictly outside that edge is spliced in and
//! both `v` and the new vertex go back on the worklist.
//!
//! Every LP call after the first bootstrap query is charged against the shared
//! budget `ProjectionCfg::max_iter`. Running out during expansion is reported
//! as `ExpansionStatus::BudgetExhausted`; the cycle is then a valid inner
//! approximation of the projection.

use std::f64::consts::{PI, TAU};

use nalgebra::Vector2;
use rand::Rng;
use tracing::{debug, trace};

use super::cycle::{VertexCycle, VertexId};
use crate::cfg::ProjectionCfg;
use crate::error::ProjectionError;
use crate::oracle::DirectionOracle;

/// How an expansion run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpansionStatus {
    /// Every edge is tight.
    Complete,
    /// The budget ran out first; some edges may still hide vertices.
    BudgetExhausted,
}

/// Counters of one expansion loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpandStats {
    /// Vertices inserted (each one charged to the budget).
    pub iterations: usize,
    /// Oracle failures treated as "boundary reached".
    pub failed_queries: usize,
    pub status: ExpansionStatus,
}

/// Finished polygon plus bookkeeping of the whole run.
#[derive(Clone, Debug)]
pub struct Expansion {
    pub cycle: VertexCycle,
    pub status: ExpansionStatus,
    /// Budget units spent by bootstrap.
    pub bootstrap_queries: usize,
    pub iterations: usize,
    pub failed_queries: usize,
}

#[inline]
fn cross(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Find three distinct support points and seed a counter-clockwise triangle.
///
/// Consumes one unit of `budget` per query after the first. Oracle failures are
/// fatal here (`InfeasibleDirection`); fewer than three distinct points once the
/// budget is spent yield `NotLinearlyFeasible`.
pub fn bootstrap<O, R>(
    oracle: &mut O,
    cfg: &ProjectionCfg,
    rng: &mut R,
    budget: &mut usize,
) -> Result<VertexCycle, ProjectionError>
where
    O: DirectionOracle + ?Sized,
    R: Rng + ?Sized,
{
    let mut query = |theta: f64| {
        oracle
            .support_at_angle(theta)
            .map_err(|source| ProjectionError::InfeasibleDirection {
                direction: (theta.cos(), theta.sin()),
                source,
            })
    };

    let mut theta = cfg.init_angle.unwrap_or_else(|| PI * rng.gen::<f64>());
    let mut found = vec![query(theta)?];
    let mut step = TAU / 3.0;
    while found.len() < 3 && *budget > 0 {
        theta += step;
        if theta >= TAU {
            // Perturb so later rays do not retrace the same directions.
            step *= rng.gen_range(0.25..0.75);
            theta += step - TAU;
        }
        let z = query(theta)?;
        *budget -= 1;
        if found
            .iter()
            .all(|z0: &Vector2<f64>| (z - z0).norm() > cfg.distinct_eps)
        {
            trace!(theta, x = z.x, y = z.y, "bootstrap point");
            found.push(z);
        }
    }
    if found.len() < 3 {
        return Err(ProjectionError::NotLinearlyFeasible { found: found.len() });
    }

    let (a, mut b, mut c) = (found[0], found[1], found[2]);
    if cross(b - a, c - a) < 0.0 {
        std::mem::swap(&mut b, &mut c);
    }
    Ok(VertexCycle::triangle(a, b, c))
}

/// Expand `cycle` until every edge is tight or `budget` insertions were made.
pub fn expand<O>(
    cycle: &mut VertexCycle,
    oracle: &mut O,
    cfg: &ProjectionCfg,
    budget: usize,
) -> ExpandStats
where
    O: DirectionOracle + ?Sized,
{
    let mut work: Vec<VertexId> = cycle.ids().filter(|&v| !cycle.is_expanded(v)).collect();
    work.reverse();
    let mut iterations = 0usize;
    let mut failed_queries = 0usize;

    while iterations < budget {
        let Some(v) = work.pop() else {
            break;
        };
        if cycle.is_expanded(v) {
            continue;
        }
        let p = cycle.point(v);
        let q = cycle.point(cycle.next(v));
        let edge = q - p;
        let Some(normal) = Vector2::new(edge.y, -edge.x).try_normalize(0.0) else {
            cycle.mark_expanded(v);
            continue;
        };

        let z = match oracle.support(normal) {
            Ok(z) => z,
            Err(err) => {
                debug!(vertex = v.0, %err, "direction query failed; edge treated as boundary");
                failed_queries += 1;
                cycle.mark_expanded(v);
                continue;
            }
        };
        if cross(z - p, p - q).abs() < cfg.tight_eps {
            cycle.mark_expanded(v);
            continue;
        }
        // A support point never lies on the inner side of a polygon edge.
        if normal.dot(&(z - p)) <= 0.0 {
            debug!(vertex = v.0, x = z.x, y = z.y, "support point inside edge; edge treated as boundary");
            cycle.mark_expanded(v);
            continue;
        }
        let new = cycle.insert_after(v, z);
        trace!(after = v.0, x = z.x, y = z.y, "insert vertex");
        work.push(new);
        work.push(v);
        iterations += 1;
    }

    let status = if cycle.all_expanded() {
        ExpansionStatus::Complete
    } else {
        ExpansionStatus::BudgetExhausted
    };
    ExpandStats {
        iterations,
        failed_queries,
        status,
    }
}

/// Bootstrap, then expand with whatever budget bootstrap left over.
pub fn compute_polygon<O, R>(
    oracle: &mut O,
    cfg: &ProjectionCfg,
    rng: &mut R,
) -> Result<Expansion, ProjectionError>
where
    O: DirectionOracle + ?Sized,
    R: Rng + ?Sized,
{
    let mut budget = cfg.max_iter;
    let mut cycle = bootstrap(oracle, cfg, rng, &mut budget)?;
    let bootstrap_queries = cfg.max_iter - budget;
    let stats = expand(&mut cycle, oracle, cfg, budget);
    debug!(
        vertices = cycle.len(),
        iterations = stats.iterations,
        failed = stats.failed_queries,
        status = ?stats.status,
        "expansion finished"
    );
    Ok(Expansion {
        cycle,
        status: stats.status,
        bootstrap_queries,
        iterations: stats.iterations,
        failed_queries: stats.failed_queries,
    })
}
