//! Polyhedron helpers that reuse the LP seam.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::error::ProjectionError;
use crate::lp::{LinearProgram, LpSolver};
use crate::system::Inequalities;

/// Margin below which the polyhedron is declared empty.
const EMPTY_MARGIN: f64 = -0.1;

/// Largest inscribed ball of `{x : A x <= b}`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChebyshevBall {
    pub center: DVector<f64>,
    /// Distance from `center` to the nearest facet; negative when the rows conflict.
    pub radius: f64,
}

/// Chebyshev center: maximize `r` subject to `a_i · x + ‖a_i‖ r <= b_i`.
///
/// A radius below `-0.1` means no point satisfies every row, reported as
/// `EmptyPolyhedron`. Radii in `[-0.1, 0)` are returned as is (flat or nearly
/// empty polyhedra). An unbounded inscribed ball surfaces as `Lp(Unbounded)`.
pub fn chebyshev_center<S: LpSolver>(
    ineq: &Inequalities,
    mut solver: S,
) -> Result<ChebyshevBall, ProjectionError> {
    let (m, n) = ineq.a.shape();
    let mut g = DMatrix::zeros(m, n + 1);
    g.view_mut((0, 0), (m, n)).copy_from(&ineq.a);
    for i in 0..m {
        g[(i, n)] = ineq.a.row(i).norm();
    }
    let mut cost = DVector::zeros(n + 1);
    cost[n] = -1.0;

    let z = solver.solve(&LinearProgram {
        cost: &cost,
        g: &g,
        h: &ineq.b,
        eq: None,
    })?;
    let radius = z[n];
    debug!(radius, "chebyshev center");
    if radius < EMPTY_MARGIN {
        return Err(ProjectionError::EmptyPolyhedron { margin: radius });
    }
    Ok(ChebyshevBall {
        center: z.rows(0, n).into_owned(),
        radius,
    })
}
