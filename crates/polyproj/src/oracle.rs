//! Direction oracle (support-function queries).
//!
//! `support(d)` returns a point `y` of the projected region maximizing `d · y`.
//! `LpOracle` answers by one LP over an `ExtendedSystem`: the cost of `(u, v)`
//! is set to `−d` (the solver minimizes) and the last two coordinates of the
//! optimum are returned.

use nalgebra::{DVector, Vector2};
use tracing::trace;

use crate::error::LpError;
use crate::lp::{LinearProgram, LpSolver};
use crate::system::ExtendedSystem;

/// Support-point queries in the projection plane.
pub trait DirectionOracle {
    fn support(&mut self, direction: Vector2<f64>) -> Result<Vector2<f64>, LpError>;

    /// Support point in direction `(cos θ, sin θ)`.
    #[inline]
    fn support_at_angle(&mut self, theta: f64) -> Result<Vector2<f64>, LpError> {
        self.support(Vector2::new(theta.cos(), theta.sin()))
    }
}

impl<O: DirectionOracle + ?Sized> DirectionOracle for &mut O {
    #[inline]
    fn support(&mut self, direction: Vector2<f64>) -> Result<Vector2<f64>, LpError> {
        (**self).support(direction)
    }
}

/// Oracle backed by an LP solver over the extended system.
pub struct LpOracle<'a, S> {
    system: &'a ExtendedSystem,
    solver: S,
    cost: DVector<f64>,
    queries: usize,
    failures: usize,
}

impl<'a, S: LpSolver> LpOracle<'a, S> {
    pub fn new(system: &'a ExtendedSystem, solver: S) -> Self {
        Self {
            system,
            solver,
            cost: system.cost.clone(),
            queries: 0,
            failures: 0,
        }
    }

    /// Number of LP solves issued so far.
    #[inline]
    pub fn queries(&self) -> usize {
        self.queries
    }

    /// Number of LP solves that reported no optimum.
    #[inline]
    pub fn failures(&self) -> usize {
        self.failures
    }
}

impl<'a, S: LpSolver> DirectionOracle for LpOracle<'a, S> {
    fn support(&mut self, direction: Vector2<f64>) -> Result<Vector2<f64>, LpError> {
        let k = self.cost.len();
        self.cost[k - 2] = -direction.x;
        self.cost[k - 1] = -direction.y;
        self.queries += 1;
        let lp = LinearProgram {
            cost: &self.cost,
            ..self.system.linear_program()
        };
        match self.solver.solve(&lp) {
            Ok(z) => {
                let p = Vector2::new(z[k - 2], z[k - 1]);
                trace!(dx = direction.x, dy = direction.y, x = p.x, y = p.y, "support");
                Ok(p)
            }
            Err(err) => {
                self.failures += 1;
                trace!(dx = direction.x, dy = direction.y, %err, "support query failed");
                Err(err)
            }
        }
    }
}
