//! Constraint systems, the 2D affine projection, and the extended LP system.
//!
//! - `Inequalities` `(A, b)`: `A x <= b`.
//! - `Equalities` `(C, d)`: `C x = d`.
//! - `AffineProjection` `(E, f)`: `y = E x + f` with `E` exactly 2×n.
//! - `ExtendedSystem`: variables `[x, u, v]` where `(u, v)` is pinned to `E x + f`
//!   and boxed by `|u|, |v| <= R`, so every directional LP is bounded.
//!
//! Shapes are validated when a system is assembled; afterwards the types are
//! treated as immutable inputs of one projection call.

use nalgebra::{DMatrix, DVector};

use crate::error::ProjectionError;
use crate::lp::LinearProgram;

/// Halfspace block `A x <= b`.
#[derive(Clone, Debug)]
pub struct Inequalities {
    pub a: DMatrix<f64>,
    pub b: DVector<f64>,
}

impl Inequalities {
    pub fn new(a: DMatrix<f64>, b: DVector<f64>) -> Result<Self, ProjectionError> {
        if a.nrows() != b.len() {
            return Err(ProjectionError::DimensionMismatch {
                what: "inequality rows (b)",
                expected: a.nrows(),
                found: b.len(),
            });
        }
        Ok(Self { a, b })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.a.ncols()
    }

    /// Membership with slack `eps` on every row.
    pub fn satisfies_eps(&self, x: &DVector<f64>, eps: f64) -> bool {
        let ax = &self.a * x;
        ax.iter().zip(self.b.iter()).all(|(l, r)| *l <= r + eps)
    }
}

/// Equality block `C x = d`.
#[derive(Clone, Debug)]
pub struct Equalities {
    pub c: DMatrix<f64>,
    pub d: DVector<f64>,
}

impl Equalities {
    pub fn new(c: DMatrix<f64>, d: DVector<f64>) -> Result<Self, ProjectionError> {
        if c.nrows() != d.len() {
            return Err(ProjectionError::DimensionMismatch {
                what: "equality rows (d)",
                expected: c.nrows(),
                found: d.len(),
            });
        }
        Ok(Self { c, d })
    }
}

/// Polyhedron `{x : A x <= b, C x = d}` with an optional equality block.
#[derive(Clone, Debug)]
pub struct ConstraintSystem {
    pub ineq: Inequalities,
    pub eq: Option<Equalities>,
}

impl ConstraintSystem {
    pub fn new(ineq: Inequalities, eq: Option<Equalities>) -> Result<Self, ProjectionError> {
        if let Some(eq) = &eq {
            if eq.c.ncols() != ineq.dim() {
                return Err(ProjectionError::DimensionMismatch {
                    what: "equality columns",
                    expected: ineq.dim(),
                    found: eq.c.ncols(),
                });
            }
        }
        Ok(Self { ineq, eq })
    }

    /// Dimension `n` of the original variable space.
    #[inline]
    pub fn dim(&self) -> usize {
        self.ineq.dim()
    }
}

/// Affine map `y = E x + f` onto the plane.
#[derive(Clone, Debug)]
pub struct AffineProjection {
    pub e: DMatrix<f64>,
    pub f: DVector<f64>,
}

impl AffineProjection {
    /// Build a projection; rejects anything but a 2-row map.
    pub fn new(e: DMatrix<f64>, f: DVector<f64>) -> Result<Self, ProjectionError> {
        if e.nrows() != 2 || f.len() != 2 {
            return Err(ProjectionError::InvalidProjectionShape {
                rows: e.nrows(),
                offset_len: f.len(),
            });
        }
        Ok(Self { e, f })
    }

    /// Linear projection onto coordinates `(i, j)` of an `n`-dimensional space.
    pub fn coordinates(n: usize, i: usize, j: usize) -> Result<Self, ProjectionError> {
        for k in [i, j] {
            if k >= n {
                return Err(ProjectionError::DimensionMismatch {
                    what: "projected coordinate index",
                    expected: n,
                    found: k,
                });
            }
        }
        let mut e = DMatrix::zeros(2, n);
        e[(0, i)] = 1.0;
        e[(1, j)] = 1.0;
        Ok(Self {
            e,
            f: DVector::zeros(2),
        })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.e.ncols()
    }
}

/// Extended LP data over `[x, u, v]`.
///
/// Invariants:
/// - `g` is `(m + 4) × (n + 2)`; the last four rows are `u <= R`, `−u <= R`,
///   `v <= R`, `−v <= R`.
/// - `a` is `(p + 2) × (n + 2)`; the last two rows encode `E x − (u, v) = −f`.
/// - `cost` is all zeros; oracles write the last two entries per query.
#[derive(Clone, Debug)]
pub struct ExtendedSystem {
    pub g: DMatrix<f64>,
    pub h: DVector<f64>,
    pub a: DMatrix<f64>,
    pub b: DVector<f64>,
    pub cost: DVector<f64>,
    pub max_radius: f64,
}

impl ExtendedSystem {
    /// Assemble the extended system for `proj` applied to `system`.
    ///
    /// Fails on a non-2D projection, mismatched column counts, or a radius that
    /// is not finite and positive. A missing equality block is accepted here;
    /// the projection front door decides whether to require it.
    pub fn build(
        system: &ConstraintSystem,
        proj: &AffineProjection,
        max_radius: f64,
    ) -> Result<Self, ProjectionError> {
        if proj.e.nrows() != 2 || proj.f.len() != 2 {
            return Err(ProjectionError::InvalidProjectionShape {
                rows: proj.e.nrows(),
                offset_len: proj.f.len(),
            });
        }
        let n = system.dim();
        if proj.dim() != n {
            return Err(ProjectionError::DimensionMismatch {
                what: "projection columns",
                expected: n,
                found: proj.dim(),
            });
        }
        if !(max_radius.is_finite() && max_radius > 0.0) {
            return Err(ProjectionError::InvalidConfig(format!(
                "max_radius must be finite and > 0, got {max_radius}"
            )));
        }

        let ineq = &system.ineq;
        let m = ineq.a.nrows();
        let mut g = DMatrix::zeros(m + 4, n + 2);
        g.view_mut((0, 0), (m, n)).copy_from(&ineq.a);
        g[(m, n)] = 1.0;
        g[(m + 1, n)] = -1.0;
        g[(m + 2, n + 1)] = 1.0;
        g[(m + 3, n + 1)] = -1.0;
        let mut h = DVector::from_element(m + 4, max_radius);
        h.rows_mut(0, m).copy_from(&ineq.b);

        let p = system.eq.as_ref().map_or(0, |eq| eq.c.nrows());
        let mut a = DMatrix::zeros(p + 2, n + 2);
        let mut b = DVector::zeros(p + 2);
        if let Some(eq) = &system.eq {
            a.view_mut((0, 0), (p, n)).copy_from(&eq.c);
            b.rows_mut(0, p).copy_from(&eq.d);
        }
        a.view_mut((p, 0), (2, n)).copy_from(&proj.e);
        a[(p, n)] = -1.0;
        a[(p + 1, n + 1)] = -1.0;
        b[p] = -proj.f[0];
        b[p + 1] = -proj.f[1];

        Ok(Self {
            g,
            h,
            a,
            b,
            cost: DVector::zeros(n + 2),
            max_radius,
        })
    }

    /// Dimension of the original variable space (without `u, v`).
    #[inline]
    pub fn original_dim(&self) -> usize {
        self.cost.len() - 2
    }

    /// LP view with the stored cost vector.
    #[inline]
    pub fn linear_program(&self) -> LinearProgram<'_> {
        LinearProgram {
            cost: &self.cost,
            g: &self.g,
            h: &self.h,
            eq: Some((&self.a, &self.b)),
        }
    }
}
