//! End-to-end projections through the dense simplex.

use nalgebra::{dmatrix, dvector, DMatrix, DVector, Vector2};
use polyproj::api::*;
use polyproj::{LpError, ProjectionError};
use rand::{rngs::StdRng, SeedableRng};

/// Counts solves and forwards to the dense simplex.
#[derive(Default)]
struct CountingSolver {
    inner: DenseSimplex,
    calls: usize,
}

impl LpSolver for CountingSolver {
    fn solve(&mut self, lp: &LinearProgram<'_>) -> Result<DVector<f64>, LpError> {
        self.calls += 1;
        self.inner.solve(lp)
    }
}

/// `|x_i| <= 1` for `i < n`, `sum x_i = 0`.
fn hypercube_with_zero_sum(n: usize) -> ConstraintSystem {
    let mut a = DMatrix::zeros(2 * n, n);
    for i in 0..n {
        a[(2 * i, i)] = 1.0;
        a[(2 * i + 1, i)] = -1.0;
    }
    let ineq = Inequalities::new(a, DVector::from_element(2 * n, 1.0)).unwrap();
    let eq = Equalities::new(DMatrix::from_element(1, n, 1.0), dvector![0.0]).unwrap();
    ConstraintSystem::new(ineq, Some(eq)).unwrap()
}

fn cross(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Clockwise and convex (all turns right, up to `eps`).
fn is_convex_cw(pts: &[Vector2<f64>], eps: f64) -> bool {
    let n = pts.len();
    (0..n).all(|i| {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        let c = pts[(i + 2) % n];
        cross(b - a, c - b) <= eps
    })
}

#[test]
fn hypercube_10d_projects_to_unit_square() {
    let sys = hypercube_with_zero_sum(10);
    let proj = AffineProjection::coordinates(10, 0, 1).unwrap();
    let cfg = ProjectionCfg {
        seed: Some(2024),
        ..Default::default()
    };
    let out = project_polygon_default(&sys, &proj, &cfg).unwrap();

    assert!(out.is_complete());
    assert!((4..=10).contains(&out.vertices.len()), "got {:?}", out.vertices);
    for p in &out.vertices {
        assert!(p.x.abs() <= 1.0 + 1e-7 && p.y.abs() <= 1.0 + 1e-7);
    }
    assert!(is_convex_cw(&out.vertices, 1e-7));
    assert_eq!(out.failed_queries, 0);
}

#[test]
fn single_point_region_is_not_linearly_feasible() {
    // x = y = 0 as two pairs of opposite halfspaces, plus x - y = 0
    let ineq = Inequalities::new(
        dmatrix![1.0, 0.0; -1.0, 0.0; 0.0, 1.0; 0.0, -1.0],
        dvector![0.0, 0.0, 0.0, 0.0],
    )
    .unwrap();
    let eq = Equalities::new(dmatrix![1.0, -1.0], dvector![0.0]).unwrap();
    let sys = ConstraintSystem::new(ineq, Some(eq)).unwrap();
    let proj = AffineProjection::coordinates(2, 0, 1).unwrap();
    let cfg = ProjectionCfg {
        max_iter: 20,
        seed: Some(1),
        ..Default::default()
    };
    let err = project_polygon_default(&sys, &proj, &cfg).unwrap_err();
    assert_eq!(err, ProjectionError::NotLinearlyFeasible { found: 1 });
}

#[test]
fn three_row_projection_never_reaches_the_solver() {
    let sys = hypercube_with_zero_sum(3);
    let proj = AffineProjection {
        e: DMatrix::identity(3, 3),
        f: DVector::zeros(3),
    };
    let mut solver = CountingSolver::default();
    let mut rng = StdRng::seed_from_u64(0);
    let err =
        project_polygon(&sys, &proj, &ProjectionCfg::default(), &mut solver, &mut rng).unwrap_err();
    assert_eq!(
        err,
        ProjectionError::InvalidProjectionShape {
            rows: 3,
            offset_len: 3
        }
    );
    assert_eq!(solver.calls, 0);
    assert!(AffineProjection::new(DMatrix::identity(3, 3), DVector::zeros(3)).is_err());
}

#[test]
fn missing_equalities_never_reach_the_solver() {
    let full = hypercube_with_zero_sum(4);
    let sys = ConstraintSystem::new(full.ineq, None).unwrap();
    let proj = AffineProjection::coordinates(4, 0, 1).unwrap();
    let mut solver = CountingSolver::default();
    let mut rng = StdRng::seed_from_u64(0);
    let err =
        project_polygon(&sys, &proj, &ProjectionCfg::default(), &mut solver, &mut rng).unwrap_err();
    assert_eq!(err, ProjectionError::MissingEqualityConstraints);
    assert_eq!(solver.calls, 0);
}

#[test]
fn fixed_angle_gives_identical_output() {
    let sys = hypercube_with_zero_sum(5);
    let e = dmatrix![
        1.0, 0.5, 0.0, 0.0, 0.0;
        0.0, 1.0, -0.3, 0.2, 0.0
    ];
    let proj = AffineProjection::new(e, dvector![0.1, -0.2]).unwrap();
    let cfg = ProjectionCfg {
        init_angle: Some(0.7),
        seed: Some(5),
        ..Default::default()
    };
    let a = project_polygon_default(&sys, &proj, &cfg).unwrap();
    let b = project_polygon_default(&sys, &proj, &cfg).unwrap();
    assert_eq!(a.vertices, b.vertices);
    assert_eq!(a.queries, b.queries);
    assert!(is_convex_cw(&a.vertices, 1e-7));
}

#[test]
fn small_budget_returns_inner_approximation() {
    let sys = hypercube_with_zero_sum(6);
    let e = dmatrix![
        1.0, 0.3, -0.2, 0.0, 0.1, 0.0;
        0.2, -0.4, 1.0, 0.5, 0.0, 0.3
    ];
    let proj = AffineProjection::new(e, dvector![0.0, 0.0]).unwrap();
    let base = ProjectionCfg {
        init_angle: Some(0.0),
        seed: Some(9),
        min_dist: 0.0,
        ..Default::default()
    };
    let full = project_polygon_default(&sys, &proj, &base).unwrap();
    let cut = project_polygon_default(
        &sys,
        &proj,
        &ProjectionCfg {
            max_iter: 4,
            ..base
        },
    )
    .unwrap();
    assert!(full.is_complete());
    assert!(!cut.is_complete());
    assert!(cut.vertices.len() < full.vertices.len());
    // inner approximation: every vertex of the cut polygon lies inside the full one
    let n = full.vertices.len();
    for p in &cut.vertices {
        for i in 0..n {
            let a = full.vertices[i];
            let b = full.vertices[(i + 1) % n];
            assert!(cross(b - a, p - a) <= 1e-6);
        }
    }
}

#[test]
fn empty_system_fails_with_default_radius() {
    // x <= 0, x >= gap, |y| <= 1, z = x + y: empty for every gap > 0
    for gap in [0.5, 0.005, 0.001] {
        let ineq = Inequalities::new(
            dmatrix![
                1.0, 0.0, 0.0;
                -1.0, 0.0, 0.0;
                0.0, 1.0, 0.0;
                0.0, -1.0, 0.0
            ],
            dvector![0.0, -gap, 1.0, 1.0],
        )
        .unwrap();
        let eq = Equalities::new(dmatrix![1.0, 1.0, -1.0], dvector![0.0]).unwrap();
        let sys = ConstraintSystem::new(ineq, Some(eq)).unwrap();
        let proj = AffineProjection::coordinates(3, 0, 1).unwrap();
        let cfg = ProjectionCfg {
            seed: Some(17),
            ..Default::default()
        };
        let err = project_polygon_default(&sys, &proj, &cfg).unwrap_err();
        assert!(
            matches!(
                err,
                ProjectionError::InfeasibleDirection {
                    source: LpError::Infeasible,
                    ..
                }
            ),
            "gap {gap}: {err:?}"
        );
    }
}
