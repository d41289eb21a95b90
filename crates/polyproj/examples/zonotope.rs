//! Project a zero-sum hypercube through a random plane and print the polygon.
//!
//! Usage:
//!   cargo run -p polyproj --example zonotope -- [n] [seed]
//!
//! Prints vertex count, budget usage, and the clockwise vertex list.

use nalgebra::{DMatrix, DVector};
use polyproj::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn main() {
    let mut args = std::env::args().skip(1);
    let n: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(8);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(2025);
    if n < 2 {
        eprintln!("usage: zonotope [n >= 2] [seed]");
        return;
    }

    let mut a = DMatrix::zeros(2 * n, n);
    for i in 0..n {
        a[(2 * i, i)] = 1.0;
        a[(2 * i + 1, i)] = -1.0;
    }
    let ineq = Inequalities::new(a, DVector::from_element(2 * n, 1.0)).unwrap();
    let eq = Equalities::new(DMatrix::from_element(1, n, 1.0), DVector::zeros(1)).unwrap();
    let sys = ConstraintSystem::new(ineq, Some(eq)).unwrap();

    let mut rng = StdRng::seed_from_u64(seed);
    let e = DMatrix::from_fn(2, n, |_, _| rng.gen_range(-1.0..1.0));
    let proj = AffineProjection::new(e, DVector::zeros(2)).unwrap();

    let cfg = ProjectionCfg {
        seed: Some(seed),
        ..Default::default()
    };
    match project_polygon_default(&sys, &proj, &cfg) {
        Ok(out) => {
            println!(
                "n={n} vertices={} queries={} complete={}",
                out.vertices.len(),
                out.queries,
                out.is_complete()
            );
            for p in &out.vertices {
                println!("  ({:+.4}, {:+.4})", p.x, p.y);
            }
        }
        Err(err) => eprintln!("projection failed: {err}"),
    }
}
