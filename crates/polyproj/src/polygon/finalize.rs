//! Output ordering and compaction.
//!
//! `sort_vertices` produces a clockwise traversal starting at the first vertex
//! of the lowest edge (smallest `y_v + y_next`), the convention downstream
//! plotting code expects. `export_vertices` then drops near-duplicates.

use nalgebra::Vector2;

use super::cycle::{VertexCycle, VertexId};
use crate::error::ProjectionError;

/// Clockwise vertex list starting at the bottom edge.
///
/// Walks the counter-clockwise cycle once from the bottom vertex, reverses the
/// order, and rotates the bottom vertex back to the front.
pub fn sort_vertices(cycle: &VertexCycle) -> Result<Vec<Vector2<f64>>, ProjectionError> {
    let mut bottom: Option<(VertexId, f64)> = None;
    for v in cycle.ids() {
        let w = cycle.next(v);
        if w.0 >= cycle.len() {
            return Err(ProjectionError::DegenerateCycle { vertex: v.0 });
        }
        let s = cycle.point(v).y + cycle.point(w).y;
        if bottom.map_or(true, |(_, best)| s < best) {
            bottom = Some((v, s));
        }
    }
    let Some((start, _)) = bottom else {
        return Err(ProjectionError::DegenerateCycle { vertex: 0 });
    };

    let mut order = cycle.walk(start)?;
    order.reverse();
    order.rotate_right(1);
    Ok(order.into_iter().map(|v| cycle.point(v)).collect())
}

/// Keep the first and last points, and every other point farther than
/// `min_dist` from the last point kept.
pub fn export_vertices(sorted: &[Vector2<f64>], min_dist: f64) -> Vec<Vector2<f64>> {
    if sorted.len() <= 2 {
        return sorted.to_vec();
    }
    let mut out = vec![sorted[0]];
    for p in &sorted[1..sorted.len() - 1] {
        if let Some(last) = out.last() {
            if (p - last).norm() > min_dist {
                out.push(*p);
            }
        }
    }
    out.push(sorted[sorted.len() - 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polygon::cycle::Vertex;
    use nalgebra::vector;

    fn square_ccw() -> VertexCycle {
        let mut c = VertexCycle::triangle(vector![1.0, 0.0], vector![1.0, 1.0], vector![0.0, 1.0]);
        c.insert_after(VertexId(2), vector![0.0, 0.0]);
        c
    }

    #[test]
    fn sorted_square_is_clockwise_from_bottom() {
        let pts = sort_vertices(&square_ccw()).unwrap();
        // lowest edge is (0,0) -> (1,0); first vertex of it comes first
        assert_eq!(
            pts,
            vec![
                vector![0.0, 0.0],
                vector![0.0, 1.0],
                vector![1.0, 1.0],
                vector![1.0, 0.0]
            ]
        );
        let area2: f64 = (0..pts.len())
            .map(|i| {
                let p = pts[i];
                let q = pts[(i + 1) % pts.len()];
                p.x * q.y - q.x * p.y
            })
            .sum();
        assert!(area2 < 0.0);
    }

    #[test]
    fn sort_rejects_dangling_successor() {
        let broken = VertexCycle::from_raw(vec![
            Vertex {
                p: vector![0.0, 0.0],
                next: 1,
                expanded: true,
            },
            Vertex {
                p: vector![1.0, 0.0],
                next: 5,
                expanded: true,
            },
        ]);
        assert_eq!(
            sort_vertices(&broken),
            Err(ProjectionError::DegenerateCycle { vertex: 1 })
        );
        assert!(sort_vertices(&VertexCycle::from_raw(Vec::new())).is_err());
    }

    #[test]
    fn export_drops_close_points_but_keeps_ends() {
        let pts = vec![
            vector![0.0, 0.0],
            vector![0.001, 0.0],
            vector![1.0, 0.0],
            vector![1.0, 0.005],
            vector![1.0, 1.0],
            vector![0.0, 1.0],
            vector![0.0, 0.001],
        ];
        let out = export_vertices(&pts, 1e-2);
        assert_eq!(
            out,
            vec![
                vector![0.0, 0.0],
                vector![1.0, 0.0],
                vector![1.0, 1.0],
                vector![0.0, 1.0],
                vector![0.0, 0.001]
            ]
        );
    }

    #[test]
    fn export_short_lists_unchanged() {
        let pts = vec![vector![0.0, 0.0], vector![0.0, 0.0]];
        assert_eq!(export_vertices(&pts, 1.0), pts);
        assert!(export_vertices(&[], 1.0).is_empty());
    }
}
