//! Index-arena vertex cycle.
//!
//! Vertices live in a `Vec` in insertion order; each stores the index of its
//! successor. Links always form one cycle (≥ 3 vertices, counter-clockwise once
//! seeded by the engine). Vertices are only ever inserted, never removed.

use nalgebra::Vector2;

use crate::error::ProjectionError;

/// Handle of a vertex inside a `VertexCycle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VertexId(pub usize);

/// Point on the current polygon plus its successor link.
///
/// `expanded` means the edge from this vertex to its successor is tight: no
/// feasible point lies strictly outside it (within tolerance).
#[derive(Clone, Debug)]
pub struct Vertex {
    pub p: Vector2<f64>,
    pub next: usize,
    pub expanded: bool,
}

#[derive(Clone, Debug)]
pub struct VertexCycle {
    vertices: Vec<Vertex>,
}

impl VertexCycle {
    /// Seed the cycle `a → b → c → a`.
    pub fn triangle(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> Self {
        let vertices = [a, b, c]
            .into_iter()
            .enumerate()
            .map(|(i, p)| Vertex {
                p,
                next: (i + 1) % 3,
                expanded: false,
            })
            .collect();
        Self { vertices }
    }

    /// Build from raw arena entries without checking the links.
    ///
    /// Meant for callers that assemble a cycle themselves; malformed links are
    /// reported later by `walk` as `DegenerateCycle`.
    pub fn from_raw(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertex ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId)
    }

    #[inline]
    pub fn point(&self, v: VertexId) -> Vector2<f64> {
        self.vertices[v.0].p
    }

    #[inline]
    pub fn next(&self, v: VertexId) -> VertexId {
        VertexId(self.vertices[v.0].next)
    }

    #[inline]
    pub fn is_expanded(&self, v: VertexId) -> bool {
        self.vertices[v.0].expanded
    }

    #[inline]
    pub fn mark_expanded(&mut self, v: VertexId) {
        self.vertices[v.0].expanded = true;
    }

    /// Splice a new, un-expanded vertex holding `p` between `v` and its successor.
    ///
    /// `v` keeps its flag; the caller decides whether the new edge `v → new`
    /// still needs exploring.
    pub fn insert_after(&mut self, v: VertexId, p: Vector2<f64>) -> VertexId {
        let id = self.vertices.len();
        let next = self.vertices[v.0].next;
        self.vertices.push(Vertex {
            p,
            next,
            expanded: false,
        });
        self.vertices[v.0].next = id;
        VertexId(id)
    }

    pub fn all_expanded(&self) -> bool {
        self.vertices.iter().all(|v| v.expanded)
    }

    /// Follow successor links from `start` once around the cycle.
    ///
    /// Fails with `DegenerateCycle` on a dangling link, or when the walk does
    /// not return to `start` within `len()` steps.
    pub fn walk(&self, start: VertexId) -> Result<Vec<VertexId>, ProjectionError> {
        let n = self.vertices.len();
        if start.0 >= n {
            return Err(ProjectionError::DegenerateCycle { vertex: start.0 });
        }
        let mut order = Vec::with_capacity(n);
        let mut cur = start.0;
        loop {
            order.push(VertexId(cur));
            let next = self.vertices[cur].next;
            if next >= n || order.len() > n {
                return Err(ProjectionError::DegenerateCycle { vertex: cur });
            }
            if next == start.0 {
                return Ok(order);
            }
            cur = next;
        }
    }

    /// Points in cycle order starting from the first seeded vertex.
    pub fn points(&self) -> Result<Vec<Vector2<f64>>, ProjectionError> {
        Ok(self
            .walk(VertexId(0))?
            .into_iter()
            .map(|v| self.point(v))
            .collect())
    }

    /// Twice the signed area (positive for counter-clockwise order).
    pub fn signed_area2(&self) -> Result<f64, ProjectionError> {
        let pts = self.points()?;
        Ok((0..pts.len())
            .map(|i| {
                let p = pts[i];
                let q = pts[(i + 1) % pts.len()];
                p.x * q.y - q.x * p.y
            })
            .sum())
    }
}
