//! Polyline outlines as a flat vertex array with per-vertex adjacency.

use kurbo::Point;

/// One contour of a flattened outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Polyline {
    pub fn closed(points: Vec<Point>) -> Self {
        Self { points, closed: true }
    }

    pub fn open(points: Vec<Point>) -> Self {
        Self { points, closed: false }
    }
}

/// Topological neighbours of a vertex. `None` marks the missing side of
/// an open chain's endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

impl Neighbors {
    /// Number of real neighbours (0, 1 or 2).
    pub fn degree(&self) -> usize {
        self.prev.is_some() as usize + self.next.is_some() as usize
    }
}

/// The run of mesh vertices belonging to one input contour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContourSpan {
    /// Index of the contour in the input slice.
    pub source: usize,
    /// First vertex of the contour in the flat array.
    pub start: usize,
    pub len: usize,
    pub closed: bool,
}

impl ContourSpan {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.len
    }
}

/// Vertices of every usable contour, concatenated, with the edge map.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Point>,
    pub edges: Vec<Neighbors>,
    pub contours: Vec<ContourSpan>,
}

impl Mesh {
    /// Build a mesh from polyline contours.
    ///
    /// Contours with fewer than two points are left out; their input
    /// index is simply absent from `contours`.
    pub fn build(polylines: &[Polyline]) -> Mesh {
        let total = polylines
            .iter()
            .filter(|c| c.points.len() >= 2)
            .map(|c| c.points.len())
            .sum();
        let mut vertices = Vec::with_capacity(total);
        let mut edges = Vec::with_capacity(total);
        let mut contours = Vec::new();

        for (source, contour) in polylines.iter().enumerate() {
            let n = contour.points.len();
            if n < 2 {
                continue;
            }
            let offset = vertices.len();
            for i in 0..n {
                let (prev, next) = if contour.closed {
                    (Some((i + n - 1) % n), Some((i + 1) % n))
                } else {
                    ((i > 0).then(|| i - 1), (i + 1 < n).then(|| i + 1))
                };
                edges.push(Neighbors {
                    prev: prev.map(|p| p + offset),
                    next: next.map(|q| q + offset),
                });
            }
            vertices.extend_from_slice(&contour.points);
            contours.push(ContourSpan {
                source,
                start: offset,
                len: n,
                closed: contour.closed,
            });
        }

        Mesh {
            vertices,
            edges,
            contours,
        }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Mesh vertex holding point `index` of input contour `source`.
    pub fn vertex_of(&self, source: usize, index: usize) -> Option<usize> {
        self.contours
            .iter()
            .find(|c| c.source == source)
            .filter(|c| index < c.len)
            .map(|c| c.start + index)
    }

    /// Write `positions` back into a copy of the input contours.
    ///
    /// Contours that were excluded from the mesh come back untouched, so
    /// the output always has the input's contour and vertex counts.
    pub fn to_polylines(&self, input: &[Polyline], positions: &[Point]) -> Vec<Polyline> {
        let mut out = input.to_vec();
        for span in &self.contours {
            out[span.source]
                .points
                .copy_from_slice(&positions[span.range()]);
        }
        out
    }
}
