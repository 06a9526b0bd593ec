//! Mapping from runs of polyline vertices back to original outline segments.

use crate::error::DeformError;
use crate::mesh::Polyline;

/// Type of an original outline segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Line,
    Curve,
}

/// One original segment: it starts at polyline vertex `start` and spans
/// `count` edges, so its run is vertices `start..=start + count`
/// (wrapping for closed contours).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subsegment {
    pub start: usize,
    pub count: usize,
    pub kind: SegmentKind,
}

/// Segments of one contour, in outline order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContourSegments {
    pub closed: bool,
    pub segments: Vec<Subsegment>,
}

impl ContourSegments {
    /// Number of polyline vertices this segmentation describes.
    pub fn vertex_count(&self) -> usize {
        let edges: usize = self.segments.iter().map(|s| s.count).sum();
        if self.closed || self.segments.is_empty() {
            edges
        } else {
            edges + 1
        }
    }

    /// Contour-local vertex indices of segment `j`, both ends included.
    pub fn run(&self, j: usize, vertex_count: usize) -> Vec<usize> {
        let seg = &self.segments[j];
        (0..=seg.count)
            .map(|i| (seg.start + i) % vertex_count)
            .collect()
    }

    /// Contour-local vertex shared by segment `j` and the one after it.
    pub fn joint_vertex(&self, j: usize, vertex_count: usize) -> usize {
        let seg = &self.segments[j];
        (seg.start + seg.count) % vertex_count
    }

    /// Pairs `(j, k)` of consecutive segments, wrapping for closed contours.
    pub fn joints(&self) -> Vec<(usize, usize)> {
        let m = self.segments.len();
        if m < 2 {
            return vec![];
        }
        if self.closed {
            (0..m).map(|j| (j, (j + 1) % m)).collect()
        } else {
            (0..m - 1).map(|j| (j, j + 1)).collect()
        }
    }

    /// Contour-local vertices where two line segments meet.
    pub fn line_joints(&self, vertex_count: usize) -> Vec<usize> {
        self.joints()
            .into_iter()
            .filter(|&(j, k)| {
                self.segments[j].kind == SegmentKind::Line
                    && self.segments[k].kind == SegmentKind::Line
            })
            .map(|(j, _)| self.joint_vertex(j, vertex_count))
            .collect()
    }
}

/// Segment runs for every contour of a flattened outline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubsegmentIndex {
    pub contours: Vec<ContourSegments>,
}

impl SubsegmentIndex {
    /// Check that the index describes `polylines` exactly.
    ///
    /// Contours too short to enter the mesh are not checked.
    pub fn validate(&self, polylines: &[Polyline]) -> Result<(), DeformError> {
        if self.contours.len() != polylines.len() {
            return Err(DeformError::mismatch(
                self.contours.len().min(polylines.len()),
                format!("{} contours", self.contours.len()),
                format!("{} polylines", polylines.len()),
            ));
        }
        for (ci, (segs, poly)) in self.contours.iter().zip(polylines).enumerate() {
            if poly.points.len() < 2 {
                continue;
            }
            if segs.closed != poly.closed {
                return Err(DeformError::mismatch(
                    ci,
                    if segs.closed { "closed contour" } else { "open contour" },
                    if poly.closed { "closed polyline" } else { "open polyline" },
                ));
            }
            if segs.vertex_count() != poly.points.len() {
                return Err(DeformError::mismatch(
                    ci,
                    format!("{} vertices", segs.vertex_count()),
                    format!("{} vertices", poly.points.len()),
                ));
            }
            let mut expected_start = 0;
            for seg in &segs.segments {
                let min_count = match seg.kind {
                    SegmentKind::Line => 1,
                    SegmentKind::Curve => 2,
                };
                if seg.count < min_count {
                    return Err(DeformError::mismatch(
                        ci,
                        format!("{:?} segment of at least {} edges", seg.kind, min_count),
                        format!("{} edges at vertex {}", seg.count, seg.start),
                    ));
                }
                if seg.start != expected_start {
                    return Err(DeformError::mismatch(
                        ci,
                        format!("segment start {}", expected_start),
                        format!("segment start {}", seg.start),
                    ));
                }
                expected_start += seg.count;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use pretty_assertions::assert_eq;

    fn seg(start: usize, count: usize, kind: SegmentKind) -> Subsegment {
        Subsegment { start, count, kind }
    }

    fn rectangle() -> ContourSegments {
        ContourSegments {
            closed: true,
            segments: vec![
                seg(0, 4, SegmentKind::Line),
                seg(4, 2, SegmentKind::Curve),
                seg(6, 4, SegmentKind::Line),
                seg(10, 2, SegmentKind::Line),
            ],
        }
    }

    #[test]
    fn runs_wrap_on_closed_contours() {
        let c = rectangle();
        assert_eq!(c.vertex_count(), 12);
        assert_eq!(c.run(3, 12), vec![10, 11, 0]);
        assert_eq!(c.joint_vertex(3, 12), 0);
    }

    #[test]
    fn line_joints_skip_curves() {
        let c = rectangle();
        assert_eq!(c.joints(), vec![(0, 1), (1, 2), (2, 3), (3, 0)]);
        assert_eq!(c.line_joints(12), vec![10, 0]);
    }

    #[test]
    fn open_contours_count_an_extra_vertex() {
        let c = ContourSegments {
            closed: false,
            segments: vec![seg(0, 3, SegmentKind::Line), seg(3, 3, SegmentKind::Line)],
        };
        assert_eq!(c.vertex_count(), 7);
        assert_eq!(c.joints(), vec![(0, 1)]);
    }

    #[test]
    fn validate_rejects_wrong_vertex_count() {
        let index = SubsegmentIndex {
            contours: vec![rectangle()],
        };
        let poly = Polyline::closed(vec![Point::ZERO; 11]);
        assert!(matches!(
            index.validate(&[poly]),
            Err(DeformError::TopologyMismatch { contour: 0, .. })
        ));
        let poly = Polyline::closed(vec![Point::ZERO; 12]);
        assert!(index.validate(&[poly]).is_ok());
    }

    #[test]
    fn validate_rejects_empty_and_short_runs() {
        // Triangle whose second segment was collapsed to nothing.
        let index = SubsegmentIndex {
            contours: vec![ContourSegments {
                closed: true,
                segments: vec![
                    seg(0, 1, SegmentKind::Line),
                    seg(1, 0, SegmentKind::Curve),
                    seg(1, 1, SegmentKind::Line),
                    seg(2, 1, SegmentKind::Line),
                ],
            }],
        };
        let poly = Polyline::closed(vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 100.0),
        ]);
        assert!(matches!(
            index.validate(&[poly.clone()]),
            Err(DeformError::TopologyMismatch { contour: 0, .. })
        ));

        // A curve sampled with a single edge cannot carry two handles.
        let index = SubsegmentIndex {
            contours: vec![ContourSegments {
                closed: true,
                segments: vec![
                    seg(0, 1, SegmentKind::Line),
                    seg(1, 1, SegmentKind::Curve),
                    seg(2, 1, SegmentKind::Line),
                ],
            }],
        };
        assert!(matches!(
            index.validate(&[poly]),
            Err(DeformError::TopologyMismatch { contour: 0, .. })
        ));
    }
}
