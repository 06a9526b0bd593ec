//! Re-sharpen joints between straight segments.
//!
//! Subdividing an outline and moving its vertices independently lets
//! the vertex at a line/line joint drift off both lines. Each joint is
//! moved back to the intersection of lines fitted through the interior
//! of the two runs it connects.

use kurbo::{Point, Vec2};

use crate::geom::{line_intersect, normalize};
use crate::mesh::Mesh;
use crate::subsegment::{SegmentKind, SubsegmentIndex};

/// Minimum run length (joints included) a line fit needs.
const MIN_RUN: usize = 4;

/// Directions closer than this to (anti)parallel do not intersect usefully.
const PARALLEL_EPSILON: f64 = 1e-6;

/// Why a joint was left where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// One of the runs has fewer than four vertices.
    TooShort,
    /// The fitted lines are parallel.
    Parallel,
    /// A run has no usable direction (coincident vertices).
    Degenerate,
}

/// Outcome of realigning one line/line joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CornerFix {
    Moved { vertex: usize, from: Point, to: Point },
    Skipped { vertex: usize, reason: SkipReason },
}

/// Move every line/line joint to the intersection of its fitted lines.
///
/// Runs are read from `positions` and never from already-corrected
/// joints. Returns the corrected positions and one [`CornerFix`] per joint.
pub fn align_corners(
    mesh: &Mesh,
    positions: &[Point],
    index: &SubsegmentIndex,
) -> (Vec<Point>, Vec<CornerFix>) {
    let mut out = positions.to_vec();
    let mut fixes = Vec::new();

    for span in &mesh.contours {
        let Some(segments) = index.contours.get(span.source) else {
            continue;
        };
        for (j, k) in segments.joints() {
            if segments.segments[j].kind != SegmentKind::Line
                || segments.segments[k].kind != SegmentKind::Line
            {
                continue;
            }
            let vertex = span.start + segments.joint_vertex(j, span.len);
            let gather = |s: usize| -> Vec<Point> {
                segments
                    .run(s, span.len)
                    .into_iter()
                    .map(|i| positions[span.start + i])
                    .collect()
            };
            let fix = match find_corner(&gather(j), &gather(k)) {
                Ok(to) => {
                    out[vertex] = to;
                    CornerFix::Moved {
                        vertex,
                        from: positions[vertex],
                        to,
                    }
                }
                Err(reason) => {
                    log::debug!("corner at vertex {} left in place: {:?}", vertex, reason);
                    CornerFix::Skipped { vertex, reason }
                }
            };
            fixes.push(fix);
        }
    }

    (out, fixes)
}

/// Intersection of lines fitted through two runs that share a joint.
fn find_corner(prev: &[Point], next: &[Point]) -> Result<Point, SkipReason> {
    if prev.len() < MIN_RUN || next.len() < MIN_RUN {
        return Err(SkipReason::TooShort);
    }
    let (p_anchor, p_dir) = fit_line(prev);
    let (n_anchor, n_dir) = fit_line(next);
    if p_dir == Vec2::ZERO || n_dir == Vec2::ZERO {
        return Err(SkipReason::Degenerate);
    }
    if 1.0 - normalize(p_dir).dot(normalize(n_dir)).abs() < PARALLEL_EPSILON {
        return Err(SkipReason::Parallel);
    }
    line_intersect(p_anchor, p_dir, n_anchor, n_dir).ok_or(SkipReason::Parallel)
}

/// Anchor and direction of a line through the interior of a run.
///
/// Both end vertices are excluded so a drifted joint does not bias the
/// fit. The direction is the mean of the unit steps between interior
/// neighbours; the anchor is the mean interior point.
fn fit_line(points: &[Point]) -> (Point, Vec2) {
    let n = points.len();
    let steps = &points[1..n - 1];
    let direction = steps
        .windows(2)
        .map(|w| normalize(w[1] - w[0]))
        .fold(Vec2::ZERO, |acc, d| acc + d)
        / (steps.len() - 1) as f64;
    let anchor = steps
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2())
        / steps.len() as f64;
    (anchor.to_point(), direction)
}
