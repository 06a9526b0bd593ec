//! Re-express a processed polyline as the original outline's segments.
//!
//! Each original segment maps to one run of polyline vertices. Lines are
//! rebuilt as lines to the run's last vertex; curves are fitted with a
//! single cubic whose end tangents follow the run:
//! - endpoints are fixed to the run's first and last vertex
//! - handle directions come from the run's end steps, averaged with the
//!   neighbouring run at smooth joins
//! - handle lengths are the least-squares solution over the run
//!
//! On-curve points that sat exactly on the baseline are put back on it.

use kurbo::{BezPath, PathEl, Point, Vec2};

use crate::error::DeformError;
use crate::geom::normalize;
use crate::mesh::Polyline;
use crate::subsegment::{ContourSegments, SegmentKind, SubsegmentIndex};

/// Joins whose incoming and outgoing directions are closer than this to
/// opposite are treated as smooth.
const SMOOTH_DOT: f64 = -0.95;

/// Original segment structure of one contour.
struct SourceContour {
    /// On-curve points: the start, then each segment's end.
    on_curve: Vec<Point>,
    kinds: Vec<SegmentKind>,
    closed: bool,
    /// The last segment is the implicit line drawn by ClosePath.
    implicit_close: bool,
}

/// Rebuild the outline from `processed`, one path per original contour.
///
/// The segment count and kinds of every contour must match `index`;
/// any disagreement is a [`DeformError::TopologyMismatch`].
pub fn refit(
    original: &[BezPath],
    processed: &[Polyline],
    index: &SubsegmentIndex,
) -> Result<Vec<BezPath>, DeformError> {
    if original.len() != processed.len() {
        return Err(DeformError::mismatch(
            original.len().min(processed.len()),
            format!("{} contours", original.len()),
            format!("{} polylines", processed.len()),
        ));
    }
    index.validate(processed)?;

    original
        .iter()
        .zip(processed)
        .zip(&index.contours)
        .enumerate()
        .map(|(ci, ((path, poly), segments))| {
            let source = read_contour(path)?;
            check_structure(ci, &source, segments)?;
            if poly.points.len() < 2 {
                return Ok(path.clone());
            }
            Ok(rebuild(&source, poly, segments))
        })
        .collect()
}

fn read_contour(path: &BezPath) -> Result<SourceContour, DeformError> {
    let elements = path.elements();
    let start = match elements.first() {
        Some(PathEl::MoveTo(p)) => *p,
        Some(_) => {
            return Err(DeformError::InvalidPath(
                "path must start with MoveTo".into(),
            ))
        }
        None => return Err(DeformError::EmptyContour),
    };

    let mut contour = SourceContour {
        on_curve: vec![start],
        kinds: Vec::new(),
        closed: false,
        implicit_close: false,
    };
    let mut current = start;
    for el in &elements[1..] {
        let (kind, p) = match *el {
            PathEl::LineTo(p) => (SegmentKind::Line, p),
            PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => (SegmentKind::Curve, p),
            PathEl::ClosePath => {
                if current != start {
                    contour.kinds.push(SegmentKind::Line);
                    contour.on_curve.push(start);
                    contour.implicit_close = true;
                }
                contour.closed = true;
                break;
            }
            PathEl::MoveTo(_) => {
                return Err(DeformError::InvalidPath("unexpected MoveTo mid-path".into()))
            }
        };
        contour.kinds.push(kind);
        contour.on_curve.push(p);
        current = p;
    }
    Ok(contour)
}

fn check_structure(
    ci: usize,
    source: &SourceContour,
    segments: &ContourSegments,
) -> Result<(), DeformError> {
    let kinds: Vec<SegmentKind> = segments.segments.iter().map(|s| s.kind).collect();
    if kinds != source.kinds || segments.closed != source.closed {
        return Err(DeformError::mismatch(
            ci,
            format!("{} segments {:?}", source.kinds.len(), source.kinds),
            format!("{} subsegments {:?}", kinds.len(), kinds),
        ));
    }
    Ok(())
}

fn rebuild(source: &SourceContour, poly: &Polyline, segments: &ContourSegments) -> BezPath {
    let n = poly.points.len();
    // Pin on-curve vertices that started on the baseline.
    let mut points = poly.points.clone();
    for (j, &orig) in source.on_curve.iter().enumerate() {
        if orig.y != 0.0 {
            continue;
        }
        let vertex = match j {
            0 => 0,
            _ => segments.joint_vertex(j - 1, n),
        };
        points[vertex].y = 0.0;
    }

    let mut path = BezPath::new();
    path.move_to(points[0]);
    let last = segments.segments.len().saturating_sub(1);
    for (j, seg) in segments.segments.iter().enumerate() {
        let run = segments.run(j, n);
        let end = points[run[run.len() - 1]];
        match seg.kind {
            SegmentKind::Line => {
                if !(j == last && source.implicit_close) {
                    path.line_to(end);
                }
            }
            SegmentKind::Curve => {
                let run_points: Vec<Point> = run.iter().map(|&i| points[i]).collect();
                let before = neighbour(&points, &run, poly.closed, false);
                let after = neighbour(&points, &run, poly.closed, true);
                let (c1, c2) = fit_cubic(&run_points, before, after);
                path.curve_to(c1, c2, end);
            }
        }
    }
    if poly.closed {
        path.close_path();
    }
    path
}

/// Vertex just outside a run, if the contour has one.
fn neighbour(points: &[Point], run: &[usize], closed: bool, after: bool) -> Option<Point> {
    let n = points.len();
    if after {
        let last = run[run.len() - 1];
        if last + 1 < n || closed {
            Some(points[(last + 1) % n])
        } else {
            None
        }
    } else {
        let first = run[0];
        if first > 0 || closed {
            Some(points[(first + n - 1) % n])
        } else {
            None
        }
    }
}

/// End tangent of a run, averaged with the neighbouring direction when
/// the join is smooth.
fn end_tangent(end: Point, inner: Point, outer: Option<Point>) -> Vec2 {
    let t = normalize(inner - end);
    match outer.map(|o| normalize(o - end)) {
        Some(o) if t.dot(o) < SMOOTH_DOT => normalize(t - o),
        _ => t,
    }
}

/// Inner control points of a cubic through `pts` with fixed endpoints.
fn fit_cubic(pts: &[Point], before: Option<Point>, after: Option<Point>) -> (Point, Point) {
    let m = pts.len();
    let p0 = pts[0];
    let p3 = pts[m - 1];
    let t0 = end_tangent(p0, pts[1], before);
    let t3 = end_tangent(p3, pts[m - 2], after);
    let chord = p0.distance(p3);

    // Chord-length parameterisation.
    let mut u = Vec::with_capacity(m);
    let mut acc = 0.0;
    u.push(0.0);
    for w in pts.windows(2) {
        acc += w[0].distance(w[1]);
        u.push(acc);
    }
    if acc > 0.0 {
        for v in &mut u {
            *v /= acc;
        }
    }

    let (mut c11, mut c12, mut c22, mut x1, mut x2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (p, &t) in pts.iter().zip(&u) {
        let s = 1.0 - t;
        let b0 = s * s * s;
        let b1 = 3.0 * s * s * t;
        let b2 = 3.0 * s * t * t;
        let b3 = t * t * t;
        let a1 = t0 * b1;
        let a2 = t3 * b2;
        c11 += a1.dot(a1);
        c12 += a1.dot(a2);
        c22 += a2.dot(a2);
        let rest = p.to_vec2() - p0.to_vec2() * (b0 + b1) - p3.to_vec2() * (b2 + b3);
        x1 += rest.dot(a1);
        x2 += rest.dot(a2);
    }

    let det = c11 * c22 - c12 * c12;
    let fallback = chord / 3.0;
    let (mut alpha, mut beta) = if det.abs() > 1e-12 {
        ((x1 * c22 - x2 * c12) / det, (c11 * x2 - c12 * x1) / det)
    } else {
        (fallback, fallback)
    };
    let eps = 1e-6 * chord;
    if alpha < eps || beta < eps {
        alpha = fallback;
        beta = fallback;
    }
    (p0 + t0 * alpha, p3 + t3 * beta)
}
