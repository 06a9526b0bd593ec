//! Flatten outline contours into polylines plus a subsegment index.
//!
//! Every line becomes `max(1, ⌊length / resolution⌋)` evenly spaced
//! edges, every curve `max(2, ⌊chord / resolution⌋)` edges at uniform
//! parameter steps. Quadratic segments are raised to cubics.

use kurbo::{BezPath, CubicBez, ParamCurve, PathEl, Point, QuadBez};

use crate::error::DeformError;
use crate::mesh::Polyline;
use crate::subsegment::{ContourSegments, SegmentKind, Subsegment, SubsegmentIndex};

/// Flatten one path per contour.
pub fn segment(
    outline: &[BezPath],
    resolution: f64,
) -> Result<(Vec<Polyline>, SubsegmentIndex), DeformError> {
    let mut polylines = Vec::with_capacity(outline.len());
    let mut index = SubsegmentIndex::default();
    for path in outline {
        let (polyline, segments) = segment_contour(path, resolution)?;
        polylines.push(polyline);
        index.contours.push(segments);
    }
    Ok((polylines, index))
}

fn steps(distance: f64, resolution: f64, min: usize) -> usize {
    if resolution > 0.0 {
        ((distance / resolution).floor() as usize).max(min)
    } else {
        min
    }
}

fn segment_contour(
    path: &BezPath,
    resolution: f64,
) -> Result<(Polyline, ContourSegments), DeformError> {
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

    let mut points = vec![start];
    let mut segments = Vec::new();
    let mut current = start;
    let mut closed = false;

    for el in &elements[1..] {
        match *el {
            PathEl::LineTo(p) => {
                push_line(&mut points, &mut segments, current, p, resolution);
                current = p;
            }
            PathEl::QuadTo(a, p) => {
                let cubic = QuadBez::new(current, a, p).raise();
                push_curve(&mut points, &mut segments, cubic, resolution);
                current = p;
            }
            PathEl::CurveTo(a, b, p) => {
                let cubic = CubicBez::new(current, a, b, p);
                push_curve(&mut points, &mut segments, cubic, resolution);
                current = p;
            }
            PathEl::ClosePath => {
                if current != start {
                    push_line(&mut points, &mut segments, current, start, resolution);
                }
                closed = true;
                break;
            }
            PathEl::MoveTo(_) => {
                return Err(DeformError::InvalidPath("unexpected MoveTo mid-path".into()))
            }
        }
    }

    // The last vertex of a closed contour is its first vertex again.
    if closed && !segments.is_empty() {
        points.pop();
    }

    Ok((
        Polyline { points, closed },
        ContourSegments { closed, segments },
    ))
}

fn push_line(
    points: &mut Vec<Point>,
    segments: &mut Vec<Subsegment>,
    from: Point,
    to: Point,
    resolution: f64,
) {
    let count = steps(from.distance(to), resolution, 1);
    segments.push(Subsegment {
        start: points.len() - 1,
        count,
        kind: SegmentKind::Line,
    });
    for i in 1..count {
        points.push(from.lerp(to, i as f64 / count as f64));
    }
    points.push(to);
}

fn push_curve(
    points: &mut Vec<Point>,
    segments: &mut Vec<Subsegment>,
    cubic: CubicBez,
    resolution: f64,
) {
    let count = steps(cubic.p0.distance(cubic.p3), resolution, 2);
    segments.push(Subsegment {
        start: points.len() - 1,
        count,
        kind: SegmentKind::Curve,
    });
    for i in 1..count {
        points.push(cubic.eval(i as f64 / count as f64));
    }
    points.push(cubic.p3);
}
