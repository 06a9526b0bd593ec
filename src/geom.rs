//! Shared geometry utilities.

use kurbo::{Point, Vec2};

/// Unit vector in the direction of `v`, or `v` itself when it has no length.
pub fn normalize(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len == 0.0 {
        v
    } else {
        v / len
    }
}

/// `v` rotated a quarter turn counter-clockwise.
pub fn perp_left(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Intersection of the line through `p` along `dp` with the line through
/// `q` along `dq`. `None` when the directions are parallel.
pub fn line_intersect(p: Point, dp: Vec2, q: Point, dq: Vec2) -> Option<Point> {
    let det = dp.cross(dq);
    if det == 0.0 {
        return None;
    }
    let t = (q - p).cross(dq) / det;
    Some(p + dp * t)
}

/// Horizontal shear `(x, y) -> (x + y·slope, y)`.
pub fn skew(points: &[Point], slope: f64) -> Vec<Point> {
    points
        .iter()
        .map(|p| Point::new(p.x + p.y * slope, p.y))
        .collect()
}

/// Signed area of a closed polygon via the shoelace formula.
///
/// Positive = counter-clockwise, negative = clockwise.
pub fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            points[i].x * points[j].y - points[j].x * points[i].y
        })
        .sum::<f64>()
        / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersect_perpendicular_lines() {
        let p = line_intersect(
            Point::new(0.0, 50.0),
            Vec2::new(0.0, -1.0),
            Point::new(50.0, 0.0),
            Vec2::new(2.0, 0.0),
        )
        .unwrap();
        assert!((p - Point::ZERO).hypot() < 1e-12);
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let d = Vec2::new(1.0, 1.0);
        assert!(line_intersect(Point::ZERO, d, Point::new(0.0, 5.0), d * 3.0).is_none());
    }

    #[test]
    fn zero_vector_normalizes_to_itself() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
        let n = normalize(Vec2::new(3.0, 4.0));
        assert!((n.hypot() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clockwise_square_has_negative_area() {
        let square = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        ];
        assert_eq!(polygon_area(&square), -100.0);
    }
}
