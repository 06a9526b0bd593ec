//! Detail transfer between two meshes with the same topology.
//!
//! The transformed mesh supplies the low-frequency shape, the original
//! mesh the high-frequency detail (serifs, notches, tight joins). Both
//! gradient fields are low-passed along each contour and the original's
//! residual is added onto the transformed field before recomposing.

use kurbo::{Point, Vec2};

use crate::geom::normalize;
use crate::gradient::{edge_lengths, gradients};
use crate::mesh::Mesh;
use crate::solver::{recompose, SolverLimits};

/// Gaussian filter truncation, in standard deviations.
const TRUNCATE: f64 = 4.0;

/// Gaussian-smooth a per-vertex field along each contour.
///
/// Closed contours wrap around; open chains repeat their end values.
/// The window never crosses from one contour into another.
pub fn smooth_along_contours(mesh: &Mesh, field: &[Vec2], sigma: f64) -> Vec<Vec2> {
    if sigma <= 0.0 {
        return field.to_vec();
    }
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let kernel: Vec<f64> = (-radius..=radius)
        .map(|k| (-(k * k) as f64 / (2.0 * sigma * sigma)).exp())
        .collect();
    let total: f64 = kernel.iter().sum();

    let mut out = field.to_vec();
    for span in &mesh.contours {
        let len = span.len as isize;
        for i in 0..len {
            let mut acc = Vec2::ZERO;
            for (k, w) in (-radius..=radius).zip(&kernel) {
                let j = if span.closed {
                    (i + k).rem_euclid(len)
                } else {
                    (i + k).clamp(0, len - 1)
                };
                acc += field[span.start + j as usize] * *w;
            }
            out[span.start + i as usize] = acc / total;
        }
    }
    out
}

/// Gradient field with the transformed mesh's shape and the original's detail.
pub fn transfer_gradients(
    mesh: &Mesh,
    original: &[Point],
    transformed: &[Point],
    sigma: f64,
) -> Vec<Vec2> {
    let grad_original = gradients(mesh, original);
    let grad_transformed = gradients(mesh, transformed);
    let smooth_original = smooth_along_contours(mesh, &grad_original, sigma);
    let smooth_transformed = smooth_along_contours(mesh, &grad_transformed, sigma);

    smooth_transformed
        .iter()
        .zip(&grad_original)
        .zip(&smooth_original)
        .map(|((&low, &raw), &raw_low)| normalize(low + (raw - raw_low)))
        .collect()
}

/// Recompose `transformed` against the transferred gradient field.
///
/// Edge lengths come from `transformed`; every vertex gets `weight`.
pub fn transfer_details(
    mesh: &Mesh,
    original: &[Point],
    transformed: &[Point],
    sigma: f64,
    weight: f64,
    limits: SolverLimits,
) -> Vec<Point> {
    let grad = transfer_gradients(mesh, original, transformed, sigma);
    let lengths = edge_lengths(mesh, transformed);
    let weights = vec![weight; mesh.len()];
    recompose(mesh, transformed, &grad, &lengths, &weights, limits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Polyline;

    #[test]
    fn constant_field_is_unchanged() {
        let mesh = Mesh::build(&[
            Polyline::closed(vec![Point::ZERO; 5]),
            Polyline::open(vec![Point::ZERO; 3]),
        ]);
        let field = vec![Vec2::new(0.6, 0.8); 8];
        let out = smooth_along_contours(&mesh, &field, 7.0);
        for v in out {
            assert!((v - Vec2::new(0.6, 0.8)).hypot() < 1e-12);
        }
    }

    #[test]
    fn smoothing_stays_within_each_contour() {
        let mesh = Mesh::build(&[
            Polyline::closed(vec![Point::ZERO; 6]),
            Polyline::closed(vec![Point::ZERO; 6]),
        ]);
        let mut field = vec![Vec2::new(1.0, 0.0); 12];
        for v in &mut field[6..] {
            *v = Vec2::new(0.0, 1.0);
        }
        field[2] = Vec2::new(-1.0, 0.0);
        let out = smooth_along_contours(&mesh, &field, 2.0);
        for v in &out[6..] {
            assert!((*v - Vec2::new(0.0, 1.0)).hypot() < 1e-12);
        }
        assert!(out[2].x > -1.0);
    }

    #[test]
    fn identical_meshes_transfer_to_themselves() {
        let pts: Vec<Point> = (0..30)
            .map(|i| {
                let t = -(i as f64) / 30.0 * std::f64::consts::TAU;
                Point::new(200.0 * t.cos(), 120.0 * t.sin())
            })
            .collect();
        let mesh = Mesh::build(&[Polyline::closed(pts.clone())]);
        let limits = SolverLimits {
            tolerance: 1e-10,
            max_iterations: 60,
        };
        let out = transfer_details(&mesh, &pts, &pts, 7.0, 0.1, limits);
        for (a, b) in out.iter().zip(&pts) {
            assert!((*a - *b).hypot() < 1e-6);
        }
    }
}
