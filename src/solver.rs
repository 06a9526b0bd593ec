//! Laplacian recompose: new vertex positions from a target edge field.
//!
//! For vertex `i` with `d` real neighbours and weight `w`, the system row is
//!
//! ```text
//! (2 + w)·x[i] − (2/d)·Σ x[j] = (2/d)·Σ e(j→i) + w·a[i]
//! ```
//!
//! where `e(j→i)` is the target edge vector (unit gradient × length) and
//! `a` the anchor positions. Scaling each row by `d/2` gives the same
//! solution with a symmetric positive-definite operator (graph Laplacian
//! plus a positive diagonal), which is applied matrix-free over the edge
//! map and solved with Jacobi-preconditioned conjugate gradient.

use kurbo::{Point, Vec2};

use crate::mesh::Mesh;

/// How an iterative solve ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub converged: bool,
    pub iterations: usize,
    /// Final residual norm.
    pub residual: f64,
}

/// Solver stopping rule.
#[derive(Debug, Clone, Copy)]
pub struct SolverLimits {
    /// Stop once `‖r‖ ≤ tolerance · ‖b‖`.
    pub tolerance: f64,
    pub max_iterations: usize,
}

/// The symmetric recompose operator `L + diag(s·w)` over one mesh.
struct Operator<'a> {
    mesh: &'a Mesh,
    diagonal: Vec<f64>,
}

impl Operator<'_> {
    fn apply(&self, x: &[f64], out: &mut [f64]) {
        for (i, e) in self.mesh.edges.iter().enumerate() {
            let mut v = self.diagonal[i] * x[i];
            if let Some(p) = e.prev {
                v -= x[p];
            }
            if let Some(n) = e.next {
                v -= x[n];
            }
            out[i] = v;
        }
    }
}

/// Row scale turning the `2/d` rows into symmetric ones.
fn row_scale(degree: usize) -> f64 {
    degree.max(1) as f64 / 2.0
}

/// Solve for positions whose edges follow `gradients` (scaled by
/// `lengths`) while each vertex is pulled toward `anchor` by its weight.
///
/// `gradients[i]` and `lengths[i]` describe vertex `i`'s outgoing edge.
/// The two coordinate axes are solved independently, starting from the
/// anchor positions. A solve that hits the iteration cap keeps its best
/// iterate.
pub fn recompose(
    mesh: &Mesh,
    anchor: &[Point],
    gradients: &[Vec2],
    lengths: &[f64],
    weights: &[f64],
    limits: SolverLimits,
) -> Vec<Point> {
    let n = mesh.len();
    if n == 0 {
        return vec![];
    }

    let diagonal: Vec<f64> = mesh
        .edges
        .iter()
        .zip(weights)
        .map(|(e, &w)| e.degree() as f64 + row_scale(e.degree()) * w)
        .collect();

    let mut rhs_x = vec![0.0; n];
    let mut rhs_y = vec![0.0; n];
    for (i, e) in mesh.edges.iter().enumerate() {
        let mut b = anchor[i].to_vec2() * (row_scale(e.degree()) * weights[i]);
        if let Some(p) = e.prev {
            b += gradients[p] * lengths[p];
        }
        if e.next.is_some() {
            b -= gradients[i] * lengths[i];
        }
        rhs_x[i] = b.x;
        rhs_y[i] = b.y;
    }

    let op = Operator { mesh, diagonal };
    let (xs, sx) = conjugate_gradient(&op, &rhs_x, anchor.iter().map(|p| p.x).collect(), limits);
    let (ys, sy) = conjugate_gradient(&op, &rhs_y, anchor.iter().map(|p| p.y).collect(), limits);
    for (axis, s) in [("x", sx), ("y", sy)] {
        if !s.converged {
            log::debug!(
                "recompose {} axis stopped after {} iterations, residual {:.3e}",
                axis,
                s.iterations,
                s.residual
            );
        }
    }

    xs.into_iter().zip(ys).map(|(x, y)| Point::new(x, y)).collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Jacobi-preconditioned conjugate gradient.
fn conjugate_gradient(
    op: &Operator,
    b: &[f64],
    mut x: Vec<f64>,
    limits: SolverLimits,
) -> (Vec<f64>, Solution) {
    let n = b.len();
    let mut ap = vec![0.0; n];
    op.apply(&x, &mut ap);
    let mut r: Vec<f64> = b.iter().zip(&ap).map(|(b, a)| b - a).collect();
    let mut z: Vec<f64> = r.iter().zip(&op.diagonal).map(|(r, d)| r / d).collect();
    let mut p = z.clone();
    let mut rz = dot(&r, &z);

    let threshold = limits.tolerance * dot(b, b).sqrt();
    let mut residual = dot(&r, &r).sqrt();
    let mut iterations = 0;

    while residual > threshold && iterations < limits.max_iterations {
        op.apply(&p, &mut ap);
        let pap = dot(&p, &ap);
        if pap <= 0.0 {
            break;
        }
        let alpha = rz / pap;
        for i in 0..n {
            x[i] += alpha * p[i];
            r[i] -= alpha * ap[i];
            z[i] = r[i] / op.diagonal[i];
        }
        let rz_next = dot(&r, &z);
        let beta = rz_next / rz;
        rz = rz_next;
        for i in 0..n {
            p[i] = z[i] + beta * p[i];
        }
        residual = dot(&r, &r).sqrt();
        iterations += 1;
    }

    let solution = Solution {
        converged: residual <= threshold,
        iterations,
        residual,
    };
    (x, solution)
}
