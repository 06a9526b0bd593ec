//! Per-vertex tangent field, cornerness, normals and smoothing weights.

use kurbo::{Point, Vec2};

use crate::config::DeformConfig;
use crate::geom::{normalize, perp_left, polygon_area};
use crate::mesh::Mesh;
use crate::subsegment::SubsegmentIndex;

/// Unit outgoing tangent at every vertex.
///
/// The last vertex of an open chain continues its incoming direction; a
/// vertex with no neighbours gets the zero vector.
pub fn gradients(mesh: &Mesh, positions: &[Point]) -> Vec<Vec2> {
    mesh.edges
        .iter()
        .enumerate()
        .map(|(a, e)| match (e.prev, e.next) {
            (_, Some(n)) => normalize(positions[n] - positions[a]),
            (Some(p), None) => normalize(positions[a] - positions[p]),
            (None, None) => Vec2::ZERO,
        })
        .collect()
}

/// Length of each vertex's outgoing edge (0 where there is none).
pub fn edge_lengths(mesh: &Mesh, positions: &[Point]) -> Vec<f64> {
    mesh.edges
        .iter()
        .enumerate()
        .map(|(a, e)| e.next.map_or(0.0, |n| (positions[n] - positions[a]).hypot()))
        .collect()
}

/// Turns shorter than this are treated as no turn at all.
const TURN_EPSILON: f64 = 1e-9;

/// Change of direction at each vertex: its gradient minus its
/// predecessor's. Zero at the start of an open chain and on straight runs.
fn turns(mesh: &Mesh, gradients: &[Vec2]) -> Vec<Vec2> {
    mesh.edges
        .iter()
        .enumerate()
        .map(|(a, e)| {
            let turn = e.prev.map_or(Vec2::ZERO, |p| gradients[a] - gradients[p]);
            if turn.hypot() < TURN_EPSILON {
                Vec2::ZERO
            } else {
                normalize(turn)
            }
        })
        .collect()
}

/// Agreement between the turn at each vertex and the turn before it.
///
/// Close to 1 where the outline bends steadily (a sampled curve), 0 on
/// straight runs and at isolated corners, negative where the bend flips.
/// Vertices without a predecessor score 0.
pub fn cornerness(mesh: &Mesh, gradients: &[Vec2]) -> Vec<f64> {
    let turns = turns(mesh, gradients);
    mesh.edges
        .iter()
        .enumerate()
        .map(|(a, e)| e.prev.map_or(0.0, |p| turns[p].dot(turns[a])))
        .collect()
}

/// +1 when the outline uses TrueType (clockwise outer) winding, -1 for
/// PostScript winding. Decided by the contour with the largest area.
pub fn winding_sign(mesh: &Mesh, positions: &[Point]) -> f64 {
    let largest = mesh
        .contours
        .iter()
        .filter(|c| c.closed)
        .map(|c| polygon_area(&positions[c.range()]))
        .max_by(|a, b| a.abs().total_cmp(&b.abs()));
    match largest {
        Some(area) if area > 0.0 => -1.0,
        _ => 1.0,
    }
}

/// Unit normal at every vertex, pointing away from the ink.
///
/// Averages the perpendiculars of the incoming and outgoing edges, so at
/// a hairpin the normal degenerates to zero.
pub fn normals(mesh: &Mesh, positions: &[Point]) -> Vec<Vec2> {
    let sign = winding_sign(mesh, positions);
    mesh.edges
        .iter()
        .enumerate()
        .map(|(a, e)| {
            let incoming = e
                .prev
                .map_or(Vec2::ZERO, |p| perp_left(normalize(positions[a] - positions[p])));
            let outgoing = e
                .next
                .map_or(Vec2::ZERO, |n| perp_left(normalize(positions[n] - positions[a])));
            normalize(incoming + outgoing) * sign
        })
        .collect()
}

/// Per-vertex trust in the current position during recompose.
///
/// Ordinary vertices get the curve-correction weight, joints between
/// two line segments the line-joint weight, corners (cornerness below
/// the threshold) the corner weight. `pinned` vertices are raised to at
/// least the anchor weight.
pub fn smoothing_weights(
    mesh: &Mesh,
    cornerness: &[f64],
    index: &SubsegmentIndex,
    pinned: &[usize],
    config: &DeformConfig,
) -> Vec<f64> {
    let mut weights = vec![config.curve_correction_weight; mesh.len()];

    for span in &mesh.contours {
        if let Some(segments) = index.contours.get(span.source) {
            for local in segments.line_joints(span.len) {
                weights[span.start + local] = config.line_joint_weight;
            }
        }
    }

    for (w, &c) in weights.iter_mut().zip(cornerness) {
        if c < config.corner_threshold {
            *w = config.corner_weight;
        }
    }

    for &v in pinned {
        if let Some(w) = weights.get_mut(v) {
            *w = w.max(config.anchor_weight);
        }
    }

    weights
}
