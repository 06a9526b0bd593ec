//! Italic and condensed synthesis over a flattened glyph outline.
//!
//! Italic pipeline, per glyph:
//! 1. Re-sharpen line/line joints and take gradients, edge lengths,
//!    cornerness and smoothing weights from the result
//! 2. Wide stems only: skew coarsely, recompose against the unskewed
//!    gradients, unskew (width-corrected base)
//! 3. Shear a copy offset along the outward normals and add its
//!    displacement onto the base (slant plus stem growth)
//! 4. Re-sharpen joints again, then apply the residual skew
//! 5. Transfer detail from the fully sheared original
//! 6. Shift for optical centring and pin the baseline

use kurbo::{BezPath, Point};

use crate::config::DeformConfig;
use crate::corners::align_corners;
use crate::detail::transfer_details;
use crate::error::DeformError;
use crate::geom::skew;
use crate::gradient::{cornerness, edge_lengths, gradients, normals, smoothing_weights};
use crate::mesh::{Mesh, Polyline};
use crate::refit::refit;
use crate::segment::segment;
use crate::solver::{recompose, SolverLimits};
use crate::subsegment::SubsegmentIndex;

/// A flattened glyph ready for the mesh engine.
#[derive(Debug, Clone, Copy)]
pub struct MeshInput<'a> {
    pub polylines: &'a [Polyline],
    pub index: &'a SubsegmentIndex,
    /// `(contour, point)` positions the caller wants held in place more
    /// firmly, e.g. metric anchors.
    pub pinned: &'a [(usize, usize)],
}

impl<'a> MeshInput<'a> {
    pub fn new(polylines: &'a [Polyline], index: &'a SubsegmentIndex) -> Self {
        Self {
            polylines,
            index,
            pinned: &[],
        }
    }
}

fn limits(mesh: &Mesh, config: &DeformConfig) -> SolverLimits {
    SolverLimits {
        tolerance: config.solver_tolerance,
        max_iterations: (config.solver_iteration_factor * mesh.len()).max(1),
    }
}

/// Build the mesh, or report why there is nothing to deform.
///
/// `Ok(None)` means the glyph has no contours at all.
fn prepare(input: &MeshInput) -> Result<Option<Mesh>, DeformError> {
    if input.polylines.is_empty() {
        return Ok(None);
    }
    input.index.validate(input.polylines)?;
    let mesh = Mesh::build(input.polylines);
    if mesh.is_empty() {
        return Err(DeformError::DegenerateMesh);
    }
    Ok(Some(mesh))
}

/// Slant a flattened glyph. Output has the input's contours and vertex
/// counts.
pub fn italicize_polylines(
    input: &MeshInput,
    config: &DeformConfig,
) -> Result<Vec<Polyline>, DeformError> {
    let Some(mesh) = prepare(input)? else {
        return Ok(input.polylines.to_vec());
    };
    let limits = limits(&mesh, config);
    let slope = config.slope();

    // ── Corner alignment & fields ─────────────────────────
    let (base, _) = align_corners(&mesh, &mesh.vertices, input.index);
    let grad = gradients(&mesh, &base);
    let lengths = edge_lengths(&mesh, &base);
    let corners = cornerness(&mesh, &grad);
    let pinned: Vec<usize> = input
        .pinned
        .iter()
        .filter_map(|&(c, p)| mesh.vertex_of(c, p))
        .collect();
    let weights = smoothing_weights(&mesh, &corners, input.index, &pinned, config);

    // ── Coarse width correction ───────────────────────────
    let corrected = if config.stem_width > config.correction_stem_threshold {
        let coarse = slope * config.coarse_skew_factor;
        let skewed = skew(&base, coarse);
        let recomposed = recompose(&mesh, &skewed, &grad, &lengths, &weights, limits);
        skew(&recomposed, -coarse)
    } else {
        base.clone()
    };

    // ── Stem-centre slant ─────────────────────────────────
    let outward = normals(&mesh, &base);
    let offset = config.stem_width * config.stem_center_offset;
    let main = slope * config.main_skew_factor;
    let combined: Vec<Point> = base
        .iter()
        .zip(&outward)
        .zip(&corrected)
        .map(|((&b, &n), &c)| {
            let center = b + n * offset;
            let shear = center.y * main;
            let growth = (center.x - b.x) * config.stem_growth;
            Point::new(c.x + shear + growth, c.y)
        })
        .collect();

    // ── Re-sharpen & residual skew ────────────────────────
    let (realigned, _) = align_corners(&mesh, &combined, input.index);
    let slanted = skew(&realigned, slope * config.residual_skew_factor);

    // ── Detail transfer ───────────────────────────────────
    let reference = skew(&base, slope);
    let detailed = transfer_details(
        &mesh,
        &reference,
        &slanted,
        config.detail_sigma,
        config.detail_weight,
        limits,
    );

    // ── Centring & baseline ───────────────────────────────
    let x_offset = config.italic_x_offset();
    let out: Vec<Point> = detailed
        .iter()
        .zip(&mesh.vertices)
        .map(|(p, orig)| {
            let y = if orig.y == 0.0 { 0.0 } else { p.y };
            Point::new(p.x + x_offset, y)
        })
        .collect();

    Ok(mesh.to_polylines(input.polylines, &out))
}

/// Narrow a flattened glyph.
///
/// Scales x, moves each side inward by a share of the stem width, then
/// recomposes twice against the scaled gradients (coarse, then fine) so
/// tight curves do not fold over. Every y is copied from the source.
pub fn condense_polylines(
    input: &MeshInput,
    config: &DeformConfig,
) -> Result<Vec<Polyline>, DeformError> {
    let Some(mesh) = prepare(input)? else {
        return Ok(input.polylines.to_vec());
    };
    let limits = limits(&mesh, config);
    let n = mesh.len();
    let scale = config.condense_scale;

    let outward = normals(&mesh, &mesh.vertices);
    let scaled: Vec<Point> = mesh
        .vertices
        .iter()
        .map(|p| Point::new(p.x * scale, p.y))
        .collect();
    let grad = gradients(&mesh, &scaled);
    let inset = config.stem_width * config.condense_offset_factor * (1.0 - scale);
    let inset: Vec<Point> = scaled
        .iter()
        .zip(&outward)
        .map(|(p, n)| Point::new(p.x - n.x * inset, p.y))
        .collect();

    let coarse = recompose(
        &mesh,
        &inset,
        &grad,
        &edge_lengths(&mesh, &inset),
        &vec![config.condense_coarse_weight; n],
        limits,
    );
    let fine = recompose(
        &mesh,
        &coarse,
        &grad,
        &edge_lengths(&mesh, &coarse),
        &vec![config.condense_fine_weight; n],
        limits,
    );

    let out: Vec<Point> = fine
        .iter()
        .zip(&mesh.vertices)
        .map(|(p, orig)| Point::new(p.x + config.condense_x_offset, orig.y))
        .collect();

    Ok(mesh.to_polylines(input.polylines, &out))
}

/// Which synthesis to run on a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Italicize,
    Condense,
}

/// Segment, deform and refit one glyph outline (one path per contour).
pub fn deform(
    outline: &[BezPath],
    operation: Operation,
    config: &DeformConfig,
) -> Result<Vec<BezPath>, DeformError> {
    if outline.is_empty() {
        return Ok(vec![]);
    }
    let (polylines, index) = segment(outline, config.segment_resolution)?;
    let input = MeshInput::new(&polylines, &index);
    let processed = match operation {
        Operation::Italicize => italicize_polylines(&input, config)?,
        Operation::Condense => condense_polylines(&input, config)?,
    };
    refit(outline, &processed, &index)
}

/// Slanted variant of a glyph outline.
pub fn italicize(outline: &[BezPath], config: &DeformConfig) -> Result<Vec<BezPath>, DeformError> {
    deform(outline, Operation::Italicize, config)
}

/// Condensed variant of a glyph outline.
pub fn condense(outline: &[BezPath], config: &DeformConfig) -> Result<Vec<BezPath>, DeformError> {
    deform(outline, Operation::Condense, config)
}
