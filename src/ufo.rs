//! UFO glyph conversion and whole-font deformation.

use kurbo::{Affine, BezPath, PathEl, Point};
use norad::{Contour, ContourPoint, Font, Glyph, PointType};

use crate::batch::{deform_batch, BatchReport, GlyphOutcome, NamedOutline};
use crate::config::DeformConfig;
use crate::deform::Operation;
use crate::error::DeformError;

/// Outline of a UFO glyph as one `BezPath` per contour.
pub fn glyph_outline(glyph: &Glyph) -> Result<Vec<BezPath>, DeformError> {
    glyph
        .contours
        .iter()
        .map(|c| {
            c.to_kurbo()
                .map_err(|e| DeformError::ContourConvert(e.to_string()))
        })
        .collect()
}

/// Convert a `kurbo::BezPath` to a `norad::Contour`.
pub fn to_contour(path: &BezPath) -> Result<Contour, DeformError> {
    let elements = path.elements();
    let first = match elements.first() {
        Some(PathEl::MoveTo(p)) => *p,
        Some(_) => {
            return Err(DeformError::InvalidPath(
                "path must start with MoveTo".into(),
            ))
        }
        None => return Err(DeformError::EmptyContour),
    };
    let closed = matches!(elements.last(), Some(PathEl::ClosePath));

    let mut points: Vec<ContourPoint> = Vec::new();
    let mut current = first;
    let mut closing_type = PointType::Line;
    for el in elements.iter().skip(1) {
        match *el {
            PathEl::LineTo(p) => {
                points.push(contour_point(p, PointType::Line, false));
                current = p;
            }
            PathEl::CurveTo(a, b, p) => {
                points.push(contour_point(a, PointType::OffCurve, false));
                points.push(contour_point(b, PointType::OffCurve, false));
                points.push(contour_point(p, PointType::Curve, false));
                current = p;
            }
            PathEl::QuadTo(a, p) => {
                points.push(contour_point(a, PointType::OffCurve, false));
                points.push(contour_point(p, PointType::QCurve, false));
                current = p;
            }
            PathEl::ClosePath => {
                // An explicit segment back to the start becomes the first
                // point; otherwise the closing line is implicit.
                if current == first && !points.is_empty() {
                    if let Some(last) = points.pop() {
                        closing_type = last.typ;
                    }
                }
                break;
            }
            PathEl::MoveTo(_) => {
                return Err(DeformError::InvalidPath("unexpected MoveTo mid-path".into()))
            }
        }
    }

    let first_type = if closed { closing_type } else { PointType::Move };
    points.insert(0, contour_point(first, first_type, false));
    Ok(Contour::new(points, None))
}

fn contour_point(p: Point, typ: PointType, smooth: bool) -> ContourPoint {
    ContourPoint::new(p.x, p.y, typ, smooth, None, None)
}

fn is_on_curve(p: &ContourPoint) -> bool {
    !matches!(p.typ, PointType::OffCurve)
}

/// Carry smooth flags and point names over from the source contour,
/// matching on-curve points in order.
fn inherit_point_attributes(target: &mut Contour, source: &Contour) {
    let src: Vec<&ContourPoint> = source.points.iter().filter(|p| is_on_curve(p)).collect();
    let dst_count = target.points.iter().filter(|p| is_on_curve(p)).count();
    if src.len() != dst_count {
        return;
    }
    for (dst, src) in target
        .points
        .iter_mut()
        .filter(|p| is_on_curve(p))
        .zip(src)
    {
        dst.smooth = src.smooth;
        dst.name = src.name.clone();
    }
}

/// Affine applied to a glyph's metric members after an operation.
///
/// Italic: `x' = narrow·x + slope·y + x_offset`. Condense:
/// `x' = scale·x + condense_x_offset`. y is unchanged in both.
pub fn member_transform(operation: Operation, config: &DeformConfig) -> Affine {
    match operation {
        Operation::Italicize => Affine::new([
            config.narrow_amount,
            0.0,
            config.slope(),
            1.0,
            config.italic_x_offset(),
            0.0,
        ]),
        Operation::Condense => Affine::new([
            config.condense_scale,
            0.0,
            0.0,
            1.0,
            config.condense_x_offset,
            0.0,
        ]),
    }
}

/// Move advance width, anchors and component offsets to match a
/// deformed outline.
///
/// Component offsets take only the linear part: the referenced glyph
/// already carries the translation.
pub fn transform_members(glyph: &mut Glyph, operation: Operation, config: &DeformConfig) {
    let affine = member_transform(operation, config);
    let [a, b, c, d, _, _] = affine.as_coeffs();
    let linear = Affine::new([a, b, c, d, 0.0, 0.0]);

    glyph.width = match operation {
        Operation::Italicize => glyph.width * config.narrow_amount,
        Operation::Condense => {
            glyph.width * config.condense_scale + 2.0 * config.condense_x_offset
        }
    };
    for anchor in &mut glyph.anchors {
        let p = affine * Point::new(anchor.x, anchor.y);
        anchor.x = p.x;
    }
    for component in &mut glyph.components {
        let t = &mut component.transform;
        let p = linear * Point::new(t.x_offset, t.y_offset);
        t.x_offset = p.x;
    }
}

/// Replace a glyph's contours with a deformed outline.
pub fn apply_outline(glyph: &mut Glyph, paths: &[BezPath]) -> Result<(), DeformError> {
    let mut contours = Vec::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        let mut contour = to_contour(path)?;
        if let Some(source) = glyph.contours.get(i) {
            inherit_point_attributes(&mut contour, source);
        }
        contours.push(contour);
    }
    glyph.contours = contours;
    Ok(())
}

/// Deform glyphs of the font's default layer in place.
///
/// `only` restricts the run to the named glyphs. Glyphs that fail keep
/// their outline and metrics.
pub fn deform_font(
    font: &mut Font,
    operation: Operation,
    config: &DeformConfig,
    only: Option<&[String]>,
) -> Result<BatchReport, DeformError> {
    let mut glyphs = Vec::new();
    for glyph in font.default_layer().iter() {
        let name = glyph.name().to_string();
        if let Some(only) = only {
            if !only.iter().any(|n| *n == name) {
                continue;
            }
        }
        let paths = match glyph_outline(glyph) {
            Ok(paths) => paths,
            Err(e) => {
                log::warn!("{}: {} (left unchanged)", name, e);
                continue;
            }
        };
        glyphs.push(NamedOutline { name, paths });
    }

    let report = deform_batch(&glyphs, operation, config);

    let layer = font.default_layer_mut();
    for (name, outcome) in &report.outcomes {
        let Some(glyph) = layer.get_glyph_mut(name.as_str()) else {
            continue;
        };
        match outcome {
            GlyphOutcome::Deformed(paths) => {
                apply_outline(glyph, paths)?;
                transform_members(glyph, operation, config);
            }
            GlyphOutcome::Unchanged => transform_members(glyph, operation, config),
            GlyphOutcome::Failed(_) => {}
        }
    }
    Ok(report)
}
