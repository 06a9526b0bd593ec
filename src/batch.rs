//! Deform many glyphs in parallel.

use kurbo::BezPath;
use rayon::prelude::*;

use crate::config::DeformConfig;
use crate::deform::{deform, Operation};
use crate::error::DeformError;

/// A named glyph outline, one path per contour.
#[derive(Debug, Clone)]
pub struct NamedOutline {
    pub name: String,
    pub paths: Vec<BezPath>,
}

/// What happened to one glyph of a batch.
#[derive(Debug)]
pub enum GlyphOutcome {
    /// New outline with the input's contour and segment structure.
    Deformed(Vec<BezPath>),
    /// Nothing to deform (no contours).
    Unchanged,
    /// Deformation failed; the caller keeps the glyph as it was.
    Failed(DeformError),
}

impl GlyphOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, GlyphOutcome::Failed(_))
    }
}

/// Per-glyph outcomes in input order, plus counts.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<(String, GlyphOutcome)>,
    pub deformed: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Run `operation` on every glyph independently.
///
/// A failing glyph is logged and reported; it never stops the batch.
pub fn deform_batch(
    glyphs: &[NamedOutline],
    operation: Operation,
    config: &DeformConfig,
) -> BatchReport {
    let outcomes: Vec<(String, GlyphOutcome)> = glyphs
        .par_iter()
        .map(|glyph| {
            let outcome = if glyph.paths.is_empty() {
                GlyphOutcome::Unchanged
            } else {
                match deform(&glyph.paths, operation, config) {
                    Ok(paths) => GlyphOutcome::Deformed(paths),
                    Err(e) => {
                        log::warn!("{}: {} (left unchanged)", glyph.name, e);
                        GlyphOutcome::Failed(e)
                    }
                }
            };
            (glyph.name.clone(), outcome)
        })
        .collect();

    let mut report = BatchReport {
        outcomes,
        deformed: 0,
        unchanged: 0,
        failed: 0,
    };
    for (_, outcome) in &report.outcomes {
        match outcome {
            GlyphOutcome::Deformed(_) => report.deformed += 1,
            GlyphOutcome::Unchanged => report.unchanged += 1,
            GlyphOutcome::Failed(_) => report.failed += 1,
        }
    }
    log::info!(
        "{:?}: {} glyphs deformed, {} unchanged, {} failed",
        operation,
        report.deformed,
        report.unchanged,
        report.failed
    );
    report
}
