use thiserror::Error;

/// Errors that abort deformation of a single glyph.
///
/// Local degradations (parallel corner lines, a solver that runs out of
/// iterations) are not errors; they are reported through
/// [`CornerFix`](crate::corners::CornerFix) and
/// [`Solution`](crate::solver::Solution) instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DeformError {
    #[error("empty contour")]
    EmptyContour,

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("contour {contour}: expected {expected}, found {found}")]
    TopologyMismatch {
        contour: usize,
        expected: String,
        found: String,
    },

    #[error("no contour has at least two points")]
    DegenerateMesh,

    #[cfg(feature = "ufo")]
    #[error("contour conversion failed: {0}")]
    ContourConvert(String),

    #[cfg(feature = "ufo")]
    #[error("norad error: {0}")]
    Norad(#[from] norad::error::FontLoadError),

    #[cfg(feature = "ufo")]
    #[error("norad write error: {0}")]
    NoradWrite(#[from] norad::error::FontWriteError),
}

impl DeformError {
    pub(crate) fn mismatch(
        contour: usize,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        DeformError::TopologyMismatch {
            contour,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}
