//! slantmesh: italic and condensed glyph synthesis by mesh deformation.
//!
//! An outline is flattened into closed polylines, deformed as a mesh
//! (shear, stem growth, detail transfer) by solving a Laplacian system,
//! then refitted onto its original segment structure. Contour count,
//! segment count and segment kinds are preserved, so the result stays
//! interpolation-compatible with its source.
//!
//! # Example
//!
//! ```
//! use slantmesh::{italicize, DeformConfig};
//! use slantmesh::kurbo::BezPath;
//!
//! let mut stem = BezPath::new();
//! stem.move_to((0.0, 0.0));
//! stem.line_to((0.0, 700.0));
//! stem.line_to((90.0, 700.0));
//! stem.line_to((90.0, 0.0));
//! stem.close_path();
//!
//! let slanted = italicize(&[stem], &DeformConfig::default())?;
//! assert_eq!(slanted.len(), 1);
//! # Ok::<(), slantmesh::DeformError>(())
//! ```

#![forbid(unsafe_code)]

mod config;
mod geom;

pub mod batch;
pub mod corners;
pub mod deform;
pub mod detail;
pub mod error;
pub mod gradient;
pub mod mesh;
pub mod refit;
pub mod segment;
pub mod solver;
pub mod subsegment;

#[cfg(feature = "ufo")]
pub mod ufo;

// Re-export kurbo so callers build outlines with the same version.
pub use kurbo;

pub use batch::{deform_batch, BatchReport, GlyphOutcome, NamedOutline};
pub use config::DeformConfig;
pub use corners::{CornerFix, SkipReason};
pub use deform::{
    condense, condense_polylines, deform, italicize, italicize_polylines, MeshInput, Operation,
};
pub use error::DeformError;
pub use mesh::{Mesh, Polyline};
pub use solver::{Solution, SolverLimits};
pub use subsegment::{ContourSegments, SegmentKind, Subsegment, SubsegmentIndex};
