/// All deformation parameters in one struct.
///
/// One value is passed by reference into every pipeline invocation;
/// nothing here is mutated while a glyph is processed. The numeric
/// defaults are the tuned values the italic and condensed masters were
/// built with, so changing them changes output geometry.
#[derive(Debug, Clone)]
pub struct DeformConfig {
    // -- Segmentation --
    /// Target spacing (font units) between polyline vertices when
    /// flattening lines and curves.
    pub segment_resolution: f64,

    // -- Italic --
    /// Slant angle in degrees. Positive leans the top of the glyph right.
    pub slant_angle: f64,
    /// Target stem width in font units.
    pub stem_width: f64,
    /// Vertical centre the slant pivots around (font units, usually
    /// negative, about 0.29 × UPM). The glyph is shifted by
    /// `tan(angle) × mean_y_center` on x.
    pub mean_y_center: f64,
    /// Horizontal scale applied to advance width and anchors of the
    /// italic glyph.
    pub narrow_amount: f64,
    /// Multiple of the slant used for the coarse width-correction skew.
    pub coarse_skew_factor: f64,
    /// Fraction of the slant applied through the stem-centre mesh.
    pub main_skew_factor: f64,
    /// Fraction of the slant applied after corner re-alignment.
    pub residual_skew_factor: f64,
    /// Offset of the stem-centre mesh along outward normals, as a
    /// fraction of `stem_width`.
    pub stem_center_offset: f64,
    /// Fraction of the stem-centre offset carried into the outline as
    /// horizontal stem growth.
    pub stem_growth: f64,
    /// Coarse width correction only runs for stems wider than this.
    pub correction_stem_threshold: f64,

    // -- Smoothing weights --
    /// Weight for ordinary vertices (curve-correction strength).
    pub curve_correction_weight: f64,
    /// Weight for vertices joining two line segments.
    pub line_joint_weight: f64,
    /// Vertices whose cornerness falls below this are corners.
    pub corner_threshold: f64,
    /// Weight for corner vertices.
    pub corner_weight: f64,
    /// Weight for caller-supplied anchor vertices.
    pub anchor_weight: f64,

    // -- Detail transfer --
    /// Standard deviation (in vertices) of the gradient smoothing window.
    pub detail_sigma: f64,
    /// Uniform weight of the detail-transfer recompose.
    pub detail_weight: f64,

    // -- Condense --
    /// Horizontal scale of the condensed glyph.
    pub condense_scale: f64,
    /// Fraction of `stem_width × (1 - condense_scale)` each side moves in.
    pub condense_offset_factor: f64,
    /// Weight of the first (coarse) condense recompose.
    pub condense_coarse_weight: f64,
    /// Weight of the second (fine) condense recompose.
    pub condense_fine_weight: f64,
    /// Horizontal shift applied to the condensed outline.
    pub condense_x_offset: f64,

    // -- Solver --
    /// Relative residual at which conjugate gradient stops.
    pub solver_tolerance: f64,
    /// Iteration cap as a multiple of the vertex count.
    pub solver_iteration_factor: usize,
}

impl Default for DeformConfig {
    fn default() -> Self {
        Self {
            segment_resolution: 25.0,
            slant_angle: 10.0,
            stem_width: 185.0,
            mean_y_center: -825.0,
            narrow_amount: 1.0,
            coarse_skew_factor: 1.6,
            main_skew_factor: 0.9,
            residual_skew_factor: 0.1,
            stem_center_offset: 0.4,
            stem_growth: 0.1,
            correction_stem_threshold: 100.0,
            curve_correction_weight: 0.03,
            line_joint_weight: 1.0,
            corner_threshold: 0.6,
            corner_weight: 10.0,
            anchor_weight: 10.0,
            detail_sigma: 7.0,
            detail_weight: 0.1,
            condense_scale: 0.8,
            condense_offset_factor: 0.5,
            condense_coarse_weight: 0.5,
            condense_fine_weight: 0.01,
            condense_x_offset: 15.0,
            solver_tolerance: 1e-8,
            solver_iteration_factor: 2,
        }
    }
}

impl DeformConfig {
    /// Shear slope for the configured slant angle.
    pub fn slope(&self) -> f64 {
        self.slant_angle.to_radians().tan()
    }

    /// Horizontal shift compensating for the slant's optical centre.
    pub fn italic_x_offset(&self) -> f64 {
        self.slope() * self.mean_y_center
    }
}
