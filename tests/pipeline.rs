use slantmesh::corners::{align_corners, CornerFix, SkipReason};
use slantmesh::gradient::{cornerness, edge_lengths, gradients};
use slantmesh::kurbo::{BezPath, PathEl, Point};
use slantmesh::segment::segment;
use slantmesh::solver::{recompose, SolverLimits};
use slantmesh::{
    condense, condense_polylines, italicize, italicize_polylines, ContourSegments, DeformConfig,
    Mesh, MeshInput, Polyline, SegmentKind, Subsegment, SubsegmentIndex,
};

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((x0, y0));
    path.line_to((x0, y1));
    path.line_to((x1, y1));
    path.line_to((x1, y0));
    path.close_path();
    path
}

/// "D"-like outer contour with a rectangular counter.
fn bowl_glyph() -> Vec<BezPath> {
    let mut outer = BezPath::new();
    outer.move_to((0.0, 0.0));
    outer.line_to((0.0, 700.0));
    outer.line_to((250.0, 700.0));
    outer.curve_to((450.0, 700.0), (560.0, 550.0), (560.0, 350.0));
    outer.curve_to((560.0, 150.0), (450.0, 0.0), (250.0, 0.0));
    outer.close_path();
    // Counter, wound the other way.
    let mut counter = BezPath::new();
    counter.move_to((100.0, 100.0));
    counter.line_to((250.0, 100.0));
    counter.line_to((250.0, 600.0));
    counter.line_to((100.0, 600.0));
    counter.close_path();
    vec![outer, counter]
}

fn pure_slant(angle: f64) -> DeformConfig {
    DeformConfig {
        slant_angle: angle,
        stem_width: 0.0,
        ..DeformConfig::default()
    }
}

#[test]
fn topology_is_preserved() {
    let mut outline = bowl_glyph();
    let mut stroke = BezPath::new();
    stroke.move_to((300.0, 800.0));
    stroke.line_to((400.0, 900.0));
    outline.push(stroke);

    let (polys, index) = segment(&outline, 25.0).unwrap();
    for config in [DeformConfig::default(), pure_slant(14.0)] {
        let out = italicize_polylines(&MeshInput::new(&polys, &index), &config).unwrap();
        assert_eq!(out.len(), polys.len());
        for (a, b) in out.iter().zip(&polys) {
            assert_eq!(a.points.len(), b.points.len());
            assert_eq!(a.closed, b.closed);
        }
        let out = condense_polylines(&MeshInput::new(&polys, &index), &config).unwrap();
        for (a, b) in out.iter().zip(&polys) {
            assert_eq!(a.points.len(), b.points.len());
            assert_eq!(a.closed, b.closed);
        }
    }
}

#[test]
fn refit_output_matches_source_segments() {
    let outline = bowl_glyph();
    let out = italicize(&outline, &DeformConfig::default()).unwrap();
    assert_eq!(out.len(), outline.len());
    for (a, b) in out.iter().zip(&outline) {
        let kinds = |p: &BezPath| -> Vec<std::mem::Discriminant<PathEl>> {
            p.elements().iter().map(std::mem::discriminant).collect()
        };
        assert_eq!(kinds(a), kinds(b));
    }
}

#[test]
fn baseline_vertices_stay_on_the_baseline() {
    let (polys, index) = segment(&bowl_glyph(), 25.0).unwrap();
    for angle in [-8.0, 6.0, 12.0, 20.0] {
        for stem in [0.0, 60.0, 185.0, 240.0] {
            let config = DeformConfig {
                slant_angle: angle,
                stem_width: stem,
                ..DeformConfig::default()
            };
            let out = italicize_polylines(&MeshInput::new(&polys, &index), &config).unwrap();
            for (a, b) in out.iter().zip(&polys) {
                for (p, q) in a.points.iter().zip(&b.points) {
                    if q.y == 0.0 {
                        assert_eq!(p.y, 0.0);
                    }
                }
            }
        }
    }
}

#[test]
fn zero_slant_and_stem_is_identity() {
    let (polys, index) = segment(&bowl_glyph(), 25.0).unwrap();
    let config = DeformConfig {
        slant_angle: 0.0,
        stem_width: 0.0,
        ..DeformConfig::default()
    };
    let out = italicize_polylines(&MeshInput::new(&polys, &index), &config).unwrap();
    for (a, b) in out.iter().zip(&polys) {
        for (p, q) in a.points.iter().zip(&b.points) {
            assert!((p.x - q.x).abs() <= 1e-3, "{:?} vs {:?}", p, q);
            assert!((p.y - q.y).abs() <= 1e-3, "{:?} vs {:?}", p, q);
        }
    }
}

#[test]
fn square_corners_are_stable() {
    let square = vec![
        Point::new(0.0, 0.0),
        Point::new(0.0, 1000.0),
        Point::new(500.0, 1000.0),
        Point::new(500.0, 0.0),
    ];
    let polys = vec![Polyline::closed(square.clone())];
    let index = SubsegmentIndex {
        contours: vec![ContourSegments {
            closed: true,
            segments: (0..4)
                .map(|i| Subsegment { start: i, count: 1, kind: SegmentKind::Line })
                .collect(),
        }],
    };
    let mesh = Mesh::build(&polys);
    let (aligned, _) = align_corners(&mesh, &mesh.vertices, &index);
    let g = gradients(&mesh, &aligned);
    let lengths = edge_lengths(&mesh, &aligned);
    let limits = SolverLimits {
        tolerance: 1e-10,
        max_iterations: 8,
    };
    let out = recompose(&mesh, &aligned, &g, &lengths, &[10.0; 4], limits);
    for (p, q) in out.iter().zip(&square) {
        assert!((*p - *q).hypot() < 1e-6);
    }
}

#[test]
fn collinear_joint_is_left_alone() {
    // Left side split into two collinear line segments at y = 300.
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((0.0, 300.0));
    path.line_to((0.0, 600.0));
    path.line_to((100.0, 600.0));
    path.line_to((100.0, 0.0));
    path.close_path();
    let (mut polys, index) = segment(&[path], 25.0).unwrap();
    let joint = index.contours[0].joint_vertex(0, polys[0].points.len());
    assert_eq!(polys[0].points[joint], Point::new(0.0, 300.0));
    polys[0].points[joint].x = 5.0;

    let mesh = Mesh::build(&polys);
    let (out, fixes) = align_corners(&mesh, &mesh.vertices, &index);
    assert_eq!(out[joint], Point::new(5.0, 300.0));
    assert!(fixes.contains(&CornerFix::Skipped {
        vertex: joint,
        reason: SkipReason::Parallel
    }));
}

#[test]
fn stem_growth_is_monotonic() {
    // A 100-unit wide stem; measured between the two sides at y = 300.
    let (polys, index) = segment(&[rect(0.0, 0.0, 100.0, 600.0)], 25.0).unwrap();
    let left = 12;
    let right = 40;
    assert_eq!(polys[0].points[left], Point::new(0.0, 300.0));
    assert_eq!(polys[0].points[right], Point::new(100.0, 300.0));

    let mut previous = 0.0;
    for stem in [0.0, 30.0, 60.0, 90.0] {
        let config = DeformConfig {
            slant_angle: 10.0,
            stem_width: stem,
            ..DeformConfig::default()
        };
        let out = italicize_polylines(&MeshInput::new(&polys, &index), &config).unwrap();
        let width = out[0].points[left].distance(out[0].points[right]);
        assert!(width > previous, "stem {}: {} <= {}", stem, width, previous);
        previous = width;
    }
}

#[test]
fn notch_survives_the_slant() {
    // Flat-topped block with a rounded notch cut into the top edge.
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.line_to((0.0, 600.0));
    path.line_to((100.0, 600.0));
    path.curve_to((150.0, 480.0), (250.0, 480.0), (300.0, 600.0));
    path.line_to((400.0, 600.0));
    path.line_to((400.0, 0.0));
    path.close_path();
    let (polys, index) = segment(&[path], 25.0).unwrap();
    let bottom = Point::new(200.0, 510.0);
    let notch = (0..polys[0].points.len())
        .min_by(|&a, &b| {
            let da = polys[0].points[a].distance(bottom);
            let db = polys[0].points[b].distance(bottom);
            da.total_cmp(&db)
        })
        .unwrap();
    assert!(polys[0].points[notch].distance(bottom) < 1e-6);

    let out = italicize_polylines(&MeshInput::new(&polys, &index), &pure_slant(10.0)).unwrap();

    let before_mesh = Mesh::build(&polys);
    let before = cornerness(&before_mesh, &gradients(&before_mesh, &before_mesh.vertices));
    let after_mesh = Mesh::build(&out);
    let after = cornerness(&after_mesh, &gradients(&after_mesh, &after_mesh.vertices));
    assert!(before[notch] >= 0.9, "before {}", before[notch]);
    assert!(after[notch] >= 0.9, "after {}", after[notch]);
}

#[test]
fn square_becomes_a_parallelogram() {
    let mut square = BezPath::new();
    square.move_to((0.0, 0.0));
    square.line_to((0.0, 1000.0));
    square.line_to((500.0, 1000.0));
    square.line_to((500.0, 0.0));
    square.close_path();

    let out = italicize(&[square], &pure_slant(12.0)).unwrap();
    let points: Vec<Point> = out[0]
        .elements()
        .iter()
        .filter_map(|el| match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(points.len(), 4);

    let shift = 1000.0 * 12f64.to_radians().tan();
    assert_eq!(points[0].y, 0.0);
    assert_eq!(points[3].y, 0.0);
    assert!((points[1].y - 1000.0).abs() < 1e-3);
    assert!((points[1].x - points[0].x - shift).abs() < 1e-3);
    assert!((points[2].x - points[3].x - shift).abs() < 1e-3);
    assert!((points[3].x - points[0].x - 500.0).abs() < 1e-3);
}

#[test]
fn condense_narrows_and_keeps_heights() {
    let outline = vec![rect(0.0, 0.0, 400.0, 700.0)];
    let (polys, index) = segment(&outline, 25.0).unwrap();
    let out = condense_polylines(&MeshInput::new(&polys, &index), &DeformConfig::default())
        .unwrap();
    for (p, q) in out[0].points.iter().zip(&polys[0].points) {
        assert_eq!(p.y, q.y);
    }
    // Vertices 14 and 58 sit halfway up the left and right sides.
    assert_eq!(polys[0].points[14], Point::new(0.0, 350.0));
    assert_eq!(polys[0].points[58], Point::new(400.0, 350.0));
    let width = out[0].points[58].x - out[0].points[14].x;
    assert!(width > 270.0 && width < 320.0, "width {}", width);
    assert!(out[0].points[14].x > 15.0);

    let refitted = condense(&outline, &DeformConfig::default()).unwrap();
    assert_eq!(refitted[0].elements().len(), outline[0].elements().len());
}

#[test]
fn empty_outline_is_returned_unchanged() {
    assert!(italicize(&[], &DeformConfig::default()).unwrap().is_empty());
    assert!(condense(&[], &DeformConfig::default()).unwrap().is_empty());
}
