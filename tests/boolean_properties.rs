#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use planar_clip::operations::query::{signed_area, total_area};
use planar_clip::{BoolOp, Clip, ClipOptions, ContourTree, FillRule, Path, SimplifySelfIntersecting};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn square(x0: f64, y0: f64, size: f64) -> Path {
    Path::polygon(&[(x0, y0), (x0 + size, y0), (x0 + size, y0 + size), (x0, y0 + size)])
}

fn run(op: BoolOp, a: &Path, b: &Path) -> Vec<Path> {
    Clip::new(op)
        .with_subject(a.clone())
        .with_clip(b.clone())
        .execute()
        .unwrap()
}

fn run_with(op: BoolOp, a: &Path, b: Option<&Path>, fill: FillRule, options: &ClipOptions) -> f64 {
    let mut clip = Clip::new(op)
        .with_subject(a.clone())
        .with_fill_rules(fill, fill)
        .with_options(options.clone());
    if let Some(b) = b {
        clip = clip.with_clip(b.clone());
    }
    total_area(&clip.execute().unwrap())
}

/// Deterministic polygon source: small vertex counts on a 4x4 grid, which
/// yields plenty of shared vertices and coincident edges.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next() % n
    }

    #[allow(clippy::cast_precision_loss)]
    fn polygon(&mut self, max_vertices: u64) -> Path {
        let n = 3 + self.below(max_vertices - 2);
        let points: Vec<(f64, f64)> = (0..n)
            .map(|_| (self.below(4) as f64, self.below(4) as f64))
            .collect();
        Path::polygon(&points)
    }
}

const FILL_RULES: [FillRule; 4] = [
    FillRule::EvenOdd,
    FillRule::NonZero,
    FillRule::Positive,
    FillRule::Negative,
];

fn assert_tree_orientation(tree: &ContourTree) {
    let mut stack: Vec<_> = tree.roots().to_vec();
    while let Some(id) = stack.pop() {
        let node = tree.node(id).unwrap();
        let area = signed_area(&node.contour);
        if tree.is_hole(id) {
            assert!(area < 0.0, "hole with area {area}");
        } else {
            assert!(area > 0.0, "outer with area {area}");
        }
        stack.extend(node.children.iter().copied());
    }
}

#[test]
fn overlapping_unit_squares() {
    init_tracing();
    let a = square(0.0, 0.0, 1.0);
    let b = Path::polygon(&[(0.5, 0.0), (1.5, 0.0), (1.5, 1.0), (0.5, 1.0)]);

    let union = run(BoolOp::Union, &a, &b);
    assert_eq!(union.len(), 1);
    assert_relative_eq!(total_area(&union), 1.5, epsilon = 1e-9);

    let inter = run(BoolOp::Intersection, &a, &b);
    assert_eq!(inter.len(), 1);
    assert_eq!(inter[0].len(), 4);
    assert_relative_eq!(total_area(&inter), 0.5, epsilon = 1e-9);
    for p in &inter[0].points {
        assert!((0.5..=1.0).contains(&p.x));
        assert!((0.0..=1.0).contains(&p.y));
    }

    let diff = run(BoolOp::Difference, &a, &b);
    assert_eq!(diff.len(), 1);
    assert_relative_eq!(total_area(&diff), 0.5, epsilon = 1e-9);
}

#[test]
fn disjoint_areas_add_up() {
    let a = square(0.0, 0.0, 2.0);
    let b = Path::polygon(&[(5.0, 0.0), (9.0, 0.0), (7.0, 3.0)]);
    let union = run(BoolOp::Union, &a, &b);
    assert_eq!(union.len(), 2);
    assert_relative_eq!(total_area(&union), signed_area(&a) + signed_area(&b), epsilon = 1e-9);
    assert!(run(BoolOp::Intersection, &a, &b).is_empty());
}

#[test]
fn union_equals_union_of_xor_and_intersection() {
    let a = square(0.0, 0.0, 4.0);
    let b = Path::polygon(&[(2.0, -1.0), (6.0, 2.0), (2.0, 5.0)]);
    let union = run(BoolOp::Union, &a, &b);
    let xor = run(BoolOp::Xor, &a, &b);
    let inter = run(BoolOp::Intersection, &a, &b);
    let rebuilt = Clip::new(BoolOp::Union)
        .with_subjects(xor)
        .with_clips(inter)
        .execute()
        .unwrap();
    assert_relative_eq!(total_area(&rebuilt), total_area(&union), epsilon = 1e-6);
}

#[test]
fn union_with_nothing_is_simplification() {
    let notched = Path::polygon(&[
        (0.0, 0.0),
        (6.0, 0.0),
        (6.0, 4.0),
        (4.0, 4.0),
        (3.0, 1.0),
        (2.0, 4.0),
        (0.0, 4.0),
    ]);
    let union = Clip::new(BoolOp::Union)
        .with_subject(notched.clone())
        .execute()
        .unwrap();
    let simplified = SimplifySelfIntersecting::new(notched.clone(), FillRule::EvenOdd)
        .execute()
        .unwrap();
    assert_eq!(union, simplified);
    assert_relative_eq!(total_area(&union), signed_area(&notched), epsilon = 1e-9);
}

#[test]
fn bowtie_splits_into_two_triangles() {
    let bowtie = Path::polygon(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]);
    let out = SimplifySelfIntersecting::new(bowtie, FillRule::EvenOdd)
        .execute()
        .unwrap();
    assert_eq!(out.len(), 2);
    for tri in &out {
        assert_eq!(tri.len(), 3);
        assert_relative_eq!(signed_area(tri), 0.25, epsilon = 1e-9);
    }
}

#[test]
fn tree_nesting_matches_orientation() {
    let outer = square(0.0, 0.0, 10.0);
    let frame_hole = square(2.0, 2.0, 6.0);
    let island = square(4.0, 4.0, 2.0);
    let tree = Clip::new(BoolOp::Union)
        .with_subjects([outer, frame_hole, island])
        .execute_tree()
        .unwrap();
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.roots().len(), 1);
    let root = tree.node(tree.roots()[0]).unwrap();
    assert_eq!(root.children.len(), 1);
    let hole = root.children[0];
    assert!(tree.is_hole(hole));
    assert_eq!(tree.node(hole).unwrap().children.len(), 1);
    assert_tree_orientation(&tree);
    assert_relative_eq!(total_area(&tree.closed_paths()), 100.0 - 36.0 + 4.0, epsilon = 1e-9);
}

#[test]
fn flat_output_orientation_follows_holes() {
    let out = run(BoolOp::Difference, &square(0.0, 0.0, 6.0), &square(2.0, 2.0, 2.0));
    assert_eq!(out.len(), 2);
    let mut areas: Vec<f64> = out.iter().map(signed_area).collect();
    areas.sort_by(f64::total_cmp);
    assert_relative_eq!(areas[0], -4.0, epsilon = 1e-9);
    assert_relative_eq!(areas[1], 36.0, epsilon = 1e-9);
}

#[test]
fn open_line_is_cut_by_polygon() {
    let line = Path::polyline(&[(-2.0, 1.0), (5.0, 1.0)]);
    let out = Clip::new(BoolOp::Intersection)
        .with_subject(line.clone())
        .with_clip(square(0.0, 0.0, 2.0))
        .execute()
        .unwrap();
    assert_eq!(out.len(), 1);
    assert!(!out[0].closed);
    let xs: Vec<f64> = out[0].points.iter().map(|p| p.x).collect();
    assert!(xs.contains(&0.0) && xs.contains(&2.0));

    let outside = Clip::new(BoolOp::Difference)
        .with_subject(line)
        .with_clip(square(0.0, 0.0, 2.0))
        .execute()
        .unwrap();
    assert_eq!(outside.len(), 2);
}

#[test]
fn generated_polygons_satisfy_area_identities() {
    init_tracing();
    let mut rng = Lcg(0x5eed);
    for case in 0..150 {
        let a = rng.polygon(7);
        let b = rng.polygon(8);
        for fill in FILL_RULES {
            for strict in [true, false] {
                let options = ClipOptions::default().with_strictly_simple(strict);
                let area = |op, x: &Path, y: Option<&Path>| run_with(op, x, y, fill, &options);
                let union = area(BoolOp::Union, &a, Some(&b));
                let inter = area(BoolOp::Intersection, &a, Some(&b));
                let xor = area(BoolOp::Xor, &a, Some(&b));
                let a_minus_b = area(BoolOp::Difference, &a, Some(&b));
                let b_minus_a = area(BoolOp::Difference, &b, Some(&a));
                let simple_a = area(BoolOp::Union, &a, None);

                let ctx = format!("case {case} {fill:?} strict={strict} a={a:?} b={b:?}");
                assert!((union - xor - inter).abs() < 1e-3, "U != X + I: {ctx}");
                assert!((xor - a_minus_b - b_minus_a).abs() < 1e-3, "X != A\\B + B\\A: {ctx}");
                assert!((simple_a - a_minus_b - inter).abs() < 1e-3, "A != A\\B + I: {ctx}");
            }
        }
    }
}

#[test]
fn coincident_edges_keep_xor_area() {
    // A overlaps itself along x = 0; B shares the horizontal run y = 1 with A.
    let a = Path::polygon(&[
        (1.0, 1.0),
        (0.0, 2.0),
        (0.0, 0.0),
        (2.0, 2.0),
        (0.0, 2.0),
        (0.0, 1.0),
    ]);
    let b = Path::polygon(&[(1.0, 0.0), (0.0, 1.0), (2.0, 1.0), (0.0, 0.0)]);
    for strict in [true, false] {
        let options = ClipOptions::default().with_strictly_simple(strict);
        let area = |op| run_with(op, &a, Some(&b), FillRule::EvenOdd, &options);
        let union = area(BoolOp::Union);
        let inter = area(BoolOp::Intersection);
        let xor = area(BoolOp::Xor);
        assert_relative_eq!(xor, 11.0 / 6.0, epsilon = 1e-3);
        assert_relative_eq!(union, xor + inter, epsilon = 1e-3);
    }
}

#[test]
fn ring_split_keeps_filled_regions_outer() {
    let a = Path::polygon(&[
        (0.0, 1.0),
        (1.0, 1.0),
        (2.0, 3.0),
        (0.0, 1.0),
        (3.0, 3.0),
        (2.0, 1.0),
        (1.0, 1.0),
    ]);
    let b = Path::polygon(&[
        (2.0, 3.0),
        (3.0, 1.0),
        (0.0, 3.0),
        (0.0, 2.0),
        (3.0, 2.0),
        (1.0, 1.0),
        (2.0, 1.0),
        (1.0, 3.0),
    ]);
    let diff = |strict| {
        Clip::new(BoolOp::Difference)
            .with_subject(a.clone())
            .with_clip(b.clone())
            .with_options(ClipOptions::default().with_strictly_simple(strict))
            .execute()
            .unwrap()
    };
    let loose = diff(false);
    let strict = diff(true);
    assert_relative_eq!(total_area(&strict), total_area(&loose), epsilon = 1e-6);
    assert_relative_eq!(total_area(&strict), 1.1928, epsilon = 1e-3);
    for ring in &strict {
        assert!(signed_area(ring) > 0.0, "ring {ring:?} came out as a hole");
    }
}

#[test]
fn self_touching_rings_nest_under_their_outer() {
    let a = Path::polygon(&[(1.0, 1.0), (1.0, 1.0), (1.0, 3.0), (1.0, 3.0), (2.0, 2.0)]);
    let b = Path::polygon(&[
        (2.0, 3.0),
        (3.0, 1.0),
        (1.0, 2.0),
        (3.0, 1.0),
        (0.0, 3.0),
        (3.0, 0.0),
        (1.0, 3.0),
        (3.0, 3.0),
    ]);
    let tree = Clip::new(BoolOp::Xor)
        .with_subject(a.clone())
        .with_clip(b.clone())
        .execute_tree()
        .unwrap();
    assert_tree_orientation(&tree);
    assert_relative_eq!(total_area(&tree.closed_paths()), 7.0 / 3.0, epsilon = 1e-3);

    let holes: Vec<_> = tree
        .roots()
        .iter()
        .flat_map(|&r| tree.node(r).unwrap().children.clone())
        .collect();
    assert_eq!(holes.len(), 1);
    assert_relative_eq!(signed_area(&tree.node(holes[0]).unwrap().contour), -0.2, epsilon = 1e-3);

    let flat = run(BoolOp::Xor, &a, &b);
    assert_relative_eq!(total_area(&flat), 7.0 / 3.0, epsilon = 1e-3);
}

#[test]
fn signed_fill_rules_pick_winding_direction() {
    let ccw = square(0.0, 0.0, 2.0);
    let cw = Path::polygon(&[(1.0, 0.0), (1.0, 2.0), (3.0, 2.0), (3.0, 0.0)]);
    let fill = |rule| {
        Clip::new(BoolOp::Union)
            .with_subjects([ccw.clone(), cw.clone()])
            .with_fill_rules(rule, rule)
            .execute()
            .unwrap()
    };

    let positive = fill(FillRule::Positive);
    assert_eq!(positive.len(), 1);
    assert_relative_eq!(total_area(&positive), 2.0, epsilon = 1e-9);
    assert!(positive[0].points.iter().all(|p| p.x <= 1.0));

    let negative = fill(FillRule::Negative);
    assert_eq!(negative.len(), 1);
    assert_relative_eq!(total_area(&negative), 2.0, epsilon = 1e-9);
    assert!(negative[0].points.iter().all(|p| p.x >= 2.0));

    // The overlap has winding zero under both unsigned rules too.
    for rule in [FillRule::NonZero, FillRule::EvenOdd] {
        let out = fill(rule);
        assert_eq!(out.len(), 2);
        assert_relative_eq!(total_area(&out), 4.0, epsilon = 1e-9);
    }
}

#[test]
fn preserve_collinear_keeps_mid_edge_vertices() {
    let square_with_mid =
        Path::polygon(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
    let union = |options: ClipOptions| {
        Clip::new(BoolOp::Union)
            .with_subject(square_with_mid.clone())
            .with_options(options)
            .execute()
            .unwrap()
    };

    let stripped = union(ClipOptions::default());
    assert_eq!(stripped.len(), 1);
    assert_eq!(stripped[0].len(), 4);

    let kept = union(ClipOptions::default().with_preserve_collinear(true));
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].len(), 5);
    assert!(kept[0].points.iter().any(|p| (p.x - 1.0).abs() < 1e-9 && p.y.abs() < 1e-9));
    assert_relative_eq!(total_area(&kept), 4.0, epsilon = 1e-9);
}

#[test]
fn reverse_solution_flips_output_orientation() {
    let out = Clip::new(BoolOp::Difference)
        .with_subject(square(0.0, 0.0, 6.0))
        .with_clip(square(2.0, 2.0, 2.0))
        .with_options(ClipOptions::default().with_reverse_solution(true))
        .execute()
        .unwrap();
    assert_eq!(out.len(), 2);
    let mut areas: Vec<f64> = out.iter().map(signed_area).collect();
    areas.sort_by(f64::total_cmp);
    assert_relative_eq!(areas[0], -36.0, epsilon = 1e-9);
    assert_relative_eq!(areas[1], 4.0, epsilon = 1e-9);
}
