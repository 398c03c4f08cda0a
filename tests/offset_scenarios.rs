#![allow(clippy::unwrap_used)]

use std::f64::consts::PI;

use approx::assert_relative_eq;
use planar_clip::operations::query::{signed_area, total_area};
use planar_clip::{EndStyle, FillRule, JoinStyle, Offset, Path, SimplifySelfIntersecting};

fn unit_square() -> Path {
    Path::polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
}

fn hexagon(radius: f64) -> Path {
    let coords: Vec<(f64, f64)> = (0..6)
        .map(|i| {
            let a = f64::from(i) * PI / 3.0;
            (radius * a.cos(), radius * a.sin())
        })
        .collect();
    Path::polygon(&coords)
}

#[test]
fn square_join_gives_square_corners() {
    let out = Offset::new(0.1)
        .with_path(&unit_square(), JoinStyle::Square, EndStyle::ClosedPolygon)
        .execute()
        .unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].len(), 4);
    assert_relative_eq!(signed_area(&out[0]), 1.44, epsilon = 1e-9);
}

#[test]
fn round_join_gives_quarter_circle_corners() {
    let out = Offset::new(0.1)
        .with_path(&unit_square(), JoinStyle::Round, EndStyle::ClosedPolygon)
        .execute()
        .unwrap();
    assert_eq!(out.len(), 1);
    let expected = 1.2 * 1.2 - 4.0 * 0.01 + PI * 0.01;
    assert_relative_eq!(signed_area(&out[0]), expected, epsilon = 1e-3);
}

#[test]
fn growing_a_convex_polygon_stays_simple() {
    let hex = hexagon(3.0);
    for join in [JoinStyle::Square, JoinStyle::Round, JoinStyle::Miter] {
        let out = Offset::new(0.5)
            .with_path(&hex, join, EndStyle::ClosedPolygon)
            .execute()
            .unwrap();
        assert_eq!(out.len(), 1);
        assert!(signed_area(&out[0]) > signed_area(&hex));
        let resolved = SimplifySelfIntersecting::new(out[0].clone(), FillRule::NonZero)
            .execute()
            .unwrap();
        assert_relative_eq!(total_area(&resolved), signed_area(&out[0]), epsilon = 1e-6);
    }
}

#[test]
fn concave_corner_overlap_is_resolved() {
    let ell = Path::polygon(&[
        (0.0, 0.0),
        (4.0, 0.0),
        (4.0, 1.0),
        (1.0, 1.0),
        (1.0, 4.0),
        (0.0, 4.0),
    ]);
    let out = Offset::new(0.25)
        .with_path(&ell, JoinStyle::Miter, EndStyle::ClosedPolygon)
        .execute()
        .unwrap();
    assert_eq!(out.len(), 1);
    // Arms widen to 1.5 and lengthen to 4.5.
    assert_relative_eq!(signed_area(&out[0]), 4.5 * 1.5 + 3.0 * 1.5, epsilon = 1e-9);
}

#[test]
fn round_capped_line() {
    let line = Path::polyline(&[(0.0, 0.0), (10.0, 0.0)]);
    let out = Offset::new(1.0)
        .with_arc_tolerance(0.001)
        .with_path(&line, JoinStyle::Round, EndStyle::OpenRound)
        .execute()
        .unwrap();
    assert_eq!(out.len(), 1);
    assert_relative_eq!(signed_area(&out[0]), 20.0 + PI, epsilon = 0.01);
}
