//! kurbo → tiny-skia conversions

use kurbo::{Affine, BezPath, PathEl};
use tiny_skia::{Path, PathBuilder, Transform};

/// Convert a kurbo path; `None` for paths with no drawable segments
pub fn to_skia_path(path: &BezPath) -> Option<Path> {
    let mut builder = PathBuilder::new();
    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p2) => {
                builder.quad_to(p1.x as f32, p1.y as f32, p2.x as f32, p2.y as f32)
            }
            PathEl::CurveTo(p1, p2, p3) => builder.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p3.x as f32,
                p3.y as f32,
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

/// Same mapping as a tiny-skia transform
pub fn to_skia_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Rect, Shape};

    #[test]
    fn test_rect_path_bounds() {
        let path = Rect::new(10.0, 20.0, 110.0, 70.0).to_path(0.1);
        let skia = to_skia_path(&path).unwrap();
        let bounds = skia.bounds();
        assert_eq!((bounds.left(), bounds.top()), (10.0, 20.0));
        assert_eq!((bounds.right(), bounds.bottom()), (110.0, 70.0));
    }

    #[test]
    fn test_empty_path_is_none() {
        assert!(to_skia_path(&BezPath::new()).is_none());
    }

    #[test]
    fn test_transform_matches_affine() {
        let affine = Affine::translate((5.0, 7.0)) * Affine::rotate(0.5) * Affine::scale(2.0);
        let mut points = [tiny_skia::Point::from_xy(3.0, -4.0)];
        to_skia_transform(affine).map_points(&mut points);
        let point = points[0];
        let expected = affine * Point::new(3.0, -4.0);
        assert!((point.x as f64 - expected.x).abs() < 1e-4);
        assert!((point.y as f64 - expected.y).abs() < 1e-4);
    }
}
