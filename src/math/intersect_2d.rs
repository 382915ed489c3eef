use super::{cross_2d, Point2, Vector2, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let cross = cross_2d(*d1, *d2);
    if cross.abs() < TOLERANCE {
        return None;
    }
    let delta = *p2 - *p1;
    let t = cross_2d(delta, *d2) / cross;
    let u = cross_2d(delta, *d1) / cross;
    Some((t, u))
}

/// Linear interpolation: `origin + dir * t`.
#[must_use]
pub fn point_at(origin: &Point2, dir: &Vector2, t: f64) -> Point2 {
    *origin + *dir * t
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn perpendicular_lines_meet() {
        let p1 = Point2::new(0.0, 5.0);
        let d1 = Vector2::new(1.0, 0.0);
        let p2 = Point2::new(3.0, 0.0);
        let d2 = Vector2::new(0.0, 1.0);
        let (t, u) = line_line_intersect_2d(&p1, &d1, &p2, &d2).unwrap();
        assert!((t - 3.0).abs() < 1e-12);
        assert!((u - 5.0).abs() < 1e-12);
        let hit = point_at(&p1, &d1, t);
        assert!((hit.x - 3.0).abs() < 1e-12);
        assert!((hit.y - 5.0).abs() < 1e-12);
    }

    #[test]
    fn parallel_lines_do_not_meet() {
        let d = Vector2::new(1.0, 1.0);
        assert!(line_line_intersect_2d(&Point2::origin(), &d, &Point2::new(0.0, 1.0), &d).is_none());
    }
}
