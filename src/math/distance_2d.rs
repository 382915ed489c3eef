use super::{Point2, TOLERANCE};

/// Returns the closest point on segment `a`-`b` to `p`, and its parameter in `[0, 1]`.
#[must_use]
pub fn closest_point_on_segment(p: &Point2, a: &Point2, b: &Point2) -> (Point2, f64) {
    let d = *b - *a;
    let len_sq = d.norm_squared();

    if len_sq < TOLERANCE * TOLERANCE {
        // Degenerate segment (zero length).
        return (*a, 0.0);
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((*p - *a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (*a + d * t, t)
}

/// Returns the minimum distance from `p` to the segment `a`-`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let (closest, _) = closest_point_on_segment(p, a, b);
    nalgebra::distance(p, &closest)
}

/// Returns the foot of the perpendicular from `p` onto the infinite line through `a`, `b`,
/// or `None` when the line is degenerate.
#[must_use]
pub fn perpendicular_foot(p: &Point2, a: &Point2, b: &Point2) -> Option<(Point2, f64)> {
    let d = *b - *a;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return None;
    }
    let t = (*p - *a).dot(&d) / len_sq;
    Some((*a + d * t, t))
}
