pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type, in plan millimetres.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-9;

/// Rounds a position to whole millimetres.
#[must_use]
pub fn round_mm(p: Point2) -> Point2 {
    Point2::new(p.x.round(), p.y.round())
}

/// Rotates `v` by 90 degrees counter-clockwise.
#[must_use]
pub fn left_normal(v: Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross_2d(a: Vector2, b: Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}
