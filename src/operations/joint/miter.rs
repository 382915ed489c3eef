use crate::math::intersect_2d::{line_line_intersect_2d, point_at};
use crate::math::polygon_2d::signed_area_2d;
use crate::math::{cross_2d, left_normal, Point2, Vector2};

/// Walls shorter than this get the degenerate square face.
pub const MIN_WALL_LENGTH: f64 = 1e-6;

/// Junctions within this many degrees of straight (or of folding back) are not mitered.
pub const PARALLEL_EPSILON_DEG: f64 = 1.0;

/// A wall centreline with its thickness, detached from the plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSegment {
    pub start: Point2,
    pub end: Point2,
    pub thickness: f64,
}

/// A neighbouring wall as seen from a shared endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointArm {
    /// The neighbour's endpoint away from the junction.
    pub far: Point2,
    pub thickness: f64,
}

/// The four corners of a wall's face quadrilateral in plan coordinates.
///
/// Left and right are relative to the start -> end direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallCorners {
    pub start_left: Point2,
    pub start_right: Point2,
    pub end_left: Point2,
    pub end_right: Point2,
}

impl WallCorners {
    /// Corners in polygon order: start-left, end-left, end-right, start-right.
    #[must_use]
    pub fn polygon(&self) -> [Point2; 4] {
        [self.start_left, self.end_left, self.end_right, self.start_right]
    }

    /// Unsigned area of the face.
    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area_2d(&self.polygon()).abs()
    }

    /// The sub-quad between fractions `from` and `to` of the left and right edges.
    #[must_use]
    pub fn section(&self, from: f64, to: f64) -> Self {
        let lerp = |a: Point2, b: Point2, t: f64| a + (b - a) * t;
        Self {
            start_left: lerp(self.start_left, self.end_left, from),
            start_right: lerp(self.start_right, self.end_right, from),
            end_left: lerp(self.start_left, self.end_left, to),
            end_right: lerp(self.start_right, self.end_right, to),
        }
    }
}

/// Computes the mitered face of one wall from its own neighbours.
///
/// At each endpoint the wall miters only against the arm that continues
/// its direction most closely; the other arms at a T or cross are left to
/// miter against each other when their own faces are computed. Nearly
/// straight or folded-back joints keep the plain perpendicular offset.
#[must_use]
pub fn corners_for(wall: &WallSegment, start_arms: &[JointArm], end_arms: &[JointArm]) -> WallCorners {
    let delta = wall.end - wall.start;
    let length = delta.norm();
    if length < MIN_WALL_LENGTH {
        return degenerate_square(wall.start, wall.thickness);
    }
    let dir = delta / length;
    let offset = left_normal(dir) * (wall.thickness * 0.5);

    let mut corners = WallCorners {
        start_left: wall.start + offset,
        start_right: wall.start - offset,
        end_left: wall.end + offset,
        end_right: wall.end - offset,
    };

    // At the start a continuing neighbour travels into the joint; at the end it travels away.
    let incoming = |arm: &JointArm| travel(arm.far, wall.start);
    if let Some((arm_dir, thickness)) = continuing_arm(dir, start_arms, incoming) {
        if let Some((left, right)) = miter(wall.start, dir, offset, arm_dir, thickness) {
            corners.start_left = left;
            corners.start_right = right;
        }
    }

    let outgoing = |arm: &JointArm| travel(wall.end, arm.far);
    if let Some((arm_dir, thickness)) = continuing_arm(dir, end_arms, outgoing) {
        if let Some((left, right)) = miter(wall.end, dir, offset, arm_dir, thickness) {
            corners.end_left = left;
            corners.end_right = right;
        }
    }

    corners
}

/// Unit direction from `from` to `to`, or `None` if they coincide.
fn travel(from: Point2, to: Point2) -> Option<Vector2> {
    let d = to - from;
    let len = d.norm();
    (len >= MIN_WALL_LENGTH).then(|| d / len)
}

/// Picks the arm whose travel direction is closest in angle to `dir`.
fn continuing_arm(
    dir: Vector2,
    arms: &[JointArm],
    travel_of: impl Fn(&JointArm) -> Option<Vector2>,
) -> Option<(Vector2, f64)> {
    let mut best: Option<(Vector2, f64, f64)> = None;
    for arm in arms {
        let Some(t) = travel_of(arm) else {
            continue;
        };
        let deviation = dir.dot(&t).clamp(-1.0, 1.0).acos();
        if best.is_none_or(|(_, _, bd)| deviation < bd) {
            best = Some((t, arm.thickness, deviation));
        }
    }
    best.map(|(t, thickness, _)| (t, thickness))
}

/// Intersects this wall's offset edges with the neighbour's matching edges.
fn miter(
    joint: Point2,
    dir: Vector2,
    offset: Vector2,
    travel: Vector2,
    arm_thickness: f64,
) -> Option<(Point2, Point2)> {
    if cross_2d(dir, travel).abs() < PARALLEL_EPSILON_DEG.to_radians().sin() {
        return None;
    }
    let arm_offset = left_normal(travel) * (arm_thickness * 0.5);

    let left_base = joint + offset;
    let (t, _) = line_line_intersect_2d(&left_base, &dir, &(joint + arm_offset), &travel)?;
    let left = point_at(&left_base, &dir, t);

    let right_base = joint - offset;
    let (t, _) = line_line_intersect_2d(&right_base, &dir, &(joint - arm_offset), &travel)?;
    let right = point_at(&right_base, &dir, t);

    Some((left, right))
}

/// Axis-aligned square of side `thickness` centred on `at`.
fn degenerate_square(at: Point2, thickness: f64) -> WallCorners {
    let h = thickness * 0.5;
    WallCorners {
        start_left: at + Vector2::new(-h, h),
        start_right: at + Vector2::new(-h, -h),
        end_left: at + Vector2::new(h, h),
        end_right: at + Vector2::new(h, -h),
    }
}
