//! Individual snap strategies. Each returns `Some` only when it fires; the
//! cascade in [`Snap::execute`](super::Snap::execute) tries them in priority order.

use std::f64::consts::{PI, TAU};

use crate::math::distance_2d::perpendicular_foot;
use crate::math::{Point2, Vector2, TOLERANCE};
use crate::plan::{Plan, PointId};

use super::config::SnapConfig;
use super::{Guide, SnapKind, SnapResult};

/// Inputs shared by every strategy for one cursor sample.
pub(super) struct SnapContext<'a> {
    pub cursor: Point2,
    pub anchor: Option<Point2>,
    pub exclude: Option<PointId>,
    pub plan: &'a Plan,
    pub config: &'a SnapConfig,
}

impl SnapContext<'_> {
    /// Points that may serve as snap targets, in arena order.
    fn candidates(&self) -> impl Iterator<Item = (PointId, Point2)> + '_ {
        self.plan
            .points()
            .filter(move |(id, _)| Some(*id) != self.exclude)
            .map(|(id, p)| (id, p.position))
    }
}

pub(super) fn point(ctx: &SnapContext<'_>) -> Option<SnapResult> {
    let mut best: Option<(PointId, Point2, f64)> = None;
    for (id, pos) in ctx.candidates() {
        let d = nalgebra::distance(&pos, &ctx.cursor);
        if d <= ctx.config.point_tolerance && best.is_none_or(|(_, _, bd)| d < bd) {
            best = Some((id, pos, d));
        }
    }
    best.map(|(id, pos, _)| SnapResult {
        position: pos,
        kind: SnapKind::Point,
        point: Some(id),
        guides: vec![Guide::Marker(pos)],
    })
}

pub(super) fn midpoint(ctx: &SnapContext<'_>) -> Option<SnapResult> {
    let mut best: Option<(Point2, Point2, Point2, f64)> = None;
    for (id, wall) in ctx.plan.walls() {
        if ctx.exclude.is_some_and(|p| wall.touches(p)) {
            continue;
        }
        let Ok((a, b)) = ctx.plan.wall_endpoints(id) else {
            continue;
        };
        let mid = nalgebra::center(&a, &b);
        let d = nalgebra::distance(&mid, &ctx.cursor);
        if d <= ctx.config.point_tolerance && best.is_none_or(|(.., bd)| d < bd) {
            best = Some((mid, a, b, d));
        }
    }
    best.map(|(mid, a, b, _)| SnapResult {
        position: mid,
        kind: SnapKind::Midpoint,
        point: None,
        guides: vec![Guide::Marker(mid), Guide::Line { from: a, to: b }],
    })
}

pub(super) fn orthogonal(ctx: &SnapContext<'_>) -> Option<SnapResult> {
    if !ctx.config.orthogonal {
        return None;
    }
    let anchor = ctx.anchor?;
    let delta = ctx.cursor - anchor;
    // Lock to whichever axis carries the larger displacement; ties stay horizontal.
    let position = if delta.x.abs() >= delta.y.abs() {
        Point2::new(ctx.cursor.x, anchor.y)
    } else {
        Point2::new(anchor.x, ctx.cursor.y)
    };
    Some(SnapResult {
        position,
        kind: SnapKind::Orthogonal,
        point: None,
        guides: vec![Guide::Line {
            from: anchor,
            to: position,
        }],
    })
}

pub(super) fn intersection(ctx: &SnapContext<'_>) -> Option<SnapResult> {
    let anchor = ctx.anchor?;
    let mut best: Option<(Point2, Point2, f64)> = None;
    for (_, pos) in ctx.candidates() {
        if nalgebra::distance(&pos, &anchor) < TOLERANCE {
            continue;
        }
        // Horizontal through the anchor x vertical through the candidate, and the reverse.
        for hit in [Point2::new(pos.x, anchor.y), Point2::new(anchor.x, pos.y)] {
            if nalgebra::distance(&hit, &anchor) < TOLERANCE {
                continue;
            }
            let d = nalgebra::distance(&hit, &ctx.cursor);
            if d <= ctx.config.intersection_tolerance && best.is_none_or(|(.., bd)| d < bd) {
                best = Some((hit, pos, d));
            }
        }
    }
    best.map(|(hit, reference, _)| SnapResult {
        position: hit,
        kind: SnapKind::Intersection,
        point: None,
        guides: vec![
            Guide::Line {
                from: anchor,
                to: hit,
            },
            Guide::Line {
                from: reference,
                to: hit,
            },
        ],
    })
}

pub(super) fn perpendicular(ctx: &SnapContext<'_>) -> Option<SnapResult> {
    let anchor = ctx.anchor?;
    let mut best: Option<(Point2, f64)> = None;
    for (id, wall) in ctx.plan.walls() {
        if ctx.exclude.is_some_and(|p| wall.touches(p)) {
            continue;
        }
        let Ok((a, b)) = ctx.plan.wall_endpoints(id) else {
            continue;
        };
        let Some((foot, t)) = perpendicular_foot(&anchor, &a, &b) else {
            continue;
        };
        if !(0.0..=1.0).contains(&t) || nalgebra::distance(&foot, &anchor) < TOLERANCE {
            continue;
        }
        let d = nalgebra::distance(&foot, &ctx.cursor);
        if d <= ctx.config.perpendicular_tolerance && best.is_none_or(|(_, bd)| d < bd) {
            best = Some((foot, d));
        }
    }
    best.map(|(foot, _)| SnapResult {
        position: foot,
        kind: SnapKind::Perpendicular,
        point: None,
        guides: vec![Guide::Line {
            from: anchor,
            to: foot,
        }],
    })
}

/// Best alignment candidate on one axis: `(reference point, deviation, distance)`.
type AxisCandidate = (Point2, f64, f64);

fn better_axis(best: Option<AxisCandidate>, deviation: f64, distance: f64) -> bool {
    match best {
        None => true,
        Some((_, bd, bdist)) => {
            deviation < bd - TOLERANCE || ((deviation - bd).abs() <= TOLERANCE && distance < bdist)
        }
    }
}

pub(super) fn axis(ctx: &SnapContext<'_>) -> Option<SnapResult> {
    let tolerance = ctx.config.axis_tolerance;
    let mut vertical: Option<AxisCandidate> = None;
    let mut horizontal: Option<AxisCandidate> = None;

    for (_, pos) in ctx.candidates() {
        let distance = nalgebra::distance(&pos, &ctx.cursor);
        let dx = (ctx.cursor.x - pos.x).abs();
        if dx <= tolerance && better_axis(vertical, dx, distance) {
            vertical = Some((pos, dx, distance));
        }
        let dy = (ctx.cursor.y - pos.y).abs();
        if dy <= tolerance && better_axis(horizontal, dy, distance) {
            horizontal = Some((pos, dy, distance));
        }
    }

    let (reference, position) = match (vertical, horizontal) {
        (Some((v, vd, _)), Some((_, hd, _))) if vd <= hd => (v, Point2::new(v.x, ctx.cursor.y)),
        (_, Some((h, ..))) => (h, Point2::new(ctx.cursor.x, h.y)),
        (Some((v, ..)), None) => (v, Point2::new(v.x, ctx.cursor.y)),
        (None, None) => return None,
    };
    Some(SnapResult {
        position,
        kind: SnapKind::Axis,
        point: None,
        guides: vec![Guide::Line {
            from: reference,
            to: position,
        }],
    })
}

/// Smallest absolute difference between two angles, in `[0, PI]`.
fn angle_between(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(TAU);
    if diff > PI {
        TAU - diff
    } else {
        diff
    }
}

pub(super) fn angle(ctx: &SnapContext<'_>) -> Option<SnapResult> {
    let anchor = ctx.anchor?;
    let delta = ctx.cursor - anchor;
    let length = delta.norm();
    if length <= ctx.config.angle_min_distance || length < TOLERANCE {
        return None;
    }
    let heading = delta.y.atan2(delta.x);
    let tolerance = ctx.config.angle_tolerance_deg.to_radians();

    let mut best: Option<(f64, f64)> = None;
    for target in ctx.config.angle_set.radians() {
        let deviation = angle_between(heading, target);
        if deviation <= tolerance && best.is_none_or(|(_, bd)| deviation < bd) {
            best = Some((target, deviation));
        }
    }
    let (target, _) = best?;
    let position = anchor + Vector2::new(target.cos(), target.sin()) * length;
    Some(SnapResult {
        position,
        kind: SnapKind::Angle,
        point: None,
        guides: vec![Guide::Line {
            from: anchor,
            to: position,
        }],
    })
}

pub(super) fn grid(ctx: &SnapContext<'_>) -> Option<SnapResult> {
    let pitch = ctx.config.grid_pitch;
    if pitch <= 0.0 {
        return None;
    }
    let position = Point2::new(
        (ctx.cursor.x / pitch).round() * pitch,
        (ctx.cursor.y / pitch).round() * pitch,
    );
    Some(SnapResult {
        position,
        kind: SnapKind::Grid,
        point: None,
        guides: vec![Guide::Marker(position)],
    })
}
