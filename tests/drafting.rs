#![allow(clippy::unwrap_used)]

use approx::assert_abs_diff_eq;
use floorcraft::math::Point2;
use floorcraft::operations::joint::{all_wall_corners, WallFaces};
use floorcraft::operations::loops::ClosedLoop;
use floorcraft::operations::snap::{SnapConfig, SnapEngine, SnapKind};
use floorcraft::plan::{OpeningData, Plan, PlanRecord};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Snaps a cursor sample, commits the resolved point and moves the anchor onto it.
fn commit(plan: &Plan, engine: &mut SnapEngine, cursor: (f64, f64), expected: SnapKind) -> Point2 {
    let snapped = engine.resolve(Point2::new(cursor.0, cursor.1), plan);
    assert_eq!(snapped.kind, expected, "cursor {cursor:?}");
    engine.set_anchor(snapped.position);
    snapped.position
}

#[test]
fn draw_rectangular_room() {
    init_tracing();
    let mut plan = Plan::new();
    let mut engine = SnapEngine::new(SnapConfig::default());
    let tolerance = engine.config().point_tolerance;

    engine.begin_gesture(None);
    let a = commit(&plan, &mut engine, (3.0, -4.0), SnapKind::Grid);
    assert_eq!(a, Point2::new(0.0, 0.0));
    let a = plan.point_at_or_insert(a, tolerance);

    let b = commit(&plan, &mut engine, (4000.0, 12.0), SnapKind::Axis);
    assert_eq!(b, Point2::new(4000.0, 0.0));
    let b = plan.point_at_or_insert(b, tolerance);
    let ab = plan.add_wall(a, b, 200.0, 2700.0).unwrap();

    let c = commit(&plan, &mut engine, (3990.0, 3000.0), SnapKind::Axis);
    assert_eq!(c, Point2::new(4000.0, 3000.0));
    let c = plan.point_at_or_insert(c, tolerance);
    let bc = plan.add_wall(b, c, 200.0, 2700.0).unwrap();
    assert_eq!(ClosedLoop::through_wall(bc).execute(&plan).unwrap(), None);

    // The guide through A and C supplies the fourth corner.
    let d = commit(&plan, &mut engine, (20.0, 2980.0), SnapKind::Intersection);
    assert_eq!(d, Point2::new(0.0, 3000.0));
    let d = plan.point_at_or_insert(d, tolerance);
    let cd = plan.add_wall(c, d, 200.0, 2700.0).unwrap();
    assert_eq!(ClosedLoop::through_wall(cd).execute(&plan).unwrap(), None);

    let snapped = engine.resolve(Point2::new(15.0, -10.0), &plan);
    assert_eq!(snapped.kind, SnapKind::Point);
    assert_eq!(snapped.point, Some(a));
    let closing = plan.point_at_or_insert(snapped.position, tolerance);
    assert_eq!(closing, a);
    let da = plan.add_wall(d, a, 200.0, 2700.0).unwrap();
    engine.end_gesture();
    assert_eq!(engine.anchor(), None);

    let room = ClosedLoop::through_wall(da).execute(&plan).unwrap().unwrap();
    assert_eq!(room.points, vec![d, a, b, c]);
    assert_abs_diff_eq!(room.area(&plan).unwrap(), 12_000_000.0, epsilon = 1e-6);

    // Mitered faces of equal-thickness walls tile the rectangle's ring exactly.
    let faces = all_wall_corners(&plan).unwrap();
    assert_eq!(faces.len(), 4);
    let total: f64 = faces.iter().map(|(_, c)| c.area()).sum();
    assert_abs_diff_eq!(total, 2.0 * (4000.0 + 3000.0) * 200.0, epsilon = 1e-6);

    plan.add_opening(OpeningData::door(ab, 0.5, 900.0)).unwrap();
    assert_eq!(WallFaces::new(ab).execute(&plan).unwrap().len(), 2);
    plan.validate().unwrap();

    let json = plan.to_record().to_json_string().unwrap();
    let restored = Plan::from_record(&PlanRecord::from_json_str(&json).unwrap()).unwrap();
    assert_eq!(restored.to_record(), plan.to_record());
    assert_eq!(restored.point_count(), 4);
    assert_eq!(restored.wall_count(), 4);
    assert_eq!(restored.opening_count(), 1);

    let (first, _) = restored.points().next().unwrap();
    let again = ClosedLoop::through_point(first).execute(&restored).unwrap().unwrap();
    assert_abs_diff_eq!(again.area(&restored).unwrap(), 12_000_000.0, epsilon = 1e-6);
}
