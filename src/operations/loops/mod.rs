use std::collections::VecDeque;

use slotmap::SecondaryMap;
use tracing::debug;

use crate::error::Result;
use crate::math::polygon_2d::signed_area_2d;
use crate::math::Point2;
use crate::plan::{Plan, PointId, WallId};

/// Finds the path with the fewest walls between two points.
///
/// Neighbours are explored in stable wall order, so identical plans always
/// yield the same path.
pub struct ShortestPath {
    from: PointId,
    to: PointId,
    excluding: Option<WallId>,
}

impl ShortestPath {
    /// Creates a new `ShortestPath` query.
    #[must_use]
    pub fn new(from: PointId, to: PointId) -> Self {
        Self {
            from,
            to,
            excluding: None,
        }
    }

    /// Forbids the search from walking along `wall`.
    #[must_use]
    pub fn excluding_wall(mut self, wall: Option<WallId>) -> Self {
        self.excluding = wall;
        self
    }

    /// Executes the search, returning the points from `from` to `to` inclusive.
    ///
    /// `Ok(None)` means `to` is unreachable. When `from == to` the path is
    /// the single point.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::PointNotFound` if either endpoint is missing.
    pub fn execute(&self, plan: &Plan) -> Result<Option<Vec<PointId>>> {
        plan.point(self.from)?;
        plan.point(self.to)?;
        if self.from == self.to {
            return Ok(Some(vec![self.from]));
        }

        let mut previous: SecondaryMap<PointId, PointId> = SecondaryMap::new();
        let mut queue = VecDeque::from([self.from]);

        while let Some(current) = queue.pop_front() {
            for (wall, next) in plan.neighbors(current)? {
                if Some(wall) == self.excluding || next == self.from || previous.contains_key(next) {
                    continue;
                }
                previous.insert(next, current);
                if next == self.to {
                    return Ok(Some(walk_back(&previous, self.to)));
                }
                queue.push_back(next);
            }
        }
        Ok(None)
    }
}

fn walk_back(previous: &SecondaryMap<PointId, PointId>, target: PointId) -> Vec<PointId> {
    let mut path = vec![target];
    let mut current = target;
    while let Some(&p) = previous.get(current) {
        path.push(p);
        current = p;
    }
    path.reverse();
    path
}

/// A closed chain of points, each joined to the next (and the last to the first) by a wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLoop {
    pub points: Vec<PointId>,
}

impl RoomLoop {
    /// Number of points (and walls) in the loop.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Resolves the loop to plan coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if a point has been removed since the loop was found.
    pub fn positions(&self, plan: &Plan) -> Result<Vec<Point2>> {
        self.points
            .iter()
            .map(|&id| Ok(plan.point(id)?.position))
            .collect()
    }

    /// Enclosed floor area in square millimetres.
    ///
    /// # Errors
    ///
    /// Same as [`RoomLoop::positions`].
    pub fn area(&self, plan: &Plan) -> Result<f64> {
        Ok(signed_area_2d(&self.positions(plan)?).abs())
    }
}

/// Detects the cycle a wall chain closes, for automatic room creation.
pub enum ClosedLoop {
    /// The cycle that contains a given wall, typically the one just committed.
    ThroughWall(WallId),
    /// The shortest cycle passing through a given point.
    ThroughPoint(PointId),
}

impl ClosedLoop {
    #[must_use]
    pub fn through_wall(wall: WallId) -> Self {
        Self::ThroughWall(wall)
    }

    #[must_use]
    pub fn through_point(point: PointId) -> Self {
        Self::ThroughPoint(point)
    }

    /// Executes the detection. `Ok(None)` means the chain is still open.
    ///
    /// # Errors
    ///
    /// Returns a `PlanError` if the wall or point is missing.
    pub fn execute(&self, plan: &Plan) -> Result<Option<RoomLoop>> {
        let found = match *self {
            Self::ThroughWall(wall) => {
                let data = plan.wall(wall)?;
                cycle_via(plan, data.start, data.end, wall)?
            }
            Self::ThroughPoint(point) => {
                let mut best: Option<RoomLoop> = None;
                for (wall, other) in plan.neighbors(point)? {
                    let Some(cycle) = cycle_via(plan, point, other, wall)? else {
                        continue;
                    };
                    if best.as_ref().is_none_or(|b| cycle.len() < b.len()) {
                        best = Some(cycle);
                    }
                }
                best
            }
        };
        if let Some(room) = &found {
            debug!(points = room.len(), "closed loop detected");
        }
        Ok(found)
    }
}

/// Cycle that leaves `start` along `wall` to `next` and returns to `start` without reusing `wall`.
fn cycle_via(plan: &Plan, start: PointId, next: PointId, wall: WallId) -> Result<Option<RoomLoop>> {
    let path = ShortestPath::new(next, start).excluding_wall(Some(wall)).execute(plan)?;
    Ok(path.map(|mut points| {
        points.pop();
        points.insert(0, start);
        RoomLoop { points }
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{FloorcraftError, PlanError};
    use approx::assert_abs_diff_eq;

    struct Square {
        plan: Plan,
        p: [PointId; 4],
        w: [WallId; 4],
    }

    /// A-B-C-D, 4000 x 3000, walls A-B, B-C, C-D, D-A.
    fn square() -> Square {
        let mut plan = Plan::new();
        let p = [
            plan.add_point(Point2::new(0.0, 0.0)),
            plan.add_point(Point2::new(4000.0, 0.0)),
            plan.add_point(Point2::new(4000.0, 3000.0)),
            plan.add_point(Point2::new(0.0, 3000.0)),
        ];
        let w = [
            plan.add_wall(p[0], p[1], 200.0, 2700.0).unwrap(),
            plan.add_wall(p[1], p[2], 200.0, 2700.0).unwrap(),
            plan.add_wall(p[2], p[3], 200.0, 2700.0).unwrap(),
            plan.add_wall(p[3], p[0], 200.0, 2700.0).unwrap(),
        ];
        Square { plan, p, w }
    }

    #[test]
    fn same_point_is_trivial_path() {
        let s = square();
        let path = ShortestPath::new(s.p[0], s.p[0]).execute(&s.plan).unwrap();
        assert_eq!(path, Some(vec![s.p[0]]));
    }

    #[test]
    fn shortest_path_counts_walls() {
        let s = square();
        let path = ShortestPath::new(s.p[0], s.p[2]).execute(&s.plan).unwrap().unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), Some(&s.p[0]));
        assert_eq!(path.last(), Some(&s.p[2]));
    }

    #[test]
    fn excluded_wall_forces_detour() {
        let s = square();
        let path = ShortestPath::new(s.p[0], s.p[1])
            .excluding_wall(Some(s.w[0]))
            .execute(&s.plan)
            .unwrap();
        assert_eq!(path, Some(vec![s.p[0], s.p[3], s.p[2], s.p[1]]));
    }

    #[test]
    fn isolated_point_is_unreachable() {
        let mut s = square();
        let e = s.plan.add_point(Point2::new(9000.0, 9000.0));
        assert_eq!(ShortestPath::new(s.p[0], e).execute(&s.plan).unwrap(), None);
        assert_eq!(ClosedLoop::through_point(e).execute(&s.plan).unwrap(), None);
    }

    #[test]
    fn missing_point_is_reported() {
        let mut s = square();
        let e = s.plan.add_point(Point2::new(9000.0, 9000.0));
        s.plan.remove_point(e).unwrap();
        assert!(matches!(
            ShortestPath::new(s.p[0], e).execute(&s.plan),
            Err(FloorcraftError::Plan(PlanError::PointNotFound(_)))
        ));
    }

    #[test]
    fn square_closes_through_point() {
        let s = square();
        let room = ClosedLoop::through_point(s.p[0]).execute(&s.plan).unwrap().unwrap();
        assert_eq!(room.points, s.p.to_vec());
        assert_abs_diff_eq!(room.area(&s.plan).unwrap(), 12_000_000.0, epsilon = 1e-6);
    }

    #[test]
    fn closing_wall_yields_room() {
        let s = square();
        let room = ClosedLoop::through_wall(s.w[3]).execute(&s.plan).unwrap().unwrap();
        assert_eq!(room.points, vec![s.p[3], s.p[0], s.p[1], s.p[2]]);
    }

    #[test]
    fn open_chain_has_no_loop() {
        let mut s = square();
        s.plan.remove_wall(s.w[3]).unwrap();
        assert_eq!(ClosedLoop::through_wall(s.w[2]).execute(&s.plan).unwrap(), None);
        assert_eq!(ClosedLoop::through_point(s.p[0]).execute(&s.plan).unwrap(), None);
    }

    #[test]
    fn shorter_of_two_rooms_wins() {
        // A partition between the midpoints of A-B and C-D makes two equal rooms.
        let mut s = square();
        let mid_ab = s.plan.split_wall(s.w[0], Point2::new(2000.0, 0.0)).unwrap();
        let mid_cd = s.plan.split_wall(s.w[2], Point2::new(2000.0, 3000.0)).unwrap();
        s.plan.add_wall(mid_ab, mid_cd, 100.0, 2700.0).unwrap();

        let room = ClosedLoop::through_point(mid_ab).execute(&s.plan).unwrap().unwrap();
        assert_eq!(room.len(), 4);
        assert_abs_diff_eq!(room.area(&s.plan).unwrap(), 6_000_000.0, epsilon = 1e-6);

        let again = ClosedLoop::through_point(mid_ab).execute(&s.plan).unwrap().unwrap();
        assert_eq!(room, again);
    }
}
