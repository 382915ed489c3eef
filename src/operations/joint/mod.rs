mod miter;
mod openings;

pub use miter::{corners_for, JointArm, WallCorners, WallSegment, MIN_WALL_LENGTH, PARALLEL_EPSILON_DEG};
pub use openings::{merge_spans, opening_faces, split_for_openings, OpeningSpan};

use crate::error::Result;
use crate::plan::{Plan, PointId, WallId};

/// Computes the mitered face quadrilateral of a wall from the current plan.
pub struct WallJoint {
    wall: WallId,
}

impl WallJoint {
    /// Creates a new `WallJoint` query.
    #[must_use]
    pub fn new(wall: WallId) -> Self {
        Self { wall }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns a `PlanError` if the wall, either endpoint, or a neighbouring
    /// wall's far endpoint is missing. No partial geometry is produced.
    pub fn execute(&self, plan: &Plan) -> Result<WallCorners> {
        let wall = plan.wall(self.wall)?;
        let segment = WallSegment {
            start: plan.point(wall.start)?.position,
            end: plan.point(wall.end)?.position,
            thickness: wall.thickness,
        };
        let start_arms = arms_at(plan, wall.start, self.wall)?;
        let end_arms = arms_at(plan, wall.end, self.wall)?;
        Ok(corners_for(&segment, &start_arms, &end_arms))
    }
}

/// Neighbouring walls at `point`, other than `skip`, in stable wall order.
fn arms_at(plan: &Plan, point: PointId, skip: WallId) -> Result<Vec<JointArm>> {
    let mut arms = Vec::new();
    for (wall, far) in plan.neighbors(point)? {
        if wall == skip {
            continue;
        }
        arms.push(JointArm {
            far: plan.point(far)?.position,
            thickness: plan.wall(wall)?.thickness,
        });
    }
    Ok(arms)
}

/// Computes the solid face pieces of a wall after cutting out its openings.
pub struct WallFaces {
    wall: WallId,
}

impl WallFaces {
    /// Creates a new `WallFaces` query.
    #[must_use]
    pub fn new(wall: WallId) -> Self {
        Self { wall }
    }

    /// Executes the query, returning pieces ordered from the wall's start to its end.
    ///
    /// # Errors
    ///
    /// Same as [`WallJoint::execute`].
    pub fn execute(&self, plan: &Plan) -> Result<Vec<WallCorners>> {
        let corners = WallJoint::new(self.wall).execute(plan)?;
        Ok(split_for_openings(&corners, &self.spans(plan)?))
    }

    /// Returns the faces of the wall's merged openings.
    ///
    /// # Errors
    ///
    /// Same as [`WallJoint::execute`].
    pub fn cutouts(&self, plan: &Plan) -> Result<Vec<WallCorners>> {
        let corners = WallJoint::new(self.wall).execute(plan)?;
        Ok(opening_faces(&corners, &self.spans(plan)?))
    }

    fn spans(&self, plan: &Plan) -> Result<Vec<OpeningSpan>> {
        let length = plan.wall_length(self.wall)?;
        Ok(plan
            .openings_on(self.wall)
            .filter_map(|(_, o)| OpeningSpan::from_opening(o.position, o.width, length))
            .collect())
    }
}

/// Recomputes the face of every wall in the plan, in arena order.
///
/// # Errors
///
/// Fails on the first wall whose geometry cannot be resolved.
pub fn all_wall_corners(plan: &Plan) -> Result<Vec<(WallId, WallCorners)>> {
    plan.walls()
        .map(|(id, _)| WallJoint::new(id).execute(plan).map(|c| (id, c)))
        .collect()
}
