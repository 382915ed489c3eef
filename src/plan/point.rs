use crate::math::Point2;

use super::wall::WallId;

slotmap::new_key_type! {
    /// Unique identifier for a point in the plan.
    pub struct PointId;
}

/// Data associated with a plan point.
///
/// `connected_walls` is kept sorted by [`WallId`] and is only ever edited by
/// [`Plan`](super::Plan), which keeps it in step with the walls' endpoints.
#[derive(Debug, Clone)]
pub struct PointData {
    /// Position in millimetres, rounded to whole millimetres.
    pub position: Point2,
    connected_walls: Vec<WallId>,
}

impl PointData {
    pub(super) fn new(position: Point2) -> Self {
        Self {
            position,
            connected_walls: Vec::new(),
        }
    }

    /// Walls that have this point as one of their endpoints, in stable key order.
    #[must_use]
    pub fn connected_walls(&self) -> &[WallId] {
        &self.connected_walls
    }

    /// Number of walls meeting at this point.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.connected_walls.len()
    }

    pub(super) fn attach(&mut self, wall: WallId) {
        if let Err(i) = self.connected_walls.binary_search(&wall) {
            self.connected_walls.insert(i, wall);
        }
    }

    pub(super) fn detach(&mut self, wall: WallId) {
        if let Ok(i) = self.connected_walls.binary_search(&wall) {
            self.connected_walls.remove(i);
        }
    }
}
