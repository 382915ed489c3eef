pub mod opening;
pub mod point;
pub mod record;
pub mod wall;

pub use opening::{OpeningData, OpeningId, OpeningKind, Swing};
pub use point::{PointData, PointId};
pub use record::{OpeningRecord, PlanRecord, PointRecord, WallRecord};
pub use wall::{WallData, WallDefaults, WallId};

use record::RecordIds;
use slotmap::SlotMap;
use tracing::debug;

use crate::error::{GeometryError, OperationError, PlanError, Result};
use crate::math::distance_2d::{closest_point_on_segment, point_to_segment_dist};
use crate::math::{round_mm, Point2, TOLERANCE};

/// Central arena that owns every point, wall and opening of a floor plan.
///
/// Walls reference points and openings reference walls via typed IDs
/// (generational indices). Each point's `connected_walls` list mirrors the
/// walls' endpoints; every mutation below keeps both sides in step, so a
/// wall id appears on a point iff that point is one of the wall's endpoints.
///
/// Alongside the arenas, every entity has a persistent record id used by
/// [`PlanRecord`] import and export.
#[derive(Debug, Default, Clone)]
pub struct Plan {
    points: SlotMap<PointId, PointData>,
    walls: SlotMap<WallId, WallData>,
    openings: SlotMap<OpeningId, OpeningData>,
    point_ids: RecordIds<PointId>,
    wall_ids: RecordIds<WallId>,
    opening_ids: RecordIds<OpeningId>,
}

impl Plan {
    /// Creates a new, empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Point operations ---

    /// Inserts a point at `position` (rounded to whole millimetres) and returns its ID.
    pub fn add_point(&mut self, position: Point2) -> PointId {
        let position = round_mm(position);
        let id = self.points.insert(PointData::new(position));
        self.point_ids.assign(id);
        debug!(?id, x = position.x, y = position.y, "added point");
        id
    }

    /// Returns the point nearest to `position` within `tolerance`, if any.
    ///
    /// Ties go to the point that comes first in arena order.
    #[must_use]
    pub fn point_near(&self, position: Point2, tolerance: f64) -> Option<PointId> {
        let mut best: Option<(PointId, f64)> = None;
        for (id, p) in &self.points {
            let d = nalgebra::distance(&p.position, &position);
            if d <= tolerance && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Reuses the point within `tolerance` of `position`, or creates a new one.
    pub fn point_at_or_insert(&mut self, position: Point2, tolerance: f64) -> PointId {
        match self.point_near(position, tolerance) {
            Some(id) => id,
            None => self.add_point(position),
        }
    }

    /// Returns a reference to the point data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the point is not in the plan.
    pub fn point(&self, id: PointId) -> std::result::Result<&PointData, PlanError> {
        self.points.get(id).ok_or(PlanError::PointNotFound(id))
    }

    /// Moves a point. Walls attached to it follow, since they own no positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the point is not in the plan.
    pub fn move_point(&mut self, id: PointId, position: Point2) -> Result<()> {
        let position = round_mm(position);
        let point = self
            .points
            .get_mut(id)
            .ok_or(PlanError::PointNotFound(id))?;
        point.position = position;
        debug!(?id, x = position.x, y = position.y, "moved point");
        Ok(())
    }

    /// Deletes a point together with every wall attached to it (and their openings).
    ///
    /// # Errors
    ///
    /// Returns an error if the point is not in the plan.
    pub fn remove_point(&mut self, id: PointId) -> Result<PointData> {
        let walls = self.point(id)?.connected_walls().to_vec();
        for wall in walls {
            self.remove_wall(wall)?;
        }
        let data = self.points.remove(id).ok_or(PlanError::PointNotFound(id))?;
        self.point_ids.remove(id);
        debug!(?id, "removed point");
        Ok(data)
    }

    /// Iterates over all points in arena order.
    pub fn points(&self) -> impl Iterator<Item = (PointId, &PointData)> {
        self.points.iter()
    }

    /// Number of points in the plan.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Returns `(wall, other endpoint)` for every wall attached to `id`, in stable wall order.
    ///
    /// # Errors
    ///
    /// Returns an error if the point or one of its walls is missing.
    pub fn neighbors(&self, id: PointId) -> std::result::Result<Vec<(WallId, PointId)>, PlanError> {
        let point = self.point(id)?;
        point
            .connected_walls()
            .iter()
            .map(|&w| {
                let wall = self.wall(w)?;
                let other = wall.other(id).ok_or_else(|| {
                    PlanError::Inconsistent(format!("{w:?} is listed on {id:?} but does not touch it"))
                })?;
                Ok((w, other))
            })
            .collect()
    }

    // --- Wall operations ---

    /// Adds a wall between two existing points and registers it on both.
    ///
    /// # Errors
    ///
    /// Returns an error if either point is missing, the endpoints coincide,
    /// or thickness/height are not positive.
    pub fn add_wall(
        &mut self,
        start: PointId,
        end: PointId,
        thickness: f64,
        height: f64,
    ) -> Result<WallId> {
        if thickness <= 0.0 {
            return Err(GeometryError::NonPositive {
                parameter: "thickness",
                value: thickness,
            }
            .into());
        }
        if height <= 0.0 {
            return Err(GeometryError::NonPositive {
                parameter: "height",
                value: height,
            }
            .into());
        }
        let a = self.point(start)?.position;
        let b = self.point(end)?.position;
        if start == end || nalgebra::distance(&a, &b) < TOLERANCE {
            return Err(GeometryError::ZeroLengthWall(start, end).into());
        }

        let id = self.walls.insert(WallData {
            start,
            end,
            thickness,
            height,
        });
        for p in [start, end] {
            if let Some(point) = self.points.get_mut(p) {
                point.attach(id);
            }
        }
        self.wall_ids.assign(id);
        debug!(?id, ?start, ?end, thickness, "added wall");
        Ok(id)
    }

    /// Adds a wall using the thickness and height in `defaults`.
    ///
    /// # Errors
    ///
    /// Same as [`Plan::add_wall`].
    pub fn add_wall_with(
        &mut self,
        start: PointId,
        end: PointId,
        defaults: &WallDefaults,
    ) -> Result<WallId> {
        self.add_wall(start, end, defaults.thickness, defaults.height)
    }

    /// Returns a reference to the wall data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is not in the plan.
    pub fn wall(&self, id: WallId) -> std::result::Result<&WallData, PlanError> {
        self.walls.get(id).ok_or(PlanError::WallNotFound(id))
    }

    /// Sets the thickness of a wall.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is missing or `thickness` is not positive.
    pub fn set_wall_thickness(&mut self, id: WallId, thickness: f64) -> Result<()> {
        if thickness <= 0.0 {
            return Err(GeometryError::NonPositive {
                parameter: "thickness",
                value: thickness,
            }
            .into());
        }
        let wall = self.walls.get_mut(id).ok_or(PlanError::WallNotFound(id))?;
        wall.thickness = thickness;
        debug!(?id, thickness, "changed wall thickness");
        Ok(())
    }

    /// Removes a wall, unregisters it from its endpoints and drops its openings.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is not in the plan.
    pub fn remove_wall(&mut self, id: WallId) -> Result<WallData> {
        let wall = self.walls.remove(id).ok_or(PlanError::WallNotFound(id))?;
        for p in [wall.start, wall.end] {
            if let Some(point) = self.points.get_mut(p) {
                point.detach(id);
            }
        }
        let opening_ids = &mut self.opening_ids;
        self.openings.retain(|opening, o| {
            let keep = o.wall != id;
            if !keep {
                opening_ids.remove(opening);
            }
            keep
        });
        self.wall_ids.remove(id);
        debug!(?id, "removed wall");
        Ok(wall)
    }

    /// Returns the endpoint positions of a wall.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall or either endpoint is missing.
    pub fn wall_endpoints(&self, id: WallId) -> std::result::Result<(Point2, Point2), PlanError> {
        let wall = self.wall(id)?;
        Ok((self.point(wall.start)?.position, self.point(wall.end)?.position))
    }

    /// Returns the centreline length of a wall in millimetres.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall or either endpoint is missing.
    pub fn wall_length(&self, id: WallId) -> std::result::Result<f64, PlanError> {
        let (a, b) = self.wall_endpoints(id)?;
        Ok(nalgebra::distance(&a, &b))
    }

    /// Returns the wall whose centreline passes nearest to `position` within `tolerance`.
    #[must_use]
    pub fn wall_near(&self, position: Point2, tolerance: f64) -> Option<WallId> {
        let mut best: Option<(WallId, f64)> = None;
        for id in self.walls.keys() {
            let Ok((a, b)) = self.wall_endpoints(id) else {
                continue;
            };
            let d = point_to_segment_dist(&position, &a, &b);
            if d <= tolerance && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Splits a wall at the projection of `position` onto its centreline.
    ///
    /// The wall is replaced by two walls with the same thickness and height,
    /// meeting at a new point. Each opening moves to the half that contains
    /// its centre, with its position renormalised to that half.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is missing or the split point would
    /// coincide with one of its endpoints.
    pub fn split_wall(&mut self, id: WallId, position: Point2) -> Result<PointId> {
        let wall = self.wall(id)?.clone();
        let (a, b) = self.wall_endpoints(id)?;
        let (foot, _) = closest_point_on_segment(&position, &a, &b);
        let split = round_mm(foot);
        if nalgebra::distance(&split, &a) < TOLERANCE || nalgebra::distance(&split, &b) < TOLERANCE {
            return Err(OperationError::InvalidInput(
                "split position coincides with a wall endpoint".to_owned(),
            )
            .into());
        }

        let length = nalgebra::distance(&a, &b);
        let first_length = nalgebra::distance(&a, &split);
        let second_length = nalgebra::distance(&split, &b);

        let mid = self.add_point(split);
        let first = self.add_wall(wall.start, mid, wall.thickness, wall.height)?;
        let second = self.add_wall(mid, wall.end, wall.thickness, wall.height)?;

        for (_, opening) in self.openings.iter_mut().filter(|(_, o)| o.wall == id) {
            let centre = opening.position * length;
            if centre <= first_length {
                opening.wall = first;
                opening.position = (centre / first_length).clamp(0.0, 1.0);
            } else {
                opening.wall = second;
                opening.position = ((centre - first_length) / second_length).clamp(0.0, 1.0);
            }
        }

        self.remove_wall(id)?;
        debug!(?id, ?first, ?second, ?mid, "split wall");
        Ok(mid)
    }

    /// Iterates over all walls in arena order.
    pub fn walls(&self) -> impl Iterator<Item = (WallId, &WallData)> {
        self.walls.iter()
    }

    /// Number of walls in the plan.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    // --- Opening operations ---

    /// Cuts an opening into a wall.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall is missing, `position` is outside `[0, 1]`
    /// or `width` is not positive.
    pub fn add_opening(&mut self, data: OpeningData) -> Result<OpeningId> {
        self.wall(data.wall)?;
        check_opening_position(data.position)?;
        if data.width <= 0.0 {
            return Err(GeometryError::NonPositive {
                parameter: "width",
                value: data.width,
            }
            .into());
        }
        let wall = data.wall;
        let id = self.openings.insert(data);
        self.opening_ids.assign(id);
        debug!(?id, ?wall, "added opening");
        Ok(id)
    }

    /// Returns a reference to the opening data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the opening is not in the plan.
    pub fn opening(&self, id: OpeningId) -> std::result::Result<&OpeningData, PlanError> {
        self.openings.get(id).ok_or(PlanError::OpeningNotFound(id))
    }

    /// Slides an opening along its wall.
    ///
    /// # Errors
    ///
    /// Returns an error if the opening is missing or `position` is outside `[0, 1]`.
    pub fn set_opening_position(&mut self, id: OpeningId, position: f64) -> Result<()> {
        check_opening_position(position)?;
        let opening = self
            .openings
            .get_mut(id)
            .ok_or(PlanError::OpeningNotFound(id))?;
        opening.position = position;
        debug!(?id, position, "moved opening");
        Ok(())
    }

    /// Removes an opening.
    ///
    /// # Errors
    ///
    /// Returns an error if the opening is not in the plan.
    pub fn remove_opening(&mut self, id: OpeningId) -> Result<OpeningData> {
        let data = self
            .openings
            .remove(id)
            .ok_or(PlanError::OpeningNotFound(id))?;
        self.opening_ids.remove(id);
        debug!(?id, "removed opening");
        Ok(data)
    }

    /// Iterates over all openings in arena order.
    pub fn openings(&self) -> impl Iterator<Item = (OpeningId, &OpeningData)> {
        self.openings.iter()
    }

    /// Iterates over the openings cut into `wall`.
    pub fn openings_on(&self, wall: WallId) -> impl Iterator<Item = (OpeningId, &OpeningData)> {
        self.openings.iter().filter(move |(_, o)| o.wall == wall)
    }

    /// Number of openings in the plan.
    #[must_use]
    pub fn opening_count(&self) -> usize {
        self.openings.len()
    }

    // --- Consistency ---

    /// Checks the referential invariants of the plan.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> std::result::Result<(), PlanError> {
        for (id, wall) in &self.walls {
            for p in [wall.start, wall.end] {
                let point = self.point(p)?;
                if point.connected_walls().binary_search(&id).is_err() {
                    return Err(PlanError::Inconsistent(format!(
                        "{id:?} ends at {p:?} but is not listed on it"
                    )));
                }
            }
            if wall.start == wall.end {
                return Err(PlanError::Inconsistent(format!("{id:?} starts and ends at the same point")));
            }
        }
        for (id, point) in &self.points {
            let walls = point.connected_walls();
            if walls.windows(2).any(|w| w[0] >= w[1]) {
                return Err(PlanError::Inconsistent(format!(
                    "connected walls of {id:?} are not strictly ordered"
                )));
            }
            for &w in walls {
                if !self.wall(w)?.touches(id) {
                    return Err(PlanError::Inconsistent(format!(
                        "{w:?} is listed on {id:?} but does not touch it"
                    )));
                }
            }
        }
        for (id, opening) in &self.openings {
            self.wall(opening.wall)?;
            if !(0.0..=1.0).contains(&opening.position) {
                return Err(PlanError::Inconsistent(format!(
                    "{id:?} has position {} outside [0, 1]",
                    opening.position
                )));
            }
        }
        Ok(())
    }
}

fn check_opening_position(position: f64) -> Result<()> {
    if (0.0..=1.0).contains(&position) {
        Ok(())
    } else {
        Err(GeometryError::ParameterOutOfRange {
            parameter: "position",
            value: position,
            min: 0.0,
            max: 1.0,
        }
        .into())
    }
}
