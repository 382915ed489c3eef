//! Plain serialisable records for bulk loading and saving a [`Plan`].
//!
//! Every entity carries a persistent `u64` record id. Ids are handed out by a
//! per-kind counter on insert, kept verbatim on import and never reused, so
//! references held outside the plan survive deletions and reloads.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use slotmap::{Key, SecondaryMap};
use tracing::{debug, warn};

use super::{OpeningData, OpeningKind, Plan, PointId, Swing, WallId};
use crate::error::{ConfigError, FloorcraftError, GeometryError, PlanError, Result};
use crate::math::Point2;

/// Persistent record ids for one kind of entity.
#[derive(Debug, Clone)]
pub(super) struct RecordIds<K: Key> {
    ids: SecondaryMap<K, u64>,
    next: u64,
}

impl<K: Key> Default for RecordIds<K> {
    fn default() -> Self {
        Self {
            ids: SecondaryMap::new(),
            next: 0,
        }
    }
}

impl<K: Key> RecordIds<K> {
    /// Gives `key` the next unused id.
    pub(super) fn assign(&mut self, key: K) -> u64 {
        let id = self.next;
        self.next += 1;
        self.ids.insert(key, id);
        id
    }

    /// Gives `key` an explicit id and moves the counter past it.
    pub(super) fn set(&mut self, key: K, id: u64) {
        self.ids.insert(key, id);
        self.next = self.next.max(id.saturating_add(1));
    }

    pub(super) fn get(&self, key: K) -> Option<u64> {
        self.ids.get(key).copied()
    }

    pub(super) fn remove(&mut self, key: K) {
        self.ids.remove(key);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: u64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallRecord {
    pub id: u64,
    pub start: u64,
    pub end: u64,
    pub thickness: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningRecord {
    pub id: u64,
    pub wall: u64,
    pub kind: OpeningKind,
    pub position: f64,
    pub width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swing: Option<Swing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sill_height: Option<f64>,
}

/// Serialised form of a whole plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRecord {
    pub points: Vec<PointRecord>,
    pub walls: Vec<WallRecord>,
    #[serde(default)]
    pub openings: Vec<OpeningRecord>,
}

impl PlanRecord {
    /// Parses a record from JSON.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if the text is not a valid plan record.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json(e).into())
    }

    /// Serialises the record to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` if serialisation fails.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Json(e).into())
    }
}

impl Plan {
    /// Persistent record id of a point.
    #[must_use]
    pub fn point_record_id(&self, id: PointId) -> Option<u64> {
        self.point_ids.get(id)
    }

    /// Persistent record id of a wall.
    #[must_use]
    pub fn wall_record_id(&self, id: WallId) -> Option<u64> {
        self.wall_ids.get(id)
    }

    /// Persistent record id of an opening.
    #[must_use]
    pub fn opening_record_id(&self, id: super::OpeningId) -> Option<u64> {
        self.opening_ids.get(id)
    }

    /// Exports the plan as plain records, in arena order, under their persistent ids.
    #[must_use]
    pub fn to_record(&self) -> PlanRecord {
        let points = self
            .points()
            .filter_map(|(id, p)| {
                self.point_ids.get(id).map(|rid| PointRecord {
                    id: rid,
                    x: p.position.x,
                    y: p.position.y,
                })
            })
            .collect();

        let mut walls = Vec::with_capacity(self.wall_count());
        for (id, w) in self.walls() {
            let (Some(rid), Some(start), Some(end)) = (
                self.wall_ids.get(id),
                self.point_ids.get(w.start),
                self.point_ids.get(w.end),
            ) else {
                warn!(?id, "wall with dangling endpoint left out of export");
                continue;
            };
            walls.push(WallRecord {
                id: rid,
                start,
                end,
                thickness: w.thickness,
                height: w.height,
            });
        }

        let openings = self
            .openings()
            .filter_map(|(id, o)| {
                let rid = self.opening_ids.get(id)?;
                let wall = self.wall_ids.get(o.wall)?;
                Some(OpeningRecord {
                    id: rid,
                    wall,
                    kind: o.kind,
                    position: o.position,
                    width: o.width,
                    swing: o.swing,
                    thickness: o.thickness,
                    sill_height: o.sill_height,
                })
            })
            .collect();

        PlanRecord {
            points,
            walls,
            openings,
        }
    }

    /// Builds a plan from records, keeping every record id.
    ///
    /// Zero-length walls are skipped with a warning, and so are the openings
    /// on them. Duplicate ids and references to unknown ids are rejected
    /// rather than guessed at.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::Inconsistent` on duplicate or dangling ids, and
    /// geometry errors for non-positive wall dimensions or bad openings.
    pub fn from_record(record: &PlanRecord) -> Result<Self> {
        let mut plan = Plan::new();
        let mut points: FxHashMap<u64, PointId> = FxHashMap::default();
        let mut walls: FxHashMap<u64, WallId> = FxHashMap::default();
        let mut skipped_walls: FxHashSet<u64> = FxHashSet::default();
        let mut openings: FxHashSet<u64> = FxHashSet::default();

        for p in &record.points {
            if points.contains_key(&p.id) {
                return Err(duplicate("point", p.id));
            }
            let id = plan.add_point(Point2::new(p.x, p.y));
            plan.point_ids.set(id, p.id);
            points.insert(p.id, id);
        }

        for w in &record.walls {
            if walls.contains_key(&w.id) || skipped_walls.contains(&w.id) {
                return Err(duplicate("wall", w.id));
            }
            let start = lookup(&points, w.start, "point")?;
            let end = lookup(&points, w.end, "point")?;
            let id = match plan.add_wall(start, end, w.thickness, w.height) {
                Ok(id) => id,
                Err(FloorcraftError::Geometry(GeometryError::ZeroLengthWall(..))) => {
                    warn!(record = w.id, "skipping zero-length wall");
                    skipped_walls.insert(w.id);
                    continue;
                }
                Err(e) => return Err(e),
            };
            plan.wall_ids.set(id, w.id);
            walls.insert(w.id, id);
        }

        for o in &record.openings {
            if !openings.insert(o.id) {
                return Err(duplicate("opening", o.id));
            }
            if skipped_walls.contains(&o.wall) {
                warn!(record = o.id, wall = o.wall, "skipping opening on zero-length wall");
                continue;
            }
            let wall = lookup(&walls, o.wall, "wall")?;
            let id = plan.add_opening(OpeningData {
                wall,
                kind: o.kind,
                position: o.position,
                width: o.width,
                swing: o.swing,
                thickness: o.thickness,
                sill_height: o.sill_height,
            })?;
            plan.opening_ids.set(id, o.id);
        }

        debug!(
            points = plan.point_count(),
            walls = plan.wall_count(),
            openings = plan.opening_count(),
            "loaded plan"
        );
        Ok(plan)
    }
}

fn duplicate(what: &str, id: u64) -> FloorcraftError {
    PlanError::Inconsistent(format!("duplicate {what} id {id}")).into()
}

fn lookup<K: Copy>(ids: &FxHashMap<u64, K>, id: u64, what: &str) -> Result<K> {
    ids.get(&id)
        .copied()
        .ok_or_else(|| PlanError::Inconsistent(format!("unknown {what} id {id}")).into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_plan() -> Plan {
        let mut plan = Plan::new();
        let a = plan.add_point(Point2::new(0.0, 0.0));
        let b = plan.add_point(Point2::new(3000.0, 0.0));
        let c = plan.add_point(Point2::new(3000.0, 2000.0));
        let w = plan.add_wall(a, b, 200.0, 2700.0).unwrap();
        plan.add_wall(b, c, 150.0, 2700.0).unwrap();
        plan.add_opening(OpeningData::door(w, 0.5, 900.0).with_swing(Swing::Left))
            .unwrap();
        plan
    }

    #[test]
    fn export_import_export_is_stable() {
        let plan = sample_plan();
        let first = plan.to_record();
        let reloaded = Plan::from_record(&first).unwrap();
        reloaded.validate().unwrap();
        assert_eq!(reloaded.to_record(), first);
    }

    fn sparse_record() -> PlanRecord {
        PlanRecord {
            points: vec![
                PointRecord { id: 10, x: 0.0, y: 0.0 },
                PointRecord { id: 11, x: 2000.0, y: 0.0 },
            ],
            walls: vec![WallRecord {
                id: 7,
                start: 10,
                end: 11,
                thickness: 200.0,
                height: 2700.0,
            }],
            openings: vec![OpeningRecord {
                id: 42,
                wall: 7,
                kind: OpeningKind::Window,
                position: 0.5,
                width: 1200.0,
                swing: None,
                thickness: None,
                sill_height: Some(900.0),
            }],
        }
    }

    #[test]
    fn imported_ids_are_kept() {
        let record = sparse_record();
        let plan = Plan::from_record(&record).unwrap();
        assert_eq!(plan.to_record(), record);

        let (wall, _) = plan.walls().next().unwrap();
        assert_eq!(plan.wall_record_id(wall), Some(7));
    }

    #[test]
    fn new_entities_continue_past_imported_ids() {
        let mut plan = Plan::from_record(&sparse_record()).unwrap();
        let p = plan.add_point(Point2::new(0.0, 3000.0));
        assert_eq!(plan.point_record_id(p), Some(12));
    }

    #[test]
    fn ids_survive_deletions() {
        let mut plan = sample_plan();
        let before = plan.to_record();
        let (first, _) = plan.points().next().unwrap();
        plan.remove_point(first).unwrap();

        let after = plan.to_record();
        let ids: Vec<u64> = after.points.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(after.points[0], before.points[1]);
        assert_eq!(after.walls, vec![before.walls[1].clone()]);

        // Ids of deleted entities are not handed out again.
        let p = plan.add_point(Point2::new(-500.0, 0.0));
        assert_eq!(plan.point_record_id(p), Some(3));
    }

    #[test]
    fn opening_on_skipped_wall_is_skipped() {
        let mut record = sparse_record();
        record.points.push(PointRecord { id: 12, x: 0.0, y: 0.0 });
        record.walls.insert(
            0,
            WallRecord {
                id: 0,
                start: 10,
                end: 12,
                thickness: 200.0,
                height: 2700.0,
            },
        );
        record.openings.push(OpeningRecord {
            id: 43,
            wall: 0,
            ..record.openings[0].clone()
        });

        let plan = Plan::from_record(&record).unwrap();
        assert_eq!(plan.wall_count(), 1);
        assert_eq!(plan.opening_count(), 1);
        let (opening, _) = plan.openings().next().unwrap();
        assert_eq!(plan.opening_record_id(opening), Some(42));
    }

    #[test]
    fn duplicate_opening_ids_rejected() {
        let mut record = sparse_record();
        record.openings.push(OpeningRecord {
            position: 0.2,
            width: 300.0,
            ..record.openings[0].clone()
        });
        let err = Plan::from_record(&record).unwrap_err();
        assert!(matches!(err, FloorcraftError::Plan(PlanError::Inconsistent(_))));
    }

    #[test]
    fn duplicate_point_ids_rejected() {
        let mut record = sparse_record();
        record.points[1].id = 10;
        assert!(matches!(
            Plan::from_record(&record),
            Err(FloorcraftError::Plan(PlanError::Inconsistent(_)))
        ));
    }

    #[test]
    fn json_round_trip() {
        let record = sample_plan().to_record();
        let json = record.to_json_string().unwrap();
        assert!(json.contains("\"kind\": \"door\""));
        assert_eq!(PlanRecord::from_json_str(&json).unwrap(), record);
    }

    #[test]
    fn dangling_wall_reference_rejected() {
        let record = PlanRecord {
            points: vec![PointRecord { id: 0, x: 0.0, y: 0.0 }],
            walls: vec![WallRecord {
                id: 0,
                start: 0,
                end: 7,
                thickness: 200.0,
                height: 2700.0,
            }],
            openings: Vec::new(),
        };
        let err = Plan::from_record(&record).unwrap_err();
        assert!(matches!(err, FloorcraftError::Plan(PlanError::Inconsistent(_))));
    }

    #[test]
    fn zero_length_wall_skipped_on_import() {
        let record = PlanRecord {
            points: vec![
                PointRecord { id: 10, x: 0.0, y: 0.0 },
                PointRecord { id: 11, x: 0.0, y: 0.0 },
            ],
            walls: vec![WallRecord {
                id: 3,
                start: 10,
                end: 11,
                thickness: 200.0,
                height: 2700.0,
            }],
            openings: Vec::new(),
        };
        let plan = Plan::from_record(&record).unwrap();
        assert_eq!(plan.point_count(), 2);
        assert_eq!(plan.wall_count(), 0);
    }

    #[test]
    fn missing_openings_field_defaults_to_empty() {
        let json = r#"{ "points": [], "walls": [] }"#;
        let record = PlanRecord::from_json_str(json).unwrap();
        assert!(record.openings.is_empty());
    }
}
