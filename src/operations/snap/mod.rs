mod config;
mod strategies;

pub use config::{AngleSet, SnapConfig, SnapToggles};

use tracing::trace;

use crate::math::{round_mm, Point2};
use crate::plan::{Plan, PointId};

use strategies::SnapContext;

/// Which strategy produced a [`SnapResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapKind {
    Point,
    Midpoint,
    Orthogonal,
    Intersection,
    Perpendicular,
    Axis,
    Angle,
    Grid,
    None,
}

impl SnapKind {
    /// Short lowercase name, for overlays and logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Midpoint => "midpoint",
            Self::Orthogonal => "orthogonal",
            Self::Intersection => "intersection",
            Self::Perpendicular => "perpendicular",
            Self::Axis => "axis",
            Self::Angle => "angle",
            Self::Grid => "grid",
            Self::None => "none",
        }
    }
}

/// Feedback geometry for the guide overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Guide {
    /// Highlight a single location.
    Marker(Point2),
    /// Draw an alignment line.
    Line { from: Point2, to: Point2 },
}

/// Outcome of snapping one cursor sample.
///
/// An empty `guides` list tells the overlay to clear whatever it drew for
/// the previous sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// Resolved position, rounded to whole millimetres.
    pub position: Point2,
    pub kind: SnapKind,
    /// The existing point snapped onto, for [`SnapKind::Point`].
    pub point: Option<PointId>,
    pub guides: Vec<Guide>,
}

impl SnapResult {
    /// Returns `true` if any strategy other than the raw fallback fired.
    #[must_use]
    pub fn is_snapped(&self) -> bool {
        self.kind != SnapKind::None
    }
}

/// Resolves a raw cursor position against the plan.
///
/// Strategies are tried in a fixed order and the first that fires wins:
/// point, midpoint, orthogonal, intersection, perpendicular, axis, angle,
/// grid. If none fires the cursor is returned rounded to 1 mm.
#[derive(Debug, Clone)]
pub struct Snap {
    cursor: Point2,
    anchor: Option<Point2>,
    exclude: Option<PointId>,
}

impl Snap {
    /// Creates a new `Snap` query for a cursor sample in plan millimetres.
    #[must_use]
    pub fn new(cursor: Point2) -> Self {
        Self {
            cursor,
            anchor: None,
            exclude: None,
        }
    }

    /// Sets the last committed point of the wall chain being drawn.
    #[must_use]
    pub fn with_anchor(mut self, anchor: Option<Point2>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Ignores a point as a snap target, typically the one being dragged.
    #[must_use]
    pub fn excluding(mut self, point: Option<PointId>) -> Self {
        self.exclude = point;
        self
    }

    /// Executes the cascade. Never mutates the plan.
    #[must_use]
    pub fn execute(&self, plan: &Plan, config: &SnapConfig) -> SnapResult {
        let ctx = SnapContext {
            cursor: self.cursor,
            anchor: self.anchor,
            exclude: self.exclude,
            plan,
            config,
        };
        let on = &config.enabled;

        let fired = on
            .point
            .then(|| strategies::point(&ctx))
            .flatten()
            .or_else(|| on.midpoint.then(|| strategies::midpoint(&ctx)).flatten())
            .or_else(|| strategies::orthogonal(&ctx))
            .or_else(|| on.intersection.then(|| strategies::intersection(&ctx)).flatten())
            .or_else(|| on.perpendicular.then(|| strategies::perpendicular(&ctx)).flatten())
            .or_else(|| on.axis.then(|| strategies::axis(&ctx)).flatten())
            .or_else(|| on.angle.then(|| strategies::angle(&ctx)).flatten())
            .or_else(|| on.grid.then(|| strategies::grid(&ctx)).flatten());

        let result = match fired {
            Some(mut result) => {
                result.position = round_mm(result.position);
                result
            }
            None => SnapResult {
                position: round_mm(self.cursor),
                kind: SnapKind::None,
                point: None,
                guides: Vec::new(),
            },
        };
        trace!(
            kind = result.kind.name(),
            x = result.position.x,
            y = result.position.y,
            "snap resolved"
        );
        result
    }
}

/// Snaps `cursor` against `plan` with an optional anchor.
#[must_use]
pub fn resolve(cursor: Point2, plan: &Plan, anchor: Option<Point2>, config: &SnapConfig) -> SnapResult {
    Snap::new(cursor).with_anchor(anchor).execute(plan, config)
}

/// Snap configuration plus the anchor of the current drafting gesture.
///
/// The anchor is the only state; callers reset it at the start and end of
/// every gesture so it never leaks into an unrelated operation.
#[derive(Debug, Clone, Default)]
pub struct SnapEngine {
    config: SnapConfig,
    anchor: Option<Point2>,
}

impl SnapEngine {
    /// Creates an engine with no anchor.
    #[must_use]
    pub fn new(config: SnapConfig) -> Self {
        Self {
            config,
            anchor: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SnapConfig {
        &mut self.config
    }

    #[must_use]
    pub fn anchor(&self) -> Option<Point2> {
        self.anchor
    }

    /// Starts a gesture, optionally from an existing anchor.
    pub fn begin_gesture(&mut self, anchor: Option<Point2>) {
        self.anchor = anchor;
    }

    /// Moves the anchor to the point just committed.
    pub fn set_anchor(&mut self, anchor: Point2) {
        self.anchor = Some(anchor);
    }

    /// Ends (or cancels) the gesture and drops the anchor.
    pub fn end_gesture(&mut self) {
        self.anchor = None;
    }

    /// Resolves a cursor sample using the engine's config and anchor.
    #[must_use]
    pub fn resolve(&self, cursor: Point2, plan: &Plan) -> SnapResult {
        Snap::new(cursor).with_anchor(self.anchor).execute(plan, &self.config)
    }
}
