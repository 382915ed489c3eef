use serde::{Deserialize, Serialize};

use super::point::PointId;
use crate::error::{ConfigError, Result};

slotmap::new_key_type! {
    /// Unique identifier for a wall in the plan.
    pub struct WallId;
}

/// Data associated with a wall.
///
/// A wall owns no position of its own: its geometry is fully determined by
/// its two endpoint positions and its thickness.
#[derive(Debug, Clone)]
pub struct WallData {
    /// Start point of the wall centreline.
    pub start: PointId,
    /// End point of the wall centreline.
    pub end: PointId,
    /// Wall thickness in millimetres.
    pub thickness: f64,
    /// Wall height in millimetres. Only the 3D extrusion reads it.
    pub height: f64,
}

impl WallData {
    /// Returns the endpoint opposite to `point`, or `None` if `point` is not an endpoint.
    #[must_use]
    pub fn other(&self, point: PointId) -> Option<PointId> {
        if self.start == point {
            Some(self.end)
        } else if self.end == point {
            Some(self.start)
        } else {
            None
        }
    }

    /// Returns `true` if `point` is one of the wall's endpoints.
    #[must_use]
    pub fn touches(&self, point: PointId) -> bool {
        self.start == point || self.end == point
    }
}

/// Thickness and height applied to newly drawn walls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallDefaults {
    pub thickness: f64,
    pub height: f64,
}

impl Default for WallDefaults {
    fn default() -> Self {
        Self {
            thickness: 200.0,
            height: 2700.0,
        }
    }
}

impl WallDefaults {
    /// Parses wall defaults from JSON. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` for malformed input and
    /// `ConfigError::Invalid` if thickness or height is not positive.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let defaults: Self = serde_json::from_str(json).map_err(ConfigError::Json)?;
        for (name, value) in [("thickness", defaults.thickness), ("height", defaults.height)] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")).into());
            }
        }
        Ok(defaults)
    }
}
