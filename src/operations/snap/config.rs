use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Directions the angle snap quantises to, measured counter-clockwise from +X.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleSet {
    /// 0, 45, 90, ... 315 degrees.
    EightWay,
    /// 0, 90, 180, 270 degrees.
    FourWay,
    /// An explicit list of angles in degrees.
    Custom(Vec<f64>),
}

impl AngleSet {
    /// Returns the set's angles in degrees.
    #[must_use]
    pub fn degrees(&self) -> Vec<f64> {
        match self {
            Self::EightWay => (0..8).map(|i| f64::from(i) * 45.0).collect(),
            Self::FourWay => (0..4).map(|i| f64::from(i) * 90.0).collect(),
            Self::Custom(angles) => angles.clone(),
        }
    }

    /// Returns the set's angles in radians.
    #[must_use]
    pub fn radians(&self) -> Vec<f64> {
        self.degrees().into_iter().map(f64::to_radians).collect()
    }
}

/// Per-strategy switches. A disabled strategy is skipped by the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SnapToggles {
    pub point: bool,
    pub midpoint: bool,
    pub intersection: bool,
    pub perpendicular: bool,
    pub axis: bool,
    pub angle: bool,
    pub grid: bool,
}

impl Default for SnapToggles {
    fn default() -> Self {
        Self {
            point: true,
            midpoint: true,
            intersection: true,
            perpendicular: false,
            axis: true,
            angle: true,
            grid: true,
        }
    }
}

/// Tolerances and switches for cursor snapping. Distances are in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Radius for snapping onto an existing point or wall midpoint.
    pub point_tolerance: f64,
    /// Radius around an anchor-aligned intersection that captures the cursor.
    pub intersection_tolerance: f64,
    /// Radius around the foot of the perpendicular from the anchor onto a wall.
    pub perpendicular_tolerance: f64,
    /// Maximum x or y deviation for aligning with an existing point.
    pub axis_tolerance: f64,
    /// Maximum angular deviation, in degrees, for the angle snap.
    pub angle_tolerance_deg: f64,
    /// Minimum anchor-to-cursor distance before the angle snap applies.
    pub angle_min_distance: f64,
    pub angle_set: AngleSet,
    /// Grid spacing.
    pub grid_pitch: f64,
    /// Orthogonal modifier: lock to the anchor's horizontal or vertical axis.
    pub orthogonal: bool,
    pub enabled: SnapToggles,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            point_tolerance: 30.0,
            intersection_tolerance: 500.0,
            perpendicular_tolerance: 100.0,
            axis_tolerance: 500.0,
            angle_tolerance_deg: 15.0,
            angle_min_distance: 50.0,
            angle_set: AngleSet::EightWay,
            grid_pitch: 100.0,
            orthogonal: false,
            enabled: SnapToggles::default(),
        }
    }
}

impl SnapConfig {
    /// Parses and validates a configuration from JSON. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` for malformed input and
    /// `ConfigError::Invalid` if validation fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that all tolerances are usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("point_tolerance", self.point_tolerance),
            ("intersection_tolerance", self.intersection_tolerance),
            ("perpendicular_tolerance", self.perpendicular_tolerance),
            ("axis_tolerance", self.axis_tolerance),
            ("grid_pitch", self.grid_pitch),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")).into());
            }
        }
        if !(self.angle_tolerance_deg > 0.0 && self.angle_tolerance_deg < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "angle_tolerance_deg must be in (0, 180), got {}",
                self.angle_tolerance_deg
            ))
            .into());
        }
        if self.angle_min_distance < 0.0 {
            return Err(ConfigError::Invalid("angle_min_distance must not be negative".to_owned()).into());
        }
        if let AngleSet::Custom(angles) = &self.angle_set {
            if angles.is_empty() || angles.iter().any(|a| !a.is_finite()) {
                return Err(ConfigError::Invalid("custom angle set must hold finite angles".to_owned()).into());
            }
        }
        Ok(())
    }
}
