use serde::{Deserialize, Serialize};

use super::wall::WallId;

slotmap::new_key_type! {
    /// Unique identifier for an opening in the plan.
    pub struct OpeningId;
}

/// What kind of cut-out an opening is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    Door,
    Window,
}

/// Hinge side of a door leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Swing {
    Left,
    Right,
}

/// A door or window cut into a wall.
///
/// `position` is the normalised offset of the opening's centre along the
/// owning wall's centreline, in `[0, 1]`. `width` is in millimetres.
/// `swing`, `thickness` and `sill_height` are carried for the renderer and
/// do not affect the 2D wall faces.
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningData {
    pub wall: WallId,
    pub kind: OpeningKind,
    pub position: f64,
    pub width: f64,
    pub swing: Option<Swing>,
    pub thickness: Option<f64>,
    pub sill_height: Option<f64>,
}

impl OpeningData {
    /// Creates a door centred at `position` along `wall`.
    #[must_use]
    pub fn door(wall: WallId, position: f64, width: f64) -> Self {
        Self {
            wall,
            kind: OpeningKind::Door,
            position,
            width,
            swing: None,
            thickness: None,
            sill_height: None,
        }
    }

    /// Creates a window centred at `position` along `wall`.
    #[must_use]
    pub fn window(wall: WallId, position: f64, width: f64) -> Self {
        Self {
            kind: OpeningKind::Window,
            ..Self::door(wall, position, width)
        }
    }

    /// Sets the door swing.
    #[must_use]
    pub fn with_swing(mut self, swing: Swing) -> Self {
        self.swing = Some(swing);
        self
    }

    /// Sets the sill height of a window.
    #[must_use]
    pub fn with_sill_height(mut self, sill_height: f64) -> Self {
        self.sill_height = Some(sill_height);
        self
    }
}
