mod color;
pub use color::{ColorToken, NamedColor, Rgb};

mod constants;
pub use constants::{GRADIENT_TAG, LEGACY_RESET, SECTION_SIGN};

use serde::{Deserialize, Serialize};

/// Stable player identity.
///
/// Hosts hand out 128-bit UUIDs; the store keys records by their hyphenated string form.
pub type PlayerId = uuid::Uuid;

/// Spatial position of a player, used to pick a region executor.
///
/// Only hosts with regionized scheduling care about this value; everyone else ignores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    /// Chunk coordinates (16-block columns) containing this location.
    pub fn chunk(&self) -> (i64, i64) {
        ((self.x.floor() as i64) >> 4, (self.z.floor() as i64) >> 4)
    }
}
