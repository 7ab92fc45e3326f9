use crate::{ColorToken, GRADIENT_TAG, Rgb};

/// A player's label as held by the store.
///
/// Records are values: the store hands out clones, so a reader never sees a
/// record half-way through an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelRecord {
    /// One color for the whole label.
    Solid { color: ColorToken, text: String },
    /// Per-character color ramp.
    ///
    /// `rendered` is the legacy-escaped text exactly as persisted; `stops` is
    /// never empty. A single stop is a flat fill but keeps the gradient tag.
    Gradient { stops: Vec<Rgb>, rendered: String },
}

impl LabelRecord {
    pub fn solid(color: impl Into<ColorToken>, text: impl Into<String>) -> Self {
        LabelRecord::Solid {
            color: color.into(),
            text: text.into(),
        }
    }

    /// Returns `true` for [`LabelRecord::Gradient`].
    pub fn is_gradient(&self) -> bool {
        matches!(self, LabelRecord::Gradient { .. })
    }

    /// Tag used as the prefix of the persisted value.
    pub fn tag(&self) -> String {
        match self {
            LabelRecord::Solid { color, .. } => color.to_string(),
            LabelRecord::Gradient { .. } => GRADIENT_TAG.to_string(),
        }
    }

    /// Persisted form: `<color>:<text>` or `GRADIENT:<legacy text>`.
    pub fn encode(&self) -> String {
        match self {
            LabelRecord::Solid { color, text } => format!("{color}:{text}"),
            LabelRecord::Gradient { rendered, .. } => format!("{GRADIENT_TAG}:{rendered}"),
        }
    }
}
