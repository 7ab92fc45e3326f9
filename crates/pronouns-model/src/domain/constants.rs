//! Wire-level constants shared by the codec and the color engine.
//!
//! These strings are part of the persisted format written by every earlier
//! release of the store; changing them breaks existing data files.

/// Prefix marking a gradient label in the persisted mapping.
///
/// A stored value `"GRADIENT:<legacy text>"` decodes into [`crate::LabelRecord::Gradient`].
pub const GRADIENT_TAG: &str = "GRADIENT";

/// Escape character introducing a legacy formatting code.
pub const SECTION_SIGN: char = '§';

/// Legacy escape that clears every color and format.
pub const LEGACY_RESET: &str = "§r";
