//! Color engine: token parsing, gradient ramps and legacy markup.
//!
//! Everything here is pure and deterministic; no function touches the host or storage.
mod gradient;
pub use gradient::{Encoding, build_gradient, render, render_gradient};

mod markup;
pub use markup::{Span, StyledText, legacy_hex, strip_color_codes, translate_ampersand};

mod parse;
pub use parse::{parse_color, parse_hex, parse_stops, parse_token};
