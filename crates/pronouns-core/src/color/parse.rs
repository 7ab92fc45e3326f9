use pronouns_model::{ColorToken, ModelError, ModelResult, NamedColor, Rgb};

/// Parse a `#rrggbb` literal. Anything else, including 3-digit shorthand, is `None`.
pub fn parse_hex(token: &str) -> Option<Rgb> {
    let digits = token.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(Rgb::from_u32)
}

/// Resolve a user-supplied color token, keeping whether it was named or hex.
///
/// Hex literals win over names; names are matched case-insensitively.
pub fn parse_token(token: &str) -> ModelResult<ColorToken> {
    if let Some(rgb) = parse_hex(token) {
        return Ok(ColorToken::Rgb(rgb));
    }
    NamedColor::from_name(token)
        .map(ColorToken::Named)
        .ok_or_else(|| ModelError::UnknownColor(token.to_string()))
}

/// Resolve a color token straight to its RGB value.
pub fn parse_color(token: &str) -> ModelResult<Rgb> {
    parse_token(token).map(ColorToken::rgb)
}

/// Resolve every token or fail on the first unknown one.
pub fn parse_stops<S: AsRef<str>>(tokens: &[S]) -> ModelResult<Vec<Rgb>> {
    tokens.iter().map(|t| parse_color(t.as_ref())).collect()
}
