//! Styled text and the legacy `§` escape format.
//!
//! [`StyledText`] is what rich-capable hosts receive; [`StyledText::to_legacy`]
//! flattens it for hosts that only understand inline escapes.
use std::fmt;

use pronouns_model::{ColorToken, LEGACY_RESET, NamedColor, Rgb, SECTION_SIGN};

/// One run of text sharing a color. `None` is the host default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub color: Option<ColorToken>,
}

/// Sequence of colored runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    spans: Vec<Span>,
}

impl StyledText {
    pub fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// Single uncolored run.
    pub fn plain_text(text: impl Into<String>) -> Self {
        let mut out = Self::new();
        out.push(text, None);
        out
    }

    /// Append a run, merging it into the previous one when the colors match.
    pub fn push(&mut self, text: impl Into<String>, color: Option<ColorToken>) -> &mut Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        match self.spans.last_mut() {
            Some(last) if last.color == color => last.text.push_str(&text),
            _ => self.spans.push(Span { text, color }),
        }
        self
    }

    /// Append every run of `other`.
    pub fn append(&mut self, other: StyledText) -> &mut Self {
        for span in other.spans {
            self.push(span.text, span.color);
        }
        self
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Text with all styling dropped.
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Flatten into legacy escapes.
    ///
    /// A run is prefixed with its color code whenever the color changes;
    /// an uncolored run after a colored one is prefixed with a reset.
    pub fn to_legacy(&self) -> String {
        let mut out = String::new();
        let mut current: Option<ColorToken> = None;
        for span in &self.spans {
            if span.color != current {
                match span.color {
                    Some(ColorToken::Named(c)) => {
                        out.push(SECTION_SIGN);
                        out.push(c.code());
                    }
                    Some(ColorToken::Rgb(c)) => out.push_str(&legacy_hex(c)),
                    None => out.push_str(LEGACY_RESET),
                }
                current = span.color;
            }
            out.push_str(&span.text);
        }
        out
    }

    /// Parse legacy escapes back into runs.
    ///
    /// Color codes and `§x` hex sequences start a new run, `§r` returns to
    /// the default color, and format codes (`k`-`o`) are dropped. Unknown
    /// escapes are kept as literal text.
    pub fn from_legacy(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let mut out = Self::new();
        let mut color: Option<ColorToken> = None;
        let mut buf = String::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c != SECTION_SIGN || i + 1 >= chars.len() {
                buf.push(c);
                i += 1;
                continue;
            }
            let code = chars[i + 1].to_ascii_lowercase();
            if code == 'x' {
                if let Some(rgb) = hex_sequence(&chars[i + 2..]) {
                    out.push(std::mem::take(&mut buf), color);
                    color = Some(ColorToken::Rgb(rgb));
                    i += 14;
                    continue;
                }
            } else if let Some(named) = NamedColor::from_code(code) {
                out.push(std::mem::take(&mut buf), color);
                color = Some(ColorToken::Named(named));
                i += 2;
                continue;
            } else if code == 'r' {
                out.push(std::mem::take(&mut buf), color);
                color = None;
                i += 2;
                continue;
            } else if ('k'..='o').contains(&code) {
                i += 2;
                continue;
            }
            buf.push(c);
            i += 1;
        }
        out.push(buf, color);
        out
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain())
    }
}

/// `§x§r§r§g§g§b§b` escape for one RGB color, lowercase digits.
pub fn legacy_hex(rgb: Rgb) -> String {
    let mut out = String::with_capacity(2 + 6 * 3);
    out.push(SECTION_SIGN);
    out.push('x');
    for d in rgb.hex().chars() {
        out.push(SECTION_SIGN);
        out.push(d);
    }
    out
}

/// Decode the six `§<hex>` pairs following a `§x`.
fn hex_sequence(chars: &[char]) -> Option<Rgb> {
    if chars.len() < 12 {
        return None;
    }
    let mut v = 0u32;
    for pair in chars[..12].chunks(2) {
        if pair[0] != SECTION_SIGN {
            return None;
        }
        v = (v << 4) | pair[1].to_digit(16)?;
    }
    Some(Rgb::from_u32(v))
}

/// Remove legacy escapes, leaving only visible text.
///
/// Strips complete lowercase `§x` hex sequences first, then every single
/// `§` code in `0-9a-fk-or`.
pub fn strip_color_codes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut pass = Vec::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == SECTION_SIGN
            && chars.get(i + 1) == Some(&'x')
            && is_lower_hex_sequence(&chars[i + 2..])
        {
            i += 14;
            continue;
        }
        pass.push(chars[i]);
        i += 1;
    }

    let mut out = String::with_capacity(pass.len());
    let mut i = 0;
    while i < pass.len() {
        if pass[i] == SECTION_SIGN && pass.get(i + 1).is_some_and(|c| is_single_code(*c)) {
            i += 2;
            continue;
        }
        out.push(pass[i]);
        i += 1;
    }
    out
}

fn is_lower_hex_sequence(chars: &[char]) -> bool {
    chars.len() >= 12
        && chars[..12]
            .chunks(2)
            .all(|p| p[0] == SECTION_SIGN && matches!(p[1], '0'..='9' | 'a'..='f'))
}

fn is_single_code(c: char) -> bool {
    matches!(c, '0'..='9' | 'a'..='f' | 'k'..='o' | 'r')
}

/// Convert `&`-notation (`&a`, `&l`, `&r`) into `§` escapes.
///
/// Only an ampersand followed by a lowercase code is converted; `"R&D"` stays as is.
pub fn translate_ampersand(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '&' {
            if let Some(&next) = chars.peek() {
                if is_single_code(next) {
                    out.push(SECTION_SIGN);
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_escape_layout() {
        assert_eq!(legacy_hex(Rgb::new(0xab, 0x01, 0xff)), "§x§a§b§0§1§f§f");
    }

    #[test]
    fn push_merges_equal_colors() {
        let mut t = StyledText::new();
        let gray = Some(ColorToken::Named(NamedColor::Gray));
        t.push("[", gray).push("they", gray).push("]", gray).push(" Alex", None);
        assert_eq!(t.spans().len(), 2);
        assert_eq!(t.plain(), "[they] Alex");
        assert_eq!(t.to_legacy(), "§7[they]§r Alex");
    }

    #[test]
    fn uncolored_prefix_emits_no_reset() {
        let mut t = StyledText::plain_text("[");
        t.push("x", Some(ColorToken::Rgb(Rgb::new(1, 2, 3))));
        t.push("]", None);
        assert_eq!(t.to_legacy(), "[§x§0§1§0§2§0§3x§r]");
    }

    #[test]
    fn parses_gradient_escapes() {
        let t = StyledText::from_legacy("§x§f§f§0§0§0§0h§x§0§0§0§0§f§fi§r");
        assert_eq!(t.spans().len(), 2);
        assert_eq!(t.spans()[0].color, Some(ColorToken::Rgb(Rgb::new(255, 0, 0))));
        assert_eq!(t.spans()[1].text, "i");
        assert_eq!(t.plain(), "hi");
    }

    #[test]
    fn parses_named_codes_and_drops_formats() {
        let t = StyledText::from_legacy("§l§aok§rdone");
        assert_eq!(t.spans()[0].color, Some(ColorToken::Named(NamedColor::Green)));
        assert_eq!(t.spans()[0].text, "ok");
        assert_eq!(t.spans()[1].color, None);
        assert_eq!(t.plain(), "okdone");
    }

    #[test]
    fn legacy_roundtrip_is_stable() {
        let src = "[§x§1§2§3§4§5§6a§x§6§5§4§3§2§1b§r] Sam";
        assert_eq!(StyledText::from_legacy(src).to_legacy(), src);
    }

    #[test]
    fn keeps_dangling_and_unknown_escapes() {
        assert_eq!(StyledText::from_legacy("a§").plain(), "a§");
        assert_eq!(StyledText::from_legacy("§zq").plain(), "§zq");
    }

    #[test]
    fn strip_removes_hex_and_single_codes() {
        assert_eq!(strip_color_codes("§x§f§f§0§0§0§0h§x§0§0§0§0§f§fi§r"), "hi");
        assert_eq!(strip_color_codes("§a§lbold§r text"), "bold text");
        assert_eq!(strip_color_codes("plain/text"), "plain/text");
    }

    #[test]
    fn strip_leaves_uppercase_hex_digits() {
        // Uppercase digits are not part of the recognized alphabet.
        assert_eq!(strip_color_codes("§x§F§F§0§0§0§0a"), "§x§F§Fa");
    }

    #[test]
    fn ampersand_translation() {
        assert_eq!(translate_ampersand("&aYour pronouns&r"), "§aYour pronouns§r");
        assert_eq!(translate_ampersand("&cErr &l!"), "§cErr §l!");
        assert_eq!(translate_ampersand("R&D & co&"), "R&D & co&");
    }
}
