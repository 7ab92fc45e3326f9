use pronouns_model::{LEGACY_RESET, Rgb};

use crate::color::markup::legacy_hex;

/// Target markup for rendered color runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// `§x§r§r§g§g§b§b` escapes, understood by every host tier.
    Legacy,
    /// `<#rrggbb>` tags for rich-markup consumers.
    Modern,
}

/// Spread `stops` across `text`, one color per character.
///
/// Character `i` of `n` sits at `p = i / (n - 1)`; the stop list is cut
/// into `k - 1` equal segments and the segment index is clamped to `k - 2`.
/// Positions are kept as exact fractions, so the first character is always
/// `stops[0]` and the last always the final stop. Channels are truncated
/// toward zero.
///
/// Returns an empty vector when `stops` is empty.
pub fn build_gradient(stops: &[Rgb], text: &str) -> Vec<(char, Rgb)> {
    let k = stops.len();
    if k == 0 {
        return Vec::new();
    }
    if k == 1 {
        return text.chars().map(|c| (c, stops[0])).collect();
    }

    let n = text.chars().count();
    // p / w = i * (k - 1) / (n - 1); a single character sits at p = 0.
    let den = n.saturating_sub(1).max(1) as i64;
    let segments = (k - 1) as i64;

    text.chars()
        .enumerate()
        .map(|(i, c)| {
            let scaled = if n > 1 { i as i64 * segments } else { 0 };
            let index = (scaled / den).min(segments - 1);
            let num = scaled - index * den;
            let idx = index as usize;
            (c, lerp(stops[idx], stops[idx + 1], num, den))
        })
        .collect()
}

/// Interpolate at `num / den` (`0 <= num <= den`).
fn lerp(a: Rgb, b: Rgb, num: i64, den: i64) -> Rgb {
    // The numerator stays non-negative, so integer division truncates toward zero.
    let ch = |x: u8, y: u8| {
        let (x, y) = (x as i64, y as i64);
        ((x * den + num * (y - x)) / den) as u8
    };
    Rgb::new(ch(a.r, b.r), ch(a.g, b.g), ch(a.b, b.b))
}

/// Serialize colored characters into the requested markup, ending with a reset.
pub fn render(pairs: &[(char, Rgb)], encoding: Encoding) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(pairs.len() * 16);
    for (c, rgb) in pairs {
        match encoding {
            Encoding::Legacy => out.push_str(&legacy_hex(*rgb)),
            Encoding::Modern => {
                out.push_str("<#");
                out.push_str(&rgb.hex());
                out.push('>');
            }
        }
        out.push(*c);
    }
    match encoding {
        Encoding::Legacy => out.push_str(LEGACY_RESET),
        Encoding::Modern => out.push_str("<reset>"),
    }
    out
}

/// Legacy-encoded gradient text as it is persisted.
///
/// A single stop is written as one escape covering the whole text rather
/// than one escape per character.
pub fn render_gradient(stops: &[Rgb], text: &str) -> String {
    if text.is_empty() || stops.is_empty() {
        return text.to_string();
    }
    if let [only] = stops {
        return format!("{}{text}{LEGACY_RESET}", legacy_hex(*only));
    }
    render(&build_gradient(stops, text), Encoding::Legacy)
}
