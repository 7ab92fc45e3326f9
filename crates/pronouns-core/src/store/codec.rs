//! Persisted form of the label map.
//!
//! The file is a flat JSON object `{"<uuid>": "<tag>:<payload>"}`. Values are
//! decoded into [`LabelRecord`] here and nowhere else.
use std::collections::{BTreeMap, HashMap};

use pronouns_model::{ColorToken, GRADIENT_TAG, LabelRecord, NamedColor, PlayerId};
use tracing::warn;

use crate::{
    color::{StyledText, parse_hex},
    store::error::{StoreError, StoreResult},
};

/// Decode one stored value.
///
/// Gradient stops are recovered from the per-character escapes; an unknown
/// solid color name decodes as gray.
pub fn decode_label(value: &str) -> StoreResult<LabelRecord> {
    let (tag, payload) = value
        .split_once(':')
        .ok_or_else(|| StoreError::Corrupt(format!("missing tag separator in {value:?}")))?;

    if tag == GRADIENT_TAG {
        let stops: Vec<_> = StyledText::from_legacy(payload)
            .spans()
            .iter()
            .filter_map(|s| s.color.map(|c| (c.rgb(), s.text.chars().count())))
            .flat_map(|(rgb, n)| std::iter::repeat_n(rgb, n))
            .collect();
        if stops.is_empty() {
            return Err(StoreError::Corrupt(format!(
                "gradient without colors: {payload:?}"
            )));
        }
        return Ok(LabelRecord::Gradient {
            stops,
            rendered: payload.to_string(),
        });
    }

    let color = match parse_hex(tag) {
        Some(rgb) => ColorToken::Rgb(rgb),
        None => match NamedColor::from_name(tag) {
            Some(named) => ColorToken::Named(named),
            None => {
                warn!(tag, "unknown stored color, using gray");
                ColorToken::Named(NamedColor::Gray)
            }
        },
    };
    Ok(LabelRecord::Solid {
        color,
        text: payload.to_string(),
    })
}

/// Parse the whole file. Blank content is an empty map.
pub fn decode_map(content: &str) -> StoreResult<HashMap<PlayerId, LabelRecord>> {
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let raw: HashMap<String, String> =
        serde_json::from_str(content).map_err(|e| StoreError::Corrupt(e.to_string()))?;

    raw.into_iter()
        .map(|(key, value)| {
            let id = key
                .parse::<PlayerId>()
                .map_err(|e| StoreError::Corrupt(format!("invalid player id {key:?}: {e}")))?;
            Ok((id, decode_label(&value)?))
        })
        .collect()
}

/// Serialize a snapshot with keys in sorted order.
pub fn encode_map(records: &HashMap<PlayerId, LabelRecord>) -> StoreResult<Vec<u8>> {
    let sorted: BTreeMap<String, String> = records
        .iter()
        .map(|(id, rec)| (id.to_string(), rec.encode()))
        .collect();
    serde_json::to_vec(&sorted).map_err(|e| StoreError::Serialize(e.to_string()))
}
