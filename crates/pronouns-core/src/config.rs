//! Runtime settings, deserialized from the host's configuration file.
use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{display::DisplayFlags, store::StoreConfig};

/// Top-level settings.
///
/// Every field has a default, so a partial or empty document is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PronounsConfig {
    pub general: GeneralConfig,
    pub display: DisplayConfig,
    pub gradient: GradientConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneralConfig {
    /// Maximum label length in characters.
    pub max_pronoun_length: usize,
    pub auto_save: bool,
    /// Debounce window for saves, in milliseconds.
    pub save_delay_ms: u64,
    /// When `false`, labels are stored but player names are never touched.
    pub update_display_names: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            max_pronoun_length: 20,
            auto_save: true,
            save_delay_ms: 1000,
            update_display_names: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DisplayConfig {
    pub show_above_head: bool,
    pub show_in_tab_list: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_above_head: true,
            show_in_tab_list: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GradientConfig {
    /// Maximum explicit gradient stops for unprivileged actors; `0` means unlimited.
    pub color_limit: usize,
    /// Preset name → whitespace-separated color tokens.
    pub presets: BTreeMap<String, String>,
}

impl Default for GradientConfig {
    fn default() -> Self {
        let presets = [
            ("trans", "#5BCEFA #F5A9B8 #FFFFFF #F5A9B8 #5BCEFA"),
            ("rainbow", "#E40303 #FF8C00 #FFED00 #008026 #004DFF #750787"),
            ("nonbinary", "#FCF434 #FFFFFF #9C59D1 #2C2C2C"),
            ("bisexual", "#D60270 #9B4F96 #0038A8"),
            ("lesbian", "#D52D00 #FF9A56 #FFFFFF #D362A4 #A30262"),
            ("pansexual", "#FF218C #FFD800 #21B1FF"),
            ("asexual", "#000000 #A3A3A3 #FFFFFF #800080"),
            ("genderfluid", "#FF76A4 #FFFFFF #C011D7 #000000 #2F3CBE"),
        ];
        Self {
            color_limit: 5,
            presets: presets
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl GradientConfig {
    /// Tokens of preset `name`, matched case-insensitively.
    pub fn preset(&self, name: &str) -> Option<Vec<&str>> {
        let wanted = name.trim().to_lowercase();
        self.presets
            .iter()
            .find(|(k, _)| k.to_lowercase() == wanted)
            .map(|(_, v)| v.split_whitespace().collect())
    }

    /// Preset names, lowercased, in sorted order.
    pub fn preset_names(&self) -> Vec<String> {
        self.presets.keys().map(|k| k.to_lowercase()).collect()
    }
}

impl PronounsConfig {
    pub fn store(&self) -> StoreConfig {
        StoreConfig {
            save_delay: Duration::from_millis(self.general.save_delay_ms),
            auto_save: self.general.auto_save,
        }
    }

    pub fn display_flags(&self) -> DisplayFlags {
        DisplayFlags {
            show_above_head: self.display.show_above_head,
            show_in_tab_list: self.display.show_in_tab_list,
        }
    }
}
