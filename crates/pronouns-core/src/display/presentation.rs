use pronouns_model::LabelRecord;

use crate::color::{StyledText, strip_color_codes};

/// The two name artifacts pushed to the host for one player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// Bare player name.
    pub name: String,
    /// `[label] name`, shown above the player's head and as display name.
    pub above_head: StyledText,
    /// `name [label]`, shown in the player list.
    pub tab_list: StyledText,
    /// `false` when the player has no label and both artifacts are the bare name.
    pub labeled: bool,
}

impl Presentation {
    pub fn build(record: Option<&LabelRecord>, name: &str) -> Self {
        let Some(record) = record else {
            return Self::bare(name);
        };

        let mut above_head = StyledText::new();
        let mut tab_list = StyledText::new();
        match record {
            LabelRecord::Solid { color, text } => {
                let label = format!("[{text}]");
                above_head
                    .push(label.clone(), Some(*color))
                    .push(format!(" {name}"), None);
                tab_list
                    .push(format!("{name} "), None)
                    .push(label, Some(*color));
            }
            LabelRecord::Gradient { rendered, .. } => {
                above_head
                    .push("[", None)
                    .append(StyledText::from_legacy(rendered))
                    .push(format!("] {name}"), None);
                tab_list.push(format!("{name} [{}]", strip_color_codes(rendered)), None);
            }
        }
        Self {
            name: name.to_string(),
            above_head,
            tab_list,
            labeled: true,
        }
    }

    pub fn bare(name: &str) -> Self {
        Self {
            name: name.to_string(),
            above_head: StyledText::plain_text(name),
            tab_list: StyledText::plain_text(name),
            labeled: false,
        }
    }
}

/// Visible label text with all color removed.
pub fn label_text(record: &LabelRecord) -> String {
    match record {
        LabelRecord::Solid { text, .. } => text.clone(),
        LabelRecord::Gradient { rendered, .. } => strip_color_codes(rendered),
    }
}
