use serde::{Deserialize, Serialize};

/// A field the dialogue asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    Project,
    Stage,
    Supplier,
    Unit,
    Date,
    Cost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Project,
    Stage,
    Supplier,
    Unit,
    Date,
}

impl OptionKind {
    pub fn slot(&self) -> Slot {
        match self {
            OptionKind::Project => Slot::Project,
            OptionKind::Stage => Slot::Stage,
            OptionKind::Supplier => Slot::Supplier,
            OptionKind::Unit => Slot::Unit,
            OptionKind::Date => Slot::Date,
        }
    }
}

pub const SKIP_VALUE: &str = "skip";
pub const TODAY_VALUE: &str = "today";
pub const TOMORROW_VALUE: &str = "tomorrow";

/// A clickable answer chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatOption {
    pub label: String,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: OptionKind,
}

impl ChatOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            kind,
        }
    }

    pub fn is_skip(&self) -> bool {
        self.value == SKIP_VALUE
    }
}

/// What the dialogue should do next.
#[derive(Debug, Clone, PartialEq)]
pub enum Question {
    Ask {
        slot: Slot,
        prompt: String,
        options: Vec<ChatOption>,
    },
    /// Every askable field is filled or already serviced.
    Confirm,
}
