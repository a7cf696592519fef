use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::commit::NewMaterial;
use super::telemetry::event::TelemetryEvent;
use crate::intent::ParsedMaterialRequest;
use crate::planner::ChatOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChatOption>,
    /// Snapshot of the pending record, set on the confirmation card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<ParsedMaterialRequest>,
}

impl ChatMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            options: Vec::new(),
            pending: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_options(mut self, options: Vec<ChatOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_pending(mut self, record: ParsedMaterialRequest) -> Self {
        self.pending = Some(record);
        self
    }
}

/// Everything that can drive the dialogue forward.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogueEvent {
    /// Typed submission.
    UserText(String),
    /// Chip click.
    OptionSelected(ChatOption),
    Confirm,
    Cancel,
    /// Results of the store call, fed back by the driver.
    CommitSucceeded { material_id: String },
    CommitFailed { reason: String },
    /// Host dialog closed.
    Closed,
}

/// Work the reducer hands to the driver. The reducer itself never awaits.
#[derive(Debug, Clone)]
pub enum SideEffect {
    Reply(ChatMessage),
    Commit(NewMaterial),
    Telemetry(TelemetryEvent),
}
