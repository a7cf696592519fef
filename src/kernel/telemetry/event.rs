use serde::{Deserialize, Serialize};

use crate::kernel::state::ConversationState;
use crate::planner::Slot;

// Allowed: states, slots, outcomes, counts
// Forbidden: utterances, names, amounts, dates

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    StateTransition {
        from: ConversationState,
        to: ConversationState,
    },

    /// Entry utterance below the confidence threshold.
    UtteranceRejected,

    /// Answer that resolved nothing. `None` while waiting for a project-info name.
    Reprompt {
        slot: Option<Slot>,
    },

    /// Slot serviced but left unset.
    SlotSkipped {
        slot: Slot,
    },

    SummaryEmitted {
        scope: SummaryKind,
    },

    CommitRequested,

    CommitOutcome {
        success: bool,
    },

    Cancelled {
        from: ConversationState,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryKind {
    Project,
    All,
}
