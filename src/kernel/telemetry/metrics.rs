use std::collections::VecDeque;

use super::event::{SummaryKind, TelemetryEvent};
use crate::planner::Slot;

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub dialogue_stats: DialogueStats,
    pub reprompt_stats: RepromptStats,
    pub commit_stats: CommitStats,
}

#[derive(Debug, Clone, Default)]
pub struct DialogueStats {
    pub transitions: u64,
    pub rejections: u64,
    pub skips: u64,
    pub project_summaries: u64,
    pub overall_summaries: u64,
    pub cancellations: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RepromptStats {
    pub total: u64,
    pub project: u64,
    pub stage: u64,
    pub supplier: u64,
    pub cost: u64,
    pub project_info: u64,
}

#[derive(Debug, Clone, Default)]
pub struct CommitStats {
    pub requested: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub success_rate: f64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::StateTransition { .. } => snap.dialogue_stats.transitions += 1,
            TelemetryEvent::UtteranceRejected => snap.dialogue_stats.rejections += 1,
            TelemetryEvent::SlotSkipped { .. } => snap.dialogue_stats.skips += 1,
            TelemetryEvent::SummaryEmitted { scope } => match scope {
                SummaryKind::Project => snap.dialogue_stats.project_summaries += 1,
                SummaryKind::All => snap.dialogue_stats.overall_summaries += 1,
            },
            TelemetryEvent::Cancelled { .. } => snap.dialogue_stats.cancellations += 1,
            TelemetryEvent::Reprompt { slot } => {
                snap.reprompt_stats.total += 1;
                match slot {
                    Some(Slot::Project) => snap.reprompt_stats.project += 1,
                    Some(Slot::Stage) => snap.reprompt_stats.stage += 1,
                    Some(Slot::Supplier) => snap.reprompt_stats.supplier += 1,
                    Some(Slot::Cost) => snap.reprompt_stats.cost += 1,
                    // Unit and date accept any text
                    Some(Slot::Unit) | Some(Slot::Date) => {}
                    None => snap.reprompt_stats.project_info += 1,
                }
            }
            TelemetryEvent::CommitRequested => snap.commit_stats.requested += 1,
            TelemetryEvent::CommitOutcome { success } => {
                if *success {
                    snap.commit_stats.succeeded += 1;
                } else {
                    snap.commit_stats.failed += 1;
                }
            }
        }
    }

    let settled = snap.commit_stats.succeeded + snap.commit_stats.failed;
    if settled > 0 {
        snap.commit_stats.success_rate = snap.commit_stats.succeeded as f64 / settled as f64;
    }

    snap
}
