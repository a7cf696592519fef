use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::commit::NewMaterial;
use super::event::{ChatMessage, DialogueEvent, SideEffect};
use super::state::{Session, TurnContext};
use super::telemetry::recorder::TelemetryRecorder;
use super::time::{Clock, SystemClock};
use crate::catalog::{Catalog, MaterialRecord};
use crate::config::AssistantConfig;
use crate::services::store::MaterialStore;

/// Drives one dialogue session: reduces events, executes side effects and
/// feeds store results back in as events.
pub struct Reactor<S: MaterialStore> {
    pub session: Session,
    pub telemetry: TelemetryRecorder,
    catalog: Catalog,
    store: Arc<S>,
    config: AssistantConfig,
    clock: Box<dyn Clock>,
}

impl<S: MaterialStore> Reactor<S> {
    pub fn new(catalog: Catalog, store: Arc<S>, config: AssistantConfig) -> Self {
        Self {
            session: Session::new(),
            telemetry: TelemetryRecorder::new(),
            catalog,
            store,
            config,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
    }

    /// Pure step: reduce one event against the current catalog and date.
    /// MUST NOT await.
    pub fn step(&mut self, event: DialogueEvent) -> Vec<SideEffect> {
        let ctx = TurnContext {
            catalog: &self.catalog,
            today: self.clock.today(),
            confidence_threshold: self.config.confidence_threshold,
        };
        self.session.reduce(event, &ctx)
    }

    /// Async driver: runs `event` and any commit results it triggers to
    /// completion, then returns the assistant replies in order.
    pub async fn handle(&mut self, event: DialogueEvent) -> Vec<ChatMessage> {
        let delay = match &event {
            DialogueEvent::UserText(_) => self.config.submission_delay(),
            DialogueEvent::OptionSelected(_) => self.config.merge_delay(),
            _ => Duration::ZERO,
        };

        let mut replies = Vec::new();
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            for effect in self.step(event) {
                match effect {
                    SideEffect::Reply(message) => replies.push(message),
                    SideEffect::Telemetry(event) => self.telemetry.record(event),
                    SideEffect::Commit(payload) => queue.push_back(self.commit(payload).await),
                }
            }
        }

        // State is already updated; only delivery waits.
        if !replies.is_empty() && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        replies
    }

    async fn commit(&mut self, payload: NewMaterial) -> DialogueEvent {
        match self.store.create_material(&payload).await {
            Ok(material_id) => {
                info!(%material_id, "Store accepted material");
                self.catalog.materials.push(MaterialRecord {
                    id: material_id.clone(),
                    name: payload.name,
                    project_id: payload.project_id,
                    estimated_total_cost: Some(payload.estimated_total_cost),
                    status: Some(payload.status),
                });
                DialogueEvent::CommitSucceeded { material_id }
            }
            Err(e) => {
                warn!(error = %e, "Store rejected material");
                DialogueEvent::CommitFailed { reason: e.to_string() }
            }
        }
    }
}
