use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use super::commit::{build_payload, UNNAMED_MATERIAL};
use super::event::{ChatMessage, DialogueEvent, Role, SideEffect};
use super::telemetry::event::{SummaryKind, TelemetryEvent};
use crate::catalog::{Catalog, ProjectSummary};
use crate::intent::extractor::{day_month, first_number, parse_at};
use crate::intent::vocab::{self, mentions};
use crate::intent::{DeliveryDate, ParsedMaterialRequest, RequestIntent};
use crate::outputs::realizer::confirmation_card;
use crate::planner::{select_next, ChatOption, OptionKind, Question, Slot, TODAY_VALUE, TOMORROW_VALUE};

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConversationState {
    #[default]
    Idle,
    CollectingProject,
    CollectingStage,
    CollectingSupplier,
    CollectingUnit,
    CollectingDate,
    CollectingCost,
    Confirming,
    CollectingProjectInfoName,
}

impl ConversationState {
    pub fn collecting(slot: Slot) -> Self {
        match slot {
            Slot::Project => Self::CollectingProject,
            Slot::Stage => Self::CollectingStage,
            Slot::Supplier => Self::CollectingSupplier,
            Slot::Unit => Self::CollectingUnit,
            Slot::Date => Self::CollectingDate,
            Slot::Cost => Self::CollectingCost,
        }
    }

    /// The slot an answer in this state fills.
    pub fn serviced_slot(&self) -> Option<Slot> {
        match self {
            Self::CollectingProject => Some(Slot::Project),
            Self::CollectingStage => Some(Slot::Stage),
            Self::CollectingSupplier => Some(Slot::Supplier),
            Self::CollectingUnit => Some(Slot::Unit),
            Self::CollectingDate => Some(Slot::Date),
            Self::CollectingCost => Some(Slot::Cost),
            Self::Idle | Self::Confirming | Self::CollectingProjectInfoName => None,
        }
    }
}

/// Read-only inputs of one reduction.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    pub catalog: &'a Catalog,
    pub today: NaiveDate,
    pub confidence_threshold: f32,
}

impl<'a> TurnContext<'a> {
    pub fn new(catalog: &'a Catalog, today: NaiveDate) -> Self {
        Self {
            catalog,
            today,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

/// One dialogue instance: state, pending record and transcript.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: ConversationState,
    pending: Option<ParsedMaterialRequest>,
    serviced: BTreeSet<Slot>,
    transcript: Vec<ChatMessage>,
    committing: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn pending(&self) -> Option<&ParsedMaterialRequest> {
        self.pending.as_ref()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn is_committing(&self) -> bool {
        self.committing
    }

    pub fn serviced(&self) -> &BTreeSet<Slot> {
        &self.serviced
    }

    /// Options attached to the latest assistant message.
    pub fn last_options(&self) -> &[ChatOption] {
        self.transcript
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.options.as_slice())
            .unwrap_or(&[])
    }

    /// Pure reduction: Session + Event -> mutated Session + SideEffects.
    pub fn reduce(&mut self, event: DialogueEvent, ctx: &TurnContext<'_>) -> Vec<SideEffect> {
        let before = self.state;
        let mut effects = Vec::new();

        if self.committing
            && !matches!(
                event,
                DialogueEvent::CommitSucceeded { .. } | DialogueEvent::CommitFailed { .. } | DialogueEvent::Closed
            )
        {
            warn!(?event, "Ignoring input while a commit is in flight");
            return effects;
        }

        match event {
            DialogueEvent::UserText(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return effects;
                }
                self.transcript.push(ChatMessage::user(text));
                self.on_text(text, ctx, &mut effects);
            }
            DialogueEvent::OptionSelected(option) => {
                self.transcript.push(ChatMessage::user(option.label.clone()));
                self.on_option(option, ctx, &mut effects);
            }
            DialogueEvent::Confirm => self.on_confirm(ctx, &mut effects),
            DialogueEvent::Cancel => self.on_cancel(&mut effects),
            DialogueEvent::CommitSucceeded { material_id } => self.on_committed(&material_id, &mut effects),
            DialogueEvent::CommitFailed { reason } => self.on_commit_failed(&reason, &mut effects),
            DialogueEvent::Closed => {
                self.reset();
                self.transcript.clear();
            }
        }

        if self.state != before {
            info!(from = ?before, to = ?self.state, "Dialogue transition");
            effects.push(SideEffect::Telemetry(TelemetryEvent::StateTransition {
                from: before,
                to: self.state,
            }));
        }
        effects
    }

    fn on_text(&mut self, text: &str, ctx: &TurnContext<'_>, effects: &mut Vec<SideEffect>) {
        match self.state {
            ConversationState::Idle => self.on_utterance(text, ctx, effects),
            ConversationState::CollectingProjectInfoName => self.on_project_info_name(text, ctx, effects),
            ConversationState::CollectingProject => match ctx.catalog.search_project(text) {
                Some(project) => {
                    let name = project.name.clone();
                    self.record().project_name = Some(name);
                    self.advance(ctx, effects);
                }
                None => self.reprompt(&format!("Não encontrei o projeto \"{}\".", text), ctx, effects),
            },
            ConversationState::CollectingStage => {
                let project_id = self
                    .pending
                    .as_ref()
                    .and_then(|r| r.project_name.as_deref())
                    .and_then(|name| ctx.catalog.project_by_name(name))
                    .map(|p| p.id.clone());
                let stage = project_id
                    .as_deref()
                    .and_then(|id| ctx.catalog.search_stage(id, text))
                    .map(|s| s.name.clone());
                match stage {
                    Some(name) => {
                        self.record().stage_name = Some(name);
                        self.advance(ctx, effects);
                    }
                    None => self.reprompt(&format!("Não encontrei a etapa \"{}\".", text), ctx, effects),
                }
            }
            ConversationState::CollectingSupplier => {
                let lower = text.to_lowercase();
                match ctx.catalog.search_supplier(text) {
                    Some(supplier) => {
                        let name = supplier.name.clone();
                        self.record().supplier_name = Some(name);
                        self.advance(ctx, effects);
                    }
                    None if mentions(&lower, vocab::SKIP_WORDS) => self.skip(Slot::Supplier, ctx, effects),
                    None => self.reprompt(&format!("Não encontrei o fornecedor \"{}\".", text), ctx, effects),
                }
            }
            ConversationState::CollectingUnit => {
                self.record().unit = Some(text.to_lowercase());
                self.advance(ctx, effects);
            }
            ConversationState::CollectingDate => {
                let date = date_answer(text, ctx.today);
                let skipped = date.is_none();
                self.record().delivery_date = date;
                if skipped {
                    self.skip(Slot::Date, ctx, effects);
                } else {
                    self.advance(ctx, effects);
                }
            }
            ConversationState::CollectingCost => {
                let lower = text.to_lowercase();
                let cost = first_number(text).or_else(|| mentions(&lower, vocab::NO_COST_WORDS).then_some(0.0));
                match cost {
                    Some(cost) => {
                        self.record().estimated_total_cost = Some(cost);
                        self.advance(ctx, effects);
                    }
                    None => self.reprompt(
                        "Não consegui entender o valor. Digite um número (ex: 350,00) ou \"não sei\".",
                        ctx,
                        effects,
                    ),
                }
            }
            ConversationState::Confirming => {
                let refinement = parse_at(text, ctx.today);
                debug!("Merging refinement onto pending record");
                self.record().merge_from(refinement);
                self.advance(ctx, effects);
            }
        }
    }

    /// First utterance of a dialogue.
    fn on_utterance(&mut self, text: &str, ctx: &TurnContext<'_>, effects: &mut Vec<SideEffect>) {
        let parsed = parse_at(text, ctx.today);

        if parsed.intent == RequestIntent::ProjectInfo {
            self.on_project_info(text, ctx, effects);
        } else if parsed.confidence > ctx.confidence_threshold {
            info!(confidence = parsed.confidence, "Starting material dialogue");
            self.pending = Some(parsed);
            self.serviced.clear();
            self.advance(ctx, effects);
        } else {
            debug!(confidence = parsed.confidence, "Utterance rejected");
            effects.push(SideEffect::Telemetry(TelemetryEvent::UtteranceRejected));
            self.say(
                ChatMessage::assistant(
                    "Desculpe, não entendi. Tente algo como \"10 sacos de cimento para amanhã\".",
                ),
                effects,
            );
        }
    }

    fn on_project_info(&mut self, text: &str, ctx: &TurnContext<'_>, effects: &mut Vec<SideEffect>) {
        let lower = text.to_lowercase();
        if let Some(project) = ctx.catalog.find_project(&project_query(&lower)) {
            let summary = ProjectSummary::for_project(ctx.catalog, project);
            self.summarize(summary, SummaryKind::Project, effects);
        } else if mentions(&lower, vocab::ALL_PROJECTS_WORDS) {
            self.summarize(ProjectSummary::overall(ctx.catalog), SummaryKind::All, effects);
        } else {
            self.state = ConversationState::CollectingProjectInfoName;
            self.say(
                ChatMessage::assistant("De qual projeto você quer o resumo?").with_options(project_options(ctx.catalog)),
                effects,
            );
        }
    }

    fn on_project_info_name(&mut self, text: &str, ctx: &TurnContext<'_>, effects: &mut Vec<SideEffect>) {
        let lower = text.to_lowercase();
        let project = ctx
            .catalog
            .find_project(&lower)
            .or_else(|| ctx.catalog.find_project(&project_query(&lower)));

        if let Some(project) = project {
            let summary = ProjectSummary::for_project(ctx.catalog, project);
            self.state = ConversationState::Idle;
            self.summarize(summary, SummaryKind::Project, effects);
        } else if mentions(&lower, vocab::ABANDON_WORDS) {
            self.state = ConversationState::Idle;
            self.say(ChatMessage::assistant("Tudo bem, consulta cancelada."), effects);
        } else {
            self.reprompt_project_info(text, ctx, effects);
        }
    }

    fn reprompt_project_info(&mut self, name: &str, ctx: &TurnContext<'_>, effects: &mut Vec<SideEffect>) {
        effects.push(SideEffect::Telemetry(TelemetryEvent::Reprompt { slot: None }));
        self.say(
            ChatMessage::assistant(format!(
                "Não encontrei o projeto \"{}\". Tente outro nome ou digite \"cancelar\".",
                name
            ))
            .with_options(project_options(ctx.catalog)),
            effects,
        );
    }

    fn on_option(&mut self, option: ChatOption, ctx: &TurnContext<'_>, effects: &mut Vec<SideEffect>) {
        if self.state == ConversationState::CollectingProjectInfoName {
            let project = (option.kind == OptionKind::Project)
                .then(|| ctx.catalog.project_by_name(&option.value))
                .flatten();
            match project {
                Some(project) => {
                    let summary = ProjectSummary::for_project(ctx.catalog, project);
                    self.state = ConversationState::Idle;
                    self.summarize(summary, SummaryKind::Project, effects);
                }
                None => self.reprompt_project_info(&option.value, ctx, effects),
            }
            return;
        }
        if self.pending.is_none() {
            warn!(kind = ?option.kind, "Option selected with no pending record");
            return;
        }

        let slot = option.kind.slot();
        let is_skip = option.is_skip();
        let record = self.record();
        let skipped = match option.kind {
            OptionKind::Project => {
                record.project_name = Some(option.value);
                false
            }
            OptionKind::Stage => {
                record.stage_name = Some(option.value);
                false
            }
            OptionKind::Supplier => {
                if !is_skip {
                    record.supplier_name = Some(option.value);
                }
                is_skip
            }
            OptionKind::Unit => {
                record.unit = Some(option.value);
                false
            }
            OptionKind::Date => {
                record.delivery_date = date_answer(&option.value, ctx.today);
                record.delivery_date.is_none()
            }
        };

        if skipped {
            self.skip(slot, ctx, effects);
        } else {
            self.serviced.insert(slot);
            self.ask_next(ctx, effects);
        }
    }

    fn on_confirm(&mut self, ctx: &TurnContext<'_>, effects: &mut Vec<SideEffect>) {
        if self.state != ConversationState::Confirming {
            warn!(state = ?self.state, "Confirm outside of confirmation");
            return;
        }
        let Some(record) = self.pending.as_ref() else {
            return;
        };

        let payload = build_payload(record, ctx.catalog);
        info!(project = ?payload.project_id, "Committing material");
        self.committing = true;
        effects.push(SideEffect::Telemetry(TelemetryEvent::CommitRequested));
        effects.push(SideEffect::Commit(payload));
    }

    fn on_cancel(&mut self, effects: &mut Vec<SideEffect>) {
        if self.state == ConversationState::Idle && self.pending.is_none() {
            return;
        }
        effects.push(SideEffect::Telemetry(TelemetryEvent::Cancelled { from: self.state }));
        self.reset();
        self.say(ChatMessage::assistant("Operação cancelada."), effects);
    }

    fn on_committed(&mut self, material_id: &str, effects: &mut Vec<SideEffect>) {
        if !self.committing {
            warn!("Commit result without a commit in flight");
            return;
        }
        let name = self
            .pending
            .as_ref()
            .and_then(|r| r.material_name.clone())
            .unwrap_or_else(|| UNNAMED_MATERIAL.to_string());
        info!(material_id, "Material created");

        effects.push(SideEffect::Telemetry(TelemetryEvent::CommitOutcome { success: true }));
        self.reset();
        self.say(ChatMessage::assistant(format!("Material {} adicionado com sucesso!", name)), effects);
    }

    fn on_commit_failed(&mut self, reason: &str, effects: &mut Vec<SideEffect>) {
        if !self.committing {
            warn!("Commit result without a commit in flight");
            return;
        }
        warn!(reason, "Material commit failed");
        self.committing = false;
        effects.push(SideEffect::Telemetry(TelemetryEvent::CommitOutcome { success: false }));
        self.say(
            ChatMessage::assistant("Não foi possível salvar o material. Tente confirmar novamente."),
            effects,
        );
    }

    /// Mark the current state's slot serviced, then ask the next question.
    fn advance(&mut self, ctx: &TurnContext<'_>, effects: &mut Vec<SideEffect>) {
        if let Some(slot) = self.state.serviced_slot() {
            self.serviced.insert(slot);
        }
        self.ask_next(ctx, effects);
    }

    fn skip(&mut self, slot: Slot, ctx: &TurnContext<'_>, effects: &mut Vec<SideEffect>) {
        debug!(?slot, "Slot skipped");
        effects.push(SideEffect::Telemetry(TelemetryEvent::SlotSkipped { slot }));
        self.serviced.insert(slot);
        self.ask_next(ctx, effects);
    }

    fn ask_next(&mut self, ctx: &TurnContext<'_>, effects: &mut Vec<SideEffect>) {
        let record = self.pending.get_or_insert_with(ParsedMaterialRequest::default);
        let question = select_next(record, ctx.catalog, &self.serviced);
        match question {
            Question::Ask { slot, prompt, options } => {
                self.state = ConversationState::collecting(slot);
                self.say(ChatMessage::assistant(prompt).with_options(options), effects);
            }
            Question::Confirm => {
                self.state = ConversationState::Confirming;
                let record = self.record().clone();
                self.say(
                    ChatMessage::assistant(confirmation_card(&record)).with_pending(record),
                    effects,
                );
            }
        }
    }

    /// Repeat the pending question with a note in front. State does not move.
    fn reprompt(&mut self, note: &str, ctx: &TurnContext<'_>, effects: &mut Vec<SideEffect>) {
        effects.push(SideEffect::Telemetry(TelemetryEvent::Reprompt {
            slot: self.state.serviced_slot(),
        }));
        let record = self.pending.get_or_insert_with(ParsedMaterialRequest::default);
        let message = match select_next(record, ctx.catalog, &self.serviced) {
            Question::Ask { prompt, options, .. } => {
                ChatMessage::assistant(format!("{} {}", note, prompt)).with_options(options)
            }
            Question::Confirm => ChatMessage::assistant(note),
        };
        self.say(message, effects);
    }

    fn summarize(&mut self, summary: ProjectSummary, scope: SummaryKind, effects: &mut Vec<SideEffect>) {
        effects.push(SideEffect::Telemetry(TelemetryEvent::SummaryEmitted { scope }));
        self.say(ChatMessage::assistant(summary.render()), effects);
    }

    fn say(&mut self, message: ChatMessage, effects: &mut Vec<SideEffect>) {
        self.transcript.push(message.clone());
        effects.push(SideEffect::Reply(message));
    }

    fn record(&mut self) -> &mut ParsedMaterialRequest {
        self.pending.get_or_insert_with(ParsedMaterialRequest::default)
    }

    fn reset(&mut self) {
        self.state = ConversationState::Idle;
        self.pending = None;
        self.serviced.clear();
        self.committing = false;
    }
}

fn project_options(catalog: &Catalog) -> Vec<ChatOption> {
    catalog
        .projects
        .iter()
        .map(|p| ChatOption::new(p.name.clone(), p.name.clone(), OptionKind::Project))
        .collect()
}

/// The part of a summary request that names the project: the words after
/// the last project keyword, or the non-keyword words when there is none.
fn project_query(lower: &str) -> String {
    let words: Vec<&str> = lower
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();

    match words.iter().rposition(|w| vocab::PROJECT_WORDS.contains(w)) {
        Some(idx) => words[idx + 1..].join(" "),
        None => words
            .into_iter()
            .filter(|w| !vocab::INFO_WORDS.contains(w) && !vocab::is_stop_word(w))
            .collect::<Vec<_>>()
            .join(" "),
    }
}

/// Free-text or chip date answer. `None` means skipped.
fn date_answer(text: &str, today: NaiveDate) -> Option<DeliveryDate> {
    let lower = text.trim().to_lowercase();
    if lower == TODAY_VALUE || mentions(&lower, vocab::TODAY_ANSWERS) {
        Some(DeliveryDate::On(today))
    } else if lower == TOMORROW_VALUE || mentions(&lower, vocab::TOMORROW_ANSWERS) {
        Some(DeliveryDate::On(today + Duration::days(1)))
    } else if mentions(&lower, vocab::SKIP_WORDS) {
        None
    } else if let Some(date) = day_month(&lower, today) {
        Some(DeliveryDate::On(date))
    } else {
        Some(DeliveryDate::Unparsed(text.trim().to_string()))
    }
}
