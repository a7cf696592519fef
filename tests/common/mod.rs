#![allow(dead_code)]

use chrono::NaiveDate;
use planitec::catalog::{Catalog, MaterialRecord, Project, Stage, Supplier};
use planitec::intent::MaterialStatus;
use planitec::kernel::event::{ChatMessage, DialogueEvent, SideEffect};
use planitec::kernel::state::{Session, TurnContext};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

pub fn catalog() -> Catalog {
    Catalog {
        projects: vec![
            Project { id: "p1".into(), name: "Casa Silva".into() },
            Project { id: "p2".into(), name: "Galpão Norte".into() },
        ],
        stages: vec![
            Stage { id: "s1".into(), name: "Fundação".into(), project_id: "p1".into() },
            Stage { id: "s2".into(), name: "Alvenaria".into(), project_id: "p1".into() },
            Stage { id: "s3".into(), name: "Cobertura".into(), project_id: "p2".into() },
        ],
        suppliers: vec![
            Supplier { id: "f1".into(), name: "Depósito Central".into() },
            Supplier { id: "f2".into(), name: "Madeireira Sul".into() },
        ],
        materials: vec![
            MaterialRecord {
                id: "m1".into(),
                name: "Areia".into(),
                project_id: Some("p1".into()),
                estimated_total_cost: Some(1200.0),
                status: Some(MaterialStatus::Delivered),
            },
            MaterialRecord {
                id: "m2".into(),
                name: "Telha".into(),
                project_id: Some("p2".into()),
                estimated_total_cost: Some(800.0),
                status: Some(MaterialStatus::Requested),
            },
        ],
    }
}

/// Feed typed text and return the assistant replies.
pub fn say(session: &mut Session, catalog: &Catalog, text: &str) -> Vec<ChatMessage> {
    send(session, catalog, DialogueEvent::UserText(text.to_string()))
}

pub fn send(session: &mut Session, catalog: &Catalog, event: DialogueEvent) -> Vec<ChatMessage> {
    let ctx = TurnContext::new(catalog, today());
    session
        .reduce(event, &ctx)
        .into_iter()
        .filter_map(|effect| match effect {
            SideEffect::Reply(message) => Some(message),
            _ => None,
        })
        .collect()
}
