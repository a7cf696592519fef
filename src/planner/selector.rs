use std::collections::BTreeSet;
use tracing::debug;

use super::types::{ChatOption, OptionKind, Question, Slot, SKIP_VALUE, TODAY_VALUE, TOMORROW_VALUE};
use crate::catalog::Catalog;
use crate::intent::vocab::UNIT_CHOICES;
use crate::intent::ParsedMaterialRequest;

/// Pick the next question for the pending record.
///
/// Rules are tried in a fixed order and the first applicable one wins. A
/// slot in `serviced` has already been asked in this dialogue and is never
/// asked again, even when the answer left it unset.
pub fn select_next(
    record: &ParsedMaterialRequest,
    catalog: &Catalog,
    serviced: &BTreeSet<Slot>,
) -> Question {
    let open = |slot: Slot| !serviced.contains(&slot);

    if record.project_name.is_none() && open(Slot::Project) && !catalog.projects.is_empty() {
        let options = catalog
            .projects
            .iter()
            .map(|p| ChatOption::new(p.name.clone(), p.name.clone(), OptionKind::Project))
            .collect();
        return ask(Slot::Project, project_prompt(record), options);
    }

    let project = record
        .project_name
        .as_deref()
        .and_then(|name| catalog.project_by_name(name));
    if let Some(project) = project {
        if record.stage_name.is_none() && open(Slot::Stage) {
            let options: Vec<ChatOption> = catalog
                .stages_for(&project.id)
                .into_iter()
                .map(|s| ChatOption::new(s.name.clone(), s.name.clone(), OptionKind::Stage))
                .collect();
            if !options.is_empty() {
                return ask(
                    Slot::Stage,
                    format!("Em qual etapa do projeto {}?", project.name),
                    options,
                );
            }
        }
    }

    if record.supplier_name.is_none() && open(Slot::Supplier) && !catalog.suppliers.is_empty() {
        let mut options: Vec<ChatOption> = catalog
            .suppliers
            .iter()
            .map(|s| ChatOption::new(s.name.clone(), s.name.clone(), OptionKind::Supplier))
            .collect();
        options.push(ChatOption::new("Pular", SKIP_VALUE, OptionKind::Supplier));
        return ask(Slot::Supplier, "Qual é o fornecedor?".to_string(), options);
    }

    if record.unit.is_none() && open(Slot::Unit) {
        let options = UNIT_CHOICES
            .iter()
            .map(|u| ChatOption::new(*u, *u, OptionKind::Unit))
            .collect();
        return ask(Slot::Unit, "Qual a unidade de medida?".to_string(), options);
    }

    if record.delivery_date.is_none() && open(Slot::Date) {
        let options = vec![
            ChatOption::new("Hoje", TODAY_VALUE, OptionKind::Date),
            ChatOption::new("Amanhã", TOMORROW_VALUE, OptionKind::Date),
            ChatOption::new("Pular", SKIP_VALUE, OptionKind::Date),
        ];
        return ask(Slot::Date, "Qual a data de entrega?".to_string(), options);
    }

    if record.estimated_total_cost.is_none() && open(Slot::Cost) {
        return ask(
            Slot::Cost,
            "Qual o custo total estimado? (digite o valor ou \"não sei\")".to_string(),
            Vec::new(),
        );
    }

    debug!("All fields settled, moving to confirmation");
    Question::Confirm
}

fn ask(slot: Slot, prompt: String, options: Vec<ChatOption>) -> Question {
    debug!(?slot, options = options.len(), "Asking for field");
    Question::Ask { slot, prompt, options }
}

fn project_prompt(record: &ParsedMaterialRequest) -> String {
    match &record.material_name {
        Some(name) => format!("Para qual projeto é o material {}?", name),
        None => "Para qual projeto é este material?".to_string(),
    }
}
