use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use planitec::catalog::Catalog;
use planitec::config::{self, AssistantConfig, BackendConfig};
use planitec::kernel::event::{ChatMessage, DialogueEvent};
use planitec::outputs::realizer::render_message;
use planitec::planner::ChatOption;
use planitec::services::store::{InMemoryMaterialStore, MaterialStore, RestMaterialStore};
use planitec::Reactor;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install tracing subscriber")?;

    tracing::info!("PlaniTec assistant starting");
    let file_catalog = match config::catalog_file_from_env() {
        Some(path) => Some(config::load_catalog_file(path)?),
        None => None,
    };

    match BackendConfig::from_env()? {
        Some(backend) => {
            let store = RestMaterialStore::new(backend);
            let catalog = match file_catalog {
                Some(catalog) => catalog,
                None => store.load_catalog().await.context("Failed to load catalog from backend")?,
            };
            run(Reactor::new(catalog, Arc::new(store), AssistantConfig::default())).await
        }
        None => {
            tracing::warn!("No backend configured, materials are kept in memory");
            let catalog = file_catalog.unwrap_or_default();
            run(Reactor::new(catalog, Arc::new(InMemoryMaterialStore::new()), AssistantConfig::default())).await
        }
    }
}

async fn run<S: MaterialStore>(mut reactor: Reactor<S>) -> Result<()> {
    print_catalog_banner(reactor.catalog());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let Some(event) = to_event(&line, reactor.session.last_options()) else {
            println!("Opção inválida.");
            continue;
        };
        let closing = event == DialogueEvent::Closed;
        print_replies(&reactor.handle(event).await);
        if closing {
            break;
        }
    }
    if !reactor.session.transcript().is_empty() {
        reactor.handle(DialogueEvent::Closed).await;
    }

    let snapshot = reactor.telemetry.snapshot();
    tracing::info!(
        transitions = snapshot.dialogue_stats.transitions,
        reprompts = snapshot.reprompt_stats.total,
        commits = snapshot.commit_stats.succeeded,
        "Session closed"
    );
    Ok(())
}

/// `#N` clicks option N, slash commands map to dialogue controls, anything
/// else is typed text. `None` for an option number that does not exist.
fn to_event(line: &str, options: &[ChatOption]) -> Option<DialogueEvent> {
    let line = line.trim();
    if let Some(number) = line.strip_prefix('#') {
        let index = number.trim().parse::<usize>().ok()?.checked_sub(1)?;
        return options.get(index).cloned().map(DialogueEvent::OptionSelected);
    }
    Some(match line {
        "/confirmar" => DialogueEvent::Confirm,
        "/cancelar" => DialogueEvent::Cancel,
        "/fechar" => DialogueEvent::Closed,
        text => DialogueEvent::UserText(text.to_string()),
    })
}

fn print_replies(replies: &[ChatMessage]) {
    for reply in replies {
        println!("{}\n", render_message(reply));
    }
}

fn print_catalog_banner(catalog: &Catalog) {
    println!(
        "PlaniTec: {} projetos, {} fornecedores. Descreva o material (ex: \"10 sacos de cimento\").",
        catalog.projects.len(),
        catalog.suppliers.len()
    );
}
