use std::{path::PathBuf, sync::Arc};

mod config;
mod controller;
mod session;
mod ui;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    AssumeYes, Confirmation, DeleteOutcome, HttpCustomerGateway, RegistryController,
    RegistryEvent, SearchOutcome, ViaCepClient,
};
use shared::domain::{CustomerId, FilterCriteria};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{load_settings, CliOverrides, Settings},
    controller::events::describe_event,
    session::{StdinConfirmation, TerminalInput},
    ui::render::render_table,
};

#[derive(Parser, Debug)]
#[command(name = "cadastro", about = "Cadastro de clientes")]
struct Args {
    /// Config file; defaults to ./cadastro.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Base URL of the customer registry API.
    #[arg(long)]
    api_url: Option<String>,
    /// Base URL of the CEP lookup service.
    #[arg(long)]
    cep_url: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (default).
    Interativo,
    /// Prints the customers matching the given filters and exits.
    Listar {
        #[arg(long = "filtro", value_name = "CAMPO=VALOR")]
        filtros: Vec<String>,
    },
    /// Deletes one customer and exits.
    Excluir {
        id: String,
        /// Skips the confirmation prompt.
        #[arg(long)]
        sim: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_controller(
    settings: &Settings,
    confirmation: Arc<dyn Confirmation>,
) -> Result<Arc<RegistryController>> {
    let timeout = settings.request_timeout();
    let gateway = HttpCustomerGateway::new(&settings.api_base_url, timeout)
        .context("failed to build registry client")?;
    let lookup = ViaCepClient::new(&settings.postal_lookup_base_url, timeout)
        .context("failed to build CEP lookup client")?;
    Ok(RegistryController::new(
        Arc::new(gateway),
        Arc::new(lookup),
        confirmation,
    ))
}

/// Prints whatever the controller broadcast during a one-shot command.
fn print_pending_events(events: &mut broadcast::Receiver<RegistryEvent>) {
    while let Ok(event) = events.try_recv() {
        if let Some(line) = describe_event(&event) {
            eprintln!("{line}");
        }
    }
}

async fn list_once(settings: &Settings, raw_filters: &[String]) -> Result<()> {
    let mut filters = FilterCriteria::new();
    for raw in raw_filters {
        let (field, value) = FilterCriteria::parse_pair(raw)?;
        filters.set(field, value);
    }

    let controller = build_controller(settings, Arc::new(AssumeYes))?;
    let mut events = controller.subscribe_events();
    for (field, value) in filters.iter() {
        controller.update_filter(field, value).await;
    }

    let outcome = controller.search().await;
    print_pending_events(&mut events);
    match outcome {
        SearchOutcome::Loaded(_) => {
            println!("{}", render_table(controller.snapshot().await.customers()));
            Ok(())
        }
        SearchOutcome::Failed | SearchOutcome::Busy => bail!("listing customers failed"),
    }
}

async fn delete_once(settings: &Settings, raw_id: &str, confirmed: bool) -> Result<()> {
    let confirmation: Arc<dyn Confirmation> = if confirmed {
        Arc::new(AssumeYes)
    } else {
        Arc::new(StdinConfirmation::new(TerminalInput::new()))
    };
    let controller = build_controller(settings, confirmation)?;
    let mut events = controller.subscribe_events();
    let id: CustomerId = raw_id.parse().unwrap_or_else(|never| match never {});

    let outcome = controller.delete(&id).await;
    print_pending_events(&mut events);
    match outcome {
        DeleteOutcome::Deleted => Ok(()),
        DeleteOutcome::Cancelled => {
            println!("Exclusão cancelada.");
            Ok(())
        }
        DeleteOutcome::Failed => bail!("deleting customer {id} failed"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let settings = load_settings(&CliOverrides {
        config: args.config.clone(),
        api_url: args.api_url.clone(),
        cep_url: args.cep_url.clone(),
    })?;
    tracing::debug!(?settings, "loaded settings");

    match args.command.unwrap_or(Command::Interativo) {
        Command::Interativo => {
            let input = TerminalInput::new();
            let confirmation = Arc::new(StdinConfirmation::new(Arc::clone(&input)));
            let controller = build_controller(&settings, confirmation)?;
            session::run(controller, input).await
        }
        Command::Listar { filtros } => list_once(&settings, &filtros).await,
        Command::Excluir { id, sim } => delete_once(&settings, &id, sim).await,
    }
}
