//! Command orchestration from session input to the registry controller.

use std::sync::Arc;

use client_core::{DeleteOutcome, RegistryController, SaveOutcome, SearchOutcome};
use shared::domain::CustomerField;

use crate::controller::commands::{UiCommand, HELP_TEXT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading; redraw the screen when `redraw` is set.
    Continue { redraw: bool },
    Quit,
}

const REDRAW: Flow = Flow::Continue { redraw: true };
const STAY: Flow = Flow::Continue { redraw: false };

pub async fn dispatch_command(
    controller: &Arc<RegistryController>,
    cmd: UiCommand,
    status: &mut String,
) -> Flow {
    tracing::debug!(command = cmd.name(), "dispatching session command");

    match cmd {
        UiCommand::Filter { field, value } => {
            controller.update_filter(field, value).await;
            REDRAW
        }
        UiCommand::Search => match controller.search().await {
            SearchOutcome::Busy => {
                *status = "Busca já em andamento.".to_string();
                STAY
            }
            SearchOutcome::Loaded(_) | SearchOutcome::Failed => REDRAW,
        },
        UiCommand::New => {
            controller.open(None).await;
            REDRAW
        }
        UiCommand::Edit { id } => {
            if controller.open_existing(&id).await {
                REDRAW
            } else {
                *status = format!("Cliente {id} não está na lista.");
                STAY
            }
        }
        UiCommand::Delete { id } => match controller.delete(&id).await {
            DeleteOutcome::Deleted => REDRAW,
            DeleteOutcome::Cancelled => {
                *status = "Exclusão cancelada.".to_string();
                STAY
            }
            DeleteOutcome::Failed => STAY,
        },
        UiCommand::Field { field, value } => {
            if controller.update_field(field, value).await {
                REDRAW
            } else {
                *status = no_form_open();
                STAY
            }
        }
        UiCommand::PostalCode { raw } => {
            if !controller.snapshot().await.modal().is_open() {
                *status = no_form_open();
                return STAY;
            }
            // The lookup runs in the background so the prompt stays usable;
            // its outcome reaches the user through the event printer.
            let controller = Arc::clone(controller);
            tokio::spawn(async move {
                let outcome = controller.update_postal_code(&raw).await;
                tracing::debug!(?outcome, "postal code update finished");
            });
            *status = format!("{} atualizado.", CustomerField::PostalCode.label());
            STAY
        }
        UiCommand::Save => match controller.save().await {
            SaveOutcome::Created(_) | SaveOutcome::Updated(_) => {
                *status = "Cliente salvo.".to_string();
                REDRAW
            }
            SaveOutcome::Failed => REDRAW,
            SaveOutcome::Skipped => {
                *status = "Nenhum formulário pronto para salvar.".to_string();
                STAY
            }
        },
        UiCommand::Cancel => {
            controller.close().await;
            REDRAW
        }
        UiCommand::Show => REDRAW,
        UiCommand::Help => {
            *status = HELP_TEXT.to_string();
            STAY
        }
        UiCommand::Quit => Flow::Quit,
    }
}

fn no_form_open() -> String {
    "Nenhum formulário aberto; use 'novo' ou 'editar <id>'.".to_string()
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
