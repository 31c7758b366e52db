//! Registry events as shown to the terminal user.

use client_core::{Notification, RegistryEvent};
use shared::protocol::AddressFragment;
use tokio::{sync::broadcast, task::JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Unreachable,
    Rejected,
    Malformed,
    Unknown,
}

pub fn classify_failure(detail: &str) -> FailureCategory {
    let lower = detail.to_ascii_lowercase();
    if lower.contains("request failed")
        || lower.contains("error sending request")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        FailureCategory::Unreachable
    } else if lower.contains(" returned ") {
        FailureCategory::Rejected
    } else if lower.contains("payload") || lower.contains("decod") {
        FailureCategory::Malformed
    } else {
        FailureCategory::Unknown
    }
}

fn failure_hint(category: FailureCategory) -> Option<&'static str> {
    match category {
        FailureCategory::Unreachable => Some("servidor indisponível; verifique a URL e a rede"),
        FailureCategory::Rejected => Some("o servidor recusou a requisição"),
        FailureCategory::Malformed => Some("resposta inesperada do servidor"),
        FailureCategory::Unknown => None,
    }
}

pub fn describe_notification(notification: &Notification) -> String {
    let hint = notification
        .detail
        .as_deref()
        .map(classify_failure)
        .and_then(failure_hint);
    match hint {
        Some(hint) => format!("[!] {} ({hint})", notification.message),
        None => format!("[!] {}", notification.message),
    }
}

fn describe_address(address: &AddressFragment) -> String {
    format!(
        "Endereço preenchido pelo CEP: {}, {}, {}/{}",
        address.street, address.neighborhood, address.city, address.state
    )
}

/// Line printed for an event, if the user should see it at all.
pub fn describe_event(event: &RegistryEvent) -> Option<String> {
    match event {
        RegistryEvent::Notification(notification) => Some(describe_notification(notification)),
        RegistryEvent::AddressResolved(address) => Some(describe_address(address)),
        RegistryEvent::Deleted(id) => Some(format!("Cliente {id} excluído.")),
        RegistryEvent::Saved(_) | RegistryEvent::CustomersLoaded { .. } => None,
    }
}

/// Prints events as they arrive, including those from background lookups.
pub fn spawn_event_printer(mut events: broadcast::Receiver<RegistryEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(line) = describe_event(&event) {
                        println!("{line}");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event printer lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
#[path = "../tests/events_tests.rs"]
mod tests;
