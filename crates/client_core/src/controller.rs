use std::sync::Arc;

use shared::{
    domain::{CustomerField, CustomerId, FilterCriteria},
    protocol::{AddressFragment, Customer},
};
use async_trait::async_trait;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::{
    gateway::CustomerGateway,
    postal::{LookupOutcome, PostalCodeLookup},
    state::{PendingLookup, RegistryState, SaveRequest},
};

pub const DELETE_CONFIRMATION_PROMPT: &str = "Tem certeza que deseja excluir este cliente?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    ListFailed,
    SaveFailed,
    DeleteFailed,
    PostalCodeNotFound,
    PostalLookupFailed,
}

impl NotificationKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::ListFailed => "Erro ao buscar clientes.",
            Self::SaveFailed => "Erro ao salvar/atualizar cliente.",
            Self::DeleteFailed => "Erro ao excluir cliente.",
            Self::PostalCodeNotFound => "CEP não encontrado.",
            Self::PostalLookupFailed => "Erro ao buscar CEP. Verifique o CEP digitado.",
        }
    }
}

/// A failure the user has to acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub detail: Option<String>,
}

impl Notification {
    pub fn new(kind: NotificationKind, detail: Option<String>) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
            detail,
        }
    }
}

#[derive(Debug, Clone)]
pub enum RegistryEvent {
    CustomersLoaded { count: usize },
    Saved(Customer),
    Deleted(CustomerId),
    AddressResolved(AddressFragment),
    Notification(Notification),
}

/// Explicit user confirmation guarding destructive calls.
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms every prompt; used for non-interactive invocations that were
/// already confirmed on the command line.
pub struct AssumeYes;

#[async_trait]
impl Confirmation for AssumeYes {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Loaded(usize),
    Failed,
    /// A fetch was already in flight; nothing was sent.
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(Customer),
    Updated(Customer),
    Failed,
    /// The modal was closed or a save was already in flight.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeOutcome {
    /// Stored without a lookup: fewer or more than eight digits.
    Stored,
    Resolved(AddressFragment),
    NotFound,
    Failed,
    /// The modal closed before the lookup completed.
    Discarded,
    /// No draft is active.
    Ignored,
}

pub struct RegistryController {
    gateway: Arc<dyn CustomerGateway>,
    lookup: Arc<dyn PostalCodeLookup>,
    confirmation: Arc<dyn Confirmation>,
    inner: Mutex<RegistryState>,
    events: broadcast::Sender<RegistryEvent>,
}

impl RegistryController {
    pub fn new(
        gateway: Arc<dyn CustomerGateway>,
        lookup: Arc<dyn PostalCodeLookup>,
        confirmation: Arc<dyn Confirmation>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            gateway,
            lookup,
            confirmation,
            inner: Mutex::new(RegistryState::new()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> RegistryState {
        self.inner.lock().await.clone()
    }

    /// Unfiltered fetch issued once per controller. `None` on later calls.
    pub async fn start(&self) -> Option<SearchOutcome> {
        let first = self.inner.lock().await.mark_started();
        if !first {
            return None;
        }
        Some(self.search().await)
    }

    pub async fn update_filter(&self, field: CustomerField, value: impl Into<String>) {
        self.inner.lock().await.update_filter(field, value);
    }

    pub async fn search(&self) -> SearchOutcome {
        let Some(filters) = self.inner.lock().await.begin_search() else {
            return SearchOutcome::Busy;
        };
        self.fetch(filters).await
    }

    async fn refresh(&self) -> SearchOutcome {
        let filters = self.inner.lock().await.begin_refresh();
        self.fetch(filters).await
    }

    async fn fetch(&self, filters: FilterCriteria) -> SearchOutcome {
        let result = self.gateway.list(&filters).await;
        let mut guard = self.inner.lock().await;
        match result {
            Ok(customers) => {
                let count = customers.len();
                guard.finish_search(Some(customers));
                drop(guard);
                let _ = self.events.send(RegistryEvent::CustomersLoaded { count });
                SearchOutcome::Loaded(count)
            }
            Err(err) => {
                guard.finish_search(None);
                drop(guard);
                error!(error = %err, "failed to fetch customers");
                self.notify(NotificationKind::ListFailed, Some(err.to_string()));
                SearchOutcome::Failed
            }
        }
    }

    pub async fn open(&self, record: Option<&Customer>) {
        self.inner.lock().await.open(record);
    }

    /// Opens the modal on a record from the displayed list.
    pub async fn open_existing(&self, id: &CustomerId) -> bool {
        let mut guard = self.inner.lock().await;
        let Some(record) = guard.customer(id).cloned() else {
            return false;
        };
        guard.open(Some(&record));
        true
    }

    pub async fn close(&self) {
        self.inner.lock().await.close();
    }

    pub async fn update_field(&self, field: CustomerField, value: impl Into<String>) -> bool {
        self.inner.lock().await.update_field(field, value)
    }

    /// Stores the normalized CEP and, for a complete code, merges the
    /// resolved address into the draft.
    pub async fn update_postal_code(&self, raw: &str) -> PostalCodeOutcome {
        let pending = {
            let mut guard = self.inner.lock().await;
            if !guard.modal().is_open() {
                return PostalCodeOutcome::Ignored;
            }
            guard.set_postal_code(raw)
        };
        let Some(PendingLookup {
            code,
            draft_generation,
        }) = pending
        else {
            return PostalCodeOutcome::Stored;
        };

        match self.lookup.lookup(&code).await {
            Ok(LookupOutcome::Found(address)) => {
                if !self
                    .inner
                    .lock()
                    .await
                    .apply_address(draft_generation, &address)
                {
                    debug!(cep = %code, "dropping address for a draft that is gone");
                    return PostalCodeOutcome::Discarded;
                }
                let _ = self
                    .events
                    .send(RegistryEvent::AddressResolved(address.clone()));
                PostalCodeOutcome::Resolved(address)
            }
            Ok(LookupOutcome::NotFound) => {
                warn!(cep = %code, "postal code not found");
                if !self.draft_is_current(draft_generation).await {
                    return PostalCodeOutcome::Discarded;
                }
                self.notify(NotificationKind::PostalCodeNotFound, None);
                PostalCodeOutcome::NotFound
            }
            Err(err) => {
                error!(cep = %code, error = %err, "postal code lookup failed");
                if !self.draft_is_current(draft_generation).await {
                    return PostalCodeOutcome::Discarded;
                }
                self.notify(NotificationKind::PostalLookupFailed, Some(err.to_string()));
                PostalCodeOutcome::Failed
            }
        }
    }

    async fn draft_is_current(&self, draft_generation: u64) -> bool {
        let guard = self.inner.lock().await;
        guard.modal().is_open() && guard.draft_generation() == draft_generation
    }

    /// Creates or updates the draft, then refetches with the current filter.
    pub async fn save(&self) -> SaveOutcome {
        let Some(request) = self.inner.lock().await.begin_save() else {
            return SaveOutcome::Skipped;
        };

        let result = match &request {
            SaveRequest::Create(customer) => self
                .gateway
                .create(customer)
                .await
                .map(SaveOutcome::Created),
            SaveRequest::Update(id, customer) => self
                .gateway
                .update(id, customer)
                .await
                .map(SaveOutcome::Updated),
        };

        match result {
            Ok(outcome) => {
                self.inner.lock().await.finish_save(true);
                if let SaveOutcome::Created(customer) | SaveOutcome::Updated(customer) = &outcome {
                    info!(id = ?customer.id, "customer saved");
                    let _ = self.events.send(RegistryEvent::Saved(customer.clone()));
                }
                self.refresh().await;
                outcome
            }
            Err(err) => {
                self.inner.lock().await.finish_save(false);
                error!(error = %err, "failed to save customer");
                self.notify(NotificationKind::SaveFailed, Some(err.to_string()));
                SaveOutcome::Failed
            }
        }
    }

    /// Deletes after explicit confirmation. A failure leaves the displayed
    /// list untouched.
    pub async fn delete(&self, id: &CustomerId) -> DeleteOutcome {
        if !self.confirmation.confirm(DELETE_CONFIRMATION_PROMPT).await {
            return DeleteOutcome::Cancelled;
        }

        // A listed record is addressed by the id the API gave it; anything
        // else goes out exactly as typed.
        let listed = self
            .inner
            .lock()
            .await
            .customer(id)
            .and_then(|record| record.id.clone());
        let id = listed.as_ref().unwrap_or(id);

        match self.gateway.delete(id).await {
            Ok(()) => {
                info!(%id, "customer deleted");
                let _ = self.events.send(RegistryEvent::Deleted(id.clone()));
                self.refresh().await;
                DeleteOutcome::Deleted
            }
            Err(err) => {
                error!(%id, error = %err, "failed to delete customer");
                self.notify(NotificationKind::DeleteFailed, Some(err.to_string()));
                DeleteOutcome::Failed
            }
        }
    }

    fn notify(&self, kind: NotificationKind, detail: Option<String>) {
        let _ = self
            .events
            .send(RegistryEvent::Notification(Notification::new(kind, detail)));
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
