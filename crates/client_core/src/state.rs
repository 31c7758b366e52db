//! Registry screen state and its synchronous transitions.
//!
//! Network work is split into `begin_*`/`finish_*` pairs: a `begin_*` call
//! flips the matching busy flag and hands back the request to issue, the
//! matching `finish_*` call applies whatever came back. The async controller
//! composes them; anything else (tests, alternative front-ends) can drive
//! them directly.

use shared::{
    domain::{CustomerField, CustomerId, FilterCriteria},
    protocol::{AddressFragment, Customer},
};

use crate::postal::{normalize_postal_input, PostalCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    Edit(CustomerId),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open(DraftMode),
    Saving(DraftMode),
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn mode(&self) -> Option<&DraftMode> {
        match self {
            Self::Closed => None,
            Self::Open(mode) | Self::Saving(mode) => Some(mode),
        }
    }
}

/// A complete CEP to resolve for the draft that was open when it was typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    pub code: PostalCode,
    pub draft_generation: u64,
}

/// Remote call produced by [`RegistryState::begin_save`].
#[derive(Debug, Clone, PartialEq)]
pub enum SaveRequest {
    Create(Customer),
    Update(CustomerId, Customer),
}

#[derive(Debug, Clone, Default)]
pub struct RegistryState {
    filters: FilterCriteria,
    customers: Vec<Customer>,
    fetches_in_flight: usize,
    started: bool,
    modal: ModalState,
    draft: Customer,
    /// Bumped whenever a draft is opened or discarded.
    draft_generation: u64,
}

impl RegistryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn customer(&self, id: &CustomerId) -> Option<&Customer> {
        self.customers
            .iter()
            .find(|customer| customer.id.as_ref().is_some_and(|own| own.refers_to(id)))
    }

    /// True while any fetch, user search or post-mutation refresh, is out.
    pub fn is_loading(&self) -> bool {
        self.fetches_in_flight > 0
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.modal, ModalState::Saving(_))
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn draft(&self) -> &Customer {
        &self.draft
    }

    pub fn draft_generation(&self) -> u64 {
        self.draft_generation
    }

    pub fn update_filter(&mut self, field: CustomerField, value: impl Into<String>) {
        self.filters.set(field, value);
    }

    /// Marks the one-off initial fetch as issued. Returns `false` after the
    /// first call.
    pub fn mark_started(&mut self) -> bool {
        !std::mem::replace(&mut self.started, true)
    }

    /// Starts a user-triggered search. `None` while a fetch is in flight.
    pub fn begin_search(&mut self) -> Option<FilterCriteria> {
        if self.is_loading() {
            return None;
        }
        Some(self.begin_refresh())
    }

    /// Starts a fetch regardless of the busy flag; used after mutations.
    pub fn begin_refresh(&mut self) -> FilterCriteria {
        self.fetches_in_flight += 1;
        self.filters.clone()
    }

    /// Applies a completed fetch. A failed fetch empties the list. The list
    /// shows whichever overlapping fetch completed last.
    pub fn finish_search(&mut self, result: Option<Vec<Customer>>) {
        self.fetches_in_flight = self.fetches_in_flight.saturating_sub(1);
        self.customers = result.unwrap_or_default();
    }

    /// `None` opens an empty draft, `Some` edits a copy of the record.
    pub fn open(&mut self, record: Option<&Customer>) {
        self.draft_generation += 1;
        match record {
            Some(record) => {
                self.draft = record.clone();
                self.modal = ModalState::Open(match &record.id {
                    Some(id) => DraftMode::Edit(id.clone()),
                    None => DraftMode::Create,
                });
            }
            None => {
                self.draft = Customer::default();
                self.modal = ModalState::Open(DraftMode::Create);
            }
        }
    }

    pub fn close(&mut self) {
        self.draft_generation += 1;
        self.modal = ModalState::Closed;
        self.draft = Customer::default();
    }

    /// Returns `false` when no draft is active.
    pub fn update_field(&mut self, field: CustomerField, value: impl Into<String>) -> bool {
        if !self.modal.is_open() {
            return false;
        }
        self.draft.set(field, value);
        true
    }

    /// Stores the normalized CEP and yields the lookup to run when it is
    /// complete.
    pub fn set_postal_code(&mut self, raw: &str) -> Option<PendingLookup> {
        let digits = normalize_postal_input(raw);
        if !self.update_field(CustomerField::PostalCode, digits.as_str()) {
            return None;
        }
        PostalCode::parse(&digits).map(|code| PendingLookup {
            code,
            draft_generation: self.draft_generation,
        })
    }

    /// Merges a resolved address into the draft it was requested for.
    /// Dropped when that draft was closed or replaced in the meantime.
    pub fn apply_address(&mut self, draft_generation: u64, address: &AddressFragment) -> bool {
        if !self.modal.is_open() || draft_generation != self.draft_generation {
            return false;
        }
        self.draft.apply_address(address);
        true
    }

    /// Moves the modal into `Saving`. `None` when closed or already saving.
    pub fn begin_save(&mut self) -> Option<SaveRequest> {
        let ModalState::Open(mode) = &self.modal else {
            return None;
        };
        let mode = mode.clone();
        let request = match self.draft.id.clone() {
            Some(id) => SaveRequest::Update(id, self.draft.clone()),
            None => SaveRequest::Create(self.draft.clone()),
        };
        self.modal = ModalState::Saving(mode);
        Some(request)
    }

    /// Success closes the modal and drops the draft; failure reopens it with
    /// the draft intact.
    pub fn finish_save(&mut self, succeeded: bool) {
        let ModalState::Saving(mode) = &self.modal else {
            return;
        };
        if succeeded {
            self.close();
        } else {
            self.modal = ModalState::Open(mode.clone());
        }
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
