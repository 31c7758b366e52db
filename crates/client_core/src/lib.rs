//! Client core for the customer registry: API adapters plus the screen state
//! machine that the front-ends drive.

pub mod controller;
pub mod error;
pub mod gateway;
pub mod postal;
pub mod state;

pub use controller::{
    AssumeYes, Confirmation, DeleteOutcome, Notification, NotificationKind, PostalCodeOutcome,
    RegistryController, RegistryEvent, SaveOutcome, SearchOutcome, DELETE_CONFIRMATION_PROMPT,
};
pub use error::{GatewayError, LookupError};
pub use gateway::{CustomerGateway, HttpCustomerGateway};
pub use postal::{
    normalize_postal_input, LookupOutcome, PostalCode, PostalCodeLookup, ViaCepClient,
};
pub use state::{DraftMode, ModalState, PendingLookup, RegistryState, SaveRequest};
