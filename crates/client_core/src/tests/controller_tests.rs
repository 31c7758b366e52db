use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex as StdMutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::{broadcast::error::TryRecvError, Notify};

use super::*;
use crate::{
    error::{GatewayError, LookupError},
    postal::PostalCode,
    state::{DraftMode, ModalState},
};

/// Parks a fake call until the test releases it.
#[derive(Default)]
struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    List(FilterCriteria),
    Create(Customer),
    Update(CustomerId, Customer),
    Delete(CustomerId),
}

#[derive(Default)]
struct FakeGateway {
    listed: Mutex<Vec<Customer>>,
    calls: Mutex<Vec<Call>>,
    fail_list: AtomicBool,
    fail_save: AtomicBool,
    fail_delete: AtomicBool,
    list_gate: Option<Arc<Gate>>,
    save_gate: Option<Arc<Gate>>,
}

impl FakeGateway {
    fn with_customers(customers: Vec<Customer>) -> Self {
        Self {
            listed: Mutex::new(customers),
            ..Self::default()
        }
    }

    async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }
}

fn server_error(path: &str) -> GatewayError {
    GatewayError::Status {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        url: format!("http://registry.test{path}"),
    }
}

#[async_trait]
impl CustomerGateway for FakeGateway {
    async fn list(&self, filters: &FilterCriteria) -> Result<Vec<Customer>, GatewayError> {
        self.calls.lock().await.push(Call::List(filters.clone()));
        if let Some(gate) = &self.list_gate {
            gate.pass().await;
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(server_error("/clientes"));
        }
        Ok(self.listed.lock().await.clone())
    }

    async fn create(&self, customer: &Customer) -> Result<Customer, GatewayError> {
        self.calls.lock().await.push(Call::Create(customer.clone()));
        if let Some(gate) = &self.save_gate {
            gate.pass().await;
        }
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(server_error("/clientes"));
        }
        let mut created = customer.clone();
        created.id = Some(CustomerId::Number(100));
        Ok(created)
    }

    async fn update(
        &self,
        id: &CustomerId,
        customer: &Customer,
    ) -> Result<Customer, GatewayError> {
        self.calls
            .lock()
            .await
            .push(Call::Update(id.clone(), customer.clone()));
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(server_error("/clientes/id"));
        }
        Ok(customer.clone())
    }

    async fn delete(&self, id: &CustomerId) -> Result<(), GatewayError> {
        self.calls.lock().await.push(Call::Delete(id.clone()));
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(server_error("/clientes/id"));
        }
        Ok(())
    }
}

#[derive(Default)]
struct FakeLookup {
    known: HashMap<String, AddressFragment>,
    failing: bool,
    calls: Mutex<Vec<String>>,
    gate: Option<Arc<Gate>>,
}

impl FakeLookup {
    fn knowing(code: &str, address: AddressFragment) -> Self {
        Self {
            known: HashMap::from([(code.to_string(), address)]),
            ..Self::default()
        }
    }
}

#[async_trait]
impl PostalCodeLookup for FakeLookup {
    async fn lookup(&self, code: &PostalCode) -> Result<LookupOutcome, LookupError> {
        self.calls.lock().await.push(code.to_string());
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        if self.failing {
            return Err(LookupError::Status {
                status: StatusCode::BAD_GATEWAY,
                url: format!("http://cep.test/{code}/json/"),
            });
        }
        Ok(match self.known.get(code.as_str()) {
            Some(address) => LookupOutcome::Found(address.clone()),
            None => LookupOutcome::NotFound,
        })
    }
}

struct ScriptedConfirmation {
    answer: bool,
    prompts: StdMutex<Vec<String>>,
}

impl ScriptedConfirmation {
    fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: StdMutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Confirmation for ScriptedConfirmation {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts
            .lock()
            .expect("prompts lock")
            .push(prompt.to_string());
        self.answer
    }
}

fn se_address() -> AddressFragment {
    AddressFragment {
        street: "Praça da Sé".into(),
        neighborhood: "Sé".into(),
        city: "São Paulo".into(),
        state: "SP".into(),
    }
}

fn customer(id: i64, name: &str) -> Customer {
    Customer {
        id: Some(CustomerId::Number(id)),
        code: Some(format!("{id:03}")),
        name: Some(name.to_string()),
        ..Customer::default()
    }
}

fn controller_with(
    gateway: Arc<FakeGateway>,
    lookup: Arc<FakeLookup>,
    confirmation: Arc<ScriptedConfirmation>,
) -> Arc<RegistryController> {
    RegistryController::new(gateway, lookup, confirmation)
}

fn controller(gateway: Arc<FakeGateway>) -> Arc<RegistryController> {
    controller_with(
        gateway,
        Arc::new(FakeLookup::default()),
        Arc::new(ScriptedConfirmation::answering(true)),
    )
}

fn drain_notifications(rx: &mut broadcast::Receiver<RegistryEvent>) -> Vec<NotificationKind> {
    let mut kinds = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(RegistryEvent::Notification(notification)) => kinds.push(notification.kind),
            Ok(_) => {}
            Err(TryRecvError::Empty | TryRecvError::Closed) => return kinds,
            Err(TryRecvError::Lagged(_)) => {}
        }
    }
}

#[tokio::test]
async fn start_fetches_unfiltered_exactly_once() {
    let gateway = Arc::new(FakeGateway::with_customers(vec![customer(1, "Ana")]));
    let controller = controller(Arc::clone(&gateway));

    assert_eq!(controller.start().await, Some(SearchOutcome::Loaded(1)));
    assert_eq!(controller.start().await, None);

    assert_eq!(gateway.calls().await, vec![Call::List(FilterCriteria::new())]);
    assert_eq!(controller.snapshot().await.customers().len(), 1);
}

#[tokio::test]
async fn search_sends_filter_state_at_call_time() {
    let gateway = Arc::new(FakeGateway::default());
    let controller = controller(Arc::clone(&gateway));

    controller.update_filter(CustomerField::Name, "Ana").await;
    controller.update_filter(CustomerField::City, "Recife").await;
    controller.update_filter(CustomerField::Code, "7").await;
    controller.update_filter(CustomerField::Code, "").await;
    assert!(gateway.calls().await.is_empty());

    controller.search().await;

    let expected = FilterCriteria::new()
        .with(CustomerField::Name, "Ana")
        .with(CustomerField::City, "Recife");
    assert_eq!(gateway.calls().await, vec![Call::List(expected.clone())]);
    assert_eq!(controller.snapshot().await.filters(), &expected);
}

#[tokio::test]
async fn search_while_loading_is_rejected() {
    let gate = Arc::new(Gate::default());
    let gateway = Arc::new(FakeGateway {
        list_gate: Some(Arc::clone(&gate)),
        ..FakeGateway::with_customers(vec![customer(1, "Ana")])
    });
    let controller = controller(Arc::clone(&gateway));

    let pending = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.search().await }
    });
    gate.entered.notified().await;

    assert!(controller.snapshot().await.is_loading());
    assert_eq!(controller.search().await, SearchOutcome::Busy);

    gate.release.notify_one();
    assert_eq!(pending.await.expect("join"), SearchOutcome::Loaded(1));
    assert!(!controller.snapshot().await.is_loading());
    assert_eq!(gateway.calls().await.len(), 1);
}

#[tokio::test]
async fn failed_search_empties_list_and_notifies() {
    let gateway = Arc::new(FakeGateway::with_customers(vec![
        customer(1, "Ana"),
        customer(2, "Bia"),
    ]));
    let controller = controller(Arc::clone(&gateway));
    let mut events = controller.subscribe_events();
    controller.search().await;

    gateway.fail_list.store(true, Ordering::SeqCst);
    assert_eq!(controller.search().await, SearchOutcome::Failed);

    let state = controller.snapshot().await;
    assert!(state.customers().is_empty());
    assert!(!state.is_loading());
    assert_eq!(
        drain_notifications(&mut events),
        vec![NotificationKind::ListFailed]
    );
    assert_eq!(gateway.calls().await.len(), 2);
}

#[tokio::test]
async fn incomplete_postal_code_is_stored_without_lookup() {
    let lookup = Arc::new(FakeLookup::default());
    let controller = controller_with(
        Arc::new(FakeGateway::default()),
        Arc::clone(&lookup),
        Arc::new(ScriptedConfirmation::answering(true)),
    );
    controller.open(None).await;

    assert_eq!(
        controller.update_postal_code("0100-10").await,
        PostalCodeOutcome::Stored
    );
    assert_eq!(
        controller.update_postal_code("010010001").await,
        PostalCodeOutcome::Stored
    );

    assert!(lookup.calls.lock().await.is_empty());
    assert_eq!(
        controller
            .snapshot()
            .await
            .draft()
            .text(CustomerField::PostalCode),
        "010010001"
    );
}

#[tokio::test]
async fn complete_postal_code_fills_address_over_user_values() {
    let lookup = Arc::new(FakeLookup::knowing("01001000", se_address()));
    let controller = controller_with(
        Arc::new(FakeGateway::default()),
        Arc::clone(&lookup),
        Arc::new(ScriptedConfirmation::answering(true)),
    );
    controller.open(None).await;
    controller
        .update_field(CustomerField::Street, "Rua Antiga")
        .await;
    controller.update_field(CustomerField::State, "RJ").await;

    let outcome = controller.update_postal_code("01001-000").await;

    assert_eq!(outcome, PostalCodeOutcome::Resolved(se_address()));
    assert_eq!(lookup.calls.lock().await.as_slice(), ["01001000"]);
    let state = controller.snapshot().await;
    let draft = state.draft();
    assert_eq!(draft.text(CustomerField::PostalCode), "01001000");
    assert_eq!(draft.text(CustomerField::Street), "Praça da Sé");
    assert_eq!(draft.text(CustomerField::Neighborhood), "Sé");
    assert_eq!(draft.text(CustomerField::City), "São Paulo");
    assert_eq!(draft.text(CustomerField::State), "SP");
}

#[tokio::test]
async fn unknown_postal_code_leaves_draft_and_notifies() {
    let controller = controller_with(
        Arc::new(FakeGateway::default()),
        Arc::new(FakeLookup::default()),
        Arc::new(ScriptedConfirmation::answering(true)),
    );
    let mut events = controller.subscribe_events();
    controller.open(None).await;
    controller.update_field(CustomerField::City, "Olinda").await;
    let before = controller.snapshot().await.draft().clone();

    assert_eq!(
        controller.update_postal_code("99999999").await,
        PostalCodeOutcome::NotFound
    );

    let mut expected = before;
    expected.set(CustomerField::PostalCode, "99999999");
    assert_eq!(controller.snapshot().await.draft(), &expected);
    assert_eq!(
        drain_notifications(&mut events),
        vec![NotificationKind::PostalCodeNotFound]
    );
}

#[tokio::test]
async fn lookup_failure_leaves_draft_and_notifies() {
    let controller = controller_with(
        Arc::new(FakeGateway::default()),
        Arc::new(FakeLookup {
            failing: true,
            ..FakeLookup::default()
        }),
        Arc::new(ScriptedConfirmation::answering(true)),
    );
    let mut events = controller.subscribe_events();
    controller.open(None).await;
    controller.update_field(CustomerField::Street, "Rua A").await;

    assert_eq!(
        controller.update_postal_code("01001000").await,
        PostalCodeOutcome::Failed
    );

    let state = controller.snapshot().await;
    assert_eq!(state.draft().text(CustomerField::Street), "Rua A");
    assert_eq!(
        drain_notifications(&mut events),
        vec![NotificationKind::PostalLookupFailed]
    );
}

#[tokio::test]
async fn postal_code_without_open_modal_is_ignored() {
    let lookup = Arc::new(FakeLookup::knowing("01001000", se_address()));
    let controller = controller_with(
        Arc::new(FakeGateway::default()),
        Arc::clone(&lookup),
        Arc::new(ScriptedConfirmation::answering(true)),
    );

    assert_eq!(
        controller.update_postal_code("01001000").await,
        PostalCodeOutcome::Ignored
    );
    assert!(lookup.calls.lock().await.is_empty());
}

#[tokio::test]
async fn lookup_resolving_after_close_does_not_leak_into_next_draft() {
    let gate = Arc::new(Gate::default());
    let lookup = Arc::new(FakeLookup {
        gate: Some(Arc::clone(&gate)),
        ..FakeLookup::knowing("01001000", se_address())
    });
    let controller = controller_with(
        Arc::new(FakeGateway::default()),
        lookup,
        Arc::new(ScriptedConfirmation::answering(true)),
    );
    controller.open(None).await;

    let pending = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.update_postal_code("01001000").await }
    });
    gate.entered.notified().await;
    controller.close().await;
    gate.release.notify_one();

    assert_eq!(pending.await.expect("join"), PostalCodeOutcome::Discarded);
    controller.open(None).await;
    assert_eq!(controller.snapshot().await.draft(), &Customer::default());
}

#[tokio::test]
async fn lookup_for_edited_record_skips_add_draft_opened_meanwhile() {
    let gate = Arc::new(Gate::default());
    let lookup = Arc::new(FakeLookup {
        gate: Some(Arc::clone(&gate)),
        ..FakeLookup::knowing("01001000", se_address())
    });
    let controller = controller_with(
        Arc::new(FakeGateway::default()),
        lookup,
        Arc::new(ScriptedConfirmation::answering(true)),
    );
    let mut events = controller.subscribe_events();
    controller.open(Some(&customer(4, "Duda"))).await;

    let pending = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.update_postal_code("01001000").await }
    });
    gate.entered.notified().await;
    controller.close().await;
    controller.open(None).await;
    gate.release.notify_one();

    assert_eq!(pending.await.expect("join"), PostalCodeOutcome::Discarded);
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.modal(), &ModalState::Open(DraftMode::Create));
    assert_eq!(snapshot.draft(), &Customer::default());
    while let Ok(event) = events.try_recv() {
        assert!(!matches!(event, RegistryEvent::AddressResolved(_)));
    }
}

#[tokio::test]
async fn unknown_code_for_replaced_draft_is_not_reported() {
    let gate = Arc::new(Gate::default());
    let lookup = Arc::new(FakeLookup {
        gate: Some(Arc::clone(&gate)),
        ..FakeLookup::default()
    });
    let controller = controller_with(
        Arc::new(FakeGateway::default()),
        lookup,
        Arc::new(ScriptedConfirmation::answering(true)),
    );
    let mut events = controller.subscribe_events();
    controller.open(None).await;

    let pending = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.update_postal_code("99999999").await }
    });
    gate.entered.notified().await;
    controller.close().await;
    controller.open(None).await;
    gate.release.notify_one();

    assert_eq!(pending.await.expect("join"), PostalCodeOutcome::Discarded);
    assert!(drain_notifications(&mut events).is_empty());
}

#[tokio::test]
async fn save_without_identifier_creates_then_refetches_with_current_filter() {
    let gateway = Arc::new(FakeGateway::default());
    let controller = controller(Arc::clone(&gateway));
    let mut events = controller.subscribe_events();
    controller.update_filter(CustomerField::City, "Recife").await;
    controller.open(None).await;
    controller.update_field(CustomerField::Name, "Nova").await;

    let outcome = controller.save().await;

    let expected_draft = Customer {
        name: Some("Nova".into()),
        ..Customer::default()
    };
    let mut created = expected_draft.clone();
    created.id = Some(CustomerId::Number(100));
    assert_eq!(outcome, SaveOutcome::Created(created));
    assert_eq!(
        gateway.calls().await,
        vec![
            Call::Create(expected_draft),
            Call::List(FilterCriteria::new().with(CustomerField::City, "Recife")),
        ]
    );
    let state = controller.snapshot().await;
    assert_eq!(state.modal(), &ModalState::Closed);
    assert_eq!(state.draft(), &Customer::default());
    assert!(drain_notifications(&mut events).is_empty());
}

#[tokio::test]
async fn save_with_identifier_updates_that_record() {
    let original = customer(8, "Heitor");
    let gateway = Arc::new(FakeGateway::with_customers(vec![original.clone()]));
    let controller = controller(Arc::clone(&gateway));
    controller.search().await;

    assert!(controller.open_existing(&CustomerId::Number(8)).await);
    controller
        .update_field(CustomerField::Phone, "81 98888-7777")
        .await;
    let outcome = controller.save().await;

    let mut edited = original;
    edited.set(CustomerField::Phone, "81 98888-7777");
    assert_eq!(outcome, SaveOutcome::Updated(edited.clone()));
    let calls = gateway.calls().await;
    assert_eq!(
        &calls[1..],
        &[
            Call::Update(CustomerId::Number(8), edited),
            Call::List(FilterCriteria::new()),
        ]
    );
    assert_eq!(controller.snapshot().await.modal(), &ModalState::Closed);
}

#[tokio::test]
async fn failed_save_keeps_modal_open_with_draft() {
    let gateway = Arc::new(FakeGateway::default());
    gateway.fail_save.store(true, Ordering::SeqCst);
    let controller = controller(Arc::clone(&gateway));
    let mut events = controller.subscribe_events();
    controller.open(None).await;
    controller.update_field(CustomerField::Name, "Íris").await;

    assert_eq!(controller.save().await, SaveOutcome::Failed);

    let state = controller.snapshot().await;
    assert_eq!(state.modal(), &ModalState::Open(DraftMode::Create));
    assert_eq!(state.draft().text(CustomerField::Name), "Íris");
    assert_eq!(gateway.calls().await.len(), 1);
    assert_eq!(
        drain_notifications(&mut events),
        vec![NotificationKind::SaveFailed]
    );
}

#[tokio::test]
async fn save_in_flight_blocks_resubmission() {
    let gate = Arc::new(Gate::default());
    let gateway = Arc::new(FakeGateway {
        save_gate: Some(Arc::clone(&gate)),
        ..FakeGateway::default()
    });
    let controller = controller(Arc::clone(&gateway));
    controller.open(None).await;

    let pending = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.save().await }
    });
    gate.entered.notified().await;

    assert!(controller.snapshot().await.is_saving());
    assert_eq!(controller.save().await, SaveOutcome::Skipped);

    gate.release.notify_one();
    assert!(matches!(
        pending.await.expect("join"),
        SaveOutcome::Created(_)
    ));
}

#[tokio::test]
async fn save_with_closed_modal_is_skipped() {
    let gateway = Arc::new(FakeGateway::default());
    let controller = controller(Arc::clone(&gateway));

    assert_eq!(controller.save().await, SaveOutcome::Skipped);
    assert!(gateway.calls().await.is_empty());
}

#[tokio::test]
async fn declined_confirmation_skips_delete() {
    let gateway = Arc::new(FakeGateway::default());
    let confirmation = Arc::new(ScriptedConfirmation::answering(false));
    let controller = controller_with(
        Arc::clone(&gateway),
        Arc::new(FakeLookup::default()),
        Arc::clone(&confirmation),
    );

    assert_eq!(
        controller.delete(&CustomerId::Number(1)).await,
        DeleteOutcome::Cancelled
    );

    assert!(gateway.calls().await.is_empty());
    assert_eq!(
        confirmation.prompts.lock().expect("prompts lock").as_slice(),
        [DELETE_CONFIRMATION_PROMPT]
    );
}

#[tokio::test]
async fn confirmed_delete_refetches() {
    let gateway = Arc::new(FakeGateway::with_customers(vec![customer(1, "Ana")]));
    let controller = controller(Arc::clone(&gateway));

    assert_eq!(
        controller.delete(&CustomerId::Number(1)).await,
        DeleteOutcome::Deleted
    );

    assert_eq!(
        gateway.calls().await,
        vec![
            Call::Delete(CustomerId::Number(1)),
            Call::List(FilterCriteria::new()),
        ]
    );
}

#[tokio::test]
async fn failed_delete_leaves_list_untouched() {
    let gateway = Arc::new(FakeGateway::with_customers(vec![
        customer(1, "Ana"),
        customer(2, "Bia"),
    ]));
    let controller = controller(Arc::clone(&gateway));
    let mut events = controller.subscribe_events();
    controller.search().await;
    let before = controller.snapshot().await.customers().to_vec();

    gateway.fail_delete.store(true, Ordering::SeqCst);
    assert_eq!(
        controller.delete(&CustomerId::Number(2)).await,
        DeleteOutcome::Failed
    );

    assert_eq!(controller.snapshot().await.customers(), before.as_slice());
    assert_eq!(
        drain_notifications(&mut events),
        vec![NotificationKind::DeleteFailed]
    );
    assert_eq!(gateway.calls().await.len(), 2);
}

#[tokio::test]
async fn loading_holds_while_search_and_refresh_overlap() {
    let gate = Arc::new(Gate::default());
    let gateway = Arc::new(FakeGateway {
        list_gate: Some(Arc::clone(&gate)),
        ..FakeGateway::with_customers(vec![customer(1, "Ana"), customer(2, "Bia")])
    });
    let controller = controller(Arc::clone(&gateway));

    let search = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.search().await }
    });
    gate.entered.notified().await;
    let delete = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.delete(&CustomerId::Number(2)).await }
    });
    gate.entered.notified().await;

    gate.release.notify_one();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !search.is_finished() && !delete.is_finished() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("one fetch returns");

    assert!(controller.snapshot().await.is_loading());
    assert_eq!(controller.search().await, SearchOutcome::Busy);

    gate.release.notify_one();
    assert!(matches!(
        search.await.expect("join"),
        SearchOutcome::Loaded(_)
    ));
    assert_eq!(delete.await.expect("join"), DeleteOutcome::Deleted);
    assert!(!controller.snapshot().await.is_loading());
}

#[tokio::test]
async fn typed_id_reaches_record_listed_with_text_id() {
    let listed = Customer {
        id: Some(CustomerId::Text("1".into())),
        name: Some("Ana".into()),
        ..Customer::default()
    };
    let gateway = Arc::new(FakeGateway::with_customers(vec![listed]));
    let controller = controller(Arc::clone(&gateway));
    controller.search().await;

    let typed: CustomerId = "1".parse().expect("infallible");
    assert!(controller.open_existing(&typed).await);
    assert_eq!(
        controller.snapshot().await.modal(),
        &ModalState::Open(DraftMode::Edit(CustomerId::Text("1".into())))
    );
}

#[tokio::test]
async fn delete_uses_listed_id_or_typed_text_verbatim() {
    let gateway = Arc::new(FakeGateway::with_customers(vec![customer(1, "Ana")]));
    let controller = controller(Arc::clone(&gateway));
    controller.search().await;

    let typed: CustomerId = "1".parse().expect("infallible");
    assert_eq!(controller.delete(&typed).await, DeleteOutcome::Deleted);
    let padded: CustomerId = "007".parse().expect("infallible");
    assert_eq!(controller.delete(&padded).await, DeleteOutcome::Deleted);

    let deletes: Vec<Call> = gateway
        .calls()
        .await
        .into_iter()
        .filter(|call| matches!(call, Call::Delete(_)))
        .collect();
    assert_eq!(
        deletes,
        vec![
            Call::Delete(CustomerId::Number(1)),
            Call::Delete(CustomerId::Text("007".into())),
        ]
    );
}

#[tokio::test]
async fn open_existing_requires_a_listed_record() {
    let controller = controller(Arc::new(FakeGateway::default()));
    assert!(!controller.open_existing(&CustomerId::Number(3)).await);
    assert_eq!(controller.snapshot().await.modal(), &ModalState::Closed);
}
