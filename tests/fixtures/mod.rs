/// Test fixtures: a scripted dispatch provider and a ready-made modal
use async_trait::async_trait;
use quote_wizard::{
    ContactField, DispatchCredentials, DispatchError, DispatchProvider, QuoteModal, QuotePayload,
    ServiceCatalog, Step, SubmissionClient,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

pub const AUTO_CLOSE_DELAY: Duration = Duration::from_secs(3);

/// Provider that records calls, answers from a script and can be held
/// until the test releases it.
pub struct ScriptedProvider {
    calls: AtomicUsize,
    sent: Mutex<Vec<QuotePayload>>,
    outcomes: Mutex<VecDeque<bool>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedProvider {
    /// Every call succeeds immediately
    pub fn succeeding() -> Self {
        Self::scripted(&[])
    }

    /// Calls answer in order (`true` = acknowledged); once the script runs
    /// out every call succeeds
    pub fn scripted(outcomes: &[bool]) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            outcomes: Mutex::new(outcomes.iter().copied().collect()),
            gate: None,
        }
    }

    /// Calls wait for a permit on `gate` before answering
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<QuotePayload> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl DispatchProvider for ScriptedProvider {
    async fn send(
        &self,
        _credentials: &DispatchCredentials,
        payload: &QuotePayload,
    ) -> Result<(), DispatchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(payload.clone());

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let ok = self.outcomes.lock().unwrap().pop_front().unwrap_or(true);
        if ok {
            Ok(())
        } else {
            Err(DispatchError::Rejected {
                status: 503,
                body: "service unavailable".to_string(),
            })
        }
    }
}

pub struct Harness {
    pub modal: QuoteModal,
    pub client: Arc<SubmissionClient>,
    pub provider: Arc<ScriptedProvider>,
    pub closes: Arc<AtomicUsize>,
}

impl Harness {
    pub fn new(provider: ScriptedProvider) -> Self {
        let provider = Arc::new(provider);
        let client = Arc::new(SubmissionClient::new(
            Arc::clone(&provider) as Arc<dyn DispatchProvider>,
            DispatchCredentials::new("service_test", "template_test", "public_test"),
            Arc::new(ServiceCatalog::default()),
        ));
        let closes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&closes);
        let modal = QuoteModal::new(Arc::clone(&client), AUTO_CLOSE_DELAY, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        Self {
            modal,
            client,
            provider,
            closes,
        }
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Open the modal and get to the services step with valid details
    pub fn open_on_services(&self) {
        assert!(self.modal.open());
        self.modal.set_field(ContactField::Name, "John").unwrap();
        self.modal.set_field(ContactField::Phone, "9876543210").unwrap();
        assert_eq!(self.modal.advance().unwrap(), Step::Services);
    }
}
