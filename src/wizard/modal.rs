//! Host-facing quote modal
//!
//! Owns the single live wizard of a modal, runs the dispatch call as a tokio
//! task and arms the auto-close timer after success. Every activation has an
//! epoch; callbacks from an older epoch (a dispatch that resolves after the
//! modal was closed, a timer that raced a manual close) are discarded.

use statig::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

use super::scheduler::AutoCloseScheduler;
use super::state_machine::{snapshot, WizardEvent, WizardMachine};
use super::types::{ContactField, Status, Step, WizardSnapshot};
use crate::catalog::ServiceId;
use crate::dispatch::{DispatchError, DispatchReceipt, SubmissionClient};

/// Banner shown when delivery fails for any reason
pub const SUBMIT_FAILED_MESSAGE: &str =
    "Something went wrong while sending your request. Please try again.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("Quote wizard is not open")]
    NotOpen,
}

/// What a call to [`QuoteModal::submit`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation passed and one dispatch call was started
    Dispatched,
    /// Validation failed; the services error is set
    Rejected,
    /// The submit control is disabled in the current state
    Ignored,
}

struct Session {
    open: bool,
    epoch: u64,
    machine: StateMachine<WizardMachine>,
    scheduler: AutoCloseScheduler,
}

struct Shared {
    client: Arc<SubmissionClient>,
    auto_close_delay: Duration,
    on_close: Box<dyn Fn() + Send + Sync>,
    session: Mutex<Session>,
    updates: watch::Sender<WizardSnapshot>,
}

/// Cloneable handle to one modal instance
#[derive(Clone)]
pub struct QuoteModal {
    shared: Arc<Shared>,
}

impl QuoteModal {
    pub fn new<F>(client: Arc<SubmissionClient>, auto_close_delay: Duration, on_close: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let machine = fresh_machine(&client);
        let (updates, _) = watch::channel(snapshot(&machine));

        Self {
            shared: Arc::new(Shared {
                client,
                auto_close_delay,
                on_close: Box::new(on_close),
                session: Mutex::new(Session {
                    open: false,
                    epoch: 0,
                    machine,
                    scheduler: AutoCloseScheduler::new(),
                }),
                updates,
            }),
        }
    }

    /// Open the modal with a fresh wizard. Returns false if it was already open.
    pub fn open(&self) -> bool {
        let mut session = self.shared.lock();
        if session.open {
            return false;
        }

        session.epoch += 1;
        session.open = true;
        session.machine = fresh_machine(&self.shared.client);
        info!(epoch = session.epoch, "Quote wizard opened");
        self.shared.publish(&session);
        true
    }

    /// Close the modal, discarding the wizard and cancelling the auto-close
    /// timer. An in-flight dispatch keeps running but its result is dropped.
    pub fn close(&self) -> bool {
        let mut session = self.shared.lock();
        if !session.open {
            return false;
        }

        session.scheduler.cancel();
        self.shared.dispose(&mut session);
        drop(session);

        (self.shared.on_close)();
        true
    }

    pub fn is_open(&self) -> bool {
        self.shared.lock().open
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        snapshot(&self.shared.lock().machine)
    }

    /// Receive a snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<WizardSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn auto_close_pending(&self) -> bool {
        self.shared.lock().scheduler.is_pending()
    }

    pub fn set_field(&self, field: ContactField, value: impl Into<String>) -> Result<(), WizardError> {
        self.shared.apply(WizardEvent::SetField {
            field,
            value: value.into(),
        })?;
        Ok(())
    }

    pub fn toggle_service(&self, id: impl Into<ServiceId>) -> Result<(), WizardError> {
        self.shared.apply(WizardEvent::ToggleService { id: id.into() })?;
        Ok(())
    }

    /// Validate contact details and move to the services step when they pass
    pub fn advance(&self) -> Result<Step, WizardError> {
        Ok(self.shared.apply(WizardEvent::Advance)?.step)
    }

    pub fn back(&self) -> Result<Step, WizardError> {
        Ok(self.shared.apply(WizardEvent::Back)?.step)
    }

    /// Validate the selection and start exactly one dispatch call.
    ///
    /// Must be called from within a tokio runtime. Calls made while a
    /// dispatch is in flight are ignored, not queued.
    pub fn submit(&self) -> Result<SubmitOutcome, WizardError> {
        let mut session = self.shared.lock();
        if !session.open {
            return Err(WizardError::NotOpen);
        }

        let before = snapshot(&session.machine);
        if !before.can_submit() {
            debug!(step = ?before.step, status = ?before.status, "Submit ignored");
            return Ok(SubmitOutcome::Ignored);
        }

        session.machine.handle(&WizardEvent::Submit);
        if snapshot(&session.machine).status != Status::Submitting {
            self.shared.client.metrics().record_validation_rejection();
            self.shared.publish(&session);
            return Ok(SubmitOutcome::Rejected);
        }

        let request = session.machine.inner().quote_request();
        let epoch = session.epoch;
        self.shared.publish(&session);
        drop(session);

        let client = Arc::clone(&self.shared.client);
        let shared = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            let result = client.submit(&request).await;
            Shared::resolve(&shared, epoch, result);
        });

        Ok(SubmitOutcome::Dispatched)
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, session: &Session) {
        self.updates.send_replace(snapshot(&session.machine));
    }

    fn apply(&self, event: WizardEvent) -> Result<WizardSnapshot, WizardError> {
        let mut session = self.lock();
        if !session.open {
            return Err(WizardError::NotOpen);
        }

        session.machine.handle(&event);
        let current = snapshot(&session.machine);
        self.updates.send_replace(current.clone());
        Ok(current)
    }

    /// Reset the wizard and start a new epoch so pending callbacks become stale
    fn dispose(&self, session: &mut Session) {
        session.open = false;
        session.epoch += 1;
        session.machine.handle(&WizardEvent::Reset);
        info!(epoch = session.epoch, "Quote wizard closed");
        self.publish(session);
    }

    fn resolve(shared: &Weak<Shared>, epoch: u64, result: Result<DispatchReceipt, DispatchError>) {
        let Some(shared) = shared.upgrade() else {
            debug!("Dispatch resolved after modal was dropped");
            return;
        };

        let mut session = shared.lock();
        if session.epoch != epoch {
            shared.client.metrics().record_discarded_late();
            debug!(epoch, current = session.epoch, "Discarding late dispatch result");
            return;
        }

        match result {
            Ok(receipt) => {
                info!(submission_id = %receipt.submission_id, "Quote request succeeded");
                session.machine.handle(&WizardEvent::DispatchSucceeded);

                let timer_target = Arc::downgrade(&shared);
                session.scheduler.schedule(shared.auto_close_delay, move || {
                    Shared::auto_close(&timer_target, epoch);
                });
            }
            Err(_) => {
                // already logged with full detail by the submission client
                session.machine.handle(&WizardEvent::DispatchFailed {
                    message: SUBMIT_FAILED_MESSAGE.to_string(),
                });
            }
        }
        shared.publish(&session);
    }

    fn auto_close(shared: &Weak<Shared>, epoch: u64) {
        let Some(shared) = shared.upgrade() else {
            return;
        };

        let mut session = shared.lock();
        if session.epoch != epoch || !session.open {
            debug!(epoch, "Discarding stale auto-close");
            return;
        }

        session.scheduler.disarm();
        shared.dispose(&mut session);
        drop(session);

        info!("Quote wizard auto-closed after successful submission");
        (shared.on_close)();
    }
}

fn fresh_machine(client: &SubmissionClient) -> StateMachine<WizardMachine> {
    WizardMachine::new(Arc::clone(client.catalog())).state_machine()
}
