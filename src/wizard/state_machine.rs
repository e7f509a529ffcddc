use serde::{Deserialize, Serialize};
use statig::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::types::{
    ContactField, ContactFields, ErrorKey, FieldErrors, QuoteRequest, Status, Step, WizardSnapshot,
};
use super::validation::{validate_details, validate_services};
use crate::catalog::{ServiceCatalog, ServiceId};

/// Inputs accepted by the wizard reducer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardEvent {
    SetField { field: ContactField, value: String },
    ToggleService { id: ServiceId },
    Advance,
    Back,
    Submit,
    DispatchSucceeded,
    DispatchFailed { message: String },
    Reset,
}

/// Shared storage of the wizard. The current step and submission status live
/// in the generated `State` enum, so stale combinations such as a
/// submitting wizard that still shows a services error cannot be expressed.
#[derive(Debug, Clone)]
pub struct WizardMachine {
    catalog: Arc<ServiceCatalog>,
    fields: ContactFields,
    selected: BTreeSet<ServiceId>,
    errors: FieldErrors,
}

impl WizardMachine {
    pub fn new(catalog: Arc<ServiceCatalog>) -> Self {
        Self {
            catalog,
            fields: ContactFields::default(),
            selected: BTreeSet::new(),
            errors: FieldErrors::new(),
        }
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    pub fn selected_services(&self) -> &BTreeSet<ServiceId> {
        &self.selected
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    /// Contents to dispatch, captured when the wizard enters `Submitting`
    pub fn quote_request(&self) -> QuoteRequest {
        QuoteRequest {
            fields: self.fields.clone(),
            services: self.selected.clone(),
        }
    }
}

#[state_machine(
    initial = "State::details()",
    state(derive(Debug, Clone, PartialEq, Eq))
)]
impl WizardMachine {
    #[state]
    fn details(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::SetField { field, value } => {
                self.set_field(*field, value);
                Handled
            }
            WizardEvent::ToggleService { id } => {
                self.toggle_service(id);
                Handled
            }
            WizardEvent::Advance => {
                let errors = validate_details(&self.fields);
                if errors.is_empty() {
                    self.errors.retain(|key| !key.is_details_scoped());
                    tracing::info!("Contact details accepted, moving to service selection");
                    Transition(State::services())
                } else {
                    tracing::debug!(invalid = errors.len(), "Contact details rejected");
                    self.errors.extend(errors);
                    Handled
                }
            }
            WizardEvent::Reset => self.reset(),
            _ => {
                tracing::debug!(?event, "Event ignored on details step");
                Handled
            }
        }
    }

    #[state]
    fn services(&mut self, event: &WizardEvent) -> Outcome<State> {
        self.on_selection_event(event)
    }

    #[state]
    fn submitting(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::DispatchSucceeded => {
                tracing::info!(services = self.selected.len(), "Quote request delivered");
                Transition(State::success())
            }
            WizardEvent::DispatchFailed { message } => {
                tracing::warn!("Quote request failed, awaiting retry");
                Transition(State::failure(message.clone()))
            }
            WizardEvent::Reset => self.reset(),
            _ => {
                tracing::debug!(?event, "Event ignored while submission is in flight");
                Handled
            }
        }
    }

    #[state]
    fn success(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::Reset => self.reset(),
            _ => {
                tracing::debug!(?event, "Event ignored after successful submission");
                Handled
            }
        }
    }

    #[state]
    fn failure(&mut self, reason: &mut String, event: &WizardEvent) -> Outcome<State> {
        if matches!(event, WizardEvent::Submit) {
            tracing::info!(previous_failure = %reason, "Retrying quote request");
        }
        self.on_selection_event(event)
    }
}

impl WizardMachine {
    /// Handling shared by the idle and failed services step
    fn on_selection_event(&mut self, event: &WizardEvent) -> Outcome<State> {
        match event {
            WizardEvent::SetField { field, value } => {
                self.set_field(*field, value);
                Handled
            }
            WizardEvent::ToggleService { id } => {
                self.toggle_service(id);
                Handled
            }
            WizardEvent::Back => {
                self.errors.remove(ErrorKey::Services);
                Transition(State::details())
            }
            WizardEvent::Submit => {
                // Contact fields stay editable after advancing
                let detail_errors = validate_details(&self.fields);
                if !detail_errors.is_empty() {
                    tracing::debug!(
                        invalid = detail_errors.len(),
                        "Contact details no longer valid, returning to details step"
                    );
                    self.errors.extend(detail_errors);
                    return Transition(State::details());
                }

                let errors = validate_services(&self.selected);
                if errors.is_empty() {
                    self.errors.remove(ErrorKey::Services);
                    tracing::info!(services = self.selected.len(), "Submitting quote request");
                    Transition(State::submitting())
                } else {
                    self.errors.extend(errors);
                    Transition(State::services())
                }
            }
            WizardEvent::Reset => self.reset(),
            _ => {
                tracing::debug!(?event, "Event ignored on services step");
                Handled
            }
        }
    }

    fn set_field(&mut self, field: ContactField, value: &str) {
        self.fields.set(field, value.to_string());
        self.errors.remove(field.into());
    }

    fn toggle_service(&mut self, id: &ServiceId) {
        if !self.catalog.contains(id) {
            tracing::debug!(service = %id, "Ignoring toggle of unknown service");
            return;
        }

        let was_empty = self.selected.is_empty();
        if !self.selected.remove(id) {
            self.selected.insert(id.clone());
        }
        if was_empty && !self.selected.is_empty() {
            self.errors.remove(ErrorKey::Services);
        }
    }

    fn reset(&mut self) -> Outcome<State> {
        self.fields = ContactFields::default();
        self.selected.clear();
        self.errors = FieldErrors::new();
        Transition(State::details())
    }
}

impl State {
    pub fn step(&self) -> Step {
        match self {
            State::Details {} => Step::Details,
            _ => Step::Services,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            State::Details {} | State::Services {} => Status::Idle,
            State::Submitting {} => Status::Submitting,
            State::Success {} => Status::Success,
            State::Failure { .. } => Status::Failure,
        }
    }

    /// User-facing failure message, only present in the failed state
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            State::Failure { reason } => Some(reason.as_str()),
            _ => None,
        }
    }
}

/// Render a state machine into the snapshot shown by the presentation layer
pub fn snapshot(machine: &StateMachine<WizardMachine>) -> WizardSnapshot {
    let state = machine.state();
    let context = machine.inner();

    let mut errors = context.errors.clone();
    if let Some(reason) = state.failure_reason() {
        errors.insert(ErrorKey::Submit, reason);
    }

    WizardSnapshot {
        step: state.step(),
        status: state.status(),
        fields: context.fields.clone(),
        selected_services: context.selected.clone(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::validation::{NAME_REQUIRED, PHONE_REQUIRED, SERVICES_REQUIRED};

    fn machine() -> StateMachine<WizardMachine> {
        WizardMachine::new(Arc::new(ServiceCatalog::default())).state_machine()
    }

    fn fill(sm: &mut StateMachine<WizardMachine>, name: &str, phone: &str) {
        sm.handle(&WizardEvent::SetField {
            field: ContactField::Name,
            value: name.to_string(),
        });
        sm.handle(&WizardEvent::SetField {
            field: ContactField::Phone,
            value: phone.to_string(),
        });
    }

    fn toggle(sm: &mut StateMachine<WizardMachine>, id: &str) {
        sm.handle(&WizardEvent::ToggleService { id: id.into() });
    }

    #[test]
    fn test_starts_on_details_idle() {
        let sm = machine();
        let snap = snapshot(&sm);
        assert_eq!(snap.step, Step::Details);
        assert_eq!(snap.status, Status::Idle);
        assert!(snap.errors.is_empty());
        assert!(snap.selected_services.is_empty());
    }

    #[test]
    fn test_advance_blocked_without_name() {
        let mut sm = machine();
        fill(&mut sm, "", "9999999999");
        sm.handle(&WizardEvent::Advance);

        let snap = snapshot(&sm);
        assert_eq!(snap.step, Step::Details);
        assert_eq!(snap.errors.get(ErrorKey::Name), Some(NAME_REQUIRED));
        assert_eq!(snap.errors.len(), 1);
    }

    #[test]
    fn test_advance_with_valid_details() {
        let mut sm = machine();
        fill(&mut sm, "John", "9876543210");
        sm.handle(&WizardEvent::Advance);

        let snap = snapshot(&sm);
        assert_eq!(snap.step, Step::Services);
        assert!(snap.errors.is_empty());
    }

    #[test]
    fn test_editing_a_field_clears_only_its_error() {
        let mut sm = machine();
        sm.handle(&WizardEvent::Advance);
        assert_eq!(snapshot(&sm).errors.len(), 2);

        sm.handle(&WizardEvent::SetField {
            field: ContactField::Email,
            value: "john@example.com".to_string(),
        });
        assert_eq!(snapshot(&sm).errors.len(), 2);

        sm.handle(&WizardEvent::SetField {
            field: ContactField::Name,
            value: "J".to_string(),
        });
        let snap = snapshot(&sm);
        assert!(!snap.errors.contains(ErrorKey::Name));
        assert_eq!(snap.errors.get(ErrorKey::Phone), Some(PHONE_REQUIRED));
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let mut sm = machine();
        toggle(&mut sm, "seo");
        let before = snapshot(&sm).selected_services;

        toggle(&mut sm, "web-dev");
        toggle(&mut sm, "web-dev");
        assert_eq!(snapshot(&sm).selected_services, before);
    }

    #[test]
    fn test_unknown_service_is_ignored() {
        let mut sm = machine();
        toggle(&mut sm, "time-travel");
        assert!(snapshot(&sm).selected_services.is_empty());
    }

    #[test]
    fn test_submit_without_services_sets_error() {
        let mut sm = machine();
        fill(&mut sm, "John", "9876543210");
        sm.handle(&WizardEvent::Advance);
        sm.handle(&WizardEvent::Submit);

        let snap = snapshot(&sm);
        assert_eq!(snap.status, Status::Idle);
        assert_eq!(snap.step, Step::Services);
        assert_eq!(snap.errors.get(ErrorKey::Services), Some(SERVICES_REQUIRED));

        toggle(&mut sm, "web-dev");
        assert!(snapshot(&sm).errors.is_empty());
    }

    #[test]
    fn test_submit_revalidates_contact_details() {
        let mut sm = machine();
        fill(&mut sm, "John", "9876543210");
        sm.handle(&WizardEvent::Advance);
        toggle(&mut sm, "web-dev");
        fill(&mut sm, "   ", "");
        sm.handle(&WizardEvent::Submit);

        let snap = snapshot(&sm);
        assert_eq!(snap.step, Step::Details);
        assert_eq!(snap.status, Status::Idle);
        assert_eq!(snap.errors.get(ErrorKey::Name), Some(NAME_REQUIRED));
        assert_eq!(snap.errors.get(ErrorKey::Phone), Some(PHONE_REQUIRED));
        assert!(snap.selected_services.contains(&ServiceId::from("web-dev")));
    }

    #[test]
    fn test_back_clears_only_services_error() {
        let mut sm = machine();
        fill(&mut sm, "John", "9876543210");
        sm.handle(&WizardEvent::Advance);
        sm.handle(&WizardEvent::Submit);
        sm.handle(&WizardEvent::Back);

        let snap = snapshot(&sm);
        assert_eq!(snap.step, Step::Details);
        assert!(snap.errors.is_empty());
        assert_eq!(snap.fields.name, "John");
    }

    #[test]
    fn test_submit_on_details_step_is_ignored() {
        let mut sm = machine();
        toggle(&mut sm, "web-dev");
        sm.handle(&WizardEvent::Submit);
        assert_eq!(sm.state(), &State::details());
    }

    #[test]
    fn test_submission_lifecycle_and_retry() {
        let mut sm = machine();
        fill(&mut sm, "John", "9876543210");
        sm.handle(&WizardEvent::Advance);
        toggle(&mut sm, "web-dev");
        sm.handle(&WizardEvent::Submit);
        assert_eq!(snapshot(&sm).status, Status::Submitting);

        // controls are disabled while in flight
        sm.handle(&WizardEvent::Submit);
        toggle(&mut sm, "seo");
        sm.handle(&WizardEvent::Back);
        let snap = snapshot(&sm);
        assert_eq!(snap.status, Status::Submitting);
        assert_eq!(snap.selected_services.len(), 1);

        sm.handle(&WizardEvent::DispatchFailed {
            message: "Something went wrong".to_string(),
        });
        let snap = snapshot(&sm);
        assert_eq!(snap.status, Status::Failure);
        assert_eq!(snap.errors.get(ErrorKey::Submit), Some("Something went wrong"));
        assert!(snap.can_submit());

        sm.handle(&WizardEvent::Submit);
        let snap = snapshot(&sm);
        assert_eq!(snap.status, Status::Submitting);
        assert!(!snap.errors.contains(ErrorKey::Submit));

        sm.handle(&WizardEvent::DispatchSucceeded);
        assert_eq!(snapshot(&sm).status, Status::Success);
    }

    #[test]
    fn test_dispatch_results_ignored_outside_submitting() {
        let mut sm = machine();
        fill(&mut sm, "John", "9876543210");
        sm.handle(&WizardEvent::Advance);
        toggle(&mut sm, "web-dev");
        sm.handle(&WizardEvent::DispatchSucceeded);
        assert_eq!(snapshot(&sm).status, Status::Idle);
    }

    #[test]
    fn test_reset_returns_to_initial_state() {
        let mut sm = machine();
        fill(&mut sm, "John", "9876543210");
        sm.handle(&WizardEvent::Advance);
        toggle(&mut sm, "web-dev");
        sm.handle(&WizardEvent::Submit);
        sm.handle(&WizardEvent::DispatchSucceeded);
        sm.handle(&WizardEvent::Reset);

        let fresh = machine();
        assert_eq!(snapshot(&sm), snapshot(&fresh));
    }

    #[test]
    fn test_quote_request_captures_selection() {
        let mut sm = machine();
        fill(&mut sm, "John", "9876543210");
        toggle(&mut sm, "ui-ux");

        let request = sm.inner().quote_request();
        assert_eq!(request.fields.name, "John");
        assert!(request.services.contains(&ServiceId::from("ui-ux")));
    }
}
