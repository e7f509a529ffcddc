// Quote Wizard - two-step lead capture state machine
//
// Details (contact fields) -> Services (selection) -> dispatch, with an
// auto-close timer after a successful submission.

pub mod modal;
pub mod scheduler;
pub mod state_machine;
pub mod types;
pub mod validation;

pub use modal::{QuoteModal, SubmitOutcome, WizardError, SUBMIT_FAILED_MESSAGE};
pub use scheduler::AutoCloseScheduler;
pub use state_machine::{WizardEvent, WizardMachine};
pub use types::{
    ContactField, ContactFields, ErrorKey, FieldErrors, QuoteRequest, Status, Step, WizardSnapshot,
};
pub use validation::{validate_details, validate_services};
