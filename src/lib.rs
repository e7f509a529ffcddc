// Quote Wizard Library - "Request a Quote" lead capture
// This exposes the core components for hosts and integration tests

pub mod catalog;
pub mod config;
pub mod counter;
pub mod dispatch;
pub mod observability;
pub mod telemetry;
pub mod wizard;

// Re-export key types for easy access
pub use catalog::{ServiceCatalog, ServiceId, ServiceOption};
pub use self::config::{config, init_config, QuoteWizardConfig};
pub use counter::{CounterAnimation, CounterValue, Tween};
pub use dispatch::{
    DispatchCredentials, DispatchError, DispatchProvider, DispatchReceipt, EmailJsProvider,
    QuotePayload, SubmissionClient,
};
pub use observability::{OperationTimer, SubmissionMetrics};
pub use telemetry::{generate_correlation_id, init_telemetry};
pub use wizard::{
    ContactField, ErrorKey, QuoteModal, Status, Step, SubmitOutcome, WizardError, WizardSnapshot,
};
