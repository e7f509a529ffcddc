// Submission Client - outbound quote notifications
//
// Adapts wizard contents into a provider payload and performs exactly one
// provider call per submission.

pub mod client;
pub mod emailjs;
pub mod errors;
pub mod payload;
pub mod provider;

pub use client::{DispatchReceipt, SubmissionClient};
pub use emailjs::EmailJsProvider;
pub use errors::DispatchError;
pub use payload::{QuotePayload, NOT_PROVIDED};
pub use provider::{DispatchCredentials, DispatchProvider};
