use thiserror::Error;

/// Failures of the outbound notification.
///
/// Every variant surfaces to the visitor as the same generic banner; the
/// variants only matter for diagnostics.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Dispatch provider credentials are not configured: missing {field}")]
    MissingCredentials { field: &'static str },
    #[error("Dispatch provider rejected the request: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("Dispatch provider timed out after {timeout_seconds}s")]
    Timeout { timeout_seconds: u64 },
    #[error("Network error talking to dispatch provider: {message}")]
    Transport { message: String },
}

impl DispatchError {
    /// Misconfiguration is reported like any other failure but logged distinctly
    pub fn is_misconfiguration(&self) -> bool {
        matches!(self, DispatchError::MissingCredentials { .. })
    }
}
