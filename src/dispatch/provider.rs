//! Dispatch provider abstraction
//!
//! The provider is the external system that delivers the composed quote
//! notification. The wizard only cares whether a send was acknowledged.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::automock;

use super::errors::DispatchError;
use super::payload::QuotePayload;

/// Fixed provider configuration supplied at startup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchCredentials {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl DispatchCredentials {
    pub fn new(service_id: &str, template_id: &str, public_key: &str) -> Self {
        Self {
            service_id: service_id.to_string(),
            template_id: template_id.to_string(),
            public_key: public_key.to_string(),
        }
    }

    /// Check that every credential is present
    pub fn validate(&self) -> Result<(), DispatchError> {
        let checks = [
            ("service_id", &self.service_id),
            ("template_id", &self.template_id),
            ("public_key", &self.public_key),
        ];
        for (field, value) in checks {
            if value.trim().is_empty() {
                return Err(DispatchError::MissingCredentials { field });
            }
        }
        Ok(())
    }
}

/// Trait for delivering quote notifications
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DispatchProvider: Send + Sync {
    /// Send one notification. Implementations must not retry internally.
    async fn send(
        &self,
        credentials: &DispatchCredentials,
        payload: &QuotePayload,
    ) -> Result<(), DispatchError>;
}
