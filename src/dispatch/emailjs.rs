// EmailJS-compatible REST provider

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::errors::DispatchError;
use super::payload::QuotePayload;
use super::provider::{DispatchCredentials, DispatchProvider};

pub const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a QuotePayload,
}

#[derive(Debug, Clone)]
pub struct EmailJsProvider {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl EmailJsProvider {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("quote-wizard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body<'a>(
        credentials: &'a DispatchCredentials,
        payload: &'a QuotePayload,
    ) -> SendRequest<'a> {
        SendRequest {
            service_id: &credentials.service_id,
            template_id: &credentials.template_id,
            user_id: &credentials.public_key,
            template_params: payload,
        }
    }

    fn classify(&self, err: reqwest::Error) -> DispatchError {
        if err.is_timeout() {
            DispatchError::Timeout {
                timeout_seconds: self.timeout.as_secs(),
            }
        } else {
            DispatchError::Transport {
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl DispatchProvider for EmailJsProvider {
    async fn send(
        &self,
        credentials: &DispatchCredentials,
        payload: &QuotePayload,
    ) -> Result<(), DispatchError> {
        debug!(endpoint = %self.endpoint, "Sending quote notification");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&Self::request_body(credentials, payload))
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DispatchError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
