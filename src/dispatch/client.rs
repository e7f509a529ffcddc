use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, Instrument};

use super::errors::DispatchError;
use super::payload::QuotePayload;
use super::provider::{DispatchCredentials, DispatchProvider};
use crate::catalog::ServiceCatalog;
use crate::observability::{OperationTimer, SubmissionMetrics};
use crate::telemetry::{create_submission_span, generate_correlation_id};
use crate::wizard::QuoteRequest;

/// Acknowledgement of a delivered quote request
#[derive(Debug, Clone)]
pub struct DispatchReceipt {
    pub submission_id: String,
    pub sent_at: DateTime<Utc>,
    pub payload: QuotePayload,
}

/// Turns validated wizard contents into exactly one provider call
pub struct SubmissionClient {
    provider: Arc<dyn DispatchProvider>,
    credentials: DispatchCredentials,
    catalog: Arc<ServiceCatalog>,
    metrics: Arc<SubmissionMetrics>,
}

impl SubmissionClient {
    pub fn new(
        provider: Arc<dyn DispatchProvider>,
        credentials: DispatchCredentials,
        catalog: Arc<ServiceCatalog>,
    ) -> Self {
        Self {
            provider,
            credentials,
            catalog,
            metrics: Arc::new(SubmissionMetrics::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<SubmissionMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn catalog(&self) -> &Arc<ServiceCatalog> {
        &self.catalog
    }

    pub fn metrics(&self) -> &Arc<SubmissionMetrics> {
        &self.metrics
    }

    pub fn build_payload(&self, request: &QuoteRequest) -> QuotePayload {
        QuotePayload::build(request, &self.catalog)
    }

    /// Deliver a quote request. No retries: one call to the provider at most.
    pub async fn submit(&self, request: &QuoteRequest) -> Result<DispatchReceipt, DispatchError> {
        let submission_id = generate_correlation_id();
        let span = create_submission_span(&submission_id, request.services.len());

        async {
            self.metrics.record_attempt();
            let payload = self.build_payload(request);

            let result = match self.credentials.validate() {
                Ok(()) => {
                    let timer = OperationTimer::new("dispatch_quote_request");
                    let sent = self.provider.send(&self.credentials, &payload).await;
                    timer.finish();
                    sent
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => {
                    self.metrics.record_success();
                    info!(services = %payload.services, "Quote notification acknowledged");
                    Ok(DispatchReceipt {
                        submission_id: submission_id.clone(),
                        sent_at: Utc::now(),
                        payload,
                    })
                }
                Err(e) => {
                    self.metrics.record_failure(e.is_misconfiguration());
                    if e.is_misconfiguration() {
                        error!(error = %e, "Quote dispatch is misconfigured");
                    } else {
                        error!(error = %e, "Quote dispatch failed");
                    }
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}
