//! EmailJS provider against a local mock HTTP server
//!
//! wiremock stands in for the provider's REST endpoint so the transport
//! contract (acknowledgement, rejection, timeout) is checked end to end.

use quote_wizard::{
    DispatchCredentials, DispatchError, DispatchProvider, EmailJsProvider, QuotePayload,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEND_PATH: &str = "/api/v1.0/email/send";

fn credentials() -> DispatchCredentials {
    DispatchCredentials::new("service_test", "template_test", "public_test")
}

fn payload() -> QuotePayload {
    QuotePayload {
        from_name: "John".to_string(),
        from_email: "Not provided".to_string(),
        company: "Acme".to_string(),
        phone: "9876543210".to_string(),
        services: "Web Development, SEO Optimization".to_string(),
        message: "New quote request".to_string(),
    }
}

fn provider_for(server: &MockServer, timeout: Duration) -> EmailJsProvider {
    EmailJsProvider::new(&format!("{}{}", server.uri(), SEND_PATH), timeout)
        .expect("client builds")
}

#[tokio::test]
async fn success_status_is_an_acknowledgement() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "service_id": "service_test",
            "template_id": "template_test",
            "user_id": "public_test",
            "template_params": {
                "from_name": "John",
                "from_email": "Not provided",
                "company": "Acme",
                "phone": "9876543210",
                "services": "Web Development, SEO Optimization",
                "message": "New quote request"
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(5));
    provider
        .send(&credentials(), &payload())
        .await
        .expect("2xx is accepted");
}

#[tokio::test]
async fn error_status_becomes_rejection_with_body() {
    for (status, body) in [(400u16, "The user ID is invalid"), (500u16, "boom")] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server, Duration::from_secs(5));
        let err = provider.send(&credentials(), &payload()).await.unwrap_err();
        assert!(
            matches!(&err, DispatchError::Rejected { status: s, body: b } if *s == status && b == body),
            "unexpected error: {err:?}"
        );
        assert!(!err.is_misconfiguration());
    }
}

#[tokio::test]
async fn slow_response_becomes_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(SEND_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Duration::from_secs(1));
    let err = provider.send(&credentials(), &payload()).await.unwrap_err();
    assert!(
        matches!(err, DispatchError::Timeout { timeout_seconds: 1 }),
        "unexpected error: {err:?}"
    );
}
