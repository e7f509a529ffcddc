use serde::{Deserialize, Serialize};

use crate::catalog::ServiceCatalog;
use crate::wizard::QuoteRequest;

/// Substituted for optional contact fields left blank
pub const NOT_PROVIDED: &str = "Not provided";

/// Template parameters sent to the dispatch provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePayload {
    pub from_name: String,
    pub from_email: String,
    pub company: String,
    pub phone: String,
    pub services: String,
    pub message: String,
}

impl QuotePayload {
    pub fn build(request: &QuoteRequest, catalog: &ServiceCatalog) -> Self {
        let fields = &request.fields;
        let from_name = fields.name.trim().to_string();
        let phone = fields.phone.trim().to_string();
        let from_email = or_not_provided(&fields.email);
        let company = or_not_provided(&fields.company);
        let services = catalog.names_for(&request.services).join(", ");

        let message = format!(
            "New quote request\n\n\
             Name: {from_name}\n\
             Email: {from_email}\n\
             Company: {company}\n\
             Phone: {phone}\n\
             Services: {services}"
        );

        Self {
            from_name,
            from_email,
            company,
            phone,
            services,
            message,
        }
    }
}

fn or_not_provided(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        trimmed.to_string()
    }
}
