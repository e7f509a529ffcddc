/// Required-field checks for each wizard step
///
/// Both validators are pure: the same input always produces the same error map.
use std::collections::BTreeSet;

use super::types::{ContactFields, ErrorKey, FieldErrors};
use crate::catalog::ServiceId;

pub const NAME_REQUIRED: &str = "Name is required";
pub const PHONE_REQUIRED: &str = "Phone number is required";
pub const SERVICES_REQUIRED: &str = "Please select at least one service";

/// Validate the details step. Email and company are optional and never checked.
pub fn validate_details(fields: &ContactFields) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if fields.name.trim().is_empty() {
        errors.insert(ErrorKey::Name, NAME_REQUIRED);
    }
    if fields.phone.trim().is_empty() {
        errors.insert(ErrorKey::Phone, PHONE_REQUIRED);
    }

    errors
}

/// Validate the services step
pub fn validate_services(selected: &BTreeSet<ServiceId>) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if selected.is_empty() {
        errors.insert(ErrorKey::Services, SERVICES_REQUIRED);
    }

    errors
}
