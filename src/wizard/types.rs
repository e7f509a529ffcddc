use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::catalog::ServiceId;

/// Page of the wizard currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Details,
    Services,
}

/// Submission status overlaying the services step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Idle,
    Submitting,
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Company,
    Phone,
}

impl ContactField {
    pub const ALL: [ContactField; 4] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Company,
        ContactField::Phone,
    ];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
}

impl ContactFields {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Company => &self.company,
            ContactField::Phone => &self.phone,
        }
    }

    pub fn set(&mut self, field: ContactField, value: String) {
        match field {
            ContactField::Name => self.name = value,
            ContactField::Email => self.email = value,
            ContactField::Company => self.company = value,
            ContactField::Phone => self.phone = value,
        }
    }
}

/// Key of an inline error: one per contact field plus the synthetic
/// `services` and `submit` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKey {
    Name,
    Email,
    Company,
    Phone,
    Services,
    Submit,
}

impl ErrorKey {
    /// Keys owned by the details step
    pub fn is_details_scoped(self) -> bool {
        matches!(
            self,
            ErrorKey::Name | ErrorKey::Email | ErrorKey::Company | ErrorKey::Phone
        )
    }
}

impl From<ContactField> for ErrorKey {
    fn from(field: ContactField) -> Self {
        match field {
            ContactField::Name => ErrorKey::Name,
            ContactField::Email => ErrorKey::Email,
            ContactField::Company => ErrorKey::Company,
            ContactField::Phone => ErrorKey::Phone,
        }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            ErrorKey::Name => "name",
            ErrorKey::Email => "email",
            ErrorKey::Company => "company",
            ErrorKey::Phone => "phone",
            ErrorKey::Services => "services",
            ErrorKey::Submit => "submit",
        };
        f.write_str(key)
    }
}

/// Error messages keyed by field; a missing key means "no error".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<ErrorKey, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: ErrorKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: ErrorKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn insert(&mut self, key: ErrorKey, message: impl Into<String>) {
        self.0.insert(key, message.into());
    }

    pub fn remove(&mut self, key: ErrorKey) -> Option<String> {
        self.0.remove(&key)
    }

    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn retain(&mut self, mut keep: impl FnMut(ErrorKey) -> bool) {
        self.0.retain(|key, _| keep(*key));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorKey, &str)> {
        self.0.iter().map(|(key, message)| (*key, message.as_str()))
    }
}

/// Point-in-time view of a wizard, handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardSnapshot {
    pub step: Step,
    pub status: Status,
    pub fields: ContactFields,
    pub selected_services: BTreeSet<ServiceId>,
    pub errors: FieldErrors,
}

impl WizardSnapshot {
    /// The submit control is disabled while a dispatch is in flight or after success
    pub fn can_submit(&self) -> bool {
        self.step == Step::Services && matches!(self.status, Status::Idle | Status::Failure)
    }
}

/// Validated wizard contents captured at the moment of submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub fields: ContactFields,
    pub services: BTreeSet<ServiceId>,
}
