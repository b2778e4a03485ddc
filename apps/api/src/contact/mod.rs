//! Contact form submissions. Validated server-side regardless of what the
//! client checked; delivery is a structured log line.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;

pub mod handlers;

/// Raw body of `POST /api/contact`. Every field is optional here so a missing
/// field becomes a 400 with a readable message instead of a decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

fn present(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl ContactRequest {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(key, _)| key)
        .collect()
    }

    pub fn validate(&self) -> Result<ContactMessage, AppError> {
        match (
            present(&self.name),
            present(&self.email),
            present(&self.subject),
            present(&self.message),
        ) {
            (Some(name), Some(email), Some(subject), Some(message)) => Ok(ContactMessage {
                name,
                email,
                subject,
                message,
            }),
            _ => Err(AppError::Validation(format!(
                "All fields are required (missing: {})",
                self.missing_fields().join(", ")
            ))),
        }
    }
}

/// Hands a validated submission off. Currently only logged.
pub fn deliver(message: &ContactMessage) {
    info!(
        name = %message.name,
        email = %message.email,
        subject = %message.subject,
        message_len = message.message.len(),
        "Contact form submission"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, subject: &str, message: &str) -> ContactRequest {
        ContactRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            subject: Some(subject.to_string()),
            message: Some(message.to_string()),
        }
    }

    #[test]
    fn test_all_fields_present_validates() {
        let msg = request("A", "a@example.com", "s", "m").validate().unwrap();
        assert_eq!(msg.name, "A");
        assert_eq!(msg.message, "m");
    }

    #[test]
    fn test_empty_email_is_rejected() {
        let req = request("A", "", "s", "m");
        assert_eq!(req.missing_fields(), vec!["email"]);
        match req.validate() {
            Err(AppError::Validation(msg)) => assert!(msg.contains("email"), "{msg}"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let req = request("   ", "a@example.com", "\t", "m");
        assert_eq!(req.missing_fields(), vec!["name", "subject"]);
    }

    #[test]
    fn test_absent_fields_are_listed() {
        let req = ContactRequest::default();
        assert_eq!(
            req.missing_fields(),
            vec!["name", "email", "subject", "message"]
        );
    }
}
