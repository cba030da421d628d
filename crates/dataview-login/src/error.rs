use chrono::{DateTime, Utc};
use thiserror::Error;

/// Form nonce rejected on submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NonceError {
    #[error("unknown or already used form nonce")]
    Unknown,

    #[error("form nonce was issued for form '{issued_for}', not '{form_id}'")]
    FormMismatch { form_id: String, issued_for: String },

    #[error("form nonce expired at {expired_at}")]
    Expired { expired_at: DateTime<Utc> },
}

/// The password reset request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("reset request failed: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
