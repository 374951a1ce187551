//! Clients of third-party services

pub mod exchange_rate;
pub mod hotel_provider;

use thiserror::Error;

/// External API failures
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API key is not configured (set {0})")]
    MissingApiKey(String),

    #[error("Request timeout: {0} did not answer in time")]
    Timeout(String),

    #[error("Connection error: cannot reach {0}")]
    Connect(String),

    #[error("{service} returned status {status}: {body}")]
    Status {
        service: String,
        status: u16,
        body: String,
    },

    #[error("Failed to parse {service} response: {message}")]
    Parse { service: String, message: String },

    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    pub fn from_reqwest(service: &str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout(service.to_string())
        } else if e.is_connect() {
            ProviderError::Connect(service.to_string())
        } else {
            ProviderError::Other(format!("{} request failed: {}", service, e))
        }
    }
}

/// First 500 characters of a body, for logs and error messages
pub(crate) fn preview(body: &str) -> String {
    let head: String = body.chars().take(500).collect();
    if head.len() < body.len() {
        format!("{}...", head)
    } else {
        head
    }
}
