//! Shared plumbing for the third-party adapters.
//!
//! Credentials are resolved once at startup. A provider without credentials is
//! kept as [`Provider::Unconfigured`] so callers get a "not configured" failure
//! instead of a network call.

use reqwest::{Response, StatusCode};

pub enum Provider<C> {
    Configured(C),
    Unconfigured { name: &'static str },
}

impl<C> Provider<C> {
    pub fn unconfigured(name: &'static str) -> Self {
        Self::Unconfigured { name }
    }

    pub fn client(&self) -> Result<&C, ProviderError> {
        match self {
            Provider::Configured(client) => Ok(client),
            Provider::Unconfigured { name } => Err(ProviderError::NotConfigured(*name)),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Provider::Configured(_))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("{0} not configured")]
    NotConfigured(&'static str),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Malformed(#[from] serde_json::Error),
}

#[derive(serde::Deserialize)]
struct RejectionBody {
    message: Option<String>,
}

/// Turns a non-2xx answer into [`ProviderError::Rejected`], preferring the
/// provider's own `message` over the bare status line.
pub async fn reject_unsuccessful(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<RejectionBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| status_line(status));

    Err(ProviderError::Rejected(message))
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
