use std::time::Duration;

use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::provider::{ProviderError, reject_unsuccessful};

/// Brevo transactional email client.
pub struct EmailClient {
    http_client: Client,
    base_url: Url,
    sender: Sender,
    api_key: SecretString,
}

#[derive(Debug, Clone)]
pub struct Sender {
    pub email: String,
    pub name: String,
}

#[derive(Serialize)]
struct Contact<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: Contact<'a>,
    to: Vec<Contact<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

impl EmailClient {
    pub const PROVIDER: &'static str = "Brevo";

    pub fn new(
        base_url: String,
        sender: Sender,
        api_key: SecretString,
        timeout: Option<Duration>,
    ) -> Result<Self, anyhow::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url: Url::parse(&base_url)?,
            sender,
            api_key,
        })
    }

    #[tracing::instrument(name = "Sending an email", skip(self, html_content))]
    pub async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        html_content: &str,
    ) -> Result<(), ProviderError> {
        let url = self
            .base_url
            .join("v3/smtp/email")
            .map_err(|e| ProviderError::Rejected(e.to_string()))?;

        let body = SendEmailRequest {
            sender: Contact {
                email: &self.sender.email,
                name: &self.sender.name,
            },
            to: vec![Contact {
                email: recipient,
                name: "Subscriber",
            }],
            subject,
            html_content,
        };

        let response = self
            .http_client
            .post(url)
            .header("api-key", self.api_key.expose_secret())
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await?;

        reject_unsuccessful(response).await?;
        Ok(())
    }
}
