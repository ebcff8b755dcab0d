use std::time::Duration;

use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};

use crate::provider::{ProviderError, reject_unsuccessful};

/// Twilio programmable messaging client.
pub struct SmsClient {
    http_client: Client,
    base_url: Url,
    account_sid: String,
    auth_token: SecretString,
    from_number: String,
}

impl SmsClient {
    pub const PROVIDER: &'static str = "Twilio";

    pub fn new(
        base_url: String,
        account_sid: String,
        auth_token: SecretString,
        from_number: String,
        timeout: Option<Duration>,
    ) -> Result<Self, anyhow::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url: Url::parse(&base_url)?,
            account_sid,
            auth_token,
            from_number,
        })
    }

    #[tracing::instrument(name = "Sending an SMS", skip(self, message))]
    pub async fn send_sms(&self, phone: &str, message: &str) -> Result<(), ProviderError> {
        let url = self
            .base_url
            .join(&format!(
                "2010-04-01/Accounts/{}/Messages.json",
                self.account_sid
            ))
            .map_err(|e| ProviderError::Rejected(e.to_string()))?;

        let response = self
            .http_client
            .post(url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(&[
                ("To", phone),
                ("From", self.from_number.as_str()),
                ("Body", message),
            ])
            .send()
            .await?;

        reject_unsuccessful(response).await?;
        Ok(())
    }
}
