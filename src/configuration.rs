use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_aux::field_attributes::{
    deserialize_number_from_string, deserialize_option_number_from_string,
};

use crate::email_client::{EmailClient, Sender};
use crate::provider::Provider;
use crate::sms_client::SmsClient;
use crate::weather_client::WeatherClient;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub weather: WeatherSettings,
    pub email_client: EmailClientSettings,
    pub sms_client: SmsClientSettings,
    pub subscribers: SubscriberStoreSettings,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub secret_key: SecretString,
    pub contact_email: String,
}

impl ApplicationSettings {
    pub fn uses_placeholder_secret(&self) -> bool {
        self.secret_key.expose_secret() == "dev"
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct WeatherSettings {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub timeout_milliseconds: Option<u64>,
}

impl WeatherSettings {
    /// Geocoding shares the weather key, so one client serves both.
    pub fn client(self) -> Result<Provider<WeatherClient>, anyhow::Error> {
        let timeout = self.timeout();
        match self.api_key {
            Some(api_key) => Ok(Provider::Configured(WeatherClient::new(
                self.base_url,
                api_key,
                timeout,
            )?)),
            None => {
                tracing::warn!("OpenWeather API key is missing, weather and geocoding are disabled.");
                Ok(Provider::unconfigured(WeatherClient::PROVIDER))
            }
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_milliseconds.map(Duration::from_millis)
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub sender_email: String,
    pub sender_name: String,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub timeout_milliseconds: Option<u64>,
}

impl EmailClientSettings {
    pub fn client(self) -> Result<Provider<EmailClient>, anyhow::Error> {
        let timeout = self.timeout();
        let sender = self.sender();
        match self.api_key {
            Some(api_key) => Ok(Provider::Configured(EmailClient::new(
                self.base_url,
                sender,
                api_key,
                timeout,
            )?)),
            None => {
                tracing::error!("Brevo API key is missing.");
                Ok(Provider::unconfigured(EmailClient::PROVIDER))
            }
        }
    }

    pub fn sender(&self) -> Sender {
        Sender {
            email: self.sender_email.clone(),
            name: self.sender_name.clone(),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_milliseconds.map(Duration::from_millis)
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct SmsClientSettings {
    pub base_url: String,
    pub account_sid: Option<String>,
    pub auth_token: Option<SecretString>,
    pub from_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub timeout_milliseconds: Option<u64>,
}

impl SmsClientSettings {
    /// All three credentials are needed; a partial set disables SMS and is reported.
    pub fn client(self) -> Result<Provider<SmsClient>, anyhow::Error> {
        let timeout = self.timeout();
        match (self.account_sid, self.auth_token, self.from_number) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => {
                Ok(Provider::Configured(SmsClient::new(
                    self.base_url,
                    account_sid,
                    auth_token,
                    from_number,
                    timeout,
                )?))
            }
            (None, None, None) => Ok(Provider::unconfigured(SmsClient::PROVIDER)),
            _ => {
                tracing::error!(
                    "Twilio configuration is incomplete. All of TWILIO_ACCOUNT_SID, \
                    TWILIO_AUTH_TOKEN, and TWILIO_FROM are required."
                );
                Ok(Provider::unconfigured(SmsClient::PROVIDER))
            }
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_milliseconds.map(Duration::from_millis)
    }
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct SubscriberStoreSettings {
    pub path: PathBuf,
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "production" => Ok(Environment::Production),
            other => Err(format!(
                "{other} is not supported environment. Try to use `local` or `production`",
            )),
        }
    }
}

/// Flat variable names used by existing deployments, mapped onto settings keys.
const PROVIDER_VARIABLES: [(&str, &str); 8] = [
    ("OPENWEATHER_API_KEY", "weather.api_key"),
    ("TWILIO_ACCOUNT_SID", "sms_client.account_sid"),
    ("TWILIO_AUTH_TOKEN", "sms_client.auth_token"),
    ("TWILIO_FROM", "sms_client.from_number"),
    ("BREVO_API_KEY", "email_client.api_key"),
    ("FROM_EMAIL", "email_client.sender_email"),
    ("CONTACT_EMAIL", "application.contact_email"),
    ("SECRET_KEY", "application.secret_key"),
];

pub fn current_environment() -> Result<Environment, anyhow::Error> {
    std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(|e: String| anyhow::anyhow!(e))
}

pub fn get_configuration() -> Result<Settings, anyhow::Error> {
    let base_path = std::env::current_dir()?;
    let conf_dir = base_path.join("configuration");
    let env = current_environment()?;

    let mut builder = config::Config::builder()
        .add_source(config::File::from(conf_dir.join("base.yaml")).required(true))
        .add_source(config::File::from(conf_dir.join(format!("{}.yaml", env.as_str()))).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .prefix_separator("_"),
        );

    for (variable, key) in PROVIDER_VARIABLES {
        let value = std::env::var(variable).ok().filter(|v| !v.is_empty());
        builder = builder.set_override_option(key, value)?;
    }

    let settings = builder.build()?.try_deserialize::<Settings>()?;
    Ok(settings)
}
