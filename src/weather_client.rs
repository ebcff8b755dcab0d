use std::time::Duration;

use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Address, Coordinates, Place, WeatherSnapshot};
use crate::provider::ProviderError;

/// OpenWeather client covering current conditions and both geocoding directions.
pub struct WeatherClient {
    http_client: Client,
    base_url: Url,
    api_key: SecretString,
}

#[derive(Deserialize)]
struct CurrentWeather {
    name: String,
    weather: Vec<Condition>,
    main: Readings,
    wind: Wind,
}

#[derive(Deserialize)]
struct Condition {
    main: String,
    description: String,
    icon: String,
}

#[derive(Deserialize)]
struct Readings {
    temp: f64,
    feels_like: f64,
    humidity: u32,
}

#[derive(Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Deserialize)]
struct DirectMatch {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Deserialize)]
struct ReverseMatch {
    name: Option<String>,
    country: Option<String>,
    state: Option<String>,
}

impl WeatherClient {
    pub const PROVIDER: &'static str = "OpenWeather";

    pub fn new(
        base_url: String,
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
            api_key,
        })
    }

    #[tracing::instrument(name = "Fetching current weather", skip(self))]
    pub async fn current_weather(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, ProviderError> {
        let body = self
            .get(
                "data/2.5/weather",
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("units", "metric".into()),
                ],
            )
            .await?;

        if !reports_success(&body) {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Weather data unavailable");
            return Err(ProviderError::Rejected(message.into()));
        }

        let current: CurrentWeather = serde_json::from_value(body)?;
        let condition = current.weather.into_iter().next().ok_or_else(|| {
            ProviderError::Rejected("Weather data unavailable".into())
        })?;

        Ok(WeatherSnapshot {
            city: current.name,
            condition_main: condition.main,
            condition_desc: condition.description,
            temp: current.main.temp,
            feels_like: current.main.feels_like,
            humidity: current.main.humidity,
            wind_speed: current.wind.speed,
            icon: condition.icon,
        })
    }

    #[tracing::instrument(name = "Geocoding a place name", skip(self))]
    pub async fn geocode(&self, query: &str) -> Result<Coordinates, ProviderError> {
        let body = self
            .get(
                "geo/1.0/direct",
                &[("q", query.to_string()), ("limit", "1".into())],
            )
            .await?;

        let matches: Vec<DirectMatch> = serde_json::from_value(reject_object(body)?)?;
        match matches.into_iter().next() {
            Some(DirectMatch {
                lat: Some(lat),
                lon: Some(lon),
            }) => Ok(Coordinates { lat, lon }),
            _ => Err(ProviderError::Rejected("Geocoding failed".into())),
        }
    }

    #[tracing::instrument(name = "Reverse geocoding coordinates", skip(self))]
    pub async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Place, ProviderError> {
        let body = self
            .get(
                "geo/1.0/reverse",
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("limit", "1".into()),
                ],
            )
            .await?;

        let matches: Vec<ReverseMatch> = serde_json::from_value(reject_object(body)?)?;
        let place = matches
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Rejected("Reverse geocoding failed".into()))?;

        Ok(Place {
            lat,
            lon,
            city: place.name,
            country_code: place.country.clone(),
            country: place.country,
            address: Address { state: place.state },
        })
    }

    /// The provider reports failures inside the payload, so the HTTP status
    /// is not inspected here.
    async fn get(&self, route: &str, params: &[(&str, String)]) -> Result<Value, ProviderError> {
        let url = self
            .base_url
            .join(route)
            .map_err(|e| ProviderError::Rejected(e.to_string()))?;

        let body = self
            .http_client
            .get(url)
            .query(params)
            .query(&[("appid", self.api_key.expose_secret())])
            .send()
            .await?
            .json::<Value>()
            .await?;

        Ok(body)
    }
}

fn reports_success(body: &Value) -> bool {
    match body.get("cod") {
        Some(Value::Number(code)) => code.as_u64() == Some(200),
        Some(Value::String(code)) => code == "200",
        _ => false,
    }
}

/// Geocoding answers with a list; an object means the call itself failed.
fn reject_object(body: Value) -> Result<Value, ProviderError> {
    match body {
        Value::Object(map) => {
            let message = map
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Geocoding failed");
            Err(ProviderError::Rejected(message.into()))
        }
        other => Ok(other),
    }
}
