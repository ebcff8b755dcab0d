use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{SubscriberEmail, SubscriptionMethod};

/// Body of a `/subscribe` call, before validation.
#[derive(serde::Deserialize, Debug, Default)]
pub struct SubscriptionRequest {
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_truthy")]
    pub also_email: bool,
    #[serde(default)]
    pub alt_email: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "deserialize_display_coordinate")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_display_coordinate")]
    pub lon: Option<f64>,
}

/// A subscription that passed validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub method: SubscriptionMethod,
    pub phone: Option<String>,
    pub email: SubscriberEmail,
    pub also_email: bool,
    pub alt_email: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl TryFrom<SubscriptionRequest> for NewSubscription {
    type Error = String;

    fn try_from(request: SubscriptionRequest) -> Result<Self, Self::Error> {
        let method = request
            .method
            .as_deref()
            .map(SubscriptionMethod::parse)
            .unwrap_or_default();
        let email = SubscriberEmail::parse(request.email.unwrap_or_default())?;
        let phone = non_empty(request.phone);

        if method == SubscriptionMethod::Sms && phone.is_none() {
            return Err("Phone number required for SMS.".into());
        }

        Ok(Self {
            method,
            phone,
            email,
            also_email: request.also_email,
            alt_email: non_empty(request.alt_email),
            city: request.city,
            country: request.country,
            lat: request.lat,
            lon: request.lon,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// The web form sends either `false` or the address itself for `also_email`.
fn deserialize_truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    })
}

/// Subscription coordinates are only shown back to the user, so anything that
/// is not a finite number is dropped instead of failing the request.
fn deserialize_display_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let coordinate = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(coordinate.filter(|c| c.is_finite()))
}
