use chrono::{DateTime, Utc};

use super::{NewSubscription, SubscriberEmail, SubscriptionMethod};

/// One element of the subscriber file. Never modified once written.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubscriptionRecord {
    pub method: SubscriptionMethod,
    pub phone: Option<String>,
    pub email: SubscriberEmail,
    pub also_email: bool,
    pub alt_email: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub ts: DateTime<Utc>,
}

impl SubscriptionRecord {
    pub fn new(subscription: NewSubscription, ts: DateTime<Utc>) -> Self {
        let NewSubscription {
            method,
            phone,
            email,
            also_email,
            alt_email,
            city,
            country,
            lat,
            lon,
        } = subscription;

        Self {
            method,
            phone,
            email,
            also_email,
            alt_email,
            city,
            country,
            lat,
            lon,
            ts,
        }
    }
}
