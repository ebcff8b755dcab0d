use std::fmt;

/// Delivery channel chosen by the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionMethod {
    #[default]
    Email,
    Sms,
    Both,
}

impl SubscriptionMethod {
    /// Case-insensitive; anything unrecognised falls back to email.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "sms" => SubscriptionMethod::Sms,
            "both" => SubscriptionMethod::Both,
            _ => SubscriptionMethod::Email,
        }
    }

    pub fn includes_sms(self) -> bool {
        matches!(self, SubscriptionMethod::Sms | SubscriptionMethod::Both)
    }

    pub fn includes_email(self) -> bool {
        matches!(self, SubscriptionMethod::Email | SubscriptionMethod::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionMethod::Email => "email",
            SubscriptionMethod::Sms => "sms",
            SubscriptionMethod::Both => "both",
        }
    }
}

impl fmt::Display for SubscriptionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
