use serde::Serialize;

/// Outcome of one notification leg: `{"ok": true}` or `{"ok": false, "error": ...}`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DeliveryReport {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryReport {
    pub fn delivered() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            ok: false,
            error: Some(error.to_string()),
        }
    }
}

impl From<Result<(), anyhow::Error>> for DeliveryReport {
    fn from(outcome: Result<(), anyhow::Error>) -> Self {
        match outcome {
            Ok(()) => Self::delivered(),
            Err(e) => Self::failed(e),
        }
    }
}

/// Only the legs that were attempted appear in the response.
#[derive(Serialize, Debug, Default, PartialEq)]
pub struct NotificationResults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms: Option<DeliveryReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<DeliveryReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub also_email: Option<DeliveryReport>,
}

#[derive(Serialize, Debug)]
pub struct SubscribeResponse {
    pub ok: bool,
    pub message: &'static str,
    pub results: NotificationResults,
}
