use actix_web::{
    HttpRequest, HttpResponse, ResponseError,
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
};

use super::super::helpers::error_chain_fmt;
use crate::subscriber_store::StoreError;

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    StoreError(#[from] StoreError),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscribeError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "ok": false,
            "error": self.to_string(),
        }))
    }
}

/// `/subscribe` reports unparsable bodies in its own `{"ok": false}` shape.
pub fn subscribe_json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = SubscribeError::ValidationError(err.to_string()).error_response();
    InternalError::from_response(err, response).into()
}
