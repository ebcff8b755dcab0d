use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};

use super::{CoordinatesBody, ErrorBody, error_chain_fmt};
use crate::provider::{Provider, ProviderError};
use crate::weather_client::WeatherClient;

#[derive(thiserror::Error)]
pub enum WeatherError {
    #[error("Latitude and longitude are required")]
    MissingCoordinates,
    #[error(transparent)]
    ProviderError(#[from] ProviderError),
}

impl std::fmt::Debug for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            WeatherError::MissingCoordinates => StatusCode::BAD_REQUEST,
            WeatherError::ProviderError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

#[tracing::instrument(
    name = "Looking up current weather",
    skip(body, weather_client),
    fields(lat = ?body.lat, lon = ?body.lon)
)]
pub async fn weather_by_coords(
    body: web::Json<CoordinatesBody>,
    weather_client: web::Data<Provider<WeatherClient>>,
) -> Result<HttpResponse, WeatherError> {
    let (lat, lon) = body
        .coordinates()
        .ok_or(WeatherError::MissingCoordinates)?;

    let snapshot = weather_client
        .client()?
        .current_weather(lat, lon)
        .await
        .inspect_err(|e| tracing::error!(error.cause_chain = ?e, "Weather fetch failed"))?;

    Ok(HttpResponse::Ok().json(snapshot))
}
