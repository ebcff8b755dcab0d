use actix_web::{HttpResponse, ResponseError, http::StatusCode, web};
use serde::Serialize;

use super::{CoordinatesBody, ErrorBody, GeocodeBody, error_chain_fmt};
use crate::provider::{Provider, ProviderError};
use crate::weather_client::WeatherClient;

/// Only input problems are errors here; provider failures are answered with
/// `200 {"error": ...}`, which the web client relies on.
#[derive(thiserror::Error)]
pub enum GeocodeError {
    #[error("Query is required")]
    MissingQuery,
    #[error("Latitude and longitude are required")]
    MissingCoordinates,
}

impl std::fmt::Debug for GeocodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for GeocodeError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

#[tracing::instrument(name = "Geocoding a place", skip(body, weather_client), fields(query = ?body.query))]
pub async fn geocode(
    body: web::Json<GeocodeBody>,
    weather_client: web::Data<Provider<WeatherClient>>,
) -> Result<HttpResponse, GeocodeError> {
    let query = body
        .0
        .query
        .filter(|q| !q.is_empty())
        .ok_or(GeocodeError::MissingQuery)?;

    let outcome = match weather_client.client() {
        Ok(client) => client.geocode(&query).await,
        Err(e) => Err(e),
    };

    Ok(respond(outcome, "Geocode failed"))
}

#[tracing::instrument(
    name = "Reverse geocoding a position",
    skip(body, weather_client),
    fields(lat = ?body.lat, lon = ?body.lon)
)]
pub async fn reverse_geocode(
    body: web::Json<CoordinatesBody>,
    weather_client: web::Data<Provider<WeatherClient>>,
) -> Result<HttpResponse, GeocodeError> {
    let (lat, lon) = body
        .coordinates()
        .ok_or(GeocodeError::MissingCoordinates)?;

    let outcome = match weather_client.client() {
        Ok(client) => client.reverse_geocode(lat, lon).await,
        Err(e) => Err(e),
    };

    Ok(respond(outcome, "Reverse geocode failed"))
}

fn respond<T: Serialize>(outcome: Result<T, ProviderError>, failure: &str) -> HttpResponse {
    match outcome {
        Ok(location) => HttpResponse::Ok().json(location),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "{failure}");
            HttpResponse::Ok().json(ErrorBody {
                error: e.to_string(),
            })
        }
    }
}
