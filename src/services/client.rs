// src/services/client.rs

//! HTTP client for the occasion-bundle endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{
    ApiConfig, BundleResponse, Config, ExaminationType, LocationId, OccasionBundleRequest,
    SessionConfig,
};
use crate::services::AvailabilitySource;
use crate::utils::http;

const ENDPOINT: &str = "Boka/occasion-bundles";

/// Queries the booking site for one location at a time.
///
/// One instance is shared by every fetch of a run, so the underlying
/// connection pool and cookie jar are reused across cycles.
pub struct BookingClient {
    client: Client,
    endpoint: Url,
    session: SessionConfig,
    exam: ExaminationType,
}

impl BookingClient {
    /// Build a client from configuration.
    pub fn new(config: &Config, exam: ExaminationType) -> Result<Self> {
        let client = http::create_client(&config.api, &config.session, &config.proxy)?;
        Self::with_client(client, &config.api, config.session.clone(), exam)
    }

    /// Use an already configured HTTP client.
    pub fn with_client(
        client: Client,
        api: &ApiConfig,
        session: SessionConfig,
        exam: ExaminationType,
    ) -> Result<Self> {
        let endpoint = Url::parse(&api.base_url)?.join(ENDPOINT)?;
        Ok(Self {
            client,
            endpoint,
            session,
            exam,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl AvailabilitySource for BookingClient {
    async fn query(&self, location: LocationId) -> Result<Vec<Value>> {
        let body = OccasionBundleRequest::new(&self.session, self.exam, location);
        log::debug!("POST {} (location {})", self.endpoint, location);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::transport(location, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::protocol(location, status.as_u16(), None));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::transport(location, e))?;
        parse_bundle_response(location, &bytes)
    }
}

/// Interpret the body of an HTTP 200 response.
pub fn parse_bundle_response(location: LocationId, body: &[u8]) -> Result<Vec<Value>> {
    let response: BundleResponse = serde_json::from_slice(body).map_err(|e| {
        log::debug!("Location {location}: response is not the expected JSON: {e}");
        AppError::protocol(location, StatusCode::OK.as_u16(), None)
    })?;

    if response.status != 200 {
        return Err(AppError::protocol(
            location,
            StatusCode::OK.as_u16(),
            Some(response.status),
        ));
    }

    response
        .data
        .and_then(|data| data.bundles)
        .ok_or_else(|| AppError::malformed(location, "response has no data.bundles"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_resolves_against_base() {
        let config = Config::default();
        let client =
            BookingClient::with_client(Client::new(), &config.api, config.session.clone(), ExaminationType::Korprov)
                .unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://fp.trafikverket.se/Boka/occasion-bundles"
        );
    }

    #[test]
    fn test_parse_success() {
        let body = br#"{"status": 200, "data": {"bundles": [{"occasions": []}, {"occasions": []}]}}"#;
        let bundles = parse_bundle_response(1, body).unwrap();
        assert_eq!(bundles.len(), 2);
    }

    #[test]
    fn test_parse_embedded_error_status() {
        let body = br#"{"status": 500, "data": null}"#;
        let err = parse_bundle_response(1, body).unwrap_err();
        assert!(matches!(
            err,
            AppError::Protocol {
                http_status: 200,
                api_status: Some(500),
                ..
            }
        ));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_parse_non_json_is_protocol_error() {
        let err = parse_bundle_response(1, b"<html>maintenance</html>").unwrap_err();
        assert!(matches!(err, AppError::Protocol { api_status: None, .. }));
    }

    #[test]
    fn test_parse_missing_bundles_is_malformed() {
        let err = parse_bundle_response(9, br#"{"status": 200, "data": {}}"#).unwrap_err();
        assert!(matches!(err, AppError::MalformedRecord { location: 9, .. }));
        assert!(!err.is_retryable());
    }
}
