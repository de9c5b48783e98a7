use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::core::config::GeocoderConfig;
use crate::shared::constants::{FALLBACK_ADDRESS, FALLBACK_CITY, UNKNOWN_CITY};

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("geocoder request failed: {0}")]
    Request(String),

    #[error("geocoder returned status {0}")]
    Status(u16),

    #[error("geocoder found no result: {0}")]
    NoResult(String),

    #[error("failed to parse geocoder response: {0}")]
    Decode(String),
}

/// Human-readable location for a coordinate pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodedAddress {
    pub address: String,
    pub city: String,
}

impl GeocodedAddress {
    /// The fixed pair used whenever reverse geocoding fails
    pub fn fallback() -> Self {
        Self {
            address: FALLBACK_ADDRESS.to_string(),
            city: FALLBACK_CITY.to_string(),
        }
    }

    /// Official a report at this location is routed to
    pub fn assigned_to(&self) -> String {
        format!("{} Mayor", self.city)
    }
}

/// Reverse geocoding: coordinates (as submitted text) to address and city
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, lat: &str, lon: &str) -> Result<GeocodedAddress, GeocodingError>;
}

/// Resolve coordinates, degrading to the fallback pair on any failure
pub async fn resolve_location(
    geocoder: &dyn ReverseGeocoder,
    lat: &str,
    lon: &str,
) -> GeocodedAddress {
    match geocoder.reverse(lat, lon).await {
        Ok(location) => location,
        Err(e) => {
            tracing::warn!(
                "Reverse geocoding failed for ({}, {}): {}; using fallback address",
                lat,
                lon,
                e
            );
            GeocodedAddress::fallback()
        }
    }
}

/// Nominatim reverse response structure
#[derive(Debug, Deserialize)]
pub struct NominatimReverseResponse {
    pub display_name: Option<String>,
    pub address: Option<NominatimAddress>,
    /// Present instead of a result, e.g. "Unable to geocode"
    pub error: Option<String>,
}

/// Nominatim address components
#[derive(Debug, Deserialize)]
pub struct NominatimAddress {
    pub city: Option<String>,
}

impl NominatimReverseResponse {
    pub fn into_address(self) -> Result<GeocodedAddress, GeocodingError> {
        if let Some(error) = self.error {
            return Err(GeocodingError::NoResult(error));
        }

        let address = self
            .display_name
            .filter(|d| !d.is_empty())
            .ok_or_else(|| GeocodingError::NoResult("missing display_name".to_string()))?;

        let city = self
            .address
            .and_then(|a| a.city)
            .unwrap_or_else(|| UNKNOWN_CITY.to_string());

        Ok(GeocodedAddress { address, city })
    }
}

/// Reverse geocoder backed by Nominatim
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodingError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeocodingError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, lat: &str, lon: &str) -> Result<GeocodedAddress, GeocodingError> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1",
            self.base_url,
            urlencoding::encode(lat.trim()),
            urlencoding::encode(lon.trim())
        );

        tracing::debug!("Reverse geocoding ({}, {}) -> {}", lat, lon, url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GeocodingError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodingError::Status(response.status().as_u16()));
        }

        let body: NominatimReverseResponse = response
            .json()
            .await
            .map_err(|e| GeocodingError::Decode(e.to_string()))?;

        body.into_address()
    }
}
