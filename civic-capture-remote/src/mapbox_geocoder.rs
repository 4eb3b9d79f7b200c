//! Reverse geocoding against the Mapbox places API.

use async_trait::async_trait;
use serde::Deserialize;

use civic_capture_core::traits::geolocation::Geocoder;

use crate::config::{ConfigError, GeocoderConfig};

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    place_name: Option<String>,
}

pub struct MapboxGeocoder {
    client: reqwest::Client,
    config: GeocoderConfig,
}

impl MapboxGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self, ConfigError> {
        let client = config.build_client()?;
        Ok(Self { client, config })
    }

    /// Longitude comes first in the places path.
    pub fn reverse_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/{},{}.json",
            self.config.endpoint.trim_end_matches('/'),
            longitude,
            latitude
        )
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, String> {
        let response = self
            .client
            .get(self.reverse_url(latitude, longitude))
            .query(&[("access_token", self.config.access_token.as_str())])
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        let body = response.text().await.map_err(|e| e.to_string())?;
        parse_place_name(&body)
    }
}

/// `features[0].place_name`, or `None` when nothing matched.
pub fn parse_place_name(body: &str) -> Result<Option<String>, String> {
    let places: PlacesResponse = serde_json::from_str(body).map_err(|e| e.to_string())?;
    Ok(places
        .features
        .into_iter()
        .next()
        .and_then(|f| f.place_name)
        .filter(|name| !name.trim().is_empty()))
}
