use std::sync::Arc;

use futures::stream::{BoxStream, StreamExt};
use tokio::time::timeout;

use crate::models::config::LocationConfig;
use crate::models::error::LocationError;
use crate::models::location::{coordinates_label, validate_coordinates, LocationResult};
use crate::traits::geolocation::{Geocoder, PositionSource};

/// Resolves complaint locations from the positioning service or a map click.
///
/// Reverse geocoding is best-effort: when it fails, times out, or no geocoder
/// is configured, the address falls back to the formatted coordinates.
pub struct LocationProvider {
    source: Arc<dyn PositionSource>,
    geocoder: Option<Arc<dyn Geocoder>>,
    config: LocationConfig,
}

impl LocationProvider {
    pub fn new(source: Arc<dyn PositionSource>, config: LocationConfig) -> Self {
        Self {
            source,
            geocoder: None,
            config,
        }
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    /// Single position fix, bounded by `position_timeout`.
    pub async fn query_once(&self) -> Result<LocationResult, LocationError> {
        let fix = self.source.current_position(self.config.high_accuracy);
        let position = match timeout(self.config.position_timeout, fix).await {
            Ok(result) => result?,
            Err(_) => {
                log::warn!("No position fix within {:?}", self.config.position_timeout);
                return Err(LocationError::Timeout);
            }
        };
        validate_coordinates(position.latitude, position.longitude)
            .map_err(LocationError::InvalidCoordinates)?;

        Ok(self.resolve(position.latitude, position.longitude).await)
    }

    /// Location picked on the map. Succeeds for any valid coordinate pair.
    pub async fn query_from_map_click(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationResult, LocationError> {
        validate_coordinates(latitude, longitude).map_err(LocationError::InvalidCoordinates)?;
        Ok(self.resolve(latitude, longitude).await)
    }

    /// Continuous tracking. Each fix is resolved like [`query_once`](Self::query_once);
    /// errors from the positioning service are passed through and do not end the stream.
    pub fn watch(&self) -> BoxStream<'_, Result<LocationResult, LocationError>> {
        self.source
            .watch_positions(self.config.high_accuracy)
            .then(move |fix| async move {
                let position = fix?;
                validate_coordinates(position.latitude, position.longitude)
                    .map_err(LocationError::InvalidCoordinates)?;
                Ok::<_, LocationError>(self.resolve(position.latitude, position.longitude).await)
            })
            .boxed()
    }

    async fn resolve(&self, latitude: f64, longitude: f64) -> LocationResult {
        let address = match self.reverse_geocode(latitude, longitude).await {
            Some(address) => address,
            None => coordinates_label(latitude, longitude),
        };
        LocationResult {
            latitude,
            longitude,
            address: Some(address),
        }
    }

    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Option<String> {
        let geocoder = self.geocoder.as_ref()?;
        match timeout(self.config.geocode_timeout, geocoder.reverse(latitude, longitude)).await {
            Ok(Ok(Some(address))) if !address.trim().is_empty() => Some(address),
            Ok(Ok(_)) => {
                log::debug!("No geocoding result for ({}, {})", latitude, longitude);
                None
            }
            Ok(Err(e)) => {
                log::warn!("Reverse geocoding failed: {}", e);
                None
            }
            Err(_) => {
                log::warn!("Reverse geocoding timed out after {:?}", self.config.geocode_timeout);
                None
            }
        }
    }
}
