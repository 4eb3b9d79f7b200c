use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::models::error::LocationError;
use crate::models::location::Position;

/// Platform positioning service (GPS, network location, ...).
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// One position fix.
    async fn current_position(&self, high_accuracy: bool) -> Result<Position, LocationError>;

    /// Continuous fixes until the stream is dropped.
    fn watch_positions(&self, high_accuracy: bool) -> BoxStream<'static, Result<Position, LocationError>>;
}

/// Reverse geocoding collaborator. Best-effort: failures never fail a query.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Address label for the coordinates, `Ok(None)` when nothing matched.
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, String>;
}
