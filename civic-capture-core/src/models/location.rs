use serde::{Deserialize, Serialize};

/// A raw position fix from the platform's positioning service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy radius in meters, when reported.
    pub accuracy_m: Option<f64>,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m: None,
        }
    }
}

/// A resolved location for a complaint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub latitude: f64,
    pub longitude: f64,
    /// Reverse-geocoded label, or the formatted coordinates when geocoding failed.
    pub address: Option<String>,
}

impl LocationResult {
    /// Human-readable label: the address if known, otherwise the coordinates.
    pub fn label(&self) -> String {
        match &self.address {
            Some(address) if !address.trim().is_empty() => address.clone(),
            _ => coordinates_label(self.latitude, self.longitude),
        }
    }
}

/// Formats coordinates as `"lat, lon"` with four decimals (about 11 m).
pub fn coordinates_label(latitude: f64, longitude: f64) -> String {
    format!("{:.4}, {:.4}", latitude, longitude)
}

/// Checks that a coordinate pair is finite and within WGS84 bounds.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), String> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(format!("non-finite coordinates ({}, {})", latitude, longitude));
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(format!("latitude out of range: {}", latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("longitude out of range: {}", longitude));
    }
    Ok(())
}
