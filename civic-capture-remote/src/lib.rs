//! # civic-capture-remote
//!
//! HTTP collaborators for civic-capture-core.
//!
//! Provides:
//! - `RestObjectStore`: evidence uploads to the storage bucket
//! - `RestComplaintStore`: complaint row inserts
//! - `MapboxGeocoder`: reverse geocoding for picked locations
//! - `RemoteConfig` / `GeocoderConfig`: settings, loadable from the environment
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use civic_capture_core::{SubmissionConfig, SubmissionCoordinator};
//! use civic_capture_remote::{RemoteConfig, RestComplaintStore, RestObjectStore};
//!
//! let remote = RemoteConfig::from_env()?;
//! let coordinator = SubmissionCoordinator::new(
//!     user_id,
//!     Arc::new(RestObjectStore::new(remote.clone())?),
//!     Arc::new(RestComplaintStore::new(remote)?),
//!     SubmissionConfig::default(),
//! )?;
//! ```

pub mod config;
pub mod mapbox_geocoder;
pub mod rest_complaints;
pub mod rest_storage;

pub use config::{ConfigError, GeocoderConfig, RemoteConfig};
pub use mapbox_geocoder::MapboxGeocoder;
pub use rest_complaints::RestComplaintStore;
pub use rest_storage::RestObjectStore;
