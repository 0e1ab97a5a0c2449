//! Traits describing backend capabilities and shared error type.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{CityName, Item, NewPoint, PointId, ProvinceCode};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to backend services.
pub enum PortError {
    /// Network layer failed, or the server answered with a non-success status.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// The server answered but the payload was not usable.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[async_trait]
/// Source of collectible item categories.
pub trait CatalogPort: Send + Sync {
    /// Fetch the full item catalog in backend order.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    async fn items(&self) -> Result<Vec<Item>, PortError>;
}

#[async_trait]
/// Source of provinces and their municipalities.
pub trait GeoPort: Send + Sync {
    /// Fetch all province codes, ordered by province name.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    async fn provinces(&self) -> Result<Vec<ProvinceCode>, PortError>;

    /// Fetch the municipalities of a province.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    async fn cities(&self, province: &ProvinceCode) -> Result<Vec<CityName>, PortError>;
}

#[async_trait]
/// Sink for new collection point registrations.
pub trait PointPort: Send + Sync {
    /// Register a collection point and return its backend identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the backend rejects the point or the request fails.
    async fn register(&self, point: &NewPoint) -> Result<PointId, PortError>;
}
