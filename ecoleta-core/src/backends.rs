//! Bundle of backend ports the service talks to.

use std::sync::Arc;

use crate::ports::{CatalogPort, GeoPort, PointPort};

/// Collection of ports implementing every backend the registration form needs.
#[derive(Clone)]
pub struct Backends {
    /// Item catalog.
    pub catalog: Arc<dyn CatalogPort>,
    /// Province and city lookups.
    pub geo: Arc<dyn GeoPort>,
    /// Point registration.
    pub points: Arc<dyn PointPort>,
}

impl Backends {
    /// Build a bundle from the provided ports.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogPort>,
        geo: Arc<dyn GeoPort>,
        points: Arc<dyn PointPort>,
    ) -> Self {
        Self {
            catalog,
            geo,
            points,
        }
    }
}
