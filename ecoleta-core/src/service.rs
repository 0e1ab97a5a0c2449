//! High-level service facade combining all backends.

use tracing::{info, instrument};

use crate::backends::Backends;
use crate::form::{FormError, PointForm};
use crate::model::{CityName, FormSelection, Item, PointId, ProvinceCode};
use crate::ports::PortError;

#[derive(thiserror::Error, Debug)]
/// Errors returned when submitting the registration form.
pub enum SubmitError {
    /// The form is incomplete or malformed.
    #[error(transparent)]
    Invalid(#[from] FormError),
    /// The backend call failed.
    #[error(transparent)]
    Port(#[from] PortError),
}

/// Public entry point for loading form data and registering points.
pub struct EcoletaService {
    backends: Backends,
}

impl EcoletaService {
    /// Create a new service bound to the provided backends.
    #[must_use]
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }

    /// Load the item catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the catalog request fails.
    #[instrument(skip(self))]
    pub async fn items(&self) -> Result<Vec<Item>, PortError> {
        self.backends.catalog.items().await
    }

    /// Load all province codes ordered by name.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the geographic API request fails.
    #[instrument(skip(self))]
    pub async fn provinces(&self) -> Result<Vec<ProvinceCode>, PortError> {
        self.backends.geo.provinces().await
    }

    /// Load the municipalities of a province.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the geographic API request fails.
    #[instrument(skip(self, province), fields(province = %province))]
    pub async fn cities(&self, province: &ProvinceCode) -> Result<Vec<CityName>, PortError> {
        self.backends.geo.cities(province).await
    }

    /// Validate the form and register the collection point.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Invalid`] without touching the network when the form
    /// is incomplete, or [`SubmitError::Port`] when the backend call fails.
    #[instrument(skip_all)]
    pub async fn register(
        &self,
        form: &PointForm,
        selection: &FormSelection,
    ) -> Result<PointId, SubmitError> {
        let point = form.validate(selection)?;
        let id = self.backends.points.register(&point).await?;
        info!(%id, uf = %point.uf, city = %point.city, "collection point registered");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::model::{ItemId, NewPoint, Selection};
    use crate::ports::{CatalogPort, GeoPort, PointPort};

    #[derive(Default)]
    struct RecordingBackend {
        registered: Mutex<Vec<NewPoint>>,
    }

    #[async_trait]
    impl CatalogPort for RecordingBackend {
        async fn items(&self) -> Result<Vec<Item>, PortError> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl GeoPort for RecordingBackend {
        async fn provinces(&self) -> Result<Vec<ProvinceCode>, PortError> {
            Ok(Vec::new())
        }

        async fn cities(&self, _province: &ProvinceCode) -> Result<Vec<CityName>, PortError> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl PointPort for RecordingBackend {
        async fn register(&self, point: &NewPoint) -> Result<PointId, PortError> {
            self.registered
                .lock()
                .expect("registered lock")
                .push(point.clone());
            Ok(PointId(9))
        }
    }

    fn service() -> (EcoletaService, Arc<RecordingBackend>) {
        let backend = Arc::new(RecordingBackend::default());
        let backends = Backends::new(
            Arc::clone(&backend) as Arc<dyn CatalogPort>,
            Arc::clone(&backend) as Arc<dyn GeoPort>,
            Arc::clone(&backend) as Arc<dyn PointPort>,
        );
        (EcoletaService::new(backends), backend)
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_backend() {
        let (service, backend) = service();

        let err = service
            .register(&PointForm::default(), &FormSelection::default())
            .await
            .expect_err("empty form");

        assert!(matches!(err, SubmitError::Invalid(FormError::MissingName)));
        assert!(backend.registered.lock().expect("registered lock").is_empty());
    }

    #[tokio::test]
    async fn form_without_items_is_rejected_before_posting() {
        let (service, backend) = service();
        let form = PointForm {
            name: "Mercado Verde".into(),
            email: "contato@verde.org".into(),
            whatsapp: "61999990000".into(),
            ..PointForm::default()
        };
        let selection = FormSelection {
            province: Selection::Selected(ProvinceCode::from("DF")),
            city: Selection::Selected(CityName::from("Brasília")),
        };

        let err = service
            .register(&form, &selection)
            .await
            .expect_err("no items");

        assert!(matches!(
            err,
            SubmitError::Invalid(FormError::NoItemsSelected)
        ));
        assert!(backend.registered.lock().expect("registered lock").is_empty());
    }

    #[tokio::test]
    async fn valid_form_is_registered() {
        let (service, backend) = service();
        let mut form = PointForm {
            name: "Mercado Verde".into(),
            email: "contato@verde.org".into(),
            whatsapp: "61999990000".into(),
            ..PointForm::default()
        };
        form.toggle_item(ItemId(4));
        let selection = FormSelection {
            province: Selection::Selected(ProvinceCode::from("DF")),
            city: Selection::Selected(CityName::from("Brasília")),
        };

        let id = service.register(&form, &selection).await.expect("registered");

        assert_eq!(id, PointId(9));
        let registered = backend.registered.lock().expect("registered lock").clone();
        assert_eq!(registered.len(), 1);
        assert_eq!(registered.first().map(|point| point.items.clone()), Some(vec![ItemId(4)]));
    }
}
