//! Provider implementation for province and municipality lookups using the IBGE
//! localidades API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use ecoleta_core::{
    model::{CityName, ProvinceCode},
    ports::{GeoPort, PortError},
};

/// Public IBGE localidades endpoint.
pub const DEFAULT_BASE_URL: &str = "https://servicodados.ibge.gov.br/api/v1/localidades";

/// State entry from /estados; many more fields exist, we only need the UF code.
#[derive(Debug, Deserialize)]
struct UfResponse {
    sigla: String,
}

/// Municipality entry from /estados/{uf}/municipios.
#[derive(Debug, Deserialize)]
struct CityResponse {
    nome: String,
}

/// Province and city lookups against IBGE.
pub struct IbgeGeoPort {
    client: Client,
    base_url: String,
}

impl IbgeGeoPort {
    /// Create a new geo port bound to the given HTTP client and API address.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }
}

#[async_trait]
impl GeoPort for IbgeGeoPort {
    async fn provinces(&self) -> Result<Vec<ProvinceCode>, PortError> {
        let req = self
            .client
            .get(format!("{}/estados", self.base_url))
            .query(&[("orderBy", "nome")]);

        let ufs = fetch_json::<Vec<UfResponse>>(req).await?;
        debug!(count = ufs.len(), "fetched IBGE states");

        Ok(ufs.into_iter().map(|uf| ProvinceCode(uf.sigla)).collect())
    }

    async fn cities(&self, province: &ProvinceCode) -> Result<Vec<CityName>, PortError> {
        let code = province.0.trim();
        // An empty segment would hit /estados//municipios, which IBGE answers with
        // an unrelated payload.
        if code.is_empty() || !code.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return Err(PortError::Internal(format!("Invalid UF code {code:?}")));
        }

        let req = self
            .client
            .get(format!("{}/estados/{code}/municipios", self.base_url));

        let cities = fetch_json::<Vec<CityResponse>>(req).await?;
        debug!(uf = code, count = cities.len(), "fetched IBGE municipalities");

        Ok(cities.into_iter().map(|city| CityName(city.nome)).collect())
    }
}

/// Build the geo port for the given client and API address.
#[must_use]
pub fn plugin(client: Client, base_url: &str) -> Arc<dyn GeoPort> {
    Arc::new(IbgeGeoPort::new(client, base_url))
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}
