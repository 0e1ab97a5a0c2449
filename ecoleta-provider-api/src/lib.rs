//! Provider implementation for the Ecoleta backend (item catalog and point registration).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use ecoleta_core::{
    model::{Item, NewPoint, PointId},
    ports::{CatalogPort, PointPort, PortError},
};

/// Address the backend listens on in a local development setup.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3333";

/// Response body of `POST /points`; the backend echoes the point, we only need its id.
#[derive(Debug, Deserialize)]
struct CreatedPoint {
    id: u64,
}

/// Item catalog implementation backed by `GET /items`.
pub struct ApiCatalogPort {
    client: Client,
    base_url: String,
}

impl ApiCatalogPort {
    /// Create a new catalog port bound to the given HTTP client and backend address.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url.into()),
        }
    }
}

#[async_trait]
impl CatalogPort for ApiCatalogPort {
    async fn items(&self) -> Result<Vec<Item>, PortError> {
        let req = self.client.get(format!("{}/items", self.base_url));
        let items = fetch_json::<Vec<Item>>(req).await?;
        debug!(count = items.len(), "fetched item catalog");
        Ok(items)
    }
}

/// Point registration implementation backed by `POST /points`.
pub struct ApiPointPort {
    client: Client,
    base_url: String,
}

impl ApiPointPort {
    /// Create a new registration port bound to the given HTTP client and backend address.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url.into()),
        }
    }
}

#[async_trait]
impl PointPort for ApiPointPort {
    async fn register(&self, point: &NewPoint) -> Result<PointId, PortError> {
        let req = self
            .client
            .post(format!("{}/points", self.base_url))
            .json(point);
        let created = fetch_json::<CreatedPoint>(req).await?;
        Ok(PointId(created.id))
    }
}

/// Build the catalog and registration ports sharing one client and backend address.
#[must_use]
pub fn plugin(client: Client, base_url: &str) -> (Arc<dyn CatalogPort>, Arc<dyn PointPort>) {
    let catalog: Arc<dyn CatalogPort> = Arc::new(ApiCatalogPort::new(client.clone(), base_url));
    let points: Arc<dyn PointPort> = Arc::new(ApiPointPort::new(client, base_url));
    (catalog, points)
}

fn normalize_base_url(base_url: String) -> String {
    match base_url.strip_suffix('/') {
        Some(trimmed) => trimmed.to_owned(),
        None => base_url,
    }
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

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::{
        Json, Router,
        extract::State,
        http::StatusCode,
        routing::{get, post},
    };
    use ecoleta_core::model::ItemId;
    use tokio::net::TcpListener;

    use super::*;

    #[derive(Clone, Default)]
    struct ServerState {
        received: Arc<Mutex<Vec<NewPoint>>>,
    }

    async fn list_items() -> Json<Vec<Item>> {
        Json(vec![
            Item {
                id: ItemId(1),
                title: "Lâmpadas".into(),
                image_url: "a.svg".into(),
            },
            Item {
                id: ItemId(2),
                title: "Pilhas".into(),
                image_url: "b.svg".into(),
            },
        ])
    }

    async fn create_point(
        State(state): State<ServerState>,
        Json(point): Json<NewPoint>,
    ) -> Json<NewPointEcho> {
        state.received.lock().expect("state lock").push(point.clone());
        Json(NewPointEcho { id: 42, point })
    }

    #[derive(serde::Serialize)]
    struct NewPointEcho {
        id: u64,
        #[serde(flatten)]
        point: NewPoint,
    }

    async fn spawn_backend(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve");
        });
        format!("http://{addr}/")
    }

    fn sample_point() -> NewPoint {
        NewPoint {
            name: "Mercado Verde".into(),
            email: "contato@verde.org".into(),
            whatsapp: "+55 61 99999-0000".into(),
            latitude: -15.7,
            longitude: -48.2,
            city: "Brasília".into(),
            uf: "DF".into(),
            items: vec![ItemId(1), ItemId(2)],
        }
    }

    #[tokio::test]
    async fn items_keep_backend_order() {
        let base_url = spawn_backend(Router::new().route("/items", get(list_items))).await;
        let port = ApiCatalogPort::new(Client::new(), base_url);

        let items = port.items().await.expect("items");

        let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["Lâmpadas", "Pilhas"]);
        let images: Vec<&str> = items.iter().map(|item| item.image_url.as_str()).collect();
        assert_eq!(images, vec!["a.svg", "b.svg"]);
    }

    #[tokio::test]
    async fn server_error_is_a_network_failure() {
        let router = Router::new().route(
            "/items",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let base_url = spawn_backend(router).await;
        let port = ApiCatalogPort::new(Client::new(), base_url);

        let err = port.items().await.expect_err("500 must fail");
        assert!(matches!(err, PortError::Network(_)));
    }

    #[tokio::test]
    async fn register_posts_point_and_returns_id() {
        let state = ServerState::default();
        let router = Router::new()
            .route("/points", post(create_point))
            .with_state(state.clone());
        let base_url = spawn_backend(router).await;
        let port = ApiPointPort::new(Client::new(), base_url);

        let id = port.register(&sample_point()).await.expect("register");

        assert_eq!(id, PointId(42));
        let received = state.received.lock().expect("state lock").clone();
        assert_eq!(received, vec![sample_point()]);
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        assert_eq!(
            normalize_base_url("http://localhost:3333/".into()),
            "http://localhost:3333"
        );
    }
}
