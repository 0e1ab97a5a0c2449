//! Async driver running the loader's requests on the tokio runtime.
//!
//! Fetches run as spawned tasks and report back over a channel; the owner of the
//! driver applies the results on its own thread via [`LoaderDriver::drain`] or
//! [`LoaderDriver::apply_next`]. A new province selection aborts the city task of
//! the previous one, and the loader's ticket check drops anything that still
//! slips through.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::loader::{CityRequest, SelectionLoader};
use crate::model::{CityName, Item, ProvinceCode, Selection};
use crate::ports::PortError;
use crate::service::EcoletaService;

#[derive(Debug)]
/// Completed fetch waiting to be applied to the loader.
pub enum LoadEvent {
    /// Item catalog response.
    Items(Result<Vec<Item>, PortError>),
    /// Province list response.
    Provinces(Result<Vec<ProvinceCode>, PortError>),
    /// City list response tagged with the request it answers.
    Cities(CityRequest, Result<Vec<CityName>, PortError>),
}

/// Owns a [`SelectionLoader`] and runs its network loads in the background.
pub struct LoaderDriver {
    service: Arc<EcoletaService>,
    loader: SelectionLoader,
    events_tx: UnboundedSender<LoadEvent>,
    events_rx: UnboundedReceiver<LoadEvent>,
    city_task: Option<JoinHandle<()>>,
}

impl LoaderDriver {
    /// Create a driver with an empty loader.
    #[must_use]
    pub fn new(service: Arc<EcoletaService>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            service,
            loader: SelectionLoader::new(),
            events_tx,
            events_rx,
            city_task: None,
        }
    }

    /// Read access to the current lists and selection.
    #[must_use]
    pub fn loader(&self) -> &SelectionLoader {
        &self.loader
    }

    /// Service the driver fetches through.
    #[must_use]
    pub fn service(&self) -> &Arc<EcoletaService> {
        &self.service
    }

    /// Kick off the startup loads: item catalog and provinces, concurrently.
    pub fn start(&mut self) {
        self.spawn_items();
        self.spawn_provinces();
    }

    /// Change the province and, unless the placeholder was chosen, load its cities.
    pub fn select_province(&mut self, province: Selection<ProvinceCode>) {
        if province == self.loader.selection().province {
            return;
        }
        if let Some(task) = self.city_task.take() {
            task.abort();
        }
        if let Some(request) = self.loader.select_province(province) {
            self.spawn_cities(request);
        }
    }

    /// Change the city. Never touches the network.
    pub fn select_city(&mut self, city: Selection<CityName>) {
        self.loader.select_city(city);
    }

    /// Re-issue every load whose last attempt failed.
    pub fn reload_failed(&mut self) {
        if self.loader.items_status().is_failed() {
            self.spawn_items();
        }
        if self.loader.provinces_status().is_failed() {
            self.spawn_provinces();
        }
        if let Some(request) = self.loader.retry_cities() {
            if let Some(task) = self.city_task.take() {
                task.abort();
            }
            self.spawn_cities(request);
        }
    }

    /// Apply every completed fetch without waiting. Returns how many were applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completed fetch and apply it.
    pub async fn apply_next(&mut self) {
        if let Some(event) = self.events_rx.recv().await {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Items(result) => self.loader.apply_items(result),
            LoadEvent::Provinces(result) => self.loader.apply_provinces(result),
            LoadEvent::Cities(request, result) => {
                self.loader.apply_cities(&request, result);
            }
        }
    }

    fn spawn_items(&mut self) {
        self.loader.begin_items();
        let service = Arc::clone(&self.service);
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = service.items().await;
            send(&events_tx, LoadEvent::Items(result));
        });
    }

    fn spawn_provinces(&mut self) {
        self.loader.begin_provinces();
        let service = Arc::clone(&self.service);
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = service.provinces().await;
            send(&events_tx, LoadEvent::Provinces(result));
        });
    }

    fn spawn_cities(&mut self, request: CityRequest) {
        let service = Arc::clone(&self.service);
        let events_tx = self.events_tx.clone();
        self.city_task = Some(tokio::spawn(async move {
            let result = service.cities(&request.province).await;
            send(&events_tx, LoadEvent::Cities(request, result));
        }));
    }
}

impl Drop for LoaderDriver {
    fn drop(&mut self) {
        if let Some(task) = self.city_task.take() {
            task.abort();
        }
    }
}

fn send(events_tx: &UnboundedSender<LoadEvent>, event: LoadEvent) {
    if events_tx.send(event).is_err() {
        debug!("loader driver dropped before fetch completed");
    }
}
