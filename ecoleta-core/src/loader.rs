//! Dependent-selection state: item catalog, provinces, and the city list keyed on
//! the selected province.
//!
//! The loader never performs I/O itself. Each `begin_*`/`select_province` call
//! describes the load the caller has to run, and each `apply_*` call folds the
//! outcome back in. City loads are tagged with a [`CityRequest`] ticket so a
//! response that arrives after the user picked another province is discarded.

use tracing::{debug, warn};

use crate::model::{CityName, FormSelection, Item, ProvinceCode, Selection};
use crate::ports::PortError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Progress of a remotely sourced list.
pub enum LoadStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The last request succeeded; the list may legitimately be empty.
    Ready,
    /// The last request failed; the list keeps its previous contents.
    Failed(String),
}

impl LoadStatus {
    /// Whether the last request failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Ticket identifying the province selection a city load belongs to.
pub struct CityRequest {
    /// Province whose cities are requested.
    pub province: ProvinceCode,
    /// Monotonic counter bumped on every province change.
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of folding a city response into the loader.
pub enum CityOutcome {
    /// The response belonged to the current selection and was applied.
    Applied,
    /// The response was for an outdated selection and was discarded.
    Stale,
}

/// Owner of the three remotely sourced lists and the province/city selection.
#[derive(Debug, Default)]
pub struct SelectionLoader {
    items: Vec<Item>,
    items_status: LoadStatus,
    provinces: Vec<ProvinceCode>,
    provinces_status: LoadStatus,
    cities: Vec<CityName>,
    cities_status: LoadStatus,
    cities_province: Option<ProvinceCode>,
    selection: FormSelection,
    city_generation: u64,
}

impl SelectionLoader {
    /// Create an empty loader with nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loaded catalog items, in backend order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Status of the item catalog.
    #[must_use]
    pub fn items_status(&self) -> &LoadStatus {
        &self.items_status
    }

    /// Loaded province codes, in API order.
    #[must_use]
    pub fn provinces(&self) -> &[ProvinceCode] {
        &self.provinces
    }

    /// Status of the province list.
    #[must_use]
    pub fn provinces_status(&self) -> &LoadStatus {
        &self.provinces_status
    }

    /// City list of the most recently applied province.
    #[must_use]
    pub fn cities(&self) -> &[CityName] {
        &self.cities
    }

    /// Status of the city list.
    #[must_use]
    pub fn cities_status(&self) -> &LoadStatus {
        &self.cities_status
    }

    /// Whether the city list was loaded for the currently selected province.
    ///
    /// False while a load for a newly picked province is pending or after it
    /// failed, when the list on screen still belongs to the previous province.
    #[must_use]
    pub fn cities_match_selection(&self) -> bool {
        self.selection.province.as_selected().is_some()
            && self.cities_province.as_ref() == self.selection.province.as_selected()
    }

    /// Current province and city selection, as shown in the form.
    #[must_use]
    pub fn selection(&self) -> &FormSelection {
        &self.selection
    }

    /// Selection fit for submission. The city is dropped unless it appears in
    /// a list loaded for the selected province.
    #[must_use]
    pub fn confirmed_selection(&self) -> FormSelection {
        let city_confirmed = self.cities_match_selection()
            && self
                .selection
                .city
                .as_selected()
                .is_some_and(|city| self.cities.contains(city));
        FormSelection {
            province: self.selection.province.clone(),
            city: if city_confirmed {
                self.selection.city.clone()
            } else {
                Selection::Unselected
            },
        }
    }

    /// Mark the item catalog as loading.
    pub fn begin_items(&mut self) {
        self.items_status = LoadStatus::Loading;
    }

    /// Fold an item catalog response in. The list is replaced wholesale on success.
    pub fn apply_items(&mut self, result: Result<Vec<Item>, PortError>) {
        match result {
            Ok(items) => {
                debug!(count = items.len(), "item catalog loaded");
                self.items = items;
                self.items_status = LoadStatus::Ready;
            }
            Err(err) => {
                warn!(error = %err, "item catalog failed to load");
                self.items_status = LoadStatus::Failed(err.to_string());
            }
        }
    }

    /// Mark the province list as loading.
    pub fn begin_provinces(&mut self) {
        self.provinces_status = LoadStatus::Loading;
    }

    /// Fold a province list response in. The list is replaced wholesale on success.
    pub fn apply_provinces(&mut self, result: Result<Vec<ProvinceCode>, PortError>) {
        match result {
            Ok(provinces) => {
                debug!(count = provinces.len(), "province list loaded");
                self.provinces = provinces;
                self.provinces_status = LoadStatus::Ready;
            }
            Err(err) => {
                warn!(error = %err, "province list failed to load");
                self.provinces_status = LoadStatus::Failed(err.to_string());
            }
        }
    }

    /// Store a new province selection.
    ///
    /// Returns the city load the caller has to run, or `None` when the
    /// placeholder was picked or the selection did not change. Any change
    /// resets the city selection and invalidates city loads still in flight.
    /// Picking the placeholder leaves the current city list untouched.
    pub fn select_province(&mut self, province: Selection<ProvinceCode>) -> Option<CityRequest> {
        if province == self.selection.province {
            return None;
        }

        self.city_generation += 1;
        self.selection.city = Selection::Unselected;
        self.selection.province = province;

        match &self.selection.province {
            Selection::Unselected => {
                if self.cities_status == LoadStatus::Loading {
                    self.cities_status = LoadStatus::Idle;
                }
                None
            }
            Selection::Selected(code) => {
                self.cities_status = LoadStatus::Loading;
                Some(CityRequest {
                    province: code.clone(),
                    generation: self.city_generation,
                })
            }
        }
    }

    /// Fold a city list response in, discarding it if its ticket is outdated.
    ///
    /// A city picked from the previous list while the load was pending is
    /// cleared if the new list does not contain it.
    pub fn apply_cities(
        &mut self,
        request: &CityRequest,
        result: Result<Vec<CityName>, PortError>,
    ) -> CityOutcome {
        let is_current = request.generation == self.city_generation
            && self.selection.province.as_selected() == Some(&request.province);
        if !is_current {
            debug!(
                province = %request.province,
                generation = request.generation,
                current = self.city_generation,
                "discarding stale city response"
            );
            return CityOutcome::Stale;
        }

        match result {
            Ok(cities) => {
                debug!(province = %request.province, count = cities.len(), "city list loaded");
                if let Selection::Selected(city) = &self.selection.city
                    && !cities.contains(city)
                {
                    self.selection.city = Selection::Unselected;
                }
                self.cities = cities;
                self.cities_province = Some(request.province.clone());
                self.cities_status = LoadStatus::Ready;
            }
            Err(err) => {
                warn!(province = %request.province, error = %err, "city list failed to load");
                self.cities_status = LoadStatus::Failed(err.to_string());
            }
        }
        CityOutcome::Applied
    }

    /// Issue a fresh ticket for the current province after a failed city load.
    pub fn retry_cities(&mut self) -> Option<CityRequest> {
        if !self.cities_status.is_failed() {
            return None;
        }
        let province = self.selection.province.as_selected()?.clone();
        self.city_generation += 1;
        self.cities_status = LoadStatus::Loading;
        Some(CityRequest {
            province,
            generation: self.city_generation,
        })
    }

    /// Store a new city selection. Purely local.
    pub fn select_city(&mut self, city: Selection<CityName>) {
        self.selection.city = city;
    }
}
