//! Domain data structures for catalog items, locations, and collection points.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier of a catalog item as assigned by the backend.
pub struct ItemId(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Collectible waste category offered by the catalog.
pub struct Item {
    /// Unique identifier.
    pub id: ItemId,
    /// Display label, e.g. “Lâmpadas”.
    pub title: String,
    /// Address of the tile image shown next to the label.
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Two-letter code of a Brazilian state (UF), e.g. `DF`.
pub struct ProvinceCode(pub String);

impl fmt::Display for ProvinceCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for ProvinceCode {
    fn from(code: &str) -> Self {
        ProvinceCode(code.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Name of a municipality inside a province.
pub struct CityName(pub String);

impl fmt::Display for CityName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for CityName {
    fn from(name: &str) -> Self {
        CityName(name.to_owned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Value of a select field: either the placeholder or a concrete choice.
pub enum Selection<T> {
    /// Placeholder meaning “no choice made yet”.
    #[default]
    Unselected,
    /// A concrete choice.
    Selected(T),
}

impl<T> Selection<T> {
    /// Borrow the chosen value, if any.
    #[must_use]
    pub fn as_selected(&self) -> Option<&T> {
        match self {
            Selection::Unselected => None,
            Selection::Selected(value) => Some(value),
        }
    }

    /// Whether the placeholder is selected.
    #[must_use]
    pub fn is_unselected(&self) -> bool {
        matches!(self, Selection::Unselected)
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Selection::Unselected, Selection::Selected)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Current province and city choices of the registration form.
pub struct FormSelection {
    /// Selected province (UF).
    pub province: Selection<ProvinceCode>,
    /// Selected city; only meaningful when a province is selected.
    pub city: Selection<CityName>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Geographic position picked for a collection point.
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Initial map center used by the registration form.
    pub const DEFAULT_CENTER: Coordinates = Coordinates {
        latitude: -15.734_300_6,
        longitude: -48.289_136_8,
    };

    /// Move the position by the given deltas, keeping it within valid bounds.
    #[must_use]
    pub fn nudged(self, delta_latitude: f64, delta_longitude: f64) -> Self {
        Self {
            latitude: (self.latitude + delta_latitude).clamp(-90.0, 90.0),
            longitude: (self.longitude + delta_longitude).clamp(-180.0, 180.0),
        }
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::DEFAULT_CENTER
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier the backend assigns to a registered collection point.
pub struct PointId(pub u64);

impl fmt::Display for PointId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Validated payload sent to the backend when registering a collection point.
pub struct NewPoint {
    /// Name of the entity running the point.
    pub name: String,
    /// Contact e-mail.
    pub email: String,
    /// Contact `WhatsApp` number.
    pub whatsapp: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// City name.
    pub city: String,
    /// Province code.
    pub uf: String,
    /// Collected item categories.
    pub items: Vec<ItemId>,
}
