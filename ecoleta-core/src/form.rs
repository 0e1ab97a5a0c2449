//! Registration form state and validation.

use std::collections::BTreeSet;

use crate::model::{Coordinates, FormSelection, ItemId, NewPoint, Selection};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// Reasons a registration form cannot be submitted.
pub enum FormError {
    /// Entity name is blank.
    #[error("Entity name is required")]
    MissingName,
    /// E-mail address is blank or malformed.
    #[error("A valid e-mail address is required")]
    InvalidEmail,
    /// `WhatsApp` number is blank or contains unexpected characters.
    #[error("A valid WhatsApp number is required")]
    InvalidWhatsapp,
    /// No province chosen.
    #[error("Select a UF")]
    ProvinceNotSelected,
    /// No city chosen.
    #[error("Select a city")]
    CityNotSelected,
    /// No collectible item chosen.
    #[error("Select at least one item")]
    NoItemsSelected,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Locally edited fields of the collection point registration form.
pub struct PointForm {
    /// Name of the entity.
    pub name: String,
    /// Contact e-mail.
    pub email: String,
    /// Contact `WhatsApp` number.
    pub whatsapp: String,
    /// Position picked on the map.
    pub position: Coordinates,
    /// Chosen item categories.
    pub items: BTreeSet<ItemId>,
}

impl PointForm {
    /// Flip membership of an item in the selection. Returns whether it is now selected.
    pub fn toggle_item(&mut self, id: ItemId) -> bool {
        if self.items.remove(&id) {
            false
        } else {
            self.items.insert(id);
            true
        }
    }

    /// Whether the item is currently selected.
    #[must_use]
    pub fn is_item_selected(&self, id: ItemId) -> bool {
        self.items.contains(&id)
    }

    /// Validate all fields together with the location selection and build the payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormError`] found, checked in form order.
    pub fn validate(&self, selection: &FormSelection) -> Result<NewPoint, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }

        let email = self.email.trim();
        if !is_plausible_email(email) {
            return Err(FormError::InvalidEmail);
        }

        let whatsapp = self.whatsapp.trim();
        if !is_plausible_phone(whatsapp) {
            return Err(FormError::InvalidWhatsapp);
        }

        let Selection::Selected(uf) = &selection.province else {
            return Err(FormError::ProvinceNotSelected);
        };
        let Selection::Selected(city) = &selection.city else {
            return Err(FormError::CityNotSelected);
        };

        if self.items.is_empty() {
            return Err(FormError::NoItemsSelected);
        }

        Ok(NewPoint {
            name: name.to_owned(),
            email: email.to_owned(),
            whatsapp: whatsapp.to_owned(),
            latitude: self.position.latitude,
            longitude: self.position.longitude,
            city: city.0.clone(),
            uf: uf.0.clone(),
            items: self.items.iter().copied().collect(),
        })
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

fn is_plausible_phone(phone: &str) -> bool {
    phone.chars().any(|ch| ch.is_ascii_digit())
        && phone
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | ' ' | '-' | '(' | ')'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CityName, ProvinceCode};

    fn filled_form() -> PointForm {
        let mut form = PointForm {
            name: "  Mercado Verde ".into(),
            email: "contato@verde.org".into(),
            whatsapp: "+55 61 99999-0000".into(),
            ..PointForm::default()
        };
        form.toggle_item(ItemId(2));
        form.toggle_item(ItemId(1));
        form
    }

    fn df_selection() -> FormSelection {
        FormSelection {
            province: Selection::Selected(ProvinceCode::from("DF")),
            city: Selection::Selected(CityName::from("Brasília")),
        }
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut form = PointForm::default();
        assert!(form.toggle_item(ItemId(3)));
        assert!(form.is_item_selected(ItemId(3)));
        assert!(!form.toggle_item(ItemId(3)));
        assert!(!form.is_item_selected(ItemId(3)));
    }

    #[test]
    fn valid_form_builds_payload() {
        let point = filled_form().validate(&df_selection()).expect("valid form");
        assert_eq!(point.name, "Mercado Verde");
        assert_eq!(point.uf, "DF");
        assert_eq!(point.city, "Brasília");
        assert_eq!(point.items, vec![ItemId(1), ItemId(2)]);
        assert!((point.latitude - Coordinates::DEFAULT_CENTER.latitude).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_each_missing_field() {
        let selection = df_selection();

        let mut form = filled_form();
        form.name = "   ".into();
        assert_eq!(form.validate(&selection), Err(FormError::MissingName));

        let mut form = filled_form();
        form.email = "contato@verde".into();
        assert_eq!(form.validate(&selection), Err(FormError::InvalidEmail));

        let mut form = filled_form();
        form.whatsapp = "call me".into();
        assert_eq!(form.validate(&selection), Err(FormError::InvalidWhatsapp));

        let mut form = filled_form();
        form.items.clear();
        assert_eq!(form.validate(&selection), Err(FormError::NoItemsSelected));
    }

    #[test]
    fn requires_province_and_city() {
        let form = filled_form();

        let no_province = FormSelection::default();
        assert_eq!(
            form.validate(&no_province),
            Err(FormError::ProvinceNotSelected)
        );

        let no_city = FormSelection {
            province: Selection::Selected(ProvinceCode::from("DF")),
            city: Selection::Unselected,
        };
        assert_eq!(form.validate(&no_city), Err(FormError::CityNotSelected));
    }
}
