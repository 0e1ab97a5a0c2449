use ecoleta_core::{
    driver::LoaderDriver,
    form::PointForm,
    model::{CityName, Item, ProvinceCode, Selection},
};

/// Degrees the position moves per arrow key press.
pub(crate) const POSITION_STEP: f64 = 0.0005;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Counter,
    Name,
    Email,
    Whatsapp,
    Position,
    Province,
    City,
    Items,
    Submit,
}

impl Focus {
    const ORDER: [Focus; 9] = [
        Focus::Counter,
        Focus::Name,
        Focus::Email,
        Focus::Whatsapp,
        Focus::Position,
        Focus::Province,
        Focus::City,
        Focus::Items,
        Focus::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER
            .iter()
            .position(|focus| *focus == self)
            .unwrap_or_default()
    }

    pub(crate) fn next(self) -> Self {
        let index = (self.position() + 1) % Self::ORDER.len();
        Self::ORDER.get(index).copied().unwrap_or(Focus::Counter)
    }

    pub(crate) fn prev(self) -> Self {
        let index = (self.position() + Self::ORDER.len() - 1) % Self::ORDER.len();
        Self::ORDER.get(index).copied().unwrap_or(Focus::Counter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Prev,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StatusMessage {
    Info(String),
    Error(String),
}

pub(crate) struct App {
    pub driver: LoaderDriver,

    pub counter: u32,
    pub focus: Focus,

    pub form: PointForm,
    pub item_cursor: usize,

    pub is_submitting: bool,
    pub status: Option<StatusMessage>,
}

impl App {
    pub(crate) fn new(driver: LoaderDriver) -> Self {
        Self {
            driver,
            counter: 0,
            focus: Focus::Name,
            form: PointForm::default(),
            item_cursor: 0,
            is_submitting: false,
            status: None,
        }
    }

    pub(crate) fn increment_counter(&mut self) {
        self.counter = self.counter.saturating_add(1);
    }

    /// Text buffer behind the focused field, if it is a text input.
    pub(crate) fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Name => Some(&mut self.form.name),
            Focus::Email => Some(&mut self.form.email),
            Focus::Whatsapp => Some(&mut self.form.whatsapp),
            _ => None,
        }
    }

    pub(crate) fn nudge_position(&mut self, delta_latitude: f64, delta_longitude: f64) {
        self.form.position = self.form.position.nudged(delta_latitude, delta_longitude);
    }

    /// Index in the province select; 0 is the placeholder.
    pub(crate) fn province_index(&self) -> usize {
        let loader = self.driver.loader();
        loader
            .selection()
            .province
            .as_selected()
            .and_then(|code| loader.provinces().iter().position(|uf| uf == code))
            .map_or(0, |index| index + 1)
    }

    /// Index in the city select; 0 is the placeholder.
    pub(crate) fn city_index(&self) -> usize {
        let loader = self.driver.loader();
        loader
            .selection()
            .city
            .as_selected()
            .and_then(|name| loader.cities().iter().position(|city| city == name))
            .map_or(0, |index| index + 1)
    }

    pub(crate) fn step_province(&mut self, step: Step) {
        let provinces = self.driver.loader().provinces();
        let index = step_index(self.province_index(), provinces.len(), step);
        let selection: Selection<ProvinceCode> = index
            .checked_sub(1)
            .and_then(|pos| provinces.get(pos).cloned())
            .into();
        self.driver.select_province(selection);
    }

    /// Step through the city list. Ignored while the list on screen still
    /// belongs to a previously selected province.
    pub(crate) fn step_city(&mut self, step: Step) {
        if !self.driver.loader().cities_match_selection() {
            return;
        }
        let cities = self.driver.loader().cities();
        let index = step_index(self.city_index(), cities.len(), step);
        let selection: Selection<CityName> = index
            .checked_sub(1)
            .and_then(|pos| cities.get(pos).cloned())
            .into();
        self.driver.select_city(selection);
    }

    pub(crate) fn move_item_cursor(&mut self, step: Step) {
        let count = self.driver.loader().items().len();
        if count == 0 {
            self.item_cursor = 0;
            return;
        }
        self.item_cursor = match step {
            Step::Prev => self.item_cursor.saturating_sub(1),
            Step::Next => (self.item_cursor + 1).min(count - 1),
        };
    }

    pub(crate) fn current_item(&self) -> Option<&Item> {
        self.driver.loader().items().get(self.item_cursor)
    }

    pub(crate) fn toggle_current_item(&mut self) {
        if let Some(id) = self.current_item().map(|item| item.id) {
            self.form.toggle_item(id);
        }
    }

    /// Apply finished loads and keep cursors inside the refreshed lists.
    pub(crate) fn sync_loads(&mut self) {
        if self.driver.drain() == 0 {
            return;
        }
        let count = self.driver.loader().items().len();
        if self.item_cursor >= count {
            self.item_cursor = count.saturating_sub(1);
        }
    }
}

/// Move within a select of `options` entries plus the placeholder at index 0.
fn step_index(current: usize, options: usize, step: Step) -> usize {
    match step {
        Step::Prev => current.saturating_sub(1),
        Step::Next => (current + 1).min(options),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use ecoleta_core::{
        backends::Backends,
        model::{ItemId, NewPoint, PointId},
        ports::{CatalogPort, GeoPort, PointPort, PortError},
        service::EcoletaService,
    };

    use super::*;

    #[derive(Default)]
    pub(crate) struct StubBackend {
        pub city_calls: Mutex<Vec<String>>,
        pub registered: Mutex<Vec<NewPoint>>,
    }

    #[async_trait]
    impl CatalogPort for StubBackend {
        async fn items(&self) -> Result<Vec<Item>, PortError> {
            Ok(vec![
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
    }

    #[async_trait]
    impl GeoPort for StubBackend {
        async fn provinces(&self) -> Result<Vec<ProvinceCode>, PortError> {
            Ok(vec![ProvinceCode::from("DF"), ProvinceCode::from("GO")])
        }

        async fn cities(&self, province: &ProvinceCode) -> Result<Vec<CityName>, PortError> {
            self.city_calls
                .lock()
                .expect("calls lock")
                .push(province.0.clone());
            Ok(match province.0.as_str() {
                "DF" => vec![CityName::from("Brasília")],
                _ => vec![CityName::from("Goiânia"), CityName::from("Anápolis")],
            })
        }
    }

    #[async_trait]
    impl PointPort for StubBackend {
        async fn register(&self, point: &NewPoint) -> Result<PointId, PortError> {
            self.registered
                .lock()
                .expect("registered lock")
                .push(point.clone());
            Ok(PointId(7))
        }
    }

    /// App with items and provinces already loaded.
    pub(crate) async fn loaded_app() -> (App, Arc<StubBackend>) {
        let backend = Arc::new(StubBackend::default());
        let backends = Backends::new(
            Arc::clone(&backend) as Arc<dyn CatalogPort>,
            Arc::clone(&backend) as Arc<dyn GeoPort>,
            Arc::clone(&backend) as Arc<dyn PointPort>,
        );
        let mut driver = LoaderDriver::new(Arc::new(EcoletaService::new(backends)));
        driver.start();
        driver.apply_next().await;
        driver.apply_next().await;
        (App::new(driver), backend)
    }

    pub(crate) async fn settle(app: &mut App) {
        tokio::time::sleep(Duration::from_millis(10)).await;
        app.sync_loads();
    }

    #[test]
    fn focus_cycles_both_ways() {
        assert_eq!(Focus::Submit.next(), Focus::Counter);
        assert_eq!(Focus::Counter.prev(), Focus::Submit);
        assert_eq!(Focus::Name.next(), Focus::Email);
    }

    #[test]
    fn step_index_clamps_to_placeholder_and_last_option() {
        assert_eq!(step_index(0, 3, Step::Prev), 0);
        assert_eq!(step_index(3, 3, Step::Next), 3);
        assert_eq!(step_index(1, 3, Step::Next), 2);
    }

    #[tokio::test]
    async fn stepping_province_loads_its_cities() {
        let (mut app, backend) = loaded_app().await;

        app.step_province(Step::Next);
        settle(&mut app).await;

        assert_eq!(app.province_index(), 1);
        assert_eq!(app.driver.loader().cities(), &[CityName::from("Brasília")]);
        assert_eq!(
            *backend.city_calls.lock().expect("calls lock"),
            vec!["DF".to_owned()]
        );

        app.step_city(Step::Next);
        assert_eq!(app.city_index(), 1);
    }

    #[tokio::test]
    async fn stepping_back_to_placeholder_skips_city_load() {
        let (mut app, backend) = loaded_app().await;

        app.step_province(Step::Next);
        settle(&mut app).await;
        app.step_province(Step::Prev);
        settle(&mut app).await;

        assert_eq!(app.province_index(), 0);
        assert_eq!(backend.city_calls.lock().expect("calls lock").len(), 1);
        assert_eq!(app.driver.loader().cities(), &[CityName::from("Brasília")]);
    }

    #[tokio::test]
    async fn city_stepping_without_province_stays_local() {
        let (mut app, backend) = loaded_app().await;

        app.step_city(Step::Next);
        settle(&mut app).await;

        assert_eq!(app.city_index(), 0);
        assert!(backend.city_calls.lock().expect("calls lock").is_empty());
    }

    #[tokio::test]
    async fn previous_province_cities_cannot_be_picked_while_loading() {
        let (mut app, _backend) = loaded_app().await;

        app.step_province(Step::Next);
        settle(&mut app).await;
        app.step_province(Step::Next);

        app.step_city(Step::Next);

        assert_eq!(app.driver.loader().cities(), &[CityName::from("Brasília")]);
        assert!(app.driver.loader().selection().city.is_unselected());
        assert_eq!(app.city_index(), 0);

        settle(&mut app).await;
        app.step_city(Step::Next);
        assert_eq!(
            app.driver.loader().selection().city,
            Selection::Selected(CityName::from("Goiânia"))
        );
    }

    #[tokio::test]
    async fn item_cursor_toggles_selection() {
        let (mut app, _backend) = loaded_app().await;

        app.move_item_cursor(Step::Next);
        app.move_item_cursor(Step::Next);
        app.toggle_current_item();

        assert_eq!(app.item_cursor, 1);
        assert!(app.form.is_item_selected(ItemId(2)));
        assert!(!app.form.is_item_selected(ItemId(1)));
    }
}
