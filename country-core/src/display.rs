//! Display projection and the presenter seam.

use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

use crate::{
    format,
    model::{CountryRecord, WeatherSummary},
};

pub const MAP_LINK_TEXT: &str = "View Map";
pub const FLAG_ALT_FALLBACK: &str = "Flag";

/// A link meant to open outside the current view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub text: String,
    pub new_context: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
}

/// Every value shown for one country, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFields {
    pub name: String,
    pub official_name: String,
    pub capital: String,
    pub languages: String,
    pub map_link: Link,
    pub population: String,
    pub flag: Image,
    pub coordinates: String,
    pub rainfall: String,
    pub temperature: String,
}

impl DisplayFields {
    pub fn compose(record: &CountryRecord, weather: &WeatherSummary) -> Self {
        Self {
            name: record.common_name.clone(),
            official_name: record.official_name.clone(),
            capital: record.capital.clone(),
            languages: record.languages.join(", "),
            map_link: Link {
                href: record.map_url.clone(),
                text: MAP_LINK_TEXT.to_string(),
                new_context: true,
            },
            population: format::group_thousands(record.population),
            flag: Image {
                src: record.flag_url.clone(),
                alt: record
                    .flag_alt
                    .clone()
                    .unwrap_or_else(|| FLAG_ALT_FALLBACK.to_string()),
            },
            coordinates: format::coordinates(&record.capital_coordinates),
            rainfall: format::rainfall(weather.total_rain_mm),
            temperature: format::temperature(
                weather.average_temperature,
                &weather.temperature_unit,
            ),
        }
    }

    /// Label/value rows in display order.
    pub fn rows(&self) -> [(&'static str, &str); 10] {
        [
            ("Name", self.name.as_str()),
            ("Official name", self.official_name.as_str()),
            ("Capital", self.capital.as_str()),
            ("Languages", self.languages.as_str()),
            ("Map", self.map_link.href.as_str()),
            ("Population", self.population.as_str()),
            ("Flag", self.flag.src.as_str()),
            ("Coordinates", self.coordinates.as_str()),
            ("Rainfall", self.rainfall.as_str()),
            ("Temperature", self.temperature.as_str()),
        ]
    }
}

/// Where the pipeline writes its output.
///
/// Methods take `&self` so one presenter can be shared by overlapping
/// invocations; implementations handle their own synchronisation.
pub trait Presenter: Send + Sync {
    /// Reset every display value to empty. Idempotent.
    fn clear(&self);
    fn show_loading(&self);
    fn hide_loading(&self);
    /// Write all display values at once.
    fn render(&self, fields: &DisplayFields);
    /// Tell the user a lookup failed.
    fn notify_error(&self, message: &str);
}

/// Current contents of the display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    pub fields: Option<DisplayFields>,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl DisplayState {
    pub fn is_cleared(&self) -> bool {
        self.fields.is_none() && !self.loading
    }
}

/// Presenter events, in the order they were received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    Cleared,
    LoadingShown,
    LoadingHidden,
    Rendered(String),
    ErrorNotified(String),
}

#[derive(Debug, Default)]
struct MemoryInner {
    state: DisplayState,
    events: Vec<DisplayEvent>,
}

/// In-memory presenter holding a [`DisplayState`].
#[derive(Debug, Default)]
pub struct MemoryDisplay {
    inner: Mutex<MemoryInner>,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DisplayState {
        self.lock().state.clone()
    }

    pub fn events(&self) -> Vec<DisplayEvent> {
        self.lock().events.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Presenter for MemoryDisplay {
    fn clear(&self) {
        let mut inner = self.lock();
        inner.state.fields = None;
        inner.state.loading = false;
        inner.events.push(DisplayEvent::Cleared);
    }

    fn show_loading(&self) {
        let mut inner = self.lock();
        inner.state.loading = true;
        inner.events.push(DisplayEvent::LoadingShown);
    }

    fn hide_loading(&self) {
        let mut inner = self.lock();
        inner.state.loading = false;
        inner.events.push(DisplayEvent::LoadingHidden);
    }

    fn render(&self, fields: &DisplayFields) {
        let mut inner = self.lock();
        inner.state.fields = Some(fields.clone());
        inner.state.last_error = None;
        inner.events.push(DisplayEvent::Rendered(fields.name.clone()));
    }

    fn notify_error(&self, message: &str) {
        let mut inner = self.lock();
        inner.state.last_error = Some(message.to_string());
        inner.events.push(DisplayEvent::ErrorNotified(message.to_string()));
    }
}
