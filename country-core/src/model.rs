use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Descriptive data for one country, as extracted from the country lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub common_name: String,
    pub official_name: String,
    /// First capital listed by the provider.
    pub capital: String,
    /// Language names in provider order.
    pub languages: Vec<String>,
    pub map_url: String,
    pub population: u64,
    pub flag_url: String,
    pub flag_alt: Option<String>,
    pub capital_coordinates: Coordinates,
}

/// Hourly forecast for one day, aligned by hour index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSeries {
    pub rain_mm: Vec<f64>,
    pub temperature: Vec<f64>,
    pub temperature_unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("hourly rain series is empty")]
    EmptyRain,
    #[error("hourly temperature series is empty")]
    EmptyTemperature,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSummary {
    pub total_rain_mm: f64,
    pub average_temperature: f64,
    pub temperature_unit: String,
}

impl WeatherSummary {
    pub fn from_series(series: &WeatherSeries) -> Result<Self, SeriesError> {
        if series.rain_mm.is_empty() {
            return Err(SeriesError::EmptyRain);
        }
        if series.temperature.is_empty() {
            return Err(SeriesError::EmptyTemperature);
        }

        let total_rain_mm = series.rain_mm.iter().sum();
        let average_temperature =
            series.temperature.iter().sum::<f64>() / series.temperature.len() as f64;

        Ok(Self {
            total_rain_mm,
            average_temperature,
            temperature_unit: series.temperature_unit.clone(),
        })
    }
}
