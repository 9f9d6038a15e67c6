use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Request};
use serde::Deserialize;
use tracing::debug;

use crate::model::{Coordinates, WeatherSeries};

use super::{WeatherProvider, ensure_success};

const HOURLY_FIELDS: &str = "temperature_2m,rain";
const FORECAST_DAYS: &str = "1";
const DEFAULT_TEMPERATURE_UNIT: &str = "°C";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(base_url: String, http: Client) -> Self {
        Self { base_url, http }
    }

    /// One-day hourly rain and temperature request for `at`.
    fn forecast_request(&self, at: Coordinates) -> reqwest::Result<Request> {
        self.http
            .get(&self.base_url)
            .query(&[
                ("latitude", at.latitude.to_string()),
                ("longitude", at.longitude.to_string()),
                ("hourly", HOURLY_FIELDS.to_string()),
                ("forecast_days", FORECAST_DAYS.to_string()),
            ])
            .build()
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn forecast(&self, at: Coordinates) -> Result<WeatherSeries> {
        debug!(latitude = at.latitude, longitude = at.longitude, "requesting forecast");

        let request = self
            .forecast_request(at)
            .with_context(|| format!("Invalid Open-Meteo base URL: {}", self.base_url))?;

        let res = self
            .http
            .execute(request)
            .await
            .context("Failed to send request to Open-Meteo")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read Open-Meteo response body")?;

        ensure_success("Open-Meteo forecast", status, &body)?;
        parse_forecast(&body)
    }
}

/// Parse a forecast body into the hourly rain and temperature series.
pub fn parse_forecast(body: &str) -> Result<WeatherSeries> {
    let parsed: OmForecastResponse =
        serde_json::from_str(body).context("Failed to parse Open-Meteo forecast JSON")?;

    let rain_mm = complete_series("rain", parsed.hourly.rain)?;
    let temperature = complete_series("temperature_2m", parsed.hourly.temperature_2m)?;

    let temperature_unit = parsed
        .hourly_units
        .and_then(|units| units.temperature_2m)
        .unwrap_or_else(|| DEFAULT_TEMPERATURE_UNIT.to_string());

    Ok(WeatherSeries { rain_mm, temperature, temperature_unit })
}

/// Collect one hourly series, failing on the first `null` hour.
///
/// Every hour is expected to be present. A `null` hour is a malformed
/// response and fails the run; it is not summed as zero.
fn complete_series(field: &str, values: Vec<Option<f64>>) -> Result<Vec<f64>> {
    values
        .into_iter()
        .enumerate()
        .map(|(hour, v)| v.ok_or_else(|| anyhow!("Open-Meteo {field} has no value for hour {hour}")))
        .collect()
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    rain: Vec<Option<f64>>,
    temperature_2m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmHourlyUnits {
    temperature_2m: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    hourly: OmHourly,
    hourly_units: Option<OmHourlyUnits>,
}
