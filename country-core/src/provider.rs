use crate::{
    Config,
    model::{Coordinates, CountryRecord, WeatherSeries},
    provider::{openmeteo::OpenMeteoProvider, restcountries::RestCountriesProvider},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::fmt::Debug;

pub mod openmeteo;
pub mod restcountries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    RestCountries,
    OpenMeteo,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::RestCountries => "restcountries",
            ProviderId::OpenMeteo => "openmeteo",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderId::RestCountries => "https://restcountries.com/v3.1",
            ProviderId::OpenMeteo => "https://api.open-meteo.com/v1/forecast",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::RestCountries, ProviderId::OpenMeteo]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "restcountries" => Ok(ProviderId::RestCountries),
            "openmeteo" => Ok(ProviderId::OpenMeteo),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: restcountries, openmeteo."
            )),
        }
    }
}

/// Country-data lookup by name.
#[async_trait]
pub trait CountryProvider: Send + Sync + Debug {
    /// All records matching `name`, in provider order.
    async fn lookup(&self, name: &str) -> anyhow::Result<Vec<CountryRecord>>;
}

/// One-day hourly forecast lookup.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn forecast(&self, at: Coordinates) -> anyhow::Result<WeatherSeries>;
}

fn http_client(config: &Config) -> anyhow::Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Construct the country provider from config.
pub fn country_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn CountryProvider>> {
    let provider = RestCountriesProvider::new(
        config.base_url(ProviderId::RestCountries).to_owned(),
        http_client(config)?,
    );
    Ok(Box::new(provider))
}

/// Construct the weather provider from config.
pub fn weather_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenMeteoProvider::new(
        config.base_url(ProviderId::OpenMeteo).to_owned(),
        http_client(config)?,
    );
    Ok(Box::new(provider))
}

/// Fail with the status and a truncated body unless `status` is 2xx.
fn ensure_success(what: &str, status: StatusCode, body: &str) -> anyhow::Result<()> {
    if status.is_success() {
        return Ok(());
    }

    Err(anyhow::anyhow!(
        "{what} request failed with status {}: {}",
        status,
        truncate_body(body),
    ))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn provider_id_parse_is_case_insensitive() {
        let parsed = ProviderId::try_from("OpenMeteo").expect("mixed case should parse");
        assert_eq!(parsed, ProviderId::OpenMeteo);
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn providers_build_from_default_config() {
        let cfg = Config::default();

        assert!(country_provider_from_config(&cfg).is_ok());
        assert!(weather_provider_from_config(&cfg).is_ok());
    }

    #[test]
    fn ensure_success_accepts_2xx() {
        assert!(ensure_success("REST Countries", StatusCode::OK, "[]").is_ok());
        assert!(ensure_success("REST Countries", StatusCode::NO_CONTENT, "").is_ok());
    }

    #[test]
    fn ensure_success_reports_status_and_body() {
        let err = ensure_success(
            "REST Countries",
            StatusCode::NOT_FOUND,
            r#"{"status":404,"message":"Not Found"}"#,
        )
        .unwrap_err();

        let msg = err.to_string();
        assert!(msg.starts_with("REST Countries request failed with status 404 Not Found"));
        assert!(msg.contains("Not Found\"}"));
    }

    #[test]
    fn ensure_success_truncates_long_bodies() {
        let body = "x".repeat(1000);
        let err = ensure_success("Open-Meteo forecast", StatusCode::BAD_GATEWAY, &body)
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("status 502 Bad Gateway"));
        assert!(msg.ends_with("..."));
        assert!(msg.len() < 300);
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("not found"), "not found");

        let long = "é".repeat(150);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 203);
    }
}
