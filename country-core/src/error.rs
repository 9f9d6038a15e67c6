use thiserror::Error;

use crate::model::SeriesError;

/// Message shown to the user for every failed lookup.
pub const LOAD_FAILED_MESSAGE: &str = "Error loading country information. Please try again.";

/// Why a pipeline run failed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("country lookup failed: {0:#}")]
    CountryLookup(#[source] anyhow::Error),

    #[error("weather lookup failed: {0:#}")]
    WeatherLookup(#[source] anyhow::Error),

    #[error("weather aggregation failed: {0}")]
    Aggregation(#[from] SeriesError),
}

impl PipelineError {
    /// The user sees the same message whatever the cause.
    pub fn user_message(&self) -> &'static str {
        LOAD_FAILED_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_variant_has_the_same_user_message() {
        let errors = [
            PipelineError::CountryLookup(anyhow::anyhow!("dns")),
            PipelineError::WeatherLookup(anyhow::anyhow!("502")),
            PipelineError::Aggregation(SeriesError::EmptyTemperature),
        ];

        for err in &errors {
            assert_eq!(err.user_message(), LOAD_FAILED_MESSAGE);
        }
    }

    #[test]
    fn display_carries_the_cause() {
        let err = PipelineError::WeatherLookup(
            anyhow::anyhow!("status 502").context("Open-Meteo forecast request failed"),
        );

        let msg = err.to_string();
        assert!(msg.starts_with("weather lookup failed"));
        assert!(msg.contains("status 502"));
    }
}
