//! Two-stage country info pipeline.
//!
//! A run clears the display, shows loading, looks the country up, fetches the
//! forecast for its capital, aggregates it and renders everything in one call.
//! Loading is hidden again on every exit path of the latest run.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use tracing::{debug, error, info, warn};

use crate::{
    Config,
    display::{DisplayFields, Presenter},
    error::PipelineError,
    model::WeatherSummary,
    provider::{
        CountryProvider, WeatherProvider, country_provider_from_config,
        weather_provider_from_config,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered(DisplayFields),
    /// A newer run started (or the display was cleared) before this one finished.
    Superseded,
}

#[derive(Debug)]
pub struct InfoPipeline {
    countries: Box<dyn CountryProvider>,
    weather: Box<dyn WeatherProvider>,
    settle_delay: Duration,
    latest: AtomicU64,
}

impl InfoPipeline {
    pub fn new(
        countries: Box<dyn CountryProvider>,
        weather: Box<dyn WeatherProvider>,
        settle_delay: Duration,
    ) -> Self {
        Self { countries, weather, settle_delay, latest: AtomicU64::new(0) }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(
            country_provider_from_config(config)?,
            weather_provider_from_config(config)?,
            config.settle_delay(),
        ))
    }

    /// Mark every in-flight run as stale.
    ///
    /// Stale runs never hide their loading indicator, so the caller must
    /// clear the presenter right after.
    pub(crate) fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, token: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == token
    }

    /// Look up `country_name` and render it into `presenter`.
    ///
    /// On failure the presenter is told through [`Presenter::notify_error`]
    /// and the cause is returned. A run that was superseded while it was
    /// suspended leaves the presenter alone from then on.
    pub async fn load_country_info(
        &self,
        country_name: &str,
        presenter: &dyn Presenter,
    ) -> Result<LoadOutcome, PipelineError> {
        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        presenter.clear();
        presenter.show_loading();

        let result = self.fetch_and_compose(country_name).await;

        if !self.is_current(token) {
            match &result {
                Ok(_) => warn!(country = country_name, "discarding superseded lookup"),
                Err(err) => warn!(country = country_name, "superseded lookup failed: {err}"),
            }
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(fields) => {
                presenter.render(&fields);
                presenter.hide_loading();
                info!(country = %fields.name, "rendered country info");
                Ok(LoadOutcome::Rendered(fields))
            }
            Err(err) => {
                error!(country = country_name, "Error fetching data: {err}");
                presenter.hide_loading();
                presenter.notify_error(err.user_message());
                Err(err)
            }
        }
    }

    async fn fetch_and_compose(&self, country_name: &str) -> Result<DisplayFields, PipelineError> {
        let mut records =
            self.countries.lookup(country_name).await.map_err(PipelineError::CountryLookup)?;

        if records.is_empty() {
            return Err(PipelineError::CountryLookup(anyhow::anyhow!(
                "no country matches '{country_name}'"
            )));
        }
        if records.len() > 1 {
            debug!(matches = records.len(), "several countries matched, using the first");
        }
        let record = records.swap_remove(0);

        let at = record.capital_coordinates;
        debug!(
            capital = %record.capital,
            latitude = at.latitude,
            longitude = at.longitude,
            "country resolved"
        );

        let series = self.weather.forecast(at).await.map_err(PipelineError::WeatherLookup)?;
        let summary = WeatherSummary::from_series(&series)?;

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        Ok(DisplayFields::compose(&record, &summary))
    }
}
