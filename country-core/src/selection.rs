use std::sync::Arc;

use tracing::debug;

use crate::{
    display::Presenter,
    error::PipelineError,
    pipeline::{InfoPipeline, LoadOutcome},
};

/// Reacts to the user picking a country (or picking nothing).
#[derive(Clone)]
pub struct SelectionHandler {
    pipeline: Arc<InfoPipeline>,
    presenter: Arc<dyn Presenter>,
}

impl SelectionHandler {
    pub fn new(pipeline: Arc<InfoPipeline>, presenter: Arc<dyn Presenter>) -> Self {
        Self { pipeline, presenter }
    }

    /// Handle one selection change.
    ///
    /// An empty selection clears the display and returns `Ok(None)` without
    /// touching the network. Anything else runs the pipeline to completion;
    /// by the time an error comes back the presenter has already been told.
    pub async fn on_select(&self, value: &str) -> Result<Option<LoadOutcome>, PipelineError> {
        let country = value.trim();

        if country.is_empty() {
            debug!("empty selection, clearing display");
            self.pipeline.invalidate();
            self.presenter.clear();
            return Ok(None);
        }

        self.pipeline.load_country_info(country, self.presenter.as_ref()).await.map(Some)
    }
}
