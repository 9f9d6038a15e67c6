//! Core library for the `country` CLI.
//!
//! This crate defines:
//! - Configuration of provider endpoints and the settle delay
//! - Country-data and weather providers behind async traits
//! - The info pipeline and the selection handler that drives it
//! - Display projection and the presenter seam
//!
//! It is used by `country-cli`, but any front end that implements
//! [`Presenter`] can drive it.

pub mod config;
pub mod display;
pub mod error;
pub mod format;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod selection;

pub use config::{Config, ProviderConfig};
pub use display::{DisplayFields, DisplayState, MemoryDisplay, Presenter};
pub use error::PipelineError;
pub use model::{Coordinates, CountryRecord, WeatherSeries, WeatherSummary};
pub use pipeline::{InfoPipeline, LoadOutcome};
pub use provider::{CountryProvider, ProviderId, WeatherProvider};
pub use selection::SelectionHandler;
