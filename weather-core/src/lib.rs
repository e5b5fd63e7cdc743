//! Core library for the `weather` lookup client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weatherapi.com client behind the [`WeatherClient`] trait
//! - Shared domain models (location, conditions, snapshot)
//! - [`RequestCoordinator`], which turns lookups into observable [`FetchOutcome`]s
//!
//! It is used by `weather-cli`, but any front end can observe the coordinator.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod outcome;
pub mod provider;

pub use config::Config;
pub use coordinator::RequestCoordinator;
pub use error::FetchError;
pub use model::{CurrentConditions, Location, WeatherSnapshot};
pub use outcome::{FAILED_TO_FETCH, FetchOutcome};
pub use provider::{WeatherApiClient, WeatherClient};
