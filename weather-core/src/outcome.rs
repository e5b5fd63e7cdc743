use std::sync::Arc;

use crate::{error::FetchError, model::WeatherSnapshot};

/// The only message ever shown to the user for a failed fetch.
pub const FAILED_TO_FETCH: &str = "Failed to Fetch the Info";

/// State of the most recent weather fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchOutcome {
    /// No fetch attempted yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Pending,
    Succeeded(Arc<WeatherSnapshot>),
    Failed(String),
}

impl FetchOutcome {
    /// Collapse a client result into a publishable outcome.
    ///
    /// Every error cause maps to [`FAILED_TO_FETCH`].
    pub fn from_result(result: Result<WeatherSnapshot, FetchError>) -> Self {
        match result {
            Ok(snapshot) => FetchOutcome::Succeeded(Arc::new(snapshot)),
            Err(_) => FetchOutcome::Failed(FAILED_TO_FETCH.to_string()),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, FetchOutcome::Pending)
    }

    /// True once a fetch has resolved either way.
    pub fn is_settled(&self) -> bool {
        matches!(self, FetchOutcome::Succeeded(_) | FetchOutcome::Failed(_))
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            FetchOutcome::Succeeded(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        match self {
            FetchOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }
}
