//! Error types for the server binary.
//!
//! [`ServerError`] is the top-level error type that wraps all possible
//! failure modes during startup and serving.

use crate::prisoner_search::PrisonerSearchError;

/// Top-level error for the server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: workplan_core::config::ConfigError,
    },

    /// Database connection or migration failed.
    #[error("database error: {source}")]
    Database {
        /// The underlying database error.
        #[from]
        source: workplan_db::DbError,
    },

    /// The prisoner-search client could not be created.
    #[error("prisoner-search error: {source}")]
    PrisonerSearch {
        /// The underlying client error.
        #[from]
        source: PrisonerSearchError,
    },

    /// The HTTP API failed to start or stopped with an error.
    #[error("api error: {source}")]
    Api {
        /// The underlying server error.
        #[from]
        source: workplan_api::ServerError,
    },
}
