//! Prisoner-search HTTP client supplying prison movement history.
//!
//! Fetches `GET {base_url}/prisoner/{prison_number}/prison-periods` and
//! converts the prison periods into movement events. A `404` means the
//! service holds no history for the person and yields an empty list.

use std::time::Duration;

use reqwest::StatusCode;
use workplan_core::MovementHistory;
use workplan_core::config::PrisonerSearchConfig;
use workplan_core::movement::{PrisonerInPrisonSummary, movement_events};
use workplan_core::zone::TimelineZone;
use workplan_types::{PrisonNumber, TimelineEvent};

/// Errors raised while talking to prisoner-search.
#[derive(Debug, thiserror::Error)]
pub enum PrisonerSearchError {
    /// The HTTP client could not be built.
    #[error("client build failed: {0}")]
    Build(String),

    /// The request could not be sent or timed out.
    #[error("prisoner-search request failed: {0}")]
    Request(String),

    /// Prisoner-search answered with a non-success status.
    #[error("prisoner-search returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnosis.
        body: String,
    },

    /// The response body was not a prison periods document.
    #[error("prisoner-search response parse failed: {0}")]
    Decode(String),
}

/// Movement history backed by the prisoner-search API.
#[derive(Debug, Clone)]
pub struct PrisonerSearchClient {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    zone: TimelineZone,
}

impl PrisonerSearchClient {
    /// Create a client from configuration. Upstream wall-clock times are
    /// read in `zone`.
    pub fn new(config: &PrisonerSearchConfig, zone: TimelineZone) -> Result<Self, PrisonerSearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| PrisonerSearchError::Build(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_token: config.api_token.clone(),
            zone,
        })
    }

    /// Fetch the person's prison periods. `None` when prisoner-search does
    /// not know the person.
    pub async fn prison_periods(
        &self,
        prison_number: &PrisonNumber,
    ) -> Result<Option<PrisonerInPrisonSummary>, PrisonerSearchError> {
        let url = format!("{}/prisoner/{prison_number}/prison-periods", self.base_url);

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PrisonerSearchError::Request(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(%prison_number, "No prison periods held for prisoner");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_owned());
            return Err(PrisonerSearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let summary = response
            .json::<PrisonerInPrisonSummary>()
            .await
            .map_err(|e| PrisonerSearchError::Decode(e.to_string()))?;
        Ok(Some(summary))
    }
}

impl MovementHistory for PrisonerSearchClient {
    type Error = PrisonerSearchError;

    async fn get_movement_events(
        &self,
        prison_number: &PrisonNumber,
    ) -> Result<Vec<TimelineEvent>, Self::Error> {
        let events = self
            .prison_periods(prison_number)
            .await?
            .map(|summary| movement_events(&summary, self.zone))
            .unwrap_or_default();
        Ok(events)
    }
}
