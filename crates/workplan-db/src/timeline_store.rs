//! Native event store on the `timeline` and `timeline_event` tables.
//!
//! A timeline row is created the first time an event is recorded for a
//! person. Events are appended with one `UNNEST` insert per batch, all inside
//! the same transaction as the timeline upsert.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use workplan_core::NativeEventStore;
use workplan_types::{
    ContextKey, CorrelationId, PrisonId, PrisonNumber, Timeline, TimelineEvent,
    TimelineEventId, TimelineEventType, TimelineId,
};

use crate::error::DbError;

/// Default batch size for event inserts.
const DEFAULT_BATCH_SIZE: usize = 100;

/// Operations on the `timeline` and `timeline_event` tables.
#[derive(Debug, Clone)]
pub struct TimelineStore {
    pool: PgPool,
    batch_size: usize,
}

impl TimelineStore {
    /// Create a store on a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self {
            pool,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the batch size for inserts. Zero is treated as one.
    #[must_use]
    pub const fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = if size == 0 { 1 } else { size };
        self
    }

    /// Load a person's timeline with its events in order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if a query fails, or a decode error if
    /// a stored row cannot be turned back into an event.
    pub async fn load(&self, prison_number: &PrisonNumber) -> Result<Option<Timeline>, DbError> {
        let timeline_id =
            sqlx::query_scalar::<_, Uuid>(r"SELECT id FROM timeline WHERE prison_number = $1")
                .bind(prison_number.as_str())
                .fetch_optional(&self.pool)
                .await?;

        let Some(timeline_id) = timeline_id else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, TimelineEventRow>(
            r"SELECT reference, source_reference, event_type, contextual_info, prison_id,
                     actioned_by, actioned_by_display_name, event_timestamp, correlation_id
              FROM timeline_event
              WHERE timeline_id = $1
              ORDER BY event_timestamp, seq",
        )
        .bind(timeline_id)
        .fetch_all(&self.pool)
        .await?;

        let events = rows
            .into_iter()
            .map(TimelineEventRow::into_event)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(%prison_number, count = events.len(), "Loaded stored timeline");

        Ok(Some(Timeline::new(
            TimelineId(timeline_id),
            prison_number.clone(),
            events,
        )))
    }

    /// Append events to a person's timeline, creating it if needed.
    ///
    /// All batches share one transaction: either every event is recorded
    /// or none is.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if an insert fails, or
    /// [`DbError::Serialization`] if contextual information cannot be
    /// encoded.
    pub async fn append(
        &self,
        prison_number: &PrisonNumber,
        events: &[TimelineEvent],
    ) -> Result<(), DbError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        let timeline_id = sqlx::query_scalar::<_, Uuid>(
            r"INSERT INTO timeline (id, prison_number)
              VALUES ($1, $2)
              ON CONFLICT (prison_number) DO UPDATE SET updated_at = now()
              RETURNING id",
        )
        .bind(TimelineId::new().into_inner())
        .bind(prison_number.as_str())
        .fetch_one(&mut *tx)
        .await?;

        for chunk in events.chunks(self.batch_size) {
            let len = chunk.len();
            let mut references = Vec::with_capacity(len);
            let mut source_references = Vec::with_capacity(len);
            let mut event_types = Vec::with_capacity(len);
            let mut contexts = Vec::with_capacity(len);
            let mut prison_ids = Vec::with_capacity(len);
            let mut actors = Vec::with_capacity(len);
            let mut display_names: Vec<Option<String>> = Vec::with_capacity(len);
            let mut timestamps: Vec<DateTime<Utc>> = Vec::with_capacity(len);
            let mut correlation_ids = Vec::with_capacity(len);

            for event in chunk {
                references.push(event.reference().into_inner());
                source_references.push(event.source_reference().to_owned());
                event_types.push(event_type_to_db(event.event_type()).to_owned());
                contexts.push(serde_json::to_value(event.contextual_info())?);
                prison_ids.push(event.prison_id().as_str().to_owned());
                actors.push(event.actioned_by().to_owned());
                display_names.push(event.actioned_by_display_name().map(str::to_owned));
                timestamps.push(event.timestamp());
                correlation_ids.push(event.correlation_id().into_inner());
            }

            sqlx::query(
                r"INSERT INTO timeline_event (timeline_id, reference, source_reference, event_type, contextual_info,
                                              prison_id, actioned_by, actioned_by_display_name, event_timestamp, correlation_id)
                  SELECT $1::UUID, * FROM UNNEST($2::UUID[], $3::TEXT[], $4::TEXT[], $5::JSONB[],
                                           $6::TEXT[], $7::TEXT[], $8::TEXT[], $9::TIMESTAMPTZ[], $10::UUID[])",
            )
            .bind(timeline_id)
            .bind(&references)
            .bind(&source_references)
            .bind(&event_types)
            .bind(&contexts)
            .bind(&prison_ids)
            .bind(&actors)
            .bind(&display_names)
            .bind(&timestamps)
            .bind(&correlation_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(%prison_number, count = events.len(), "Recorded timeline events");
        Ok(())
    }
}

impl NativeEventStore for TimelineStore {
    type Error = DbError;

    async fn get_timeline(
        &self,
        prison_number: &PrisonNumber,
    ) -> Result<Option<Timeline>, Self::Error> {
        self.load(prison_number).await
    }

    async fn record_event(
        &self,
        prison_number: &PrisonNumber,
        event: TimelineEvent,
    ) -> Result<(), Self::Error> {
        self.append(prison_number, std::slice::from_ref(&event)).await
    }

    async fn record_events(
        &self,
        prison_number: &PrisonNumber,
        events: Vec<TimelineEvent>,
    ) -> Result<(), Self::Error> {
        self.append(prison_number, &events).await
    }
}

/// A row from the `timeline_event` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TimelineEventRow {
    /// Event reference.
    pub reference: Uuid,
    /// Identifier of the domain record the event is about.
    pub source_reference: String,
    /// Event type as stored.
    pub event_type: String,
    /// Context key/value pairs as a JSON object.
    pub contextual_info: serde_json::Value,
    /// Prison the event happened in.
    pub prison_id: String,
    /// Actor that caused the event.
    pub actioned_by: String,
    /// Actor's display name, if known.
    pub actioned_by_display_name: Option<String>,
    /// When the event happened.
    pub event_timestamp: DateTime<Utc>,
    /// Correlation id shared by events raised together.
    pub correlation_id: Uuid,
}

impl TimelineEventRow {
    /// Rebuild the event this row was written from.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UnknownEventType`] or [`DbError::Serialization`]
    /// if the row holds values this build cannot read.
    pub fn into_event(self) -> Result<TimelineEvent, DbError> {
        let event_type = event_type_from_db(&self.event_type)
            .ok_or_else(|| DbError::UnknownEventType(self.event_type.clone()))?;
        let contextual_info: BTreeMap<ContextKey, String> =
            serde_json::from_value(self.contextual_info)?;

        let mut event = TimelineEvent::new(
            self.source_reference,
            event_type,
            PrisonId::new(self.prison_id),
            self.actioned_by,
        )
        .with_reference(TimelineEventId(self.reference))
        .with_contextual_info(contextual_info)
        .with_timestamp(self.event_timestamp)
        .with_correlation_id(CorrelationId(self.correlation_id));

        if let Some(name) = self.actioned_by_display_name {
            event = event.with_actioned_by_display_name(name);
        }
        Ok(event)
    }
}

/// Convert a [`TimelineEventType`] to its stored string.
pub const fn event_type_to_db(et: TimelineEventType) -> &'static str {
    match et {
        TimelineEventType::InductionCreated => "induction_created",
        TimelineEventType::InductionUpdated => "induction_updated",
        TimelineEventType::InductionScheduleCreated => "induction_schedule_created",
        TimelineEventType::InductionScheduleUpdated => "induction_schedule_updated",
        TimelineEventType::InductionScheduleStatusUpdated => "induction_schedule_status_updated",
        TimelineEventType::ActionPlanCreated => "action_plan_created",
        TimelineEventType::GoalCreated => "goal_created",
        TimelineEventType::GoalUpdated => "goal_updated",
        TimelineEventType::GoalCompleted => "goal_completed",
        TimelineEventType::GoalArchived => "goal_archived",
        TimelineEventType::GoalUnarchived => "goal_unarchived",
        TimelineEventType::StepUpdated => "step_updated",
        TimelineEventType::StepNotStarted => "step_not_started",
        TimelineEventType::StepStarted => "step_started",
        TimelineEventType::StepCompleted => "step_completed",
        TimelineEventType::ActionPlanReviewCompleted => "action_plan_review_completed",
        TimelineEventType::ActionPlanReviewScheduleCreated => "action_plan_review_schedule_created",
        TimelineEventType::ActionPlanReviewScheduleStatusUpdated => {
            "action_plan_review_schedule_status_updated"
        }
        TimelineEventType::PrisonAdmission => "prison_admission",
        TimelineEventType::PrisonRelease => "prison_release",
        TimelineEventType::PrisonTransfer => "prison_transfer",
    }
}

/// Parse a stored event type string.
pub fn event_type_from_db(value: &str) -> Option<TimelineEventType> {
    TimelineEventType::ALL
        .into_iter()
        .find(|et| event_type_to_db(*et) == value)
}
