//! Handlers for the backend's queue categories.

use crate::registry::WorkerJob;
use async_trait::async_trait;
use parley_services::jobs::{AnalyticsEventJob, EmailJob, ProgressUpdateJob};
use parley_services::{day_bucket, AppState};

#[async_trait]
impl WorkerJob for AnalyticsEventJob {
    async fn execute(self, _job_id: String, mut state: AppState) -> Result<(), String> {
        let recorded = state
            .analytics
            .track_event(
                &self.event_type,
                Some(&self.user_id),
                None,
                Some(self.event_data),
            )
            .await;

        if recorded {
            Ok(())
        } else {
            Err(format!("event {} was not recorded", self.event_type))
        }
    }
}

#[async_trait]
impl WorkerJob for EmailJob {
    async fn execute(self, job_id: String, mut state: AppState) -> Result<(), String> {
        // Delivery goes through the mail provider; this side only accounts
        // for the dispatch.
        tracing::info!(
            "dispatching {} email to {} (job {job_id})",
            self.email_type,
            self.recipient
        );

        let day = day_bucket(time::OffsetDateTime::now_utc());
        let key = parley::email_counter_key(&self.email_type, &day);
        state
            .store
            .increment_counter(&key, 1, Some(86400))
            .await
            .map_err(|err| format!("{err:?}"))?;

        Ok(())
    }
}

#[async_trait]
impl WorkerJob for ProgressUpdateJob {
    async fn execute(self, _job_id: String, mut state: AppState) -> Result<(), String> {
        let event_type = format!("progress_{}", self.action);
        let recorded = state
            .analytics
            .track_event(&event_type, Some(&self.user_id), None, Some(self.data))
            .await;

        if recorded {
            Ok(())
        } else {
            Err(format!("progress update {} was not recorded", self.action))
        }
    }
}
