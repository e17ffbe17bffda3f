use crate::state::AppState;
use parley::{Job, QueueName};
use parley_client::{JobQueue, StoreClient};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailJob {
    pub email_type: String,
    pub recipient: String,
    pub data: Value,
}

impl Job for EmailJob {
    const QUEUE: QueueName = QueueName::Borrowed("email");

    type State = AppState;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEventJob {
    pub event_type: String,
    pub user_id: String,
    pub event_data: Value,
    pub timestamp: i64,
}

impl Job for AnalyticsEventJob {
    const QUEUE: QueueName = QueueName::Borrowed("analytics");

    type State = AppState;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdateJob {
    pub user_id: String,
    pub action: String,
    pub data: Value,
}

impl Job for ProgressUpdateJob {
    const QUEUE: QueueName = QueueName::Borrowed("user_progress");

    type State = AppState;
}

/// Fire-and-forget producer side of the three background queue categories.
/// Handlers run a primary request to completion first; a dropped job is a
/// log line, never a request failure.
pub struct BackgroundJobs {
    email: JobQueue,
    analytics: JobQueue,
    progress: JobQueue,
}

impl BackgroundJobs {
    pub fn new(store: &StoreClient) -> Self {
        Self {
            email: store.job_queue(EmailJob::QUEUE),
            analytics: store.job_queue(AnalyticsEventJob::QUEUE),
            progress: store.job_queue(ProgressUpdateJob::QUEUE),
        }
    }

    pub async fn enqueue_email(
        &mut self,
        email_type: &str,
        recipient: &str,
        data: Value,
        priority: i64,
    ) -> bool {
        let job = EmailJob {
            email_type: email_type.into(),
            recipient: recipient.into(),
            data,
        };
        self.email.enqueue_or_drop(&job, priority).await
    }

    pub async fn enqueue_analytics_event(
        &mut self,
        event_type: &str,
        user_id: &str,
        event_data: Value,
    ) -> bool {
        let job = AnalyticsEventJob {
            event_type: event_type.into(),
            user_id: user_id.into(),
            event_data,
            timestamp: OffsetDateTime::now_utc().unix_timestamp(),
        };
        self.analytics
            .enqueue_or_drop(&job, AnalyticsEventJob::PRIORITY)
            .await
    }

    pub async fn enqueue_progress_update(
        &mut self,
        user_id: &str,
        action: &str,
        data: Value,
    ) -> bool {
        let job = ProgressUpdateJob {
            user_id: user_id.into(),
            action: action.into(),
            data,
        };
        self.progress
            .enqueue_or_drop(&job, ProgressUpdateJob::PRIORITY)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley::JobEnvelope;
    use serde_json::json;

    #[test]
    fn queue_names_match_the_stored_categories() {
        assert_eq!(EmailJob::QUEUE, "email");
        assert_eq!(AnalyticsEventJob::QUEUE, "analytics");
        assert_eq!(ProgressUpdateJob::QUEUE, "user_progress");
    }

    #[test]
    fn payloads_survive_the_envelope_round_trip() {
        let job = AnalyticsEventJob {
            event_type: "conversation_started".into(),
            user_id: "u-3".into(),
            event_data: json!({"scenario": "gallery"}),
            timestamp: 1_754_000_000,
        };

        let envelope = JobEnvelope::wrap(&job, 0, 1_754_000_001).unwrap();
        assert_eq!(envelope.queue, "analytics");

        let member = envelope.to_member().unwrap();
        let decoded = JobEnvelope::from_member(&member).unwrap();
        assert_eq!(decoded.payload::<AnalyticsEventJob>().unwrap(), job);
    }

    #[test]
    fn default_priority_is_zero() {
        assert_eq!(EmailJob::PRIORITY, 0);
        assert_eq!(ProgressUpdateJob::PRIORITY, 0);
    }
}
