use crate::error::{ParleyError, ParleyResult};
use crate::Job;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A unit of deferred work, serialized whole as the sorted-set member.
///
/// The member layout is shared with data already sitting in the store:
/// `data` carries the queue-specific payload, `priority` doubles as the
/// sort score. Two envelopes built in the same second at the same priority
/// share an `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEnvelope {
    pub id: String,
    pub queue: String,
    pub data: Value,
    pub created_at: i64,
    pub priority: i64,
}

impl JobEnvelope {
    pub fn wrap<J: Job>(job: &J, priority: i64, created_at: i64) -> ParleyResult<Self> {
        let data = serde_json::to_value(job).map_err(ParleyError::SerializeJob)?;

        Ok(Self {
            id: format!("{}:{created_at}:{priority}", J::QUEUE),
            queue: J::QUEUE.to_string(),
            data,
            created_at,
            priority,
        })
    }

    pub fn to_member(&self) -> ParleyResult<String> {
        serde_json::to_string(self).map_err(ParleyError::SerializeJob)
    }

    pub fn from_member(member: &str) -> ParleyResult<Self> {
        serde_json::from_str(member).map_err(|_err| ParleyError::InvalidJobData(member.into()))
    }

    pub fn payload<J: Job>(&self) -> ParleyResult<J> {
        serde_json::from_value(self.data.clone())
            .map_err(|err| ParleyError::InvalidJobData(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParleyError, QueueName};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct ReminderJob {
        user_id: String,
        streak: i64,
    }

    impl Job for ReminderJob {
        const QUEUE: QueueName = QueueName::Borrowed("reminders");
        const PRIORITY: i64 = 2;

        type State = ();
    }

    fn reminder() -> ReminderJob {
        ReminderJob {
            user_id: "u-42".into(),
            streak: 7,
        }
    }

    #[test]
    fn wrap_builds_the_composite_id() {
        let envelope = JobEnvelope::wrap(&reminder(), 2, 1_754_000_000).unwrap();

        assert_eq!(envelope.id, "reminders:1754000000:2");
        assert_eq!(envelope.queue, "reminders");
        assert_eq!(envelope.created_at, 1_754_000_000);
        assert_eq!(envelope.priority, 2);
    }

    #[test]
    fn member_round_trip_preserves_the_payload() {
        let envelope = JobEnvelope::wrap(&reminder(), 0, 1_754_000_000).unwrap();

        let member = envelope.to_member().unwrap();
        let decoded = JobEnvelope::from_member(&member).unwrap();

        assert_eq!(decoded, envelope);
        assert_eq!(decoded.payload::<ReminderJob>().unwrap(), reminder());
    }

    #[test]
    fn member_layout_keeps_the_stored_field_names() {
        let envelope = JobEnvelope::wrap(&reminder(), 1, 1_754_000_000).unwrap();
        let member = envelope.to_member().unwrap();
        let raw: serde_json::Value = serde_json::from_str(&member).unwrap();

        for field in ["id", "queue", "data", "created_at", "priority"] {
            assert!(raw.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(raw["data"]["user_id"], "u-42");
    }

    #[test]
    fn malformed_member_is_a_typed_error() {
        let err = JobEnvelope::from_member("{not json").unwrap_err();
        assert!(matches!(err, ParleyError::InvalidJobData(_)));
    }

    #[test]
    fn payload_type_mismatch_is_a_typed_error() {
        #[derive(Debug, Serialize, Deserialize)]
        struct OtherJob {
            count: i64,
        }

        impl Job for OtherJob {
            const QUEUE: QueueName = QueueName::Borrowed("other");

            type State = ();
        }

        let envelope = JobEnvelope::wrap(&reminder(), 0, 1).unwrap();
        let err = envelope.payload::<OtherJob>().unwrap_err();
        assert!(matches!(err, ParleyError::InvalidJobData(_)));
    }
}
