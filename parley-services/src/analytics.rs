use parley_client::StoreClient;
use serde::Serialize;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

const EVENT_RETENTION_SECONDS: u64 = 86400 * 7;
const COUNTER_TTL_SECONDS: u64 = 86400;

const DAY_FORMAT: &[FormatItem<'static>] = format_description!("[year][month][day]");
const HOUR_FORMAT: &[FormatItem<'static>] = format_description!("[year][month][day][hour]");

pub fn day_bucket(at: OffsetDateTime) -> String {
    at.format(&DAY_FORMAT).unwrap_or_else(|_| "unknown".into())
}

pub fn hour_bucket(at: OffsetDateTime) -> String {
    at.format(&HOUR_FORMAT).unwrap_or_else(|_| "unknown".into())
}

#[derive(Debug, Serialize)]
struct EventRecord<'a> {
    event_type: &'a str,
    user_id: Option<&'a str>,
    session_id: Option<&'a str>,
    timestamp: String,
    data: Value,
}

/// Realtime event tracking over store lists and counters. The relational
/// rollups live behind the ORM and are not this service's concern.
#[derive(Clone)]
pub struct AnalyticsService {
    store: StoreClient,
}

impl AnalyticsService {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    /// Records the event for realtime processing. Store failures log and
    /// report `false`; request handling never depends on this succeeding.
    pub async fn track_event(
        &mut self,
        event_type: &str,
        user_id: Option<&str>,
        session_id: Option<&str>,
        data: Option<Value>,
    ) -> bool {
        let now = OffsetDateTime::now_utc();
        let record = EventRecord {
            event_type,
            user_id,
            session_id,
            timestamp: now.format(&Rfc3339).unwrap_or_default(),
            data: data.unwrap_or_else(|| Value::Object(Default::default())),
        };

        let payload = match serde_json::to_string(&record) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!("failed to serialize event {event_type}: {err}");
                return false;
            }
        };

        let key = parley::events_key(&day_bucket(now));
        if let Err(err) = self
            .store
            .push_list(&key, &payload, Some(EVENT_RETENTION_SECONDS))
            .await
        {
            tracing::error!("failed to record event {event_type}: {err:?}");
            return false;
        }

        self.bump_realtime_counters(event_type, user_id, now).await;
        true
    }

    async fn bump_realtime_counters(
        &mut self,
        event_type: &str,
        user_id: Option<&str>,
        now: OffsetDateTime,
    ) {
        let day = day_bucket(now);
        let hour = hour_bucket(now);

        let mut keys = vec![
            parley::event_counter_key(event_type, &day),
            parley::total_events_counter_key(&day),
            parley::hourly_event_counter_key(event_type, &hour),
        ];
        if let Some(user_id) = user_id {
            keys.push(parley::user_event_counter_key(user_id, event_type, &day));
        }

        for key in keys {
            if let Err(err) = self
                .store
                .increment_counter(&key, 1, Some(COUNTER_TTL_SECONDS))
                .await
            {
                tracing::error!("failed to bump {key}: {err:?}");
            }
        }
    }

    /// Response-time accounting under the performance prefix; the average
    /// for an hour is `total_ms / count`.
    pub async fn track_response_time(&mut self, endpoint: &str, millis: i64) -> bool {
        let hour = hour_bucket(OffsetDateTime::now_utc());
        let count_key = parley::response_time_count_key(endpoint, &hour);
        let total_key = parley::response_time_total_key(endpoint, &hour);

        let count = self
            .store
            .increment_counter(&count_key, 1, Some(COUNTER_TTL_SECONDS))
            .await;
        let total = self
            .store
            .increment_counter(&total_key, millis, Some(COUNTER_TTL_SECONDS))
            .await;

        if let Err(err) = count.and(total) {
            tracing::error!("failed to track response time for {endpoint}: {err:?}");
            return false;
        }
        true
    }

    /// Realtime counter read for one event type; absent buckets read as 0.
    pub async fn event_count(&mut self, event_type: &str, day: &str) -> i64 {
        match self
            .store
            .get_counter(&parley::event_counter_key(event_type, day))
            .await
        {
            Ok(count) => count,
            Err(err) => {
                tracing::error!("failed to read counter for {event_type}: {err:?}");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn buckets_are_compact_utc_stamps() {
        let at = datetime!(2026-08-06 09:05:00 UTC);
        assert_eq!(day_bucket(at), "20260806");
        assert_eq!(hour_bucket(at), "2026080609");
    }

    #[test]
    fn event_records_serialize_with_stable_fields() {
        let record = EventRecord {
            event_type: "conversation_started",
            user_id: Some("u-7"),
            session_id: None,
            timestamp: "2026-08-06T09:05:00Z".into(),
            data: serde_json::json!({"scenario": "park"}),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["event_type"], "conversation_started");
        assert_eq!(value["user_id"], "u-7");
        assert_eq!(value["session_id"], Value::Null);
        assert_eq!(value["data"]["scenario"], "park");
    }
}
