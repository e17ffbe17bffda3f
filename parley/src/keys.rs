// queue:<name>                       - sorted set: {envelope-json  priority}
#[inline]
pub fn queue_key(queue_name: &str) -> String {
    format!("queue:{queue_name}")
}

// session:<id>                       - string: session JSON, TTL-bounded
#[inline]
pub fn session_key(session_id: &str) -> String {
    format!("session:{session_id}")
}

// conversation:<id>:context          - string: cached character context JSON
#[inline]
pub fn conversation_context_key(conversation_id: &str) -> String {
    format!("conversation:{conversation_id}:context")
}

// analytics:events:<YYYYMMDD>        - list: raw event records, 7d retention
#[inline]
pub fn events_key(day: &str) -> String {
    format!("analytics:events:{day}")
}

// metrics:events:<type>:<YYYYMMDD>   - counter
#[inline]
pub fn event_counter_key(event_type: &str, day: &str) -> String {
    format!("metrics:events:{event_type}:{day}")
}

// metrics:events:total:<YYYYMMDD>    - counter
#[inline]
pub fn total_events_counter_key(day: &str) -> String {
    format!("metrics:events:total:{day}")
}

// metrics:user:<id>:<type>:<YYYYMMDD> - counter
#[inline]
pub fn user_event_counter_key(user_id: &str, event_type: &str, day: &str) -> String {
    format!("metrics:user:{user_id}:{event_type}:{day}")
}

// metrics:hourly:<type>:<YYYYMMDDHH> - counter
#[inline]
pub fn hourly_event_counter_key(event_type: &str, hour: &str) -> String {
    format!("metrics:hourly:{event_type}:{hour}")
}

// metrics:emails:<type>:<YYYYMMDD>   - counter: dispatched email jobs
#[inline]
pub fn email_counter_key(email_type: &str, day: &str) -> String {
    format!("metrics:emails:{email_type}:{day}")
}

// metrics:worker:failed:<queue>:<YYYYMMDD> - counter: jobs lost to handler errors
#[inline]
pub fn worker_failure_counter_key(queue_name: &str, day: &str) -> String {
    format!("metrics:worker:failed:{queue_name}:{day}")
}

// performance:<endpoint>:count:<YYYYMMDDHH>    - counter
#[inline]
pub fn response_time_count_key(endpoint: &str, hour: &str) -> String {
    format!("performance:{endpoint}:count:{hour}")
}

// performance:<endpoint>:total_ms:<YYYYMMDDHH> - counter
#[inline]
pub fn response_time_total_key(endpoint: &str, hour: &str) -> String {
    format!("performance:{endpoint}:total_ms:{hour}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_keys_share_the_wire_prefix() {
        assert_eq!(queue_key("email"), "queue:email");
        assert_eq!(queue_key("user_progress"), "queue:user_progress");
    }

    #[test]
    fn cache_keys_match_the_stored_namespaces() {
        assert_eq!(session_key("abc-123"), "session:abc-123");
        assert_eq!(
            conversation_context_key("conv-9"),
            "conversation:conv-9:context"
        );
    }

    #[test]
    fn metric_keys_are_time_bucketed() {
        assert_eq!(events_key("20260806"), "analytics:events:20260806");
        assert_eq!(
            event_counter_key("conversation_started", "20260806"),
            "metrics:events:conversation_started:20260806"
        );
        assert_eq!(
            total_events_counter_key("20260806"),
            "metrics:events:total:20260806"
        );
        assert_eq!(
            user_event_counter_key("u1", "message_sent", "20260806"),
            "metrics:user:u1:message_sent:20260806"
        );
        assert_eq!(
            hourly_event_counter_key("message_sent", "2026080609"),
            "metrics:hourly:message_sent:2026080609"
        );
        assert_eq!(
            worker_failure_counter_key("analytics", "20260806"),
            "metrics:worker:failed:analytics:20260806"
        );
        assert_eq!(
            response_time_count_key("conversations", "2026080609"),
            "performance:conversations:count:2026080609"
        );
        assert_eq!(
            response_time_total_key("conversations", "2026080609"),
            "performance:conversations:total_ms:2026080609"
        );
    }
}
