use redis::{Script, ScriptInvocation};

/// Sliding-window admission check against one caller/action key.
///
/// Prune, count, record and TTL refresh run as a single server-side script;
/// the returned count is the in-window total before the current attempt was
/// recorded.
#[derive(Clone)]
pub struct RateLimitAction {
    script: Script,
}

impl RateLimitAction {
    pub fn new() -> Self {
        Self {
            script: Script::new(crate::lua::RATE_LIMIT),
        }
    }

    pub fn prepare_invoke(
        &self,
        key: &str,
        window_seconds: i64,
        now: RequestStamp,
    ) -> ScriptInvocation {
        let mut invoke = self.script.prepare_invoke();
        invoke.key(key);
        invoke
            .arg(now.seconds)
            .arg(window_seconds)
            .arg(now.member());
        invoke
    }
}

impl Default for RateLimitAction {
    fn default() -> Self {
        Self::new()
    }
}

/// Second-resolution score plus a sub-second member, so every attempt lands
/// as a distinct sorted-set entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestStamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl RequestStamp {
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    pub fn member(&self) -> String {
        format!("{}.{:09}", self.seconds, self.nanos)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: i64,
    pub reset_time: i64,
    pub current_count: i64,
}

impl RateLimitDecision {
    /// `count` is the in-window total before the current attempt was added;
    /// the attempt tipping the window to exactly `limit` is still allowed.
    pub fn from_window_count(
        count: i64,
        limit: i64,
        window_seconds: i64,
        now_seconds: i64,
    ) -> Self {
        Self {
            allowed: count < limit,
            remaining: (limit - count - 1).max(0),
            reset_time: now_seconds + window_seconds,
            current_count: count,
        }
    }

    /// Store-failure verdict: admission control fails open.
    pub fn fail_open(limit: i64, window_seconds: i64, now_seconds: i64) -> Self {
        Self {
            allowed: true,
            remaining: limit,
            reset_time: now_seconds + window_seconds,
            current_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_below_the_limit_are_allowed() {
        for count in 0..3 {
            let decision = RateLimitDecision::from_window_count(count, 3, 60, 1_000);
            assert!(decision.allowed, "count {count} should pass");
            assert_eq!(decision.current_count, count);
        }
    }

    #[test]
    fn the_count_reaching_the_limit_is_denied() {
        let decision = RateLimitDecision::from_window_count(3, 3, 60, 1_000);
        assert!(!decision.allowed);
        assert_eq!(decision.current_count, 3);
    }

    #[test]
    fn remaining_excludes_the_recorded_attempt_and_clamps_at_zero() {
        assert_eq!(RateLimitDecision::from_window_count(0, 3, 60, 0).remaining, 2);
        assert_eq!(RateLimitDecision::from_window_count(2, 3, 60, 0).remaining, 0);
        assert_eq!(RateLimitDecision::from_window_count(9, 3, 60, 0).remaining, 0);
    }

    #[test]
    fn reset_time_is_one_window_out() {
        let decision = RateLimitDecision::from_window_count(1, 3, 60, 1_000);
        assert_eq!(decision.reset_time, 1_060);
    }

    #[test]
    fn fail_open_reports_the_full_quota() {
        let decision = RateLimitDecision::fail_open(100, 60, 1_000);
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 100);
        assert_eq!(decision.current_count, 0);
        assert_eq!(decision.reset_time, 1_060);
    }

    #[test]
    fn stamp_members_are_distinct_below_one_second() {
        let a = RequestStamp::new(1_754_000_000, 1_000);
        let b = RequestStamp::new(1_754_000_000, 2_000);
        assert_ne!(a.member(), b.member());
        assert_eq!(a.member(), "1754000000.000001000");
    }
}
