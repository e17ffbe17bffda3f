use parley::{ParleyError, ParleyResult, RateLimitAction, RateLimitDecision, RequestStamp};
use redis::aio::ConnectionManager;

/// Sliding-window admission control over the shared store.
pub struct RateLimiter {
    manager: ConnectionManager,
    action: RateLimitAction,
}

impl RateLimiter {
    pub(crate) fn new(manager: ConnectionManager) -> Self {
        Self {
            manager,
            action: RateLimitAction::new(),
        }
    }

    /// Count-then-add: the attempt is recorded even when the verdict is a
    /// denial, so a rejected caller still consumes a window slot.
    pub async fn check(
        &mut self,
        key: &str,
        limit: i64,
        window_seconds: i64,
    ) -> ParleyResult<RateLimitDecision> {
        let now = stamp();
        let count: i64 = self
            .action
            .prepare_invoke(key, window_seconds, now)
            .invoke_async(&mut self.manager)
            .await
            .map_err(ParleyError::RateLimit)?;

        Ok(RateLimitDecision::from_window_count(
            count,
            limit,
            window_seconds,
            now.seconds,
        ))
    }

    /// Admission control fails open: a degraded store never rejects
    /// traffic, it only loses quota accounting.
    pub async fn check_or_allow(
        &mut self,
        key: &str,
        limit: i64,
        window_seconds: i64,
    ) -> RateLimitDecision {
        match self.check(key, limit, window_seconds).await {
            Ok(decision) => decision,
            Err(err) => {
                tracing::error!("rate limit check for {key} failed: {err:?}");
                RateLimitDecision::fail_open(limit, window_seconds, stamp().seconds)
            }
        }
    }
}

fn stamp() -> RequestStamp {
    let now = time::OffsetDateTime::now_utc();
    RequestStamp::new(now.unix_timestamp(), now.nanosecond())
}
