use crate::queue::JobQueue;
use crate::rate_limiter::RateLimiter;
use parley::{ParleyError, ParleyResult, QueueName};
use redis::aio::ConnectionManager;

/// Shared handle to the key-value store.
///
/// Constructed once at process start and cloned into every component that
/// needs store access. `ConnectionManager` re-establishes dropped
/// connections on its own, so a clone stays valid for the process lifetime.
#[derive(Clone)]
pub struct StoreClient {
    pub(crate) manager: ConnectionManager,
}

impl StoreClient {
    pub async fn connect(redis_url: &str) -> ParleyResult<Self> {
        let client = redis::Client::open(redis_url).map_err(ParleyError::CreateRedisClient)?;
        let manager = client
            .get_tokio_connection_manager()
            .await
            .map_err(ParleyError::GetRedisConn)?;

        Ok(Self { manager })
    }

    pub fn from_manager(manager: ConnectionManager) -> Self {
        Self { manager }
    }

    pub fn job_queue(&self, queue_name: QueueName) -> JobQueue {
        JobQueue::new(queue_name, self.manager.clone())
    }

    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.manager.clone())
    }
}
