use parley::{
    DequeueAction, DequeueStatus, EnqueueAction, EnqueueStatus, Job, JobEnvelope, ParleyError,
    ParleyResult, QueueName, QueueSizeAction,
};
use redis::aio::ConnectionManager;

/// Producer/consumer handle for one named queue.
///
/// Enqueue never blocks on consumer availability and nothing bounds queue
/// growth; dequeue is a non-blocking poll.
pub struct JobQueue {
    queue_name: QueueName,
    manager: ConnectionManager,
    enqueue_action: EnqueueAction,
    dequeue_action: DequeueAction,
    size_action: QueueSizeAction,
}

impl JobQueue {
    pub(crate) fn new(queue_name: QueueName, manager: ConnectionManager) -> Self {
        Self {
            enqueue_action: EnqueueAction::new(&queue_name),
            dequeue_action: DequeueAction::new(&queue_name),
            size_action: QueueSizeAction::new(&queue_name),
            queue_name,
            manager,
        }
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    pub async fn enqueue<J: Job>(&mut self, job: &J) -> ParleyResult<EnqueueStatus> {
        self.enqueue_with_priority(job, J::PRIORITY).await
    }

    pub async fn enqueue_with_priority<J: Job>(
        &mut self,
        job: &J,
        priority: i64,
    ) -> ParleyResult<EnqueueStatus> {
        let created_at = time::OffsetDateTime::now_utc().unix_timestamp();
        let envelope = JobEnvelope::wrap(job, priority, created_at)?;
        self.enqueue_envelope(&envelope).await
    }

    pub async fn enqueue_envelope(&mut self, envelope: &JobEnvelope) -> ParleyResult<EnqueueStatus> {
        self.enqueue_action
            .prepare_invoke(envelope)?
            .query_async(&mut self.manager)
            .await
            .map_err(ParleyError::Enqueue)
    }

    /// Fire-and-forget enqueue: a store failure drops the job and is
    /// reported only through the return value and the log.
    pub async fn enqueue_or_drop<J: Job>(&mut self, job: &J, priority: i64) -> bool {
        match self.enqueue_with_priority(job, priority).await {
            Ok(EnqueueStatus::Added) => true,
            Ok(EnqueueStatus::Duplicate) => {
                tracing::warn!(
                    "enqueue to {}: identical job already pending",
                    self.queue_name
                );
                false
            }
            Err(err) => {
                tracing::error!("enqueue to {} failed: {err:?}", self.queue_name);
                false
            }
        }
    }

    /// Pops the lowest-priority pending job, or `None` when the queue is
    /// empty. At-most-once: a popped job that its consumer fails to process
    /// is gone.
    pub async fn dequeue(&mut self) -> ParleyResult<Option<JobEnvelope>> {
        let status: DequeueStatus = self
            .dequeue_action
            .prepare_invoke()
            .invoke_async(&mut self.manager)
            .await
            .map_err(ParleyError::Dequeue)?;

        match status {
            DequeueStatus::Popped(member) => Ok(Some(JobEnvelope::from_member(&member)?)),
            DequeueStatus::Empty => Ok(None),
            DequeueStatus::Unknown(err) => Err(ParleyError::Dequeue(redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "dequeue error",
                err,
            )))),
        }
    }

    /// Poll that treats a degraded store the same as an empty queue,
    /// logging the difference away for the caller.
    pub async fn dequeue_or_empty(&mut self) -> Option<JobEnvelope> {
        match self.dequeue().await {
            Ok(job) => job,
            Err(err) => {
                tracing::error!("dequeue from {} failed: {err:?}", self.queue_name);
                None
            }
        }
    }

    pub async fn size(&mut self) -> ParleyResult<u64> {
        self.size_action
            .prepare_invoke()
            .query_async(&mut self.manager)
            .await
            .map_err(ParleyError::QueueSize)
    }
}
