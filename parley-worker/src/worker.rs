use crate::registry::{decode_and_run, JobFns, WorkerJob};
use parley::ParleyResult;
use parley_client::{JobQueue, StoreClient};
use parley_services::day_bucket;
use std::time::Duration;

/// Long-lived queue drainer.
///
/// Each cycle polls every registered queue category in registration order,
/// draining each before moving on, then sleeps the poll interval. There is
/// no backoff and no parallel consumption inside one worker instance.
pub struct Worker<S> {
    store: StoreClient,
    queues: Vec<JobQueue>,
    job_fns: JobFns<S>,
    state: S,
    poll_interval: Duration,
}

impl<S> Worker<S>
where
    S: Send + Sync + Clone + 'static,
{
    pub fn new(store: StoreClient, state: S, poll_interval: Duration) -> Self {
        Self {
            queues: Vec::new(),
            job_fns: JobFns::new(),
            store,
            state,
            poll_interval,
        }
    }

    pub fn reg_job<J: WorkerJob<State = S>>(mut self) -> ParleyResult<Self> {
        self.job_fns.reg_job(J::QUEUE, decode_and_run::<J, S>())?;
        self.queues.push(self.store.job_queue(J::QUEUE));
        Ok(self)
    }

    pub async fn run(mut self) -> ParleyResult<()> {
        tracing::info!(
            "worker polling {} queue categories every {:?}",
            self.queues.len(),
            self.poll_interval
        );

        loop {
            self.poll_cycle().await;
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn poll_cycle(&mut self) {
        for idx in 0..self.queues.len() {
            loop {
                // A store failure reads as an empty queue; the next cycle
                // retries.
                let envelope = match self.queues[idx].dequeue_or_empty().await {
                    Some(envelope) => envelope,
                    None => break,
                };

                let queue_name = envelope.queue.clone();
                let job_id = envelope.id.clone();
                tracing::trace!("handling job {job_id}");

                if let Err(err) = self.job_fns.handle(envelope, self.state.clone()).await {
                    tracing::error!("job {job_id} on {queue_name} failed: {err:?}");
                    self.record_failure(&queue_name).await;
                }
            }
        }
    }

    async fn record_failure(&mut self, queue_name: &str) {
        let day = day_bucket(time::OffsetDateTime::now_utc());
        let key = parley::worker_failure_counter_key(queue_name, &day);

        if let Err(err) = self.store.increment_counter(&key, 1, Some(86400)).await {
            tracing::error!("failed to record job failure for {queue_name}: {err:?}");
        }
    }
}
