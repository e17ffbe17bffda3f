use async_trait::async_trait;
use parley::{Job, JobEnvelope, ParleyError, ParleyResult, QueueName, RunJobError};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A queue category's handler: decode the payload, do the work.
///
/// Returning `Err` loses the job; delivery is at-most-once and there is no
/// redelivery protocol to lean on.
#[async_trait]
pub trait WorkerJob: Job + 'static + Send {
    async fn execute(self, job_id: String, state: Self::State) -> Result<(), String>;
}

type JobFn<S> = Arc<
    dyn Fn(JobEnvelope, S) -> Pin<Box<dyn Future<Output = Result<(), String>> + Send>>
        + Send
        + Sync,
>;

pub(crate) struct JobFns<S>(HashMap<QueueName, JobFn<S>>);

impl<S> JobFns<S> {
    pub(crate) fn new() -> JobFns<S> {
        JobFns::<S>(HashMap::default())
    }

    pub(crate) fn reg_job(&mut self, queue: QueueName, job_fn: JobFn<S>) -> ParleyResult<()> {
        if self.0.insert(queue.clone(), job_fn).is_some() {
            Err(ParleyError::DupQueueHandler(queue))
        } else {
            Ok(())
        }
    }

    pub(crate) async fn handle(&self, envelope: JobEnvelope, state: S) -> ParleyResult<()> {
        let job_fn = match self.0.get(envelope.queue.as_str()) {
            Some(job_fn) => job_fn,
            None => {
                return Err(ParleyError::QueueHandlerMissing(QueueName::from(
                    envelope.queue.clone(),
                )));
            }
        };

        let job_data = envelope.data.to_string();
        job_fn(envelope, state)
            .await
            .map_err(|error| ParleyError::RunJobError(RunJobError::new(job_data, error)))
    }
}

pub(crate) fn decode_and_run<J, S>() -> JobFn<S>
where
    J: WorkerJob<State = S>,
    S: Send + 'static,
{
    Arc::new(|envelope, state| {
        Box::pin(async move {
            let job: J = envelope.payload().map_err(|err| format!("{err:?}"))?;
            job.execute(envelope.id, state).await
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::sync::atomic::{AtomicI64, Ordering};

    #[derive(Debug, Serialize, Deserialize)]
    struct CountingJob {
        amount: i64,
    }

    impl Job for CountingJob {
        const QUEUE: QueueName = QueueName::Borrowed("counting");

        type State = Arc<AtomicI64>;
    }

    #[async_trait]
    impl WorkerJob for CountingJob {
        async fn execute(self, _job_id: String, state: Self::State) -> Result<(), String> {
            state.fetch_add(self.amount, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct FailingJob {}

    impl Job for FailingJob {
        const QUEUE: QueueName = QueueName::Borrowed("failing");

        type State = Arc<AtomicI64>;
    }

    #[async_trait]
    impl WorkerJob for FailingJob {
        async fn execute(self, _job_id: String, _state: Self::State) -> Result<(), String> {
            Err("handler blew up".into())
        }
    }

    fn registry() -> JobFns<Arc<AtomicI64>> {
        let mut fns = JobFns::new();
        fns.reg_job(CountingJob::QUEUE, decode_and_run::<CountingJob, _>())
            .unwrap();
        fns.reg_job(FailingJob::QUEUE, decode_and_run::<FailingJob, _>())
            .unwrap();
        fns
    }

    #[tokio::test]
    async fn a_registered_handler_runs_against_the_shared_state() {
        let fns = registry();
        let state = Arc::new(AtomicI64::new(0));
        let envelope =
            JobEnvelope::wrap(&CountingJob { amount: 4 }, 0, 1_754_000_000).unwrap();

        fns.handle(envelope, state.clone()).await.unwrap();
        assert_eq!(state.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn a_handler_error_carries_the_job_data() {
        let fns = registry();
        let state = Arc::new(AtomicI64::new(0));
        let envelope = JobEnvelope::wrap(&FailingJob {}, 0, 1_754_000_000).unwrap();

        match fns.handle(envelope, state).await.unwrap_err() {
            ParleyError::RunJobError(run_err) => assert_eq!(run_err.error, "handler blew up"),
            other => panic!("expected RunJobError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn an_unregistered_queue_is_a_typed_error() {
        let fns = JobFns::<Arc<AtomicI64>>::new();
        let envelope =
            JobEnvelope::wrap(&CountingJob { amount: 1 }, 0, 1_754_000_000).unwrap();

        assert!(matches!(
            fns.handle(envelope, Arc::new(AtomicI64::new(0))).await,
            Err(ParleyError::QueueHandlerMissing(_))
        ));
    }

    #[tokio::test]
    async fn a_malformed_payload_fails_the_job_not_the_worker() {
        let fns = registry();
        let mut envelope =
            JobEnvelope::wrap(&CountingJob { amount: 1 }, 0, 1_754_000_000).unwrap();
        envelope.data = serde_json::json!({"amount": "not a number"});

        assert!(matches!(
            fns.handle(envelope, Arc::new(AtomicI64::new(0))).await,
            Err(ParleyError::RunJobError(_))
        ));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut fns = registry();
        assert!(matches!(
            fns.reg_job(CountingJob::QUEUE, decode_and_run::<CountingJob, _>()),
            Err(ParleyError::DupQueueHandler(_))
        ));
    }
}
