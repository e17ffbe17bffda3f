use parley_client::StoreClient;
use parley_services::jobs::{AnalyticsEventJob, EmailJob, ProgressUpdateJob};
use parley_services::AppState;
use parley_worker::Worker;
use practice_demo::{init_tracing, REDIS_URL};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let store = StoreClient::connect(REDIS_URL).await?;
    let state = AppState::new(store.clone());

    let worker = Worker::new(store, state, Duration::from_secs(5))
        .reg_job::<AnalyticsEventJob>()?
        .reg_job::<EmailJob>()?
        .reg_job::<ProgressUpdateJob>()?;

    worker.run().await.map_err(Into::into)
}
