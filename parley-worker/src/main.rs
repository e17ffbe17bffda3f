use parley_client::StoreClient;
use parley_services::jobs::{AnalyticsEventJob, EmailJob, ProgressUpdateJob};
use parley_services::AppState;
use parley_worker::{Worker, WorkerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = WorkerConfig::from_env();
    tracing::info!("worker starting - environment: {}", config.environment);

    let store = StoreClient::connect(&config.redis_url).await?;
    let state = AppState::new(store.clone());

    let worker = Worker::new(store, state, config.poll_interval)
        .reg_job::<AnalyticsEventJob>()?
        .reg_job::<EmailJob>()?
        .reg_job::<ProgressUpdateJob>()?;

    worker.run().await.map_err(Into::into)
}

fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .with_env_filter("parley=TRACE,parley_worker=TRACE")
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}
