use parley_client::StoreClient;
use parley_services::jobs::BackgroundJobs;
use parley_services::AnalyticsService;
use practice_demo::{init_tracing, REDIS_URL};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let store = StoreClient::connect(REDIS_URL).await?;

    let mut jobs = BackgroundJobs::new(&store);
    jobs.enqueue_analytics_event(
        "conversation_started",
        "demo-user",
        json!({"scenario": "coffee_shop", "difficulty": "green"}),
    )
    .await;
    jobs.enqueue_email("welcome", "demo@example.com", json!({"name": "Demo"}), 0)
        .await;
    jobs.enqueue_progress_update("demo-user", "completed_session", json!({"score": 82}))
        .await;

    let mut limiter = store.rate_limiter();
    for attempt in 1..=4 {
        let decision = limiter
            .check_or_allow("demo-user:conversations", 3, 60)
            .await;
        println!(
            "attempt {attempt}: allowed={} remaining={} count={}",
            decision.allowed, decision.remaining, decision.current_count
        );
    }

    let mut store = store;
    store
        .set_session(
            "demo-session",
            &json!({"scenario": "coffee_shop", "difficulty": "green"}),
            None,
        )
        .await?;
    let session: Option<serde_json::Value> = store.get_session("demo-session").await?;
    println!("session: {session:?}");

    let mut analytics = AnalyticsService::new(store.clone());
    analytics
        .track_event(
            "conversation_started",
            Some("demo-user"),
            Some("demo-session"),
            Some(json!({"scenario": "coffee_shop"})),
        )
        .await;
    analytics.track_response_time("conversations", 120).await;

    let health = store.health_check().await;
    println!("store health: {health:?}");

    Ok(())
}
