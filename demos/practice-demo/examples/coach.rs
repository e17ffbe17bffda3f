//! Drives the generation client end to end. Without GENERATION_API_KEY the
//! calls degrade to their static fallbacks, which is the interesting path.

use parley_client::StoreClient;
use parley_services::{
    ChatTurn, GenerationClient, HttpIdentityVerifier, IdentityVerifier, Settings,
};
use practice_demo::{init_tracing, REDIS_URL};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let settings = Settings::from_env();
    let generation = GenerationClient::new(&settings);

    let health = generation.health_check().await;
    println!("generation health: {health:?}");

    let outcome = generation
        .generate_character("coffee_shop", "green", None)
        .await;
    println!(
        "character (success={}): {:?}",
        outcome.success, outcome.character
    );

    let context = parley_services::ConversationContext {
        scenario_type: "coffee_shop".into(),
        difficulty_level: "green".into(),
        character: outcome.character,
    };

    let history = vec![ChatTurn {
        sender: "user".into(),
        content: "Hi! Is this seat taken?".into(),
    }];
    let reply = generation
        .generate_reply(&context, "What are you reading?", &history)
        .await;
    println!("reply (success={}): {:?}", reply.success, reply.reply);

    let feedback = generation
        .generate_feedback(&history, &["confidence".into()], "coffee_shop")
        .await;
    println!(
        "feedback (success={}): overall={}",
        feedback.success, feedback.feedback.overall_score
    );

    // The generated context is what conversation handlers cache per session.
    let mut store = StoreClient::connect(REDIS_URL).await?;
    let context_key = parley::conversation_context_key("demo-conversation");
    store.set_cache(&context_key, &context, Some(3600)).await?;
    let cached: Option<parley_services::ConversationContext> =
        store.get_cache_as(&context_key).await?;
    println!("cached context scenario: {:?}", cached.map(|c| c.scenario_type));

    let verifier = HttpIdentityVerifier::new("http://127.0.0.1:9999", "demo-anon-key");
    match verifier.verify("not-a-real-token").await {
        Ok(identity) => println!("identity: {identity:?}"),
        Err(err) => println!("identity verification unavailable: {err:?}"),
    }

    Ok(())
}
