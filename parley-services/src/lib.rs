mod analytics;
mod config;
mod generation;
mod identity;
pub mod jobs;
mod state;

pub use {
    analytics::{day_bucket, hour_bucket, AnalyticsService},
    config::Settings,
    generation::{
        CharacterOutcome, CharacterProfile, CharacterReply, ChatTurn, ConversationContext,
        FeedbackOutcome, GenerationClient, GenerationError, GenerationHealth, ReplyOutcome,
        SessionFeedback, SuggestionNote,
    },
    identity::{HttpIdentityVerifier, IdentityError, IdentityVerifier, VerifiedIdentity},
    state::AppState,
};
