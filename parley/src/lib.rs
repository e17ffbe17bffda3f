use serde::de::DeserializeOwned;
use serde::Serialize;

mod dequeue;
mod enqueue;
mod envelope;
pub(crate) mod error;
mod helper;
mod keys;
pub(crate) mod lua;
mod queue_size;
mod rate_limit;

pub use {
    dequeue::{DequeueAction, DequeueStatus},
    enqueue::{EnqueueAction, EnqueueStatus},
    envelope::JobEnvelope,
    error::{ParleyError, ParleyResult, RunJobError},
    keys::{
        conversation_context_key, email_counter_key, event_counter_key, events_key,
        hourly_event_counter_key, queue_key, response_time_count_key, response_time_total_key,
        session_key, total_events_counter_key, user_event_counter_key,
        worker_failure_counter_key,
    },
    queue_size::QueueSizeAction,
    rate_limit::{RateLimitAction, RateLimitDecision, RequestStamp},
};

pub type QueueName = std::borrow::Cow<'static, str>;

/// A queue category's payload schema. The queue name is the discriminator:
/// producers and consumers of one queue share this type, not a convention.
pub trait Job: Serialize + DeserializeOwned {
    const QUEUE: QueueName;

    const PRIORITY: i64 = 0;

    type State: Clone + 'static;
}
