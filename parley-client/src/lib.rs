mod cache;
mod client;
mod counters;
mod health;
mod queue;
mod rate_limiter;
mod sessions;

pub use {
    cache::CacheValue,
    client::StoreClient,
    health::StoreHealth,
    queue::JobQueue,
    rate_limiter::RateLimiter,
};
