pub(crate) const DEQUEUE: &str = include_str!("dequeue.lua");
pub(crate) const RATE_LIMIT: &str = include_str!("rate_limit.lua");
