use crate::keys;

/// Reports the cardinality of one queue's sorted set.
pub struct QueueSizeAction {
    queue_key: String,
}

impl QueueSizeAction {
    pub fn new(queue_name: &str) -> Self {
        Self {
            queue_key: keys::queue_key(queue_name),
        }
    }

    pub fn prepare_invoke(&self) -> redis::Cmd {
        redis::Cmd::zcard(self.queue_key.as_str())
    }
}
