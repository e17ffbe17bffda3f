use crate::envelope::JobEnvelope;
use crate::error::ParleyResult;
use crate::keys;
use redis::{FromRedisValue, RedisResult};

/// Prepares inserts into one queue's sorted set, scored by priority.
pub struct EnqueueAction {
    queue_key: String,
}

impl EnqueueAction {
    pub fn new(queue_name: &str) -> Self {
        Self {
            queue_key: keys::queue_key(queue_name),
        }
    }

    pub fn prepare_invoke(&self, envelope: &JobEnvelope) -> ParleyResult<redis::Cmd> {
        let member = envelope.to_member()?;
        Ok(redis::Cmd::zadd(
            self.queue_key.as_str(),
            member,
            envelope.priority,
        ))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum EnqueueStatus {
    Added,
    /// The exact serialized member was already pending; the insert was a
    /// no-op and the existing entry is the only copy.
    Duplicate,
}

impl FromRedisValue for EnqueueStatus {
    fn from_redis_value(v: &redis::Value) -> RedisResult<Self> {
        match v {
            redis::Value::Int(1) => Ok(EnqueueStatus::Added),
            redis::Value::Int(0) => Ok(EnqueueStatus::Duplicate),
            _ => Err(redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "invalid enqueue status - invalid value type",
                format!("{v:?}"),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reply_maps_to_added() {
        let status = EnqueueStatus::from_redis_value(&redis::Value::Int(1)).unwrap();
        assert_eq!(status, EnqueueStatus::Added);
    }

    #[test]
    fn noop_reply_maps_to_duplicate() {
        let status = EnqueueStatus::from_redis_value(&redis::Value::Int(0)).unwrap();
        assert_eq!(status, EnqueueStatus::Duplicate);
    }

    #[test]
    fn unexpected_reply_is_an_error() {
        let err = EnqueueStatus::from_redis_value(&redis::Value::Status("OK".into()));
        assert!(err.is_err());
    }
}
