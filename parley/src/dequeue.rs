use crate::helper::read_value_as_str;
use crate::keys;
use redis::{FromRedisValue, RedisResult, Script, ScriptInvocation};

/// Pops the lowest-priority member of one queue's sorted set.
///
/// Read and remove run inside a single server-side script, so concurrent
/// consumers never observe the same member.
#[derive(Clone)]
pub struct DequeueAction {
    script: Script,
    queue_key: String,
}

impl DequeueAction {
    pub fn new(queue_name: &str) -> Self {
        Self {
            script: Script::new(crate::lua::DEQUEUE),
            queue_key: keys::queue_key(queue_name),
        }
    }

    pub fn prepare_invoke(&self) -> ScriptInvocation {
        let mut invoke = self.script.prepare_invoke();
        invoke.key(self.queue_key.as_str());
        invoke
    }
}

#[derive(Debug)]
pub enum DequeueStatus {
    /// The popped member, still serialized.
    Popped(String),
    Empty,
    Unknown(String),
}

impl TryFrom<&[redis::Value]> for DequeueStatus {
    type Error = redis::RedisError;

    fn try_from(values: &[redis::Value]) -> Result<Self, Self::Error> {
        let mut iter = values.iter();
        let action =
            read_value_as_str(iter.next(), "invalid dequeue status - invalid action")?;

        let status = match action.as_ref() {
            "popped" => {
                let member =
                    read_value_as_str(iter.next(), "invalid dequeue status - invalid member")?;
                DequeueStatus::Popped(member.into_owned())
            }
            "empty" => DequeueStatus::Empty,
            _ => DequeueStatus::Unknown(format!("{values:?}")),
        };

        Ok(status)
    }
}

impl FromRedisValue for DequeueStatus {
    fn from_redis_value(v: &redis::Value) -> RedisResult<Self> {
        match v {
            redis::Value::Bulk(bulk) => DequeueStatus::try_from(bulk.as_slice()),
            _ => Err(redis::RedisError::from((
                redis::ErrorKind::ResponseError,
                "invalid dequeue status - invalid value type",
                format!("{v:?}"),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(s: &str) -> redis::Value {
        redis::Value::Data(s.as_bytes().to_vec())
    }

    #[test]
    fn popped_reply_carries_the_member() {
        let reply = redis::Value::Bulk(vec![data("popped"), data("{\"id\":\"q:1:0\"}")]);

        match DequeueStatus::from_redis_value(&reply).unwrap() {
            DequeueStatus::Popped(member) => assert_eq!(member, "{\"id\":\"q:1:0\"}"),
            other => panic!("expected popped, got {other:?}"),
        }
    }

    #[test]
    fn empty_reply_maps_to_empty() {
        let reply = redis::Value::Bulk(vec![data("empty")]);
        assert!(matches!(
            DequeueStatus::from_redis_value(&reply).unwrap(),
            DequeueStatus::Empty
        ));
    }

    #[test]
    fn unrecognized_action_maps_to_unknown() {
        let reply = redis::Value::Bulk(vec![data("requeued")]);
        assert!(matches!(
            DequeueStatus::from_redis_value(&reply).unwrap(),
            DequeueStatus::Unknown(_)
        ));
    }

    #[test]
    fn popped_without_member_is_an_error() {
        let reply = redis::Value::Bulk(vec![data("popped")]);
        assert!(DequeueStatus::from_redis_value(&reply).is_err());
    }

    #[test]
    fn non_bulk_reply_is_an_error() {
        assert!(DequeueStatus::from_redis_value(&redis::Value::Int(3)).is_err());
    }
}
