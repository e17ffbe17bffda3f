use crate::QueueName;
use thiserror::Error;

pub type ParleyResult<T> = Result<T, ParleyError>;

#[derive(Error, Debug)]
pub enum ParleyError {
    #[error("CreateRedisClient")]
    CreateRedisClient(redis::RedisError),
    #[error("GetRedisConn")]
    GetRedisConn(redis::RedisError),
    #[error("Enqueue")]
    Enqueue(redis::RedisError),
    #[error("Dequeue")]
    Dequeue(redis::RedisError),
    #[error("QueueSize")]
    QueueSize(redis::RedisError),
    #[error("RateLimit")]
    RateLimit(redis::RedisError),
    #[error("Cache")]
    Cache(redis::RedisError),
    #[error("Counter")]
    Counter(redis::RedisError),
    #[error("SerializeJob")]
    SerializeJob(serde_json::Error),
    #[error("SerializeValue")]
    SerializeValue(serde_json::Error),
    #[error("InvalidJobData")]
    InvalidJobData(String),
    #[error("InvalidCacheData")]
    InvalidCacheData(String),
    #[error("DupQueueHandler")]
    DupQueueHandler(QueueName),
    #[error("QueueHandlerMissing")]
    QueueHandlerMissing(QueueName),
    #[error("RunJobError")]
    RunJobError(RunJobError),
}

#[derive(Debug)]
pub struct RunJobError {
    pub job_data: String,
    pub error: String,
}

impl RunJobError {
    pub fn new(job_data: String, error: String) -> Self {
        Self { job_data, error }
    }
}
