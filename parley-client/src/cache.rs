use crate::client::StoreClient;
use parley::{ParleyError, ParleyResult};
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// What a lenient cache read produced: the stored JSON document, or the raw
/// string when the value never was JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    Json(serde_json::Value),
    Raw(String),
}

impl CacheValue {
    pub(crate) fn decode(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => CacheValue::Json(value),
            Err(_) => CacheValue::Raw(raw),
        }
    }
}

impl StoreClient {
    /// Serializes the value to JSON and stores it, with SETEX when a TTL is
    /// given.
    pub async fn set_cache<T: Serialize>(
        &mut self,
        key: &str,
        value: &T,
        ttl: Option<u64>,
    ) -> ParleyResult<()> {
        let payload = serde_json::to_string(value).map_err(ParleyError::SerializeValue)?;
        self.set_cache_raw(key, &payload, ttl).await
    }

    pub async fn set_cache_raw(
        &mut self,
        key: &str,
        value: &str,
        ttl: Option<u64>,
    ) -> ParleyResult<()> {
        match ttl {
            Some(ttl) => {
                self.manager
                    .set_ex::<_, _, ()>(key, value, ttl as usize)
                    .await
            }
            None => self.manager.set::<_, _, ()>(key, value).await,
        }
        .map_err(ParleyError::Cache)
    }

    pub async fn get_cache(&mut self, key: &str) -> ParleyResult<Option<String>> {
        self.manager.get(key).await.map_err(ParleyError::Cache)
    }

    /// Lenient read: malformed JSON degrades to the raw string, never an
    /// error.
    pub async fn get_cache_json(&mut self, key: &str) -> ParleyResult<Option<CacheValue>> {
        Ok(self.get_cache(key).await?.map(CacheValue::decode))
    }

    /// Strict typed read: malformed JSON is a typed error, not a default.
    pub async fn get_cache_as<T: DeserializeOwned>(
        &mut self,
        key: &str,
    ) -> ParleyResult<Option<T>> {
        match self.get_cache(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|err| ParleyError::InvalidCacheData(err.to_string())),
            None => Ok(None),
        }
    }

    pub async fn delete_cache(&mut self, key: &str) -> ParleyResult<bool> {
        let removed: i64 = self.manager.del(key).await.map_err(ParleyError::Cache)?;
        Ok(removed > 0)
    }

    pub async fn cache_exists(&mut self, key: &str) -> ParleyResult<bool> {
        self.manager.exists(key).await.map_err(ParleyError::Cache)
    }

    /// LPUSH onto a retention-bounded list, refreshing its TTL.
    pub async fn push_list(
        &mut self,
        key: &str,
        value: &str,
        ttl: Option<u64>,
    ) -> ParleyResult<i64> {
        let len: i64 = self
            .manager
            .lpush(key, value)
            .await
            .map_err(ParleyError::Cache)?;

        if let Some(ttl) = ttl {
            self.manager
                .expire::<_, ()>(key, ttl as usize)
                .await
                .map_err(ParleyError::Cache)?;
        }

        Ok(len)
    }
}
