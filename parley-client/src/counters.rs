use crate::client::StoreClient;
use parley::{ParleyError, ParleyResult};
use redis::AsyncCommands;

impl StoreClient {
    /// Atomic INCRBY; the TTL is attached only when this call created the
    /// key, so a steadily-bumped counter keeps its original expiry.
    pub async fn increment_counter(
        &mut self,
        key: &str,
        amount: i64,
        ttl: Option<u64>,
    ) -> ParleyResult<i64> {
        let value: i64 = self
            .manager
            .incr(key, amount)
            .await
            .map_err(ParleyError::Counter)?;

        if let Some(ttl) = ttl {
            if value == amount {
                self.manager
                    .expire::<_, ()>(key, ttl as usize)
                    .await
                    .map_err(ParleyError::Counter)?;
            }
        }

        Ok(value)
    }

    /// An absent counter reads as zero.
    pub async fn get_counter(&mut self, key: &str) -> ParleyResult<i64> {
        let value: Option<i64> = self.manager.get(key).await.map_err(ParleyError::Counter)?;
        Ok(value.unwrap_or(0))
    }
}
