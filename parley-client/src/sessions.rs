use crate::client::StoreClient;
use parley::ParleyResult;
use serde::de::DeserializeOwned;
use serde::Serialize;

const SESSION_TTL_SECONDS: u64 = 3600;

impl StoreClient {
    /// Stores session data under `session:<id>`; the default TTL keeps
    /// abandoned sessions from accumulating.
    pub async fn set_session<T: Serialize>(
        &mut self,
        session_id: &str,
        data: &T,
        ttl: Option<u64>,
    ) -> ParleyResult<()> {
        let key = parley::session_key(session_id);
        self.set_cache(&key, data, Some(ttl.unwrap_or(SESSION_TTL_SECONDS)))
            .await
    }

    pub async fn get_session<T: DeserializeOwned>(
        &mut self,
        session_id: &str,
    ) -> ParleyResult<Option<T>> {
        self.get_cache_as(&parley::session_key(session_id)).await
    }

    pub async fn delete_session(&mut self, session_id: &str) -> ParleyResult<bool> {
        self.delete_cache(&parley::session_key(session_id)).await
    }
}
