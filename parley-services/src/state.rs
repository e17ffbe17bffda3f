use crate::analytics::AnalyticsService;
use parley_client::StoreClient;

/// Everything a job handler needs, cloned per execution.
#[derive(Clone)]
pub struct AppState {
    pub store: StoreClient,
    pub analytics: AnalyticsService,
}

impl AppState {
    pub fn new(store: StoreClient) -> Self {
        Self {
            analytics: AnalyticsService::new(store.clone()),
            store,
        }
    }
}
