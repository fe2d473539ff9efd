use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::clock::Clock;
use crate::services::ownership::OwnershipPolicy;
use crate::store::CachedStore;

pub struct AppState {
    pub store: CachedStore,
    pub config: AppConfig,
    pub clock: Arc<dyn Clock>,
    pub ownership: Box<dyn OwnershipPolicy>,
}
