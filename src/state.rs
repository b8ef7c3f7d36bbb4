//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::SubscriptionService;
use crate::domain::repositories::SubscriptionRepository;

/// State shared by all handlers.
///
/// Holds no mutable data of its own; the repository's connection pool is the
/// only shared resource and manages its own synchronization.
#[derive(Clone)]
pub struct AppState {
    pub subscription_service: Arc<SubscriptionService<dyn SubscriptionRepository>>,
}

impl AppState {
    /// Wires the service on top of the given repository.
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self {
            subscription_service: Arc::new(SubscriptionService::new(repository)),
        }
    }
}
