//! In-process implementation of subscription repository.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::{Subscription, SubscriptionPage, SubscriptionPatch, TotalPriceFilter};
use crate::domain::repositories::{RepositoryError, SubscriptionRepository};

/// A repository that keeps subscriptions in a map guarded by an async lock.
///
/// Follows the same contract as
/// [`PgSubscriptionRepository`](super::PgSubscriptionRepository), including the
/// invariant checks the database performs with CHECK constraints.
///
/// # Use Cases
///
/// - Service and handler tests that must not depend on PostgreSQL
/// - Local experiments without a database
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    rows: RwLock<HashMap<Uuid, Subscription>>,
}

impl InMemorySubscriptionRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        debug!("Using in-memory subscription repository");
        Self::default()
    }

    /// Number of stored subscriptions.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn create(&self, subscription: Subscription) -> Result<(), RepositoryError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&subscription.id()) {
            return Err(RepositoryError::Conflict {
                constraint: Some("subscriptions_pkey".to_string()),
            });
        }
        rows.insert(subscription.id(), subscription);
        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<SubscriptionPage, RepositoryError> {
        let rows = self.rows.read().await;

        let mut items: Vec<Subscription> = rows.values().cloned().collect();
        items.sort_by_key(|s| (s.start_date(), s.id()));

        let skip = usize::try_from(offset).unwrap_or(0);
        let take = if limit > 0 {
            usize::try_from(limit).unwrap_or(usize::MAX)
        } else {
            usize::MAX
        };

        Ok(SubscriptionPage {
            items: items.into_iter().skip(skip).take(take).collect(),
            total: rows.len() as i64,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, RepositoryError> {
        self.rows
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, id: Uuid, patch: SubscriptionPatch) -> Result<(), RepositoryError> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut rows = self.rows.write().await;
        let current = rows.get(&id).ok_or(RepositoryError::NotFound)?;
        let updated = current.patched(&patch)?;
        rows.insert(id, updated);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.rows
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn total_price(&self, filter: TotalPriceFilter) -> Result<i64, RepositoryError> {
        self.rows
            .read()
            .await
            .values()
            .filter(|s| filter.matches(s))
            .map(Subscription::price)
            .try_fold(0i64, i64::checked_add)
            .ok_or(RepositoryError::TotalOutOfRange)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
