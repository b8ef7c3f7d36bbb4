//! Repository trait for subscription data access.

use crate::domain::entities::{
    Subscription, SubscriptionError, SubscriptionPage, SubscriptionPatch, TotalPriceFilter,
};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Failures reported by a [`SubscriptionRepository`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A targeted operation matched zero rows.
    #[error("subscription not found")]
    NotFound,

    /// A unique constraint rejected the write (e.g. a duplicate id).
    #[error("unique constraint violation: {constraint:?}")]
    Conflict { constraint: Option<String> },

    /// The stored row would break a subscription invariant.
    #[error(transparent)]
    Invalid(#[from] SubscriptionError),

    /// The aggregated price does not fit in an `i64`.
    #[error("total price out of range")]
    TotalOutOfRange,

    /// Connectivity or any other unexpected store failure.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps an arbitrary store failure.
    pub fn storage(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage(err.into())
    }
}

/// Repository interface for managing subscriptions.
///
/// The only component allowed to issue storage queries. Every method is a
/// single statement (or a pair of reads for [`SubscriptionRepository::list`]),
/// so there is no partial commit to roll back.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSubscriptionRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemorySubscriptionRepository`] - In-process store for tests
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Inserts a new subscription.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] if the id already exists.
    /// Returns [`RepositoryError::Storage`] on database errors.
    async fn create(&self, subscription: Subscription) -> Result<(), RepositoryError>;

    /// Lists subscriptions ordered by start date, then id.
    ///
    /// `limit <= 0` disables the limit. `total` counts every stored row,
    /// independent of pagination.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] on database errors.
    async fn list(&self, limit: i64, offset: i64) -> Result<SubscriptionPage, RepositoryError>;

    /// Fetches one subscription.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no row has this id.
    /// Returns [`RepositoryError::Storage`] on database errors.
    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, RepositoryError>;

    /// Partially updates a subscription.
    ///
    /// Only fields present in [`SubscriptionPatch`] are written. An empty patch
    /// succeeds without touching storage.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if zero rows were affected.
    /// Returns [`RepositoryError::Invalid`] if the resulting row breaks an invariant.
    /// Returns [`RepositoryError::Storage`] on database errors.
    async fn update(&self, id: Uuid, patch: SubscriptionPatch) -> Result<(), RepositoryError>;

    /// Deletes a subscription.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if zero rows were affected.
    /// Returns [`RepositoryError::Storage`] on database errors.
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// Sums the price of every subscription matching `filter`; 0 when none match.
    ///
    /// See [`TotalPriceFilter`] for predicate semantics.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::TotalOutOfRange`] if the sum does not fit in an `i64`.
    /// Returns [`RepositoryError::Storage`] on database errors.
    async fn total_price(&self, filter: TotalPriceFilter) -> Result<i64, RepositoryError>;

    /// Checks that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Storage`] if it is not.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
