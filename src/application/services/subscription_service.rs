//! Subscription management service.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{
    NewSubscription, Subscription, SubscriptionError, SubscriptionPage, SubscriptionPatch,
    TotalPriceFilter,
};
use crate::domain::repositories::{RepositoryError, SubscriptionRepository};

/// Errors surfaced by [`SubscriptionService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The input breaks a subscription invariant.
    #[error(transparent)]
    Validation(#[from] SubscriptionError),

    /// No subscription has the requested id.
    #[error("subscription not found")]
    SubscriptionNotFound,

    /// A uniqueness rule rejected the write.
    #[error("subscription already exists")]
    Conflict,

    /// The matching prices add up to more than an `i64` holds.
    #[error("total price out of range")]
    TotalPriceOutOfRange,

    /// Any other repository failure, passed through unchanged.
    #[error(transparent)]
    Storage(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::SubscriptionNotFound,
            RepositoryError::Invalid(e) => Self::Validation(e),
            RepositoryError::Conflict { .. } => Self::Conflict,
            RepositoryError::TotalOutOfRange => Self::TotalPriceOutOfRange,
            other => Self::Storage(other),
        }
    }
}

/// Service for creating, reading, changing and aggregating subscriptions.
///
/// Assigns identifiers, enforces invariants before anything reaches storage and
/// translates repository errors into [`ServiceError`]. Failures are never retried.
///
/// Generic over the repository so that tests can plug in a mock or the in-memory
/// store; `R` may be `dyn SubscriptionRepository`.
pub struct SubscriptionService<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: SubscriptionRepository + ?Sized> SubscriptionService<R> {
    /// Creates a new subscription service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates a subscription under a freshly generated id and returns that id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] if the input breaks an invariant; nothing
    /// is written in that case.
    /// Returns [`ServiceError::Storage`] on repository errors.
    pub async fn create_subscription(&self, input: NewSubscription) -> Result<Uuid, ServiceError> {
        let id = Uuid::new_v4();
        let subscription = input.into_subscription(id)?;

        self.repository.create(subscription).await?;

        metrics::counter!("subscriptions_created_total").increment(1);
        tracing::info!(subscription_id = %id, "Subscription created");

        Ok(id)
    }

    /// Lists subscriptions page by page.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Storage`] on repository errors.
    pub async fn list_subscriptions(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<SubscriptionPage, ServiceError> {
        Ok(self.repository.list(limit, offset).await?)
    }

    /// Retrieves a subscription by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::SubscriptionNotFound`] if it does not exist.
    /// Returns [`ServiceError::Storage`] on repository errors.
    pub async fn get_subscription_by_id(&self, id: Uuid) -> Result<Subscription, ServiceError> {
        Ok(self.repository.get_by_id(id).await?)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] if the patch (alone, or merged with the
    /// stored row) breaks an invariant.
    /// Returns [`ServiceError::SubscriptionNotFound`] if it does not exist.
    /// Returns [`ServiceError::Storage`] on repository errors.
    pub async fn update_subscription_by_id(
        &self,
        id: Uuid,
        patch: SubscriptionPatch,
    ) -> Result<(), ServiceError> {
        patch.validate()?;

        self.repository.update(id, patch).await?;

        tracing::debug!(subscription_id = %id, "Subscription updated");
        Ok(())
    }

    /// Deletes a subscription.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::SubscriptionNotFound`] if it does not exist.
    /// Returns [`ServiceError::Storage`] on repository errors.
    pub async fn delete_subscription_by_id(&self, id: Uuid) -> Result<(), ServiceError> {
        self.repository.delete(id).await?;

        metrics::counter!("subscriptions_deleted_total").increment(1);
        tracing::info!(subscription_id = %id, "Subscription deleted");

        Ok(())
    }

    /// Sums prices over the subscriptions matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::TotalPriceOutOfRange`] if the sum exceeds `i64::MAX`.
    /// Returns [`ServiceError::Storage`] on repository errors.
    pub async fn get_subscriptions_total_price(
        &self,
        filter: TotalPriceFilter,
    ) -> Result<i64, ServiceError> {
        Ok(self.repository.total_price(filter).await?)
    }

    /// Returns true if the backing store answers.
    pub async fn health_check(&self) -> bool {
        match self.repository.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Repository health check failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockSubscriptionRepository;
    use chrono::NaiveDate;

    fn month(year: i32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, 1).unwrap()
    }

    fn new_netflix() -> NewSubscription {
        NewSubscription {
            service_name: "Netflix".to_string(),
            price: 999,
            user_id: "60601fee-2bf1-4721-ae6f-7636e79a0cba".to_string(),
            start_date: month(2024, 1),
            end_date: None,
        }
    }

    fn stored(id: Uuid) -> Subscription {
        new_netflix().into_subscription(id).unwrap()
    }

    #[tokio::test]
    async fn test_create_subscription_success() {
        let mut mock_repo = MockSubscriptionRepository::new();

        mock_repo
            .expect_create()
            .withf(|s| {
                s.service_name() == "Netflix"
                    && s.price() == 999
                    && s.start_date() == month(2024, 1)
                    && s.end_date().is_none()
            })
            .times(1)
            .returning(|_| Ok(()));

        let service = SubscriptionService::new(Arc::new(mock_repo));

        let result = service.create_subscription(new_netflix()).await;

        assert!(result.is_ok());
        assert!(!result.unwrap().is_nil());
    }

    #[tokio::test]
    async fn test_create_subscription_generates_distinct_ids() {
        let mut mock_repo = MockSubscriptionRepository::new();
        mock_repo.expect_create().times(2).returning(|_| Ok(()));

        let service = SubscriptionService::new(Arc::new(mock_repo));

        let first = service.create_subscription(new_netflix()).await.unwrap();
        let second = service.create_subscription(new_netflix()).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_create_subscription_invalid_range_skips_repository() {
        let mock_repo = MockSubscriptionRepository::new();
        let service = SubscriptionService::new(Arc::new(mock_repo));

        let input = NewSubscription {
            end_date: Some(month(2023, 12)),
            ..new_netflix()
        };
        let result = service.create_subscription(input).await;

        assert!(matches!(
            result.unwrap_err(),
            ServiceError::Validation(SubscriptionError::InvalidDateRange)
        ));
    }

    #[tokio::test]
    async fn test_create_subscription_negative_price() {
        let mock_repo = MockSubscriptionRepository::new();
        let service = SubscriptionService::new(Arc::new(mock_repo));

        let input = NewSubscription {
            price: -1,
            ..new_netflix()
        };
        let result = service.create_subscription(input).await;

        assert!(matches!(
            result.unwrap_err(),
            ServiceError::Validation(SubscriptionError::InvalidPrice)
        ));
    }

    #[tokio::test]
    async fn test_create_subscription_storage_error_passes_through() {
        let mut mock_repo = MockSubscriptionRepository::new();
        mock_repo
            .expect_create()
            .times(1)
            .returning(|_| Err(RepositoryError::storage("connection refused")));

        let service = SubscriptionService::new(Arc::new(mock_repo));

        let result = service.create_subscription(new_netflix()).await;

        assert!(matches!(
            result.unwrap_err(),
            ServiceError::Storage(RepositoryError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn test_create_subscription_conflict() {
        let mut mock_repo = MockSubscriptionRepository::new();
        mock_repo.expect_create().times(1).returning(|_| {
            Err(RepositoryError::Conflict {
                constraint: Some("subscriptions_pkey".to_string()),
            })
        });

        let service = SubscriptionService::new(Arc::new(mock_repo));

        let result = service.create_subscription(new_netflix()).await;

        assert!(matches!(result.unwrap_err(), ServiceError::Conflict));
    }

    #[tokio::test]
    async fn test_get_subscription_success() {
        let mut mock_repo = MockSubscriptionRepository::new();
        let id = Uuid::new_v4();
        let subscription = stored(id);

        mock_repo
            .expect_get_by_id()
            .withf(move |requested| *requested == id)
            .times(1)
            .returning(move |_| Ok(subscription.clone()));

        let service = SubscriptionService::new(Arc::new(mock_repo));

        let result = service.get_subscription_by_id(id).await.unwrap();

        assert_eq!(result.id(), id);
        assert_eq!(result.service_name(), "Netflix");
    }

    #[tokio::test]
    async fn test_get_subscription_not_found() {
        let mut mock_repo = MockSubscriptionRepository::new();
        mock_repo
            .expect_get_by_id()
            .times(1)
            .returning(|_| Err(RepositoryError::NotFound));

        let service = SubscriptionService::new(Arc::new(mock_repo));

        let result = service.get_subscription_by_id(Uuid::new_v4()).await;

        assert!(matches!(
            result.unwrap_err(),
            ServiceError::SubscriptionNotFound
        ));
    }

    #[tokio::test]
    async fn test_list_subscriptions_passes_pagination() {
        let mut mock_repo = MockSubscriptionRepository::new();
        mock_repo
            .expect_list()
            .withf(|limit, offset| *limit == 20 && *offset == 40)
            .times(1)
            .returning(|_, _| {
                Ok(SubscriptionPage {
                    items: vec![],
                    total: 40,
                })
            });

        let service = SubscriptionService::new(Arc::new(mock_repo));

        let page = service.list_subscriptions(20, 40).await.unwrap();

        assert_eq!(page.total, 40);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_update_subscription_not_found() {
        let mut mock_repo = MockSubscriptionRepository::new();
        mock_repo
            .expect_update()
            .times(1)
            .returning(|_, _| Err(RepositoryError::NotFound));

        let service = SubscriptionService::new(Arc::new(mock_repo));

        let patch = SubscriptionPatch {
            price: Some(1),
            ..Default::default()
        };
        let result = service.update_subscription_by_id(Uuid::new_v4(), patch).await;

        assert!(matches!(
            result.unwrap_err(),
            ServiceError::SubscriptionNotFound
        ));
    }

    #[tokio::test]
    async fn test_update_subscription_invalid_patch_skips_repository() {
        let mock_repo = MockSubscriptionRepository::new();
        let service = SubscriptionService::new(Arc::new(mock_repo));

        let patch = SubscriptionPatch {
            price: Some(-10),
            ..Default::default()
        };
        let result = service.update_subscription_by_id(Uuid::new_v4(), patch).await;

        assert!(matches!(
            result.unwrap_err(),
            ServiceError::Validation(SubscriptionError::InvalidPrice)
        ));
    }

    #[tokio::test]
    async fn test_update_subscription_constraint_becomes_validation() {
        let mut mock_repo = MockSubscriptionRepository::new();
        mock_repo
            .expect_update()
            .times(1)
            .returning(|_, _| Err(SubscriptionError::InvalidDateRange.into()));

        let service = SubscriptionService::new(Arc::new(mock_repo));

        let patch = SubscriptionPatch {
            end_date: Some(Some(month(2000, 1))),
            ..Default::default()
        };
        let result = service.update_subscription_by_id(Uuid::new_v4(), patch).await;

        assert!(matches!(
            result.unwrap_err(),
            ServiceError::Validation(SubscriptionError::InvalidDateRange)
        ));
    }

    #[tokio::test]
    async fn test_delete_subscription_not_found() {
        let mut mock_repo = MockSubscriptionRepository::new();
        mock_repo
            .expect_delete()
            .times(1)
            .returning(|_| Err(RepositoryError::NotFound));

        let service = SubscriptionService::new(Arc::new(mock_repo));

        let result = service.delete_subscription_by_id(Uuid::new_v4()).await;

        assert!(matches!(
            result.unwrap_err(),
            ServiceError::SubscriptionNotFound
        ));
    }

    #[tokio::test]
    async fn test_total_price_passes_filter() {
        let mut mock_repo = MockSubscriptionRepository::new();
        mock_repo
            .expect_total_price()
            .withf(|f| f.user_id.as_deref() == Some("user-1") && f.service_name.is_none())
            .times(1)
            .returning(|_| Ok(1998));

        let service = SubscriptionService::new(Arc::new(mock_repo));

        let filter = TotalPriceFilter {
            user_id: Some("user-1".to_string()),
            ..Default::default()
        };
        let total = service.get_subscriptions_total_price(filter).await.unwrap();

        assert_eq!(total, 1998);
    }

    #[tokio::test]
    async fn test_health_check_reports_repository_failure() {
        let mut mock_repo = MockSubscriptionRepository::new();
        mock_repo
            .expect_ping()
            .times(1)
            .returning(|| Err(RepositoryError::storage("pool timed out")));

        let service = SubscriptionService::new(Arc::new(mock_repo));

        assert!(!service.health_check().await);
    }
}
