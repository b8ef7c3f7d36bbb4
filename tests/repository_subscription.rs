mod common;

use common::{OTHER_USER_ID, USER_ID, month, new_subscription};
use sqlx::PgPool;
use std::sync::Arc;
use subscription_aggregator::domain::entities::{
    Subscription, SubscriptionError, SubscriptionPatch, TotalPriceFilter,
};
use subscription_aggregator::domain::repositories::{RepositoryError, SubscriptionRepository};
use subscription_aggregator::infrastructure::persistence::PgSubscriptionRepository;
use uuid::Uuid;

fn subscription(
    service_name: &str,
    price: i64,
    user_id: &str,
    start: chrono::NaiveDate,
    end: Option<chrono::NaiveDate>,
) -> Subscription {
    new_subscription(service_name, price, user_id, start, end)
        .into_subscription(Uuid::new_v4())
        .unwrap()
}

#[sqlx::test]
async fn test_create_and_get_by_id(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(Arc::new(pool));
    let sub = subscription("Netflix", 999, USER_ID, month(2024, 1), Some(month(2024, 12)));

    repo.create(sub.clone()).await.unwrap();
    let stored = repo.get_by_id(sub.id()).await.unwrap();

    assert_eq!(stored, sub);
}

#[sqlx::test]
async fn test_create_duplicate_id_conflicts(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(Arc::new(pool));
    let sub = subscription("Netflix", 999, USER_ID, month(2024, 1), None);

    repo.create(sub.clone()).await.unwrap();
    let result = repo.create(sub).await;

    assert!(matches!(result, Err(RepositoryError::Conflict { .. })));
}

#[sqlx::test]
async fn test_get_by_id_not_found(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(Arc::new(pool));

    let result = repo.get_by_id(Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[sqlx::test]
async fn test_list_orders_and_counts(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(Arc::new(pool));
    for m in [3, 1, 2] {
        repo.create(subscription("Netflix", 100, USER_ID, month(2024, m), None))
            .await
            .unwrap();
    }

    let all = repo.list(0, 0).await.unwrap();
    assert_eq!(all.total, 3);
    assert_eq!(all.items.len(), 3);

    let page = repo.list(1, 1).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].start_date(), month(2024, 2));
}

#[sqlx::test]
async fn test_update_partial_fields(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(Arc::new(pool));
    let sub = subscription("Netflix", 999, USER_ID, month(2024, 1), Some(month(2024, 12)));
    repo.create(sub.clone()).await.unwrap();

    let patch = SubscriptionPatch {
        service_name: Some("Netflix Premium".to_string()),
        end_date: Some(None),
        ..Default::default()
    };
    repo.update(sub.id(), patch).await.unwrap();

    let stored = repo.get_by_id(sub.id()).await.unwrap();
    assert_eq!(stored.service_name(), "Netflix Premium");
    assert_eq!(stored.price(), 999);
    assert!(stored.is_open_ended());
}

#[sqlx::test]
async fn test_update_empty_patch_is_noop(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(Arc::new(pool));
    let sub = subscription("Netflix", 999, USER_ID, month(2024, 1), None);
    repo.create(sub.clone()).await.unwrap();

    repo.update(sub.id(), SubscriptionPatch::default())
        .await
        .unwrap();

    assert_eq!(repo.get_by_id(sub.id()).await.unwrap(), sub);
}

#[sqlx::test]
async fn test_update_violating_date_range_is_invalid(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(Arc::new(pool));
    let sub = subscription("Netflix", 999, USER_ID, month(2024, 6), None);
    repo.create(sub.clone()).await.unwrap();

    let patch = SubscriptionPatch {
        end_date: Some(Some(month(2024, 1))),
        ..Default::default()
    };
    let result = repo.update(sub.id(), patch).await;

    assert!(matches!(
        result,
        Err(RepositoryError::Invalid(SubscriptionError::InvalidDateRange))
    ));
}

#[sqlx::test]
async fn test_update_unknown_id_not_found(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(Arc::new(pool));
    let patch = SubscriptionPatch {
        price: Some(1),
        ..Default::default()
    };

    let result = repo.update(Uuid::new_v4(), patch).await;

    assert!(matches!(result, Err(RepositoryError::NotFound)));
}

#[sqlx::test]
async fn test_delete_twice(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(Arc::new(pool));
    let sub = subscription("Netflix", 999, USER_ID, month(2024, 1), None);
    repo.create(sub.clone()).await.unwrap();

    repo.delete(sub.id()).await.unwrap();

    assert!(matches!(
        repo.delete(sub.id()).await,
        Err(RepositoryError::NotFound)
    ));
}

#[sqlx::test]
async fn test_total_price_filters(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(Arc::new(pool));
    repo.create(subscription("Netflix", 999, USER_ID, month(2024, 1), None))
        .await
        .unwrap();
    let spotify = subscription("Spotify", 299, USER_ID, month(2024, 1), Some(month(2024, 12)));
    repo.create(spotify).await.unwrap();
    let other = subscription("Netflix", 500, OTHER_USER_ID, month(2024, 1), Some(month(2024, 6)));
    repo.create(other).await.unwrap();

    let full_year = TotalPriceFilter {
        start_date: Some(month(2024, 1)),
        end_date: Some(month(2024, 12)),
        ..Default::default()
    };
    assert_eq!(repo.total_price(full_year.clone()).await.unwrap(), 999 + 299);

    let by_user = TotalPriceFilter {
        user_id: Some(USER_ID.to_string()),
        ..full_year.clone()
    };
    assert_eq!(repo.total_price(by_user).await.unwrap(), 999 + 299);

    let by_service = TotalPriceFilter {
        service_name: Some("Netflix".to_string()),
        ..full_year
    };
    assert_eq!(repo.total_price(by_service).await.unwrap(), 999);

    let nothing = TotalPriceFilter {
        user_id: Some(Uuid::new_v4().to_string()),
        ..Default::default()
    };
    assert_eq!(repo.total_price(nothing).await.unwrap(), 0);
}

#[sqlx::test]
async fn test_total_price_overflow_is_out_of_range(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(Arc::new(pool));
    for name in ["Netflix", "Spotify"] {
        repo.create(subscription(name, i64::MAX, USER_ID, month(2024, 1), None))
            .await
            .unwrap();
    }

    let result = repo.total_price(TotalPriceFilter::default()).await;

    assert!(matches!(result, Err(RepositoryError::TotalOutOfRange)));
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    let repo = PgSubscriptionRepository::new(Arc::new(pool));
    assert!(repo.ping().await.is_ok());
}
