//! PostgreSQL implementation of subscription repository.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{
    Subscription, SubscriptionError, SubscriptionPage, SubscriptionPatch, TotalPriceFilter,
};
use crate::domain::repositories::{RepositoryError, SubscriptionRepository};

const SELECT_COLUMNS: &str =
    "SELECT id, service_name, price, user_id, start_date, end_date FROM subscriptions";

/// CHECK constraint names from `migrations/`.
const PRICE_CONSTRAINT: &str = "subscriptions_price_check";
const DATE_RANGE_CONSTRAINT: &str = "subscriptions_date_range_check";

/// SQLSTATE `numeric_value_out_of_range`, raised when the summed NUMERIC is cast to BIGINT.
const NUMERIC_OUT_OF_RANGE: &str = "22003";

#[derive(Debug, FromRow)]
struct SubscriptionRow {
    id: Uuid,
    service_name: String,
    price: i64,
    user_id: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Subscription::from_storage(
            row.id,
            row.service_name,
            row.price,
            row.user_id,
            row.start_date,
            row.end_date,
        )
    }
}

/// PostgreSQL repository for subscription storage and aggregation.
///
/// Dynamic statements (partial update, optional filters) are assembled with
/// [`QueryBuilder`] and bound parameters, never string interpolation.
pub struct PgSubscriptionRepository {
    pool: Arc<PgPool>,
}

impl PgSubscriptionRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn create(&self, subscription: Subscription) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (id, service_name, price, user_id, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(subscription.id())
        .bind(subscription.service_name())
        .bind(subscription.price())
        .bind(subscription.user_id())
        .bind(subscription.start_date())
        .bind(subscription.end_date())
        .execute(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<SubscriptionPage, RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_COLUMNS);
        query.push(" ORDER BY start_date, id");
        if limit > 0 {
            query.push(" LIMIT ").push_bind(limit);
        }
        if offset > 0 {
            query.push(" OFFSET ").push_bind(offset);
        }

        let rows = query.build_query_as::<SubscriptionRow>().fetch_all(self.pool.as_ref());
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscriptions")
            .fetch_one(self.pool.as_ref());

        let (rows, total) = tokio::try_join!(rows, total).map_err(map_sqlx_error)?;

        Ok(SubscriptionPage {
            items: rows.into_iter().map(Subscription::from).collect(),
            total,
        })
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Subscription, RepositoryError> {
        let row = sqlx::query_as::<_, SubscriptionRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        row.map(Subscription::from).ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, id: Uuid, patch: SubscriptionPatch) -> Result<(), RepositoryError> {
        if patch.is_empty() {
            return Ok(());
        }

        let mut query = QueryBuilder::<Postgres>::new("UPDATE subscriptions SET ");
        {
            let mut set = query.separated(", ");
            if let Some(service_name) = patch.service_name {
                set.push("service_name = ").push_bind_unseparated(service_name);
            }
            if let Some(price) = patch.price {
                set.push("price = ").push_bind_unseparated(price);
            }
            if let Some(start_date) = patch.start_date {
                set.push("start_date = ").push_bind_unseparated(start_date);
            }
            if let Some(end_date) = patch.end_date {
                set.push("end_date = ").push_bind_unseparated(end_date);
            }
        }
        query.push(" WHERE id = ").push_bind(id);

        let result = query
            .build()
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn total_price(&self, filter: TotalPriceFilter) -> Result<i64, RepositoryError> {
        // SUM(BIGINT) is NUMERIC in Postgres
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT COALESCE(SUM(price), 0)::BIGINT FROM subscriptions WHERE TRUE",
        );
        if let Some(user_id) = filter.user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(service_name) = filter.service_name {
            query.push(" AND service_name = ").push_bind(service_name);
        }
        if let Some(start_date) = filter.start_date {
            query.push(" AND start_date <= ").push_bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            // open-ended subscriptions overlap every interval
            query
                .push(" AND (end_date IS NULL OR end_date >= ")
                .push_bind(end_date)
                .push(")");
        }

        query
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

/// Classifies a sqlx error into the repository's error kinds.
fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    if matches!(e, sqlx::Error::RowNotFound) {
        return RepositoryError::NotFound;
    }

    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            return RepositoryError::Conflict {
                constraint: db.constraint().map(str::to_owned),
            };
        }
        if db.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) {
            return RepositoryError::TotalOutOfRange;
        }
        if db.is_check_violation() {
            match db.constraint() {
                Some(DATE_RANGE_CONSTRAINT) => {
                    return SubscriptionError::InvalidDateRange.into();
                }
                Some(PRICE_CONSTRAINT) => return SubscriptionError::InvalidPrice.into(),
                _ => {}
            }
        }
    }

    RepositoryError::storage(e)
}
