//! DTOs for subscription endpoints.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::month_year::MonthYear;
use crate::domain::entities::{NewSubscription, Subscription, SubscriptionPatch, TotalPriceFilter};

/// Request body for `POST /api/v1/subscriptions`.
///
/// ```json
/// {
///   "service_name": "Yandex Plus",
///   "price": 400,
///   "user_id": "60601fee-2bf1-4721-ae6f-7636e79a0cba",
///   "start_date": "07-2025",
///   "end_date": "12-2025"
/// }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubscriptionRequest {
    #[validate(length(min = 1, max = 255, message = "Service name must be 1-255 characters"))]
    pub service_name: String,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: i64,

    pub user_id: Uuid,

    pub start_date: MonthYear,

    #[serde(default)]
    pub end_date: Option<MonthYear>,
}

impl From<CreateSubscriptionRequest> for NewSubscription {
    fn from(req: CreateSubscriptionRequest) -> Self {
        NewSubscription {
            service_name: req.service_name,
            price: req.price,
            user_id: req.user_id.to_string(),
            start_date: req.start_date.into(),
            end_date: req.end_date.map(Into::into),
        }
    }
}

/// Response body for a created subscription.
#[derive(Debug, Serialize)]
pub struct CreateSubscriptionResponse {
    pub subscription_id: Uuid,
}

/// A single subscription as returned by the API.
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub subscription_id: Uuid,
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: MonthYear,
    pub end_date: Option<MonthYear>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(s: Subscription) -> Self {
        SubscriptionResponse {
            subscription_id: s.id(),
            service_name: s.service_name().to_string(),
            price: s.price(),
            user_id: s.user_id().to_string(),
            start_date: MonthYear::from_date(s.start_date()),
            end_date: s.end_date().map(MonthYear::from_date),
        }
    }
}

/// Response body for `GET /api/v1/subscriptions`.
#[derive(Debug, Serialize)]
pub struct ListSubscriptionsResponse {
    pub total: i64,
    pub subscriptions: Vec<SubscriptionResponse>,
}

/// Request body for `PUT /api/v1/subscriptions/{id}`.
///
/// All fields are optional; only provided fields are changed.
///
/// # `end_date` semantics
///
/// - **Absent** → leave existing value unchanged
/// - **`null`** → clear it (the subscription becomes open-ended)
/// - **`"MM-YYYY"`** → set new end month
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSubscriptionRequest {
    #[validate(length(min = 1, max = 255, message = "Service name must be 1-255 characters"))]
    pub service_name: Option<String>,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price: Option<i64>,

    pub start_date: Option<MonthYear>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_date: Option<Option<MonthYear>>,
}

impl From<UpdateSubscriptionRequest> for SubscriptionPatch {
    fn from(req: UpdateSubscriptionRequest) -> Self {
        SubscriptionPatch {
            service_name: req.service_name,
            price: req.price,
            start_date: req.start_date.map(Into::into),
            end_date: req.end_date.map(|end| end.map(Into::into)),
        }
    }
}

/// Query parameters for `GET /api/v1/subscriptions/total`.
#[derive(Debug, Deserialize, Validate)]
pub struct TotalPriceQuery {
    pub start_date: MonthYear,
    pub end_date: MonthYear,
    pub user_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255, message = "Service name must be 1-255 characters"))]
    pub service_name: Option<String>,
}

impl From<TotalPriceQuery> for TotalPriceFilter {
    fn from(q: TotalPriceQuery) -> Self {
        TotalPriceFilter {
            user_id: q.user_id.map(|u| u.to_string()),
            service_name: q.service_name,
            start_date: Some(q.start_date.into()),
            end_date: Some(q.end_date.into()),
        }
    }
}

/// Response body for the total price aggregate.
#[derive(Debug, Serialize)]
pub struct TotalPriceResponse {
    pub total_price: i64,
}
