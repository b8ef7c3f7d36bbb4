//! Handlers for subscription endpoints.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::subscription::{
    CreateSubscriptionRequest, CreateSubscriptionResponse, ListSubscriptionsResponse,
    SubscriptionResponse, TotalPriceQuery, TotalPriceResponse, UpdateSubscriptionRequest,
};
use crate::error::AppError;
use crate::state::AppState;

fn parse_subscription_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::bad_request("Invalid id format", json!({ "id": raw })))
}

/// Creates a subscription.
///
/// # Endpoint
///
/// `POST /api/v1/subscriptions`
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed or breaks an invariant.
pub async fn create_subscription_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateSubscriptionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateSubscriptionResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let subscription_id = state
        .subscription_service
        .create_subscription(payload.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSubscriptionResponse { subscription_id }),
    ))
}

/// Lists subscriptions.
///
/// # Endpoint
///
/// `GET /api/v1/subscriptions?limit=20&offset=0`
///
/// # Errors
///
/// Returns 400 Bad Request if `limit <= 0` or `offset < 0`.
pub async fn list_subscriptions_handler(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<ListSubscriptionsResponse>, AppError> {
    let Query(params) = params?;
    let (limit, offset) = params
        .validate_and_get_limit_offset()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let page = state
        .subscription_service
        .list_subscriptions(limit, offset)
        .await?;

    Ok(Json(ListSubscriptionsResponse {
        total: page.total,
        subscriptions: page
            .items
            .into_iter()
            .map(SubscriptionResponse::from)
            .collect(),
    }))
}

/// Returns one subscription.
///
/// # Endpoint
///
/// `GET /api/v1/subscriptions/{id}`
///
/// # Errors
///
/// Returns 400 Bad Request if `id` is not a UUID.
/// Returns 404 Not Found if the subscription doesn't exist.
pub async fn get_subscription_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SubscriptionResponse>, AppError> {
    let id = parse_subscription_id(&id)?;

    let subscription = state
        .subscription_service
        .get_subscription_by_id(id)
        .await?;

    Ok(Json(subscription.into()))
}

/// Partially updates a subscription.
///
/// # Endpoint
///
/// `PUT /api/v1/subscriptions/{id}`
///
/// # Request Body
///
/// All fields are optional. Only provided fields are changed.
///
/// ```json
/// {
///   "service_name": "Netflix Premium",
///   "price": 1299,
///   "start_date": "01-2025",
///   "end_date": null   // clears the end date
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if `id` is not a UUID or the body is invalid.
/// Returns 404 Not Found if the subscription doesn't exist.
pub async fn update_subscription_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateSubscriptionRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let id = parse_subscription_id(&id)?;
    let Json(payload) = payload?;
    payload.validate()?;

    state
        .subscription_service
        .update_subscription_by_id(id, payload.into())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Deletes a subscription.
///
/// # Endpoint
///
/// `DELETE /api/v1/subscriptions/{id}`
///
/// # Errors
///
/// Returns 400 Bad Request if `id` is not a UUID.
/// Returns 404 Not Found if the subscription doesn't exist.
pub async fn delete_subscription_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let id = parse_subscription_id(&id)?;

    state
        .subscription_service
        .delete_subscription_by_id(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Sums subscription prices over a period.
///
/// # Endpoint
///
/// `GET /api/v1/subscriptions/total?start_date=01-2024&end_date=12-2024&user_id=..&service_name=..`
///
/// Both dates are required; `user_id` and `service_name` narrow the sum.
/// Subscriptions without an end date count as still running.
///
/// # Errors
///
/// Returns 400 Bad Request if a date is missing or malformed, or `user_id` is not a UUID.
pub async fn total_price_handler(
    State(state): State<AppState>,
    query: Result<Query<TotalPriceQuery>, QueryRejection>,
) -> Result<Json<TotalPriceResponse>, AppError> {
    let Query(query) = query?;
    query.validate()?;

    tracing::debug!(?query, "Computing total price");

    let total_price = state
        .subscription_service
        .get_subscriptions_total_price(query.into())
        .await?;

    Ok(Json(TotalPriceResponse { total_price }))
}
