//! API route configuration.

use crate::api::handlers::{
    create_subscription_handler, delete_subscription_handler, get_subscription_handler,
    list_subscriptions_handler, total_price_handler, update_subscription_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Version 1 of the REST API, mounted under `/api/v1`.
///
/// # Endpoints
///
/// - `POST   /subscriptions`        - Create a subscription
/// - `GET    /subscriptions`        - List subscriptions (`limit`, `offset`)
/// - `GET    /subscriptions/total`  - Total price over a period
/// - `GET    /subscriptions/{id}`   - Fetch one subscription
/// - `PUT    /subscriptions/{id}`   - Partially update a subscription
/// - `DELETE /subscriptions/{id}`   - Delete a subscription
pub fn v1_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/subscriptions",
            get(list_subscriptions_handler).post(create_subscription_handler),
        )
        .route("/subscriptions/total", get(total_price_handler))
        .route(
            "/subscriptions/{id}",
            get(get_subscription_handler)
                .put(update_subscription_handler)
                .delete(delete_subscription_handler),
        )
}
