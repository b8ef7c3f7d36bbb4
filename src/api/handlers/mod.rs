//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod subscriptions;

pub use health::health_handler;
pub use subscriptions::{
    create_subscription_handler, delete_subscription_handler, get_subscription_handler,
    list_subscriptions_handler, total_price_handler, update_subscription_handler,
};
