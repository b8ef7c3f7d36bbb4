//! Business logic services for the application layer.

pub mod subscription_service;

pub use subscription_service::{ServiceError, SubscriptionService};
