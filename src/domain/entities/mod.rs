//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`Subscription`] - A user's paid subscription to a service
//!
//! # Design Pattern
//!
//! - [`Subscription::new`] - Validated construction, the only way to create one
//! - [`NewSubscription`] - Creation input, before an id is assigned
//! - [`SubscriptionPatch`] - Partial updates
//! - [`TotalPriceFilter`] - Predicates for the spend aggregate
//! - [`SubscriptionPage`] - Paginated listing result

pub mod subscription;

pub use subscription::{
    NewSubscription, Subscription, SubscriptionError, SubscriptionPage, SubscriptionPatch,
    TotalPriceFilter,
};
