//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access so that services never talk to a store
//! client directly. Implementations live in `crate::infrastructure::persistence`;
//! mock implementations are generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`SubscriptionRepository`] - Subscription CRUD and spend aggregation

pub mod subscription_repository;

pub use subscription_repository::{RepositoryError, SubscriptionRepository};

#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
