//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgSubscriptionRepository`] - PostgreSQL storage via SQLx
//! - [`InMemorySubscriptionRepository`] - In-process storage for tests

pub mod in_memory_subscription_repository;
pub mod pg_subscription_repository;

pub use in_memory_subscription_repository::InMemorySubscriptionRepository;
pub use pg_subscription_repository::PgSubscriptionRepository;
