#![allow(dead_code)]

use axum_test::TestServer;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use subscription_aggregator::application::services::SubscriptionService;
use subscription_aggregator::domain::entities::NewSubscription;
use subscription_aggregator::infrastructure::persistence::InMemorySubscriptionRepository;
use subscription_aggregator::routes::build_router;
use subscription_aggregator::state::AppState;

pub const USER_ID: &str = "60601fee-2bf1-4721-ae6f-7636e79a0cba";
pub const OTHER_USER_ID: &str = "8d7a2c8e-3a51-4d8c-9f16-2b0f4f6c1e77";

pub fn month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}

pub fn new_subscription(
    service_name: &str,
    price: i64,
    user_id: &str,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> NewSubscription {
    NewSubscription {
        service_name: service_name.to_string(),
        price,
        user_id: user_id.to_string(),
        start_date,
        end_date,
    }
}

pub fn create_test_service() -> SubscriptionService<InMemorySubscriptionRepository> {
    SubscriptionService::new(Arc::new(InMemorySubscriptionRepository::new()))
}

pub fn create_test_state() -> AppState {
    AppState::new(Arc::new(InMemorySubscriptionRepository::new()))
}

pub fn create_test_server() -> TestServer {
    let app = build_router(create_test_state(), Duration::from_secs(10));
    TestServer::new(app).unwrap()
}
