//! Subscription entity and its construction invariants.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Invariant violations detected while building or changing a [`Subscription`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    #[error("end date must not be earlier than start date")]
    InvalidDateRange,
    #[error("price must not be negative")]
    InvalidPrice,
}

/// A user's subscription to a paid service.
///
/// Fields are private so that every value in circulation has passed through
/// [`Subscription::new`] (or was loaded from storage, which enforces the same
/// rules with CHECK constraints).
///
/// Dates have month granularity: the day component carries no meaning and the
/// HTTP layer always produces the first day of the month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    id: Uuid,
    service_name: String,
    price: i64,
    user_id: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl Subscription {
    /// Builds a subscription, checking the date range first and the price second.
    ///
    /// # Errors
    ///
    /// - [`SubscriptionError::InvalidDateRange`] if `end_date < start_date`
    /// - [`SubscriptionError::InvalidPrice`] if `price < 0`
    pub fn new(
        id: Uuid,
        service_name: String,
        price: i64,
        user_id: String,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, SubscriptionError> {
        check_date_range(start_date, end_date)?;
        check_price(price)?;

        Ok(Self::from_storage(
            id,
            service_name,
            price,
            user_id,
            start_date,
            end_date,
        ))
    }

    /// Rebuilds a subscription from a stored row without re-checking invariants.
    pub(crate) fn from_storage(
        id: Uuid,
        service_name: String,
        price: i64,
        user_id: String,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            service_name,
            price,
            user_id,
            start_date,
            end_date,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// `None` means the subscription is still active.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Returns true if the subscription has no end date.
    pub fn is_open_ended(&self) -> bool {
        self.end_date.is_none()
    }

    /// Returns a copy with `patch` applied, re-checking the invariants on the result.
    ///
    /// # Errors
    ///
    /// Same as [`Subscription::new`].
    pub fn patched(&self, patch: &SubscriptionPatch) -> Result<Self, SubscriptionError> {
        Self::new(
            self.id,
            patch
                .service_name
                .clone()
                .unwrap_or_else(|| self.service_name.clone()),
            patch.price.unwrap_or(self.price),
            self.user_id.clone(),
            patch.start_date.unwrap_or(self.start_date),
            patch.end_date.unwrap_or(self.end_date),
        )
    }
}

/// Input data for creating a new subscription; the id is assigned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl NewSubscription {
    /// Builds the entity under `id`.
    ///
    /// # Errors
    ///
    /// Same as [`Subscription::new`].
    pub fn into_subscription(self, id: Uuid) -> Result<Subscription, SubscriptionError> {
        Subscription::new(
            id,
            self.service_name,
            self.price,
            self.user_id,
            self.start_date,
            self.end_date,
        )
    }
}

/// Partial update for an existing subscription.
///
/// `None` fields are left unchanged.
/// `end_date: Some(None)` clears the end date; `Some(Some(d))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionPatch {
    pub service_name: Option<String>,
    pub price: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
}

impl SubscriptionPatch {
    /// Returns true if the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.service_name.is_none()
            && self.price.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Checks the invariants that can be decided from the patch alone.
    ///
    /// A date range is only checked when both bounds are present; a patch that
    /// touches one bound is checked against the stored row by the repository.
    ///
    /// # Errors
    ///
    /// Same kinds, and same order, as [`Subscription::new`].
    pub fn validate(&self) -> Result<(), SubscriptionError> {
        if let Some(start_date) = self.start_date {
            check_date_range(start_date, self.end_date.flatten())?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        Ok(())
    }
}

/// Filter for the total price aggregate. Present predicates are combined with AND.
///
/// A subscription matches when:
/// - `user_id` / `service_name` are equal (when given)
/// - it started on or before `start_date` (when given)
/// - it ends on or after `end_date`, or has no end date at all (when given)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TotalPriceFilter {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TotalPriceFilter {
    /// Evaluates the filter against a single subscription.
    pub fn matches(&self, subscription: &Subscription) -> bool {
        if self
            .user_id
            .as_deref()
            .is_some_and(|u| u != subscription.user_id())
        {
            return false;
        }
        if self
            .service_name
            .as_deref()
            .is_some_and(|s| s != subscription.service_name())
        {
            return false;
        }
        if self
            .start_date
            .is_some_and(|start| subscription.start_date() > start)
        {
            return false;
        }
        match (self.end_date, subscription.end_date()) {
            (Some(end), Some(sub_end)) => sub_end >= end,
            _ => true,
        }
    }
}

/// One page of subscriptions plus the total number of stored rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionPage {
    pub items: Vec<Subscription>,
    pub total: i64,
}

fn check_date_range(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<(), SubscriptionError> {
    match end_date {
        Some(end) if end < start_date => Err(SubscriptionError::InvalidDateRange),
        _ => Ok(()),
    }
}

fn check_price(price: i64) -> Result<(), SubscriptionError> {
    if price < 0 {
        return Err(SubscriptionError::InvalidPrice);
    }
    Ok(())
}
