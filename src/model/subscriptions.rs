use serde::{Deserialize, Serialize};

use crate::domain::{Month, UserId};

/// Subscription fields supplied by a client on create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubscription {
    pub service_name: String,
    /// Price in minor currency units
    pub price: i64,
    pub user_id: UserId,
    pub start_date: Month,
    /// `None` while the subscription is still active
    #[serde(default)]
    pub end_date: Option<Month>,
}

/// Stored Subscription record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Server-assigned ID of the subscription
    pub id: i64,
    pub service_name: String,
    pub price: i64,
    pub user_id: UserId,
    pub start_date: Month,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Month>,
}

impl Subscription {
    pub fn new(id: i64, fields: NewSubscription) -> Self {
        let NewSubscription {
            service_name,
            price,
            user_id,
            start_date,
            end_date,
        } = fields;

        Self {
            id,
            service_name,
            price,
            user_id,
            start_date,
            end_date,
        }
    }

    /// Whether the subscription is active at some point in `[start, end]`.
    /// An open-ended subscription stays active forever.
    pub fn overlaps(&self, start: Month, end: Month) -> bool {
        self.start_date <= end && self.end_date.map_or(true, |end_date| end_date >= start)
    }
}

/// Listing filters. Fields left as `None` do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    /// Only subscriptions starting at or after this month
    pub start_date: Option<Month>,
    /// Only subscriptions ending at or before this month; open-ended ones never match
    pub end_date: Option<Month>,
}

impl ListFilter {
    pub fn matches(&self, subscription: &Subscription) -> bool {
        self.user_id
            .as_deref()
            .map_or(true, |user_id| subscription.user_id.as_ref() == user_id)
            && self
                .service_name
                .as_deref()
                .map_or(true, |name| subscription.service_name == name)
            && self
                .start_date
                .map_or(true, |start| subscription.start_date >= start)
            && self.end_date.map_or(true, |end| {
                subscription.end_date.map_or(false, |end_date| end_date <= end)
            })
    }
}

/// Cost aggregation parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostFilter {
    pub start_period: Month,
    pub end_period: Month,
    pub user_id: Option<UserId>,
    pub service_name: Option<String>,
}

impl CostFilter {
    pub fn matches(&self, subscription: &Subscription) -> bool {
        subscription.overlaps(self.start_period, self.end_period)
            && self
                .user_id
                .as_ref()
                .map_or(true, |user_id| &subscription.user_id == user_id)
            && self
                .service_name
                .as_deref()
                .map_or(true, |name| subscription.service_name == name)
    }
}
