use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::model::{CostFilter, ListFilter, NewSubscription, Subscription};

use super::SubscriptionStore;

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Subscription>,
}

/// Subscription store kept entirely in process memory.
///
/// Filters and the overlap rule follow the Postgres store exactly, including
/// open-ended subscriptions never satisfying an `end_date` listing bound.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    table: RwLock<Table>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    #[tracing::instrument(name = "Insert subscription", skip(self))]
    async fn create(&self, subscription: &NewSubscription) -> Result<i64> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let id = table.last_id;
        table
            .rows
            .insert(id, Subscription::new(id, subscription.clone()));
        Ok(id)
    }

    #[tracing::instrument(name = "Fetch subscription by id", skip(self))]
    async fn get(&self, id: i64) -> Result<Subscription> {
        self.table
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound { id })
    }

    #[tracing::instrument(name = "Update subscription by id", skip(self))]
    async fn update(&self, id: i64, subscription: &NewSubscription) -> Result<()> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = Subscription::new(id, subscription.clone());
                Ok(())
            }
            None => {
                tracing::warn!(id, "No subscription found for update");
                Err(Error::NotFound { id })
            }
        }
    }

    #[tracing::instrument(name = "Delete subscription by id", skip(self))]
    async fn delete(&self, id: i64) -> Result<()> {
        let mut table = self.table.write().await;
        if table.rows.remove(&id).is_none() {
            tracing::warn!(id, "No subscription found for deletion");
            return Err(Error::NotFound { id });
        }
        Ok(())
    }

    #[tracing::instrument(name = "List subscriptions", skip(self))]
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Subscription>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect())
    }

    #[tracing::instrument(name = "Calculate total cost", skip(self))]
    async fn total_cost(&self, filter: &CostFilter) -> Result<i64> {
        let table = self.table.read().await;
        table
            .rows
            .values()
            .filter(|row| filter.matches(row))
            .try_fold(0i64, |total, row| total.checked_add(row.price))
            .ok_or(Error::CostOverflow)
    }
}
