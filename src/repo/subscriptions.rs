use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::domain::{Month, ValidationError};
use crate::error::{Error, Result};
use crate::model::{CostFilter, ListFilter, NewSubscription, Subscription};

/// Subscription store, implemented once per backend.
/// NOTE: Handlers only see `dyn SubscriptionStore`, so tests can swap in the in-memory store
/// TODO: Swap async-trait for std async traits once they support `dyn` dispatch
#[async_trait::async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Insert a new subscription, returning its assigned ID
    async fn create(&self, subscription: &NewSubscription) -> Result<i64>;

    /// Fetch a single subscription by ID
    async fn get(&self, id: i64) -> Result<Subscription>;

    /// Replace every field of an existing subscription
    async fn update(&self, id: i64, subscription: &NewSubscription) -> Result<()>;

    /// Physically remove a subscription
    async fn delete(&self, id: i64) -> Result<()>;

    /// All subscriptions matching the supplied filter fields, in no particular order
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Subscription>>;

    /// Sum of prices of the subscriptions active within the filter period
    async fn total_cost(&self, filter: &CostFilter) -> Result<i64>;
}

/// Raw `subscriptions` row, dates in sortable `YYYY-MM` form
#[derive(Debug, FromRow)]
struct SubscriptionRow {
    id: i64,
    service_name: String,
    price: i64,
    user_id: String,
    start_date: String,
    end_date: Option<String>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = Error;

    fn try_from(row: SubscriptionRow) -> Result<Self> {
        let decode = |e: ValidationError| Error::Storage(sqlx::Error::Decode(Box::new(e)));

        Ok(Self {
            id: row.id,
            service_name: row.service_name,
            price: row.price,
            user_id: row.user_id.parse().map_err(decode)?,
            start_date: Month::from_sortable(&row.start_date).map_err(decode)?,
            end_date: row
                .end_date
                .as_deref()
                .map(Month::from_sortable)
                .transpose()
                .map_err(decode)?,
        })
    }
}

/// Postgres Subscription store
#[derive(Debug, Clone)]
pub struct PgSubscriptionStore {
    pool: PgPool,
}

impl PgSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    #[tracing::instrument(name = "Insert subscription", skip(self))]
    async fn create(&self, subscription: &NewSubscription) -> Result<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            "insert into subscriptions(service_name, price, user_id, start_date, end_date) \
             values ($1, $2, $3, $4, $5) returning id",
        )
        .bind(&subscription.service_name)
        .bind(subscription.price)
        .bind(subscription.user_id.as_ref())
        .bind(subscription.start_date.sortable())
        .bind(subscription.end_date.map(|d| d.sortable()))
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    #[tracing::instrument(name = "Fetch subscription by id", skip(self))]
    async fn get(&self, id: i64) -> Result<Subscription> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            "select id, service_name, price, user_id, start_date, end_date \
             from subscriptions where id=$1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(Error::NotFound { id })?.try_into()
    }

    #[tracing::instrument(name = "Update subscription by id", skip(self))]
    async fn update(&self, id: i64, subscription: &NewSubscription) -> Result<()> {
        let result = sqlx::query(
            "update subscriptions \
             set service_name=$1, price=$2, user_id=$3, start_date=$4, end_date=$5 \
             where id=$6",
        )
        .bind(&subscription.service_name)
        .bind(subscription.price)
        .bind(subscription.user_id.as_ref())
        .bind(subscription.start_date.sortable())
        .bind(subscription.end_date.map(|d| d.sortable()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(id, "No subscription found for update");
            return Err(Error::NotFound { id });
        }
        Ok(())
    }

    #[tracing::instrument(name = "Delete subscription by id", skip(self))]
    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("delete from subscriptions where id=$1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(id, "No subscription found for deletion");
            return Err(Error::NotFound { id });
        }
        Ok(())
    }

    #[tracing::instrument(name = "List subscriptions", skip(self))]
    async fn list(&self, filter: &ListFilter) -> Result<Vec<Subscription>> {
        let mut query = QueryBuilder::<Postgres>::new(
            "select id, service_name, price, user_id, start_date, end_date \
             from subscriptions where 1=1",
        );
        if let Some(user_id) = &filter.user_id {
            query.push(" and user_id = ").push_bind(user_id.clone());
        }
        if let Some(service_name) = &filter.service_name {
            query.push(" and service_name = ").push_bind(service_name.clone());
        }
        if let Some(start_date) = filter.start_date {
            query.push(" and start_date >= ").push_bind(start_date.sortable());
        }
        if let Some(end_date) = filter.end_date {
            query.push(" and end_date <= ").push_bind(end_date.sortable());
        }

        let rows = query
            .build_query_as::<SubscriptionRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Subscription::try_from).collect()
    }

    #[tracing::instrument(name = "Calculate total cost", skip(self))]
    async fn total_cost(&self, filter: &CostFilter) -> Result<i64> {
        // sum(bigint) is numeric in Postgres, the cast fails loudly on overflow
        let mut query = QueryBuilder::<Postgres>::new(
            "select coalesce(sum(price), 0)::bigint from subscriptions where start_date <= ",
        );
        query
            .push_bind(filter.end_period.sortable())
            .push(" and (end_date is null or end_date >= ")
            .push_bind(filter.start_period.sortable())
            .push(")");
        if let Some(user_id) = &filter.user_id {
            query
                .push(" and user_id = ")
                .push_bind(user_id.as_ref().to_string());
        }
        if let Some(service_name) = &filter.service_name {
            query.push(" and service_name = ").push_bind(service_name.clone());
        }

        let total = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}
