use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

use serde::{Deserialize, Serialize};

use crate::controller::RestResult;
use crate::domain::{Month, UserId, ValidationError};
use crate::error::Error;
use crate::model::{CostFilter, ListFilter, NewSubscription};
use crate::repo::SubscriptionStore;

#[derive(Debug, Serialize)]
struct Created {
    id: i64,
}

#[derive(Debug, Serialize)]
struct Updated {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct TotalCost {
    total_cost: i64,
}

/// JSON deserialization wrapper for parsing subscription bodies
#[derive(Debug, Deserialize)]
pub struct SubscriptionForm {
    service_name: String,
    price: i64,
    user_id: String,
    start_date: String,
    #[serde(default)]
    end_date: Option<String>,
}

impl TryInto<NewSubscription> for SubscriptionForm {
    type Error = ValidationError;

    fn try_into(self) -> Result<NewSubscription, Self::Error> {
        let user_id = self.user_id.parse::<UserId>()?;
        let start_date = self.start_date.parse::<Month>()?;
        let end_date = self.end_date.map(|d| d.parse::<Month>()).transpose()?;

        Ok(NewSubscription {
            service_name: self.service_name,
            price: self.price,
            user_id,
            start_date,
            end_date,
        })
    }
}

/// Query string for listing subscriptions
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    user_id: Option<String>,
    service_name: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl TryInto<ListFilter> for ListQuery {
    type Error = ValidationError;

    fn try_into(self) -> Result<ListFilter, Self::Error> {
        Ok(ListFilter {
            user_id: non_empty(self.user_id),
            service_name: non_empty(self.service_name),
            start_date: non_empty(self.start_date)
                .map(|d| d.parse::<Month>())
                .transpose()?,
            end_date: non_empty(self.end_date)
                .map(|d| d.parse::<Month>())
                .transpose()?,
        })
    }
}

/// Query string for the cost calculation
#[derive(Debug, Deserialize)]
pub struct CostQuery {
    start_period: Option<String>,
    end_period: Option<String>,
    user_id: Option<String>,
    service_name: Option<String>,
}

impl TryInto<CostFilter> for CostQuery {
    type Error = ValidationError;

    fn try_into(self) -> Result<CostFilter, Self::Error> {
        let start_period = non_empty(self.start_period)
            .ok_or(ValidationError::MissingParameter("start_period"))?;
        let end_period =
            non_empty(self.end_period).ok_or(ValidationError::MissingParameter("end_period"))?;

        Ok(CostFilter {
            start_period: start_period.parse::<Month>()?,
            end_period: end_period.parse::<Month>()?,
            user_id: non_empty(self.user_id)
                .map(|id| id.parse::<UserId>())
                .transpose()?,
            service_name: non_empty(self.service_name),
        })
    }
}

/// Empty query values count as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Create endpoint for new subscriptions
#[tracing::instrument(name = "Create a subscription", skip(store))]
#[post("")]
async fn create(
    store: web::Data<dyn SubscriptionStore>,
    body: web::Json<SubscriptionForm>,
) -> RestResult<impl Responder> {
    let new_subscription: NewSubscription = body.into_inner().try_into().map_err(Error::from)?;

    let id = store.create(&new_subscription).await?;

    Ok(HttpResponse::Created().json(Created { id }))
}

/// Calculate the total price of subscriptions active within a period
#[tracing::instrument(name = "Calculate total cost", skip(store))]
#[get("/cost")]
async fn total_cost(
    store: web::Data<dyn SubscriptionStore>,
    query: web::Query<CostQuery>,
) -> RestResult<impl Responder> {
    let filter: CostFilter = query.into_inner().try_into().map_err(Error::from)?;
    tracing::info!(?filter, "Calculating total cost");

    let total_cost = store.total_cost(&filter).await?;

    Ok(HttpResponse::Ok().json(TotalCost { total_cost }))
}

/// List subscriptions matching the query filters
#[tracing::instrument(name = "List subscriptions", skip(store))]
#[get("")]
async fn list(
    store: web::Data<dyn SubscriptionStore>,
    query: web::Query<ListQuery>,
) -> RestResult<impl Responder> {
    let filter: ListFilter = query.into_inner().try_into().map_err(Error::from)?;

    let subscriptions = store.list(&filter).await?;

    Ok(HttpResponse::Ok().json(subscriptions))
}

#[tracing::instrument(name = "Fetch a subscription", skip(store))]
#[get("/{id}")]
async fn fetch(
    store: web::Data<dyn SubscriptionStore>,
    path: web::Path<(i64,)>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();

    let subscription = store.get(id).await?;

    Ok(HttpResponse::Ok().json(subscription))
}

/// Replace every field of an existing subscription
#[tracing::instrument(name = "Update a subscription", skip(store))]
#[put("/{id}")]
async fn update(
    store: web::Data<dyn SubscriptionStore>,
    path: web::Path<(i64,)>,
    body: web::Json<SubscriptionForm>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();
    let subscription: NewSubscription = body.into_inner().try_into().map_err(Error::from)?;

    store.update(id, &subscription).await?;

    Ok(HttpResponse::Ok().json(Updated { status: "updated" }))
}

#[tracing::instrument(name = "Delete a subscription", skip(store))]
#[delete("/{id}")]
async fn remove(
    store: web::Data<dyn SubscriptionStore>,
    path: web::Path<(i64,)>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();

    store.delete(id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Subscriptions API endpoints
pub fn scope() -> impl HttpServiceFactory {
    // `/cost` must be registered ahead of `/{id}`
    web::scope("/subscriptions")
        .service(total_cost)
        .service(create)
        .service(list)
        .service(fetch)
        .service(update)
        .service(remove)
}
