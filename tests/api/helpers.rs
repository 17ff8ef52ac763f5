use std::net::TcpListener;
use std::sync::Arc;

use reqwest::{Client, Method, Response};

use serde::{Deserialize, Serialize};

use subcost::app;
use subcost::repo::{InMemorySubscriptionStore, SubscriptionStore};
use subcost::settings::ServerTimeouts;

pub const USER_ID: &str = "60601fee-2bf1-4721-ae6f-7636e79a0cba";

/// Request body, every field optional so malformed payloads can be built
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl SubscriptionBody {
    pub fn new(service_name: &str, price: i64, start_date: &str, end_date: Option<&str>) -> Self {
        Self {
            service_name: Some(service_name.into()),
            price: Some(price),
            user_id: Some(USER_ID.into()),
            start_date: Some(start_date.into()),
            end_date: end_date.map(Into::into),
        }
    }

    pub fn for_user(self, user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..self
        }
    }
}

/// Subscription as returned by the API
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubscriptionResponse {
    pub id: i64,
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_date: String,
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct TotalCostResponse {
    pub total_cost: i64,
}

pub struct TestApp {
    addr: String,

    pub client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(InMemorySubscriptionStore::new())).await
    }

    pub async fn spawn_with_store(store: Arc<dyn SubscriptionStore>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to listen on random port");
        let port = listener.local_addr().unwrap().port();

        let addr = format!("http://127.0.0.1:{}", port);

        let server = app::run(listener, store, ServerTimeouts::default())
            .expect("Failed to spawn app instance");
        let _ = tokio::spawn(server);

        let client = Client::new();

        Self { addr, client }
    }

    pub fn request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", &self.addr, url);
        self.client.request(method, url)
    }

    pub async fn health_check(&self) -> reqwest::Result<Response> {
        self.request(Method::GET, "health_check").send().await
    }

    pub async fn subscription_create(&self, body: &SubscriptionBody) -> reqwest::Result<Response> {
        self.request(Method::POST, "subscriptions")
            .json(body)
            .send()
            .await
    }

    pub async fn subscription_get(&self, id: &str) -> reqwest::Result<Response> {
        self.request(Method::GET, &format!("subscriptions/{}", id))
            .send()
            .await
    }

    pub async fn subscription_update(
        &self,
        id: &str,
        body: &SubscriptionBody,
    ) -> reqwest::Result<Response> {
        self.request(Method::PUT, &format!("subscriptions/{}", id))
            .json(body)
            .send()
            .await
    }

    pub async fn subscription_delete(&self, id: &str) -> reqwest::Result<Response> {
        self.request(Method::DELETE, &format!("subscriptions/{}", id))
            .send()
            .await
    }

    pub async fn subscription_list(&self, query: &[(&str, &str)]) -> reqwest::Result<Response> {
        self.request(Method::GET, "subscriptions")
            .query(query)
            .send()
            .await
    }

    pub async fn total_cost(&self, query: &[(&str, &str)]) -> reqwest::Result<Response> {
        self.request(Method::GET, "subscriptions/cost")
            .query(query)
            .send()
            .await
    }

    /// Create a subscription that is expected to succeed, returning its ID
    pub async fn create_ok(&self, body: &SubscriptionBody) -> i64 {
        let res = self
            .subscription_create(body)
            .await
            .expect("Failed to execute request");
        assert_eq!(reqwest::StatusCode::CREATED, res.status());

        res.json::<CreatedResponse>()
            .await
            .expect("Failed to parse created response")
            .id
    }

    /// Run a cost query that is expected to succeed
    pub async fn total_cost_ok(&self, query: &[(&str, &str)]) -> i64 {
        let res = self
            .total_cost(query)
            .await
            .expect("Failed to execute request");
        assert_eq!(reqwest::StatusCode::OK, res.status());

        res.json::<TotalCostResponse>()
            .await
            .expect("Failed to parse cost response")
            .total_cost
    }
}
