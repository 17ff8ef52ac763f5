use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use tracing_actix_web::TracingLogger;

use crate::controller::{invalid_body, invalid_id, invalid_query, subscriptions};
use crate::repo::SubscriptionStore;
use crate::settings::ServerTimeouts;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Run the application on a specified TCP listener.
///
/// The returned server stops accepting connections on SIGINT/SIGTERM and
/// waits up to `timeouts.shutdown` for in-flight requests.
pub fn run(
    listener: TcpListener,
    store: Arc<dyn SubscriptionStore>,
    timeouts: ServerTimeouts,
) -> anyhow::Result<Server> {
    // Wrap application data
    let store: web::Data<dyn SubscriptionStore> = web::Data::from(store);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(store.clone())
            .app_data(web::JsonConfig::default().error_handler(invalid_body))
            .app_data(web::PathConfig::default().error_handler(invalid_id))
            .app_data(web::QueryConfig::default().error_handler(invalid_query))
            .service(health_check)
            .service(subscriptions::scope())
    })
    .client_request_timeout(timeouts.request)
    .keep_alive(timeouts.keep_alive)
    .shutdown_timeout(timeouts.shutdown.as_secs())
    .listen(listener)?
    .run();

    Ok(server)
}
