use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use bigcommerce_tools::BigCommerceApi;
use log::warn;
use order_intake_engine::{IntakeApi, SqliteBackend, WebhookApi};

use crate::{
    alert_sink::AlertSink,
    config::ServerConfig,
    consumer_worker::start_consumer_worker,
    errors::ServerError,
    poll_worker::start_poll_worker,
    routes::{health, CartConvertedRoute, TriggerPollRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let backend = SqliteBackend::new_with_url(&config.database_url)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let upstream = BigCommerceApi::new(config.bigcommerce_config.clone())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let alerts = AlertSink::new(config.alert_webhook_url.clone());
    if config.poll_enabled {
        start_poll_worker(
            upstream.clone(),
            backend.clone(),
            alerts.clone(),
            config.bigcommerce_config.store_hash.clone(),
            config.poll_interval,
        );
    } else {
        warn!("The poll worker is disabled. Orders will only arrive via webhooks.");
    }
    if config.consumer_enabled {
        start_consumer_worker(
            upstream.clone(),
            backend.clone(),
            config.consumer_batch_size,
            config.consumer_idle_delay,
        );
    } else {
        warn!("The consumer worker is disabled. The queue will accumulate until one runs.");
    }
    let srv = create_server_instance(config, upstream, backend, alerts)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    upstream: BigCommerceApi,
    backend: SqliteBackend,
    alerts: AlertSink,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let producer = config.bigcommerce_config.producer();
        let store_hash = config.bigcommerce_config.store_hash.clone();
        let webhook_api =
            WebhookApi::new(upstream.clone(), backend.clone(), backend.clone(), producer);
        let intake_api =
            IntakeApi::new(upstream.clone(), backend.clone(), backend.clone(), store_hash);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("oip::access_log"))
            .app_data(web::Data::new(webhook_api))
            .app_data(web::Data::new(intake_api))
            .app_data(web::Data::new(alerts.clone()))
            .service(health)
            .service(CartConvertedRoute::<BigCommerceApi, SqliteBackend, SqliteBackend>::new())
            .service(TriggerPollRoute::<BigCommerceApi, SqliteBackend, SqliteBackend>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
