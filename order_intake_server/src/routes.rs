//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use order_intake_engine::{
    alerts::report_failure,
    pipeline_objects::CartConvertedEvent,
    traits::{DocumentStore, UpstreamOrders, WorkQueue},
    IntakeApi,
    WebhookApi,
};

use crate::{alert_sink::AlertSink, data_objects::JsonResponse, errors::ServerError};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("Received health check request");
    HttpResponse::Ok().body("ok\n")
}

//----------------------------------------------   Webhook  ----------------------------------------------------
route!(cart_converted => Post "/webhook/cart_converted" impl UpstreamOrders, WorkQueue, DocumentStore);
/// Route handler for inbound cart-conversion webhooks.
///
/// The body must be the raw JSON event exactly as the storefront delivered it; it is kept
/// verbatim for the audit trail, so it is read as bytes rather than through a typed extractor.
/// A malformed body earns a 400, an event for a different store or of a different type earns a
/// 403, and neither produces any queue or store writes. Backend failures alert the operator.
pub async fn cart_converted<U, Q, S>(
    body: web::Bytes,
    api: web::Data<WebhookApi<U, Q, S>>,
    alerts: web::Data<AlertSink>,
) -> Result<HttpResponse, ServerError>
where
    U: UpstreamOrders,
    Q: WorkQueue,
    S: DocumentStore,
{
    trace!("Received cart-converted webhook");
    let raw = std::str::from_utf8(&body).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
    let event: CartConvertedEvent =
        serde_json::from_str(raw).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
    match api.handle_cart_converted(&event, raw).await {
        Ok(order_id) => {
            debug!("Webhook for order {order_id} processed");
            Ok(HttpResponse::Ok()
                .json(JsonResponse::success(format!("Successfully added order {order_id} to the queue"))))
        },
        Err(e) if e.is_validation() => {
            info!("Rejected cart-converted webhook. {e}");
            Err(e.into())
        },
        Err(e) => {
            report_failure(alerts.as_ref(), "webhook intake", &e).await;
            Err(e.into())
        },
    }
}

//----------------------------------------------   Poll  ----------------------------------------------------
route!(trigger_poll => Post "/poll/run" impl UpstreamOrders, WorkQueue, DocumentStore);
/// Kicks off one poll run immediately, outside the worker's schedule.
pub async fn trigger_poll<U, Q, S>(
    api: web::Data<IntakeApi<U, Q, S>>,
    alerts: web::Data<AlertSink>,
) -> Result<HttpResponse, ServerError>
where
    U: UpstreamOrders,
    Q: WorkQueue,
    S: DocumentStore,
{
    debug!("Received manual poll trigger");
    match api.run_poll().await {
        Ok(summary) => {
            info!(
                "Manual poll run enqueued {} orders over {} pages",
                summary.orders_enqueued, summary.pages
            );
            Ok(HttpResponse::Ok().json(summary))
        },
        Err(e) => {
            report_failure(alerts.as_ref(), "poll intake", &e).await;
            Err(e.into())
        },
    }
}
