use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, App};
use order_intake_engine::{pipeline_objects::SendReceipt, traits::QueueError, WebhookApi};

use super::mocks::{sample_order, MockQueue, MockStore, MockUpstream};
use crate::{alert_sink::AlertSink, routes::CartConvertedRoute};

const PRODUCER: &str = "stores/XYZ";
const VALID_EVENT: &str =
    r#"{"scope":"store/cart/converted","producer":"stores/XYZ","data":{"orderId":42}}"#;

async fn post_webhook(
    upstream: MockUpstream,
    queue: MockQueue,
    store: MockStore,
    body: &'static str,
) -> (StatusCode, String) {
    let _ = env_logger::try_init().ok();
    let api = WebhookApi::new(upstream, queue, store, PRODUCER.to_string());
    let app = App::new()
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(AlertSink::Log))
        .service(CartConvertedRoute::<MockUpstream, MockQueue, MockStore>::new());
    let service = test::init_service(app).await;
    let req = TestRequest::post()
        .uri("/webhook/cart_converted")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body)
        .to_request();
    let (_, res) = test::call_service(&service, req).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

#[actix_web::test]
async fn valid_event_queues_the_order() {
    let mut upstream = MockUpstream::new();
    upstream.expect_fetch_order().times(1).withf(|id| *id == 42).returning(|id| Ok(sample_order(id)));
    let mut queue = MockQueue::new();
    queue
        .expect_send_message()
        .times(1)
        .withf(|body, attrs| body.contains("\"id\":42") && attrs.webhook.is_some())
        .returning(|_, _| Ok(SendReceipt { message_id: "m-42".to_string() }));
    let mut store = MockStore::new();
    store
        .expect_record_webhook_audit()
        .times(1)
        .withf(|entry| entry.order_id == 42 && entry.message.message_id == "m-42")
        .returning(|_| Ok(()));
    let (status, body) = post_webhook(upstream, queue, store, VALID_EVENT).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Successfully added order 42 to the queue"));
}

#[actix_web::test]
async fn foreign_store_event_is_forbidden_with_no_side_effects() {
    let mut upstream = MockUpstream::new();
    upstream.expect_fetch_order().times(0);
    let mut queue = MockQueue::new();
    queue.expect_send_message().times(0);
    let mut store = MockStore::new();
    store.expect_record_webhook_audit().times(0);
    let event = r#"{"scope":"store/cart/converted","producer":"stores/OTHER","data":{"orderId":42}}"#;
    let (status, body) = post_webhook(upstream, queue, store, event).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("Webhook rejected"));
}

#[actix_web::test]
async fn unrelated_event_type_is_forbidden() {
    let event = r#"{"scope":"store/order/updated","producer":"stores/XYZ","data":{"orderId":42}}"#;
    let (status, _) = post_webhook(MockUpstream::new(), MockQueue::new(), MockStore::new(), event).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn malformed_body_is_a_bad_request() {
    let (status, body) =
        post_webhook(MockUpstream::new(), MockQueue::new(), MockStore::new(), "not json at all").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Could not read request body"));
}

#[actix_web::test]
async fn queue_failure_is_an_internal_error() {
    let mut upstream = MockUpstream::new();
    upstream.expect_fetch_order().times(1).returning(|id| Ok(sample_order(id)));
    let mut queue = MockQueue::new();
    queue
        .expect_send_message()
        .times(1)
        .returning(|_, _| Err(QueueError::SendError("queue is down".to_string())));
    let mut store = MockStore::new();
    store.expect_record_webhook_audit().times(0);
    let (status, _) = post_webhook(upstream, queue, store, VALID_EVENT).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
