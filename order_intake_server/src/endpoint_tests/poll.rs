use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, App};
use order_intake_engine::{traits::UpstreamApiError, IntakeApi};

use super::mocks::{counts_with, MockQueue, MockStore, MockUpstream};
use crate::{alert_sink::AlertSink, routes::TriggerPollRoute};

async fn post_poll(upstream: MockUpstream, queue: MockQueue, store: MockStore) -> (StatusCode, String) {
    let _ = env_logger::try_init().ok();
    let api = IntakeApi::new(upstream, queue, store, "XYZ".to_string());
    let app = App::new()
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(AlertSink::Log))
        .service(TriggerPollRoute::<MockUpstream, MockQueue, MockStore>::new());
    let service = test::init_service(app).await;
    let req = TestRequest::post().uri("/poll/run").to_request();
    let (_, res) = test::call_service(&service, req).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

#[actix_web::test]
async fn manual_poll_of_an_empty_catalog_still_writes_a_ledger_entry() {
    let mut upstream = MockUpstream::new();
    upstream
        .expect_count_orders_by_status()
        .times(1)
        .returning(|| Ok(counts_with(&[(1, 3, "Pending"), (5, 2, "Cancelled")])));
    upstream.expect_fetch_orders_page().times(0);
    let mut queue = MockQueue::new();
    queue.expect_send_message().times(0);
    let mut store = MockStore::new();
    store.expect_record_poll_run().times(1).returning(|_| Ok(()));
    let (status, body) = post_poll(upstream, queue, store).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"orders_enqueued\":0"));
}

#[actix_web::test]
async fn an_unreachable_upstream_is_an_internal_error() {
    let mut upstream = MockUpstream::new();
    upstream
        .expect_count_orders_by_status()
        .times(1)
        .returning(|| Err(UpstreamApiError::RequestFailed("connection refused".to_string())));
    let mut store = MockStore::new();
    store.expect_record_poll_run().times(0);
    let (status, body) = post_poll(upstream, MockQueue::new(), store).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("backend"));
}
