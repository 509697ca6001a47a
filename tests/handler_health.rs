mod common;

use axum_test::TestServer;

#[tokio::test]
async fn test_health_endpoint_success() {
    let (state, _clicks, _rx) = common::create_test_state();
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert_eq!(json["checks"]["click_queue"]["status"], "ok");
    assert_eq!(json["checks"]["cache"]["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_health_degraded_when_click_queue_closed() {
    let (state, _clicks, rx) = common::create_test_state();
    drop(rx);
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status_service_unavailable();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["click_queue"]["status"], "error");
}
