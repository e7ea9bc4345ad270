use super::*;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn create_test_router() -> Router {
    let (state, _events) = ChatServerState::new();
    create_router(state)
}

async fn get(router: Router, uri: &str) -> Response {
    router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_index_served() {
    let response = get(create_test_router(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = body_string(response).await;
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("id=\"messages\""));
    assert!(html.contains("<input"));
    assert!(html.contains("<button"));
}

#[tokio::test]
async fn test_app_js_served() {
    let response = get(create_test_router(), "/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/javascript"
    );
    let js = body_string(response).await;
    assert!(js.contains("WebSocket"));
    assert!(js.contains("textContent"));
}

#[tokio::test]
async fn test_style_css_served() {
    let response = get(create_test_router(), "/style.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
}

#[tokio::test]
async fn test_health_reports_connections() {
    let response = get(create_test_router(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "starting");
    assert_eq!(body["connections"], 0);
}

#[tokio::test]
async fn test_api_info() {
    let response = get(create_test_router(), "/api/info").await;
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["name"], "chatcast");
    assert_eq!(body["endpoints"]["websocket"], "/ws");
}

#[tokio::test]
async fn test_ws_requires_upgrade() {
    let response = get(create_test_router(), "/ws").await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let response = create_test_router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://elsewhere.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_unknown_route() {
    let response = get(create_test_router(), "/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
