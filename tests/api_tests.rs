use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use nms_sentinel::{config::Config, routes, state::AppState};
use serde_json::Value;
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        secret_key: Some("integration-test-secret".to_string()),
        ..Config::default()
    }
}

async fn spawn_app_with(config: Config) -> Router {
    let state = AppState::initialize(config)
        .await
        .expect("Failed to create app state");
    routes::router(state)
}

async fn spawn_app() -> Router {
    spawn_app_with(test_config()).await
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/admin/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={username}&password={password}")))
        .unwrap()
}

async fn obtain_token(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(login_request("admin", "adminpass"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

fn create_key_request(token: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/admin/apikeys")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn list_keys_request(token: &str) -> Request<Body> {
    Request::builder()
        .uri("/admin/apikeys")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn is_hex_key(key: &str) -> bool {
    key.len() == 64 && key.chars().all(|c| c.is_ascii_hexdigit())
}

#[tokio::test]
async fn test_root_endpoint() {
    let app = spawn_app().await;

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["message"].is_string());
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = spawn_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["database"], "connected");
}

#[tokio::test]
async fn test_token_endpoint() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(login_request("admin", "adminpass"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert_eq!(body["token_type"], "bearer");
}

#[tokio::test]
async fn test_token_endpoint_invalid_credentials() {
    let app = spawn_app().await;

    for (username, password) in [("admin", "wrong"), ("invalid", "invalid")] {
        let response = app
            .clone()
            .oneshot(login_request(username, password))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");
        assert_eq!(
            body_json(response).await["error"]["message"],
            "Incorrect username or password"
        );
    }
}

#[tokio::test]
async fn test_token_endpoint_missing_field() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/token")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("username=admin"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_create_key_requires_authorization() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(create_key_request(None, r#"{"name": "sensor-1"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");

    let response = app
        .clone()
        .oneshot(create_key_request(Some("not-a-token"), r#"{"name": "sensor-1"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_secret_is_rejected() {
    let app = spawn_app().await;
    let other = spawn_app_with(Config {
        secret_key: Some("some-other-secret".to_string()),
        ..test_config()
    })
    .await;
    let foreign_token = obtain_token(&other).await;

    let response = app.oneshot(list_keys_request(&foreign_token)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_api_keys() {
    let app = spawn_app().await;
    let token = obtain_token(&app).await;

    let response = app
        .clone()
        .oneshot(list_keys_request(&token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(create_key_request(Some(&token), r#"{"name": "sensor-1"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["name"], "sensor-1");
    assert!(first["id"].is_i64());
    assert!(first["created_at"].is_string());
    let first_key = first["key"].as_str().unwrap().to_string();
    assert!(is_hex_key(&first_key));

    let response = app
        .clone()
        .oneshot(create_key_request(Some(&token), r#"{"name": "sensor-1"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let second_key = body_json(response).await["key"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(is_hex_key(&second_key));
    assert_ne!(first_key, second_key);

    let response = app
        .clone()
        .oneshot(list_keys_request(&token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let keys = body_json(response).await;
    let keys = keys.as_array().unwrap();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0]["key"], first_key.as_str());
    assert_eq!(keys[1]["key"], second_key.as_str());
}

#[tokio::test]
async fn test_create_key_rejects_malformed_body() {
    let app = spawn_app().await;
    let token = obtain_token(&app).await;

    let response = app
        .clone()
        .oneshot(create_key_request(Some(&token), r#"{"label": "sensor-1"}"#))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_rate_limit_applies_to_all_routes() {
    let app = spawn_app_with(Config {
        rate_limit_requests: 3,
        ..test_config()
    })
    .await;

    for expected_remaining in ["2", "1", "0"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["x-ratelimit-remaining"],
            expected_remaining
        );
    }

    let response = app
        .clone()
        .oneshot(login_request("admin", "adminpass"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
}
