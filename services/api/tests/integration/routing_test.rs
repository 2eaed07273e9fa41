use axum::http::{HeaderName, HeaderValue, Method, StatusCode, header};
use axum_test::TestServer;
use serde_json::{Value, json};

use greencart_api::router::{Resource, ResourceRouters, build_router};

use crate::helpers::{ALLOWED_ORIGIN, FOREIGN_ORIGIN, RecordingSink, test_app, test_config};

fn server() -> TestServer {
    TestServer::new(test_app(RecordingSink::default())).unwrap()
}

fn origin(value: &'static str) -> (HeaderName, HeaderValue) {
    (header::ORIGIN, HeaderValue::from_static(value))
}

// ── Liveness ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_liveness_without_backends() {
    let response = server().get("/").await;

    response.assert_status_ok();
    response.assert_text("API is Working");
}

// ── Resource mounts ──────────────────────────────────────────────────────────

#[tokio::test]
async fn should_route_each_prefix_to_its_router() {
    let server = server();
    for resource in Resource::ALL {
        let path = format!("{}/items/7?expand=true", resource.prefix());
        let response = server
            .post(&path)
            .json(&json!({ "quantity": 2 }))
            .await;

        response.assert_status_ok();
        let echo: Value = response.json();
        assert_eq!(echo["resource"], resource.name());
        assert_eq!(echo["original_uri"], path);
        assert_eq!(echo["uri"], "/items/7?expand=true");
        assert_eq!(echo["json"]["quantity"], 2);
    }
}

#[tokio::test]
async fn should_deliver_body_bytes_unaltered() {
    let body = "{ \"name\" :   \"kale\",\n  \"price\": 3.50 }";
    let response = server()
        .put("/api/product/42")
        .content_type("application/json")
        .bytes(body.as_bytes().to_vec().into())
        .await;

    response.assert_status_ok();
    let echo: Value = response.json();
    assert_eq!(echo["method"], "PUT");
    assert_eq!(echo["body"], body);
    assert_eq!(echo["json"]["name"], "kale");
}

#[tokio::test]
async fn should_pass_non_json_bodies_through() {
    let response = server()
        .post("/api/address/add")
        .text("street=Main")
        .await;

    response.assert_status_ok();
    let echo: Value = response.json();
    assert_eq!(echo["body"], "street=Main");
    assert!(echo["json"].is_null());
}

#[tokio::test]
async fn should_expose_parsed_cookies_to_routers() {
    let response = server()
        .get("/api/user/is-auth")
        .add_header(header::COOKIE, HeaderValue::from_static("token=abc; theme=dark"))
        .await;

    response.assert_status_ok();
    let echo: Value = response.json();
    assert_eq!(echo["cookies"]["token"], "abc");
    assert_eq!(echo["cookies"]["theme"], "dark");
}

#[tokio::test]
async fn should_reject_malformed_json_before_router() {
    let response = server()
        .post("/api/cart/update")
        .content_type("application/json")
        .bytes("{\"items\": [".as_bytes().to_vec().into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "MALFORMED_JSON");
}

#[tokio::test]
async fn should_answer_not_mounted_for_missing_router() {
    let routers = ResourceRouters::unmounted();
    let app = build_router(&test_config(&[]), RecordingSink::default(), routers);
    let server = TestServer::new(app).unwrap();

    let response = server.get("/api/order/user").await;

    response.assert_status(StatusCode::NOT_IMPLEMENTED);
    let body: Value = response.json();
    assert_eq!(body["kind"], "NOT_MOUNTED");
    assert_eq!(body["message"], "order routes are not mounted");
}

#[tokio::test]
async fn should_answer_not_mounted_with_trailing_slash() {
    let app = build_router(
        &test_config(&[]),
        RecordingSink::default(),
        ResourceRouters::unmounted(),
    );
    let server = TestServer::new(app).unwrap();

    for path in ["/api/order", "/api/order/", "/api/order/user"] {
        let response = server.get(path).await;

        response.assert_status(StatusCode::NOT_IMPLEMENTED);
        let body: Value = response.json();
        assert_eq!(body["kind"], "NOT_MOUNTED", "{path}");
    }
}

#[tokio::test]
async fn should_route_prefix_with_trailing_slash() {
    let server = server();
    for resource in Resource::ALL {
        let path = format!("{}/", resource.prefix());
        let response = server.get(&path).await;

        response.assert_status_ok();
        let echo: Value = response.json();
        assert_eq!(echo["resource"], resource.name());
        assert_eq!(echo["original_uri"], path);
        assert_eq!(echo["uri"], "/");
    }
}

#[tokio::test]
async fn should_return_uniform_not_found_outside_table() {
    let response = server().get("/api/unknown").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["kind"], "NOT_FOUND");
}

// ── CORS ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_grant_preflight_to_listed_origin() {
    let (name, value) = origin(ALLOWED_ORIGIN);
    let response = server()
        .method(Method::OPTIONS, "/api/product/list")
        .add_header(name, value)
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("PATCH"),
        )
        .add_header(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("content-type"),
        )
        .await;

    assert!(response.status_code().is_success());
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOWED_ORIGIN);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .to_owned();
    for method in ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"] {
        assert!(methods.contains(method), "{method} missing from {methods}");
    }
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type");
}

#[tokio::test]
async fn should_grant_preflight_on_webhook_path() {
    let (name, value) = origin(ALLOWED_ORIGIN);
    let response = server()
        .method(Method::OPTIONS, "/stripe")
        .add_header(name, value)
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .await;

    assert!(response.status_code().is_success());
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        ALLOWED_ORIGIN
    );
}

#[tokio::test]
async fn should_withhold_grants_from_foreign_origin() {
    let (name, value) = origin(FOREIGN_ORIGIN);
    let response = server()
        .method(Method::OPTIONS, "/api/product/list")
        .add_header(name, value)
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("DELETE"),
        )
        .await;

    let headers = response.headers();
    assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS));
    assert!(!headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn should_decorate_simple_request_from_listed_origin() {
    let (name, value) = origin(ALLOWED_ORIGIN);
    let response = server().get("/").add_header(name, value).await;

    response.assert_status_ok();
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOWED_ORIGIN);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn should_still_serve_foreign_origin_without_grants() {
    let (name, value) = origin(FOREIGN_ORIGIN);
    let response = server().get("/").add_header(name, value).await;

    response.assert_status_ok();
    assert!(
        !response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
    );
}

#[tokio::test]
async fn should_tag_responses_with_request_id() {
    let response = server().get("/").await;

    assert!(response.headers().contains_key("x-request-id"));
}
