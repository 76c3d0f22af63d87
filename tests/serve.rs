//! The hyper layer: real `Request`s in, JSON `Response`s out.

mod common;

use hyper::{header, Body, Request, StatusCode};
use serde_json::{json, Value};

use common::demo_router;

async fn body_json(body: Body) -> Value {
    let bytes = hyper::body::to_bytes(body).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn get_with_query_string() {
    let router = demo_router();
    let req = Request::builder()
        .method("GET")
        .uri("http://localhost/items/?skip=1&limit=1")
        .body(Body::empty())
        .unwrap();

    let res = router.respond(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(body_json(res.into_body()).await, json!([{"item_name": "Bar"}]));
}

#[tokio::test]
async fn post_with_json_body() {
    let router = demo_router();
    let req = Request::builder()
        .method("POST")
        .uri("http://localhost/items/")
        .body(Body::from(r#"{"name": "Axe", "price": 10.5, "tax": 1.5}"#))
        .unwrap();

    let res = router.respond(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.into_body()).await;
    assert_eq!(body["price_with_tax"], json!(12.0));
}

#[tokio::test]
async fn validation_failure_is_a_422_with_details() {
    let router = demo_router();
    let req = Request::builder()
        .method("GET")
        .uri("http://localhost/fruits/?q=ab")
        .body(Body::empty())
        .unwrap();

    let res = router.respond(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res.into_body()).await;
    assert_eq!(body["detail"][0]["loc"], json!(["query", "q"]));
}

#[tokio::test]
async fn unmatched_request_is_a_404() {
    let router = demo_router();
    let req = Request::builder()
        .method("GET")
        .uri("http://localhost/missing")
        .body(Body::empty())
        .unwrap();

    let res = router.respond(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(res.into_body()).await,
        json!({"detail": "Not Found"})
    );
}

#[tokio::test]
async fn router_serves_through_the_service_interface() {
    use hyper::service::Service;

    let mut make = demo_router().into_service();
    let mut service = make.call(()).await.unwrap();

    let req = Request::builder()
        .method("GET")
        .uri("http://localhost/users/me")
        .body(Body::empty())
        .unwrap();

    let res = service.call(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        body_json(res.into_body()).await,
        json!({"user_id": "the_current_user"})
    );
}
