//! End-to-end exercises of the boss counter endpoints through the router.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use dungeon_brawl_server::{build_router, AppState, BOSS_MAX_HP};
use tower::ServiceExt;

fn service() -> Router {
    build_router(AppState::default())
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body is readable");
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

fn attack_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/boss/attack")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .expect("request builds")
}

#[tokio::test]
async fn status_initializes_the_counter_to_full_health() {
    let response = service()
        .oneshot(
            Request::builder()
                .uri("/api/boss/status")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router answers");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["type"], "boss_status");
    assert_eq!(body["bossId"], "global-boss-1");
    assert_eq!(body["hp"], BOSS_MAX_HP);
    assert_eq!(body["maxHp"], BOSS_MAX_HP);
}

#[tokio::test]
async fn empty_attack_body_applies_the_default_amount() {
    let response = service()
        .oneshot(attack_request(""))
        .await
        .expect("router answers");

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["type"], "boss_attack");
    assert_eq!(body["amount"], 10);
    assert_eq!(body["hp"], BOSS_MAX_HP - 10);
}

#[tokio::test]
async fn oversized_attack_amounts_are_clamped() {
    let response = service()
        .oneshot(attack_request(r#"{"amount": 9999}"#))
        .await
        .expect("router answers");

    let body = response_json(response).await;
    assert_eq!(body["amount"], 25);
    assert_eq!(body["hp"], BOSS_MAX_HP - 25);
}

#[tokio::test]
async fn undersized_attack_amounts_are_clamped() {
    let response = service()
        .oneshot(attack_request(r#"{"amount": 0}"#))
        .await
        .expect("router answers");

    let body = response_json(response).await;
    assert_eq!(body["amount"], 1);
    assert_eq!(body["hp"], BOSS_MAX_HP - 1);
}

#[tokio::test]
async fn unreadable_amounts_fall_back_to_the_default() {
    let response = service()
        .oneshot(attack_request(r#"{"amount": "banana"}"#))
        .await
        .expect("router answers");

    let body = response_json(response).await;
    assert_eq!(body["amount"], 10);
    assert_eq!(body["hp"], BOSS_MAX_HP - 10);
}

#[tokio::test]
async fn repeated_attacks_floor_the_counter_at_zero() {
    let app = service();

    for _ in 0..=(BOSS_MAX_HP / 25) {
        let response = app
            .clone()
            .oneshot(attack_request(r#"{"amount": 25}"#))
            .await
            .expect("router answers");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(attack_request(r#"{"amount": 25}"#))
        .await
        .expect("router answers");
    let body = response_json(response).await;
    assert_eq!(body["hp"], 0);
}
