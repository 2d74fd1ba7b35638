// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end HTTP flows against the Firestore emulator.
//!
//! Register, log in, create and list pins through the router.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{body_json, json_request, unique_suffix};

/// Register and log in a fresh user, returning (username, token).
async fn signed_up_user(app: &axum::Router, prefix: &str) -> (String, String) {
    let username = format!("{}_{}", prefix, unique_suffix());
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users",
            &json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "hunter22"
            }),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            &json!({"username": username, "password": "hunter22"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap().to_string();

    (username, token)
}

async fn list_pins(app: &axum::Router, query: &str) -> Vec<serde_json::Value> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/pins{}", query))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await.as_array().unwrap().clone()
}

#[tokio::test]
async fn test_registration_hides_password_and_rejects_duplicates() {
    require_emulator!();

    let (app, _) = common::create_test_app_with_db(common::test_db().await);
    let username = format!("reg_{}", unique_suffix());
    let registration = json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": "hunter22"
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/users", &registration, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let text = body.to_string();
    assert!(!text.contains("hunter22"));
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
    assert_eq!(body["username"], username.as_str());

    let response = app
        .oneshot(json_request("POST", "/api/users", &registration, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    require_emulator!();

    let (app, _) = common::create_test_app_with_db(common::test_db().await);
    let (username, _) = signed_up_user(&app, "wrongpw").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            &json!({"username": username, "password": "hunter23"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "invalid_credentials");

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/users/login",
            &json!({"username": format!("ghost_{}", unique_suffix()), "password": "hunter22"}),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "invalid_credentials");
}

#[tokio::test]
async fn test_create_cafe_then_list() {
    require_emulator!();

    let (app, _) = common::create_test_app_with_db(common::test_db().await);
    let (username, token) = signed_up_user(&app, "alice").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/pins",
            &json!({
                "username": username,
                "title": "Cafe",
                "desc": "Great coffee",
                "rating": 4,
                "lat": 47.5,
                "long": 19.0
            }),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["title"], "Cafe");
    assert_eq!(created["rating"], 4);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert!(!created["created_at"].as_str().unwrap().is_empty());

    let pins = list_pins(&app, &format!("?username={}", username)).await;
    assert_eq!(pins, vec![created.clone()]);

    let all = list_pins(&app, "").await;
    assert!(all.contains(&created));

    // Budapest is inside central Europe, not inside western France
    let inside = list_pins(&app, &format!("?username={}&bbox=16,45.5,23,48.6", username)).await;
    assert_eq!(inside.len(), 1);
    let outside = list_pins(&app, &format!("?username={}&bbox=-5,43,2,49", username)).await;
    assert!(outside.is_empty());
}

#[tokio::test]
async fn test_username_filter_ignores_case() {
    require_emulator!();

    let (app, _) = common::create_test_app_with_db(common::test_db().await);
    let (username, token) = signed_up_user(&app, "Alice").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/pins",
            &json!({"title": "Bakery", "desc": "Fresh bread", "rating": 5, "lat": 48.85, "long": 2.35}),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["username"], username.as_str());

    let lower = list_pins(&app, &format!("?username={}", username.to_lowercase())).await;
    assert_eq!(lower, vec![created.clone()]);
    let upper = list_pins(&app, &format!("?username={}", username.to_uppercase())).await;
    assert_eq!(upper, vec![created]);

    let nobody = list_pins(&app, &format!("?username=ghost_{}", unique_suffix())).await;
    assert!(nobody.is_empty());
}

#[tokio::test]
async fn test_only_owner_can_modify_pin() {
    require_emulator!();

    let (app, _) = common::create_test_app_with_db(common::test_db().await);
    let (_, alice_token) = signed_up_user(&app, "owner").await;
    let (_, bob_token) = signed_up_user(&app, "other").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/pins",
            &json!({"title": "Museum", "desc": "Worth a visit", "rating": 5, "lat": 52.52, "long": 13.40}),
            Some(&alice_token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["id"].as_str().unwrap().to_string();
    let uri = format!("/api/pins/{}", id);

    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, &json!({"rating": 1}), Some(&bob_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, &json!({"rating": 4}), Some(&alice_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["rating"], 4);

    let delete = |token: &str| {
        Request::builder()
            .method("DELETE")
            .uri(&uri)
            .header("authorization", format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete(&bob_token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.clone().oneshot(delete(&alice_token)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_token_for_unknown_user_cannot_create_pin() {
    require_emulator!();

    let (app, state) = common::create_test_app_with_db(common::test_db().await);
    let token = common::create_test_jwt(
        &format!("ghost_{}", unique_suffix()),
        &state.config.jwt_signing_key,
    );

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/pins",
            &json!({"title": "Nowhere", "desc": "No owner", "rating": 3, "lat": 0.0, "long": 0.0}),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
