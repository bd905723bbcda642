mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use common::{MenuCall, Outcome, STORE_ID, TestApp, delete, get, post_json, token_for};
use storefront_models::menus::{MenuPageQuery, UpsertMenuDto, UpsertProductDto};

#[tokio::test]
async fn test_find_menu_by_id_end_to_end() {
    let app = TestApp::new();
    let token = token_for(STORE_ID, 1);

    let response = app.send(get("/store-user/menus/7", Some(&token))).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["id"], 7);
    assert_eq!(body["store_id"], 42);
    assert_eq!(body["products"][0]["menu_id"], 7);
    assert_eq!(
        *app.menus.calls.lock().unwrap(),
        vec![MenuCall::FindById(42, 7)]
    );
}

#[tokio::test]
async fn test_tenant_comes_from_token_not_query() {
    let app = TestApp::new();
    let token = token_for(STORE_ID, 1);

    let response = app
        .send(get("/store-user/menus?store_id=99", Some(&token)))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json().as_array().unwrap().len(), 2);
    assert_eq!(
        *app.menus.calls.lock().unwrap(),
        vec![MenuCall::FindMany(42)]
    );
}

#[tokio::test]
async fn test_upsert_ignores_store_id_in_body() {
    let app = TestApp::new();
    let token = token_for(STORE_ID, 1);

    let response = app
        .send(post_json(
            "/store-user/menus",
            Some(&token),
            json!({
                "store_id": 99,
                "label": "Drinks",
                "products": [
                    { "name": "Lemon soda", "price_cents": 350 }
                ]
            }),
        ))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["label"], "Drinks");
    assert_eq!(
        *app.menus.calls.lock().unwrap(),
        vec![MenuCall::Upsert(
            42,
            UpsertMenuDto {
                id: None,
                label: "Drinks".to_string(),
                description: None,
                products: vec![UpsertProductDto {
                    id: None,
                    name: "Lemon soda".to_string(),
                    description: None,
                    price_cents: 350,
                    image_url: None,
                }],
            }
        )]
    );
}

#[tokio::test]
async fn test_paginated_query_reaches_repository_typed() {
    let app = TestApp::new();
    let token = token_for(STORE_ID, 1);

    let response = app
        .send(get(
            "/store-user/menus/paginated?page=2&size=10&label=soda",
            Some(&token),
        ))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["meta"]["page"], 2);
    assert_eq!(body["meta"]["size"], 10);
    assert_eq!(body["meta"]["total"], 11);
    assert_eq!(body["meta"]["has_more"], false);
    assert_eq!(
        *app.menus.calls.lock().unwrap(),
        vec![MenuCall::FindManyPaginated(
            42,
            MenuPageQuery {
                page: Some(2),
                size: Some(10),
                label: Some("soda".to_string()),
            }
        )]
    );
}

#[tokio::test]
async fn test_paginated_query_rejects_non_numeric_page() {
    let app = TestApp::new();
    let token = token_for(STORE_ID, 1);

    let response = app
        .send(get("/store-user/menus/paginated?page=two", Some(&token)))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["message"].is_string());
    assert!(app.menus.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_find_product_passes_both_ids() {
    let app = TestApp::new();
    let token = token_for(STORE_ID, 1);

    let response = app
        .send(get("/store-user/menus/5/products/9", Some(&token)))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["id"], 9);
    assert_eq!(
        *app.menus.calls.lock().unwrap(),
        vec![MenuCall::FindProductById(42, 5, 9)]
    );
}

#[tokio::test]
async fn test_delete_returns_no_content() {
    let app = TestApp::new();
    let token = token_for(STORE_ID, 1);

    let response = app.send(delete("/store-user/menus/7", Some(&token))).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.body.is_empty());
    assert_eq!(
        *app.menus.calls.lock().unwrap(),
        vec![MenuCall::Delete(42, 7)]
    );
}

#[tokio::test]
async fn test_delete_maps_domain_error_like_other_actions() {
    let app = TestApp::new();
    *app.menus.outcome.lock().unwrap() = Outcome::Domain(StatusCode::NOT_FOUND, "Menu not found");
    let token = token_for(STORE_ID, 1);

    let response = app.send(delete("/store-user/menus/7", Some(&token))).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({ "message": "Menu not found" }));
}

/// One authenticated request per menu route.
fn every_menu_route(token: &str) -> Vec<Request<Body>> {
    vec![
        post_json(
            "/store-user/menus",
            Some(token),
            json!({
                "label": "Drinks",
                "products": [{ "name": "Lemon soda", "price_cents": 350 }]
            }),
        ),
        get("/store-user/menus", Some(token)),
        get("/store-user/menus/paginated?page=1&size=10", Some(token)),
        get("/store-user/menus/7", Some(token)),
        get("/store-user/menus/7/products/3", Some(token)),
        delete("/store-user/menus/7", Some(token)),
    ]
}

#[tokio::test]
async fn test_every_route_applies_the_error_policy() {
    let token = token_for(STORE_ID, 1);
    let domain_cases = vec![
        (StatusCode::NOT_FOUND, "Menu not found"),
        (StatusCode::CONFLICT, "A menu with this label already exists"),
    ];

    for (status, message) in domain_cases {
        let app = TestApp::new();
        *app.menus.outcome.lock().unwrap() = Outcome::Domain(status, message);

        for request in every_menu_route(&token) {
            let uri = request.uri().to_string();
            let response = app.send(request).await;
            assert_eq!(response.status, status, "{}", uri);
            assert_eq!(response.json(), json!({ "message": message }), "{}", uri);
        }
        assert_eq!(app.menus.calls.lock().unwrap().len(), 6);
    }

    let app = TestApp::new();
    *app.menus.outcome.lock().unwrap() = Outcome::Fault;

    for request in every_menu_route(&token) {
        let uri = request.uri().to_string();
        let response = app.send(request).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
        assert!(response.body.is_empty(), "{}", uri);
    }
    assert_eq!(app.menus.calls.lock().unwrap().len(), 6);
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let app = TestApp::new();
    let token = token_for(STORE_ID, 1);

    let response = app.send(get("/store-user/menus/abc", Some(&token))).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["message"].is_string());
    assert!(app.menus.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app.send(get("/store-user/menus", None)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json(),
        json!({ "message": "Missing authentication token" })
    );
    assert!(app.menus.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app
        .send(get("/store-user/menus", Some("not.a.token")))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json(),
        json!({ "message": "Invalid or expired token" })
    );
}

#[tokio::test]
async fn test_access_token_cookie_authenticates() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("GET")
        .uri("/store-user/menus/7")
        .header("cookie", format!("access_token={}", token_for(STORE_ID, 1)))
        .body(Body::empty())
        .unwrap();

    let response = app.send(request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        *app.menus.calls.lock().unwrap(),
        vec![MenuCall::FindById(42, 7)]
    );
}

#[tokio::test]
async fn test_upsert_validation_failure_is_unprocessable() {
    let app = TestApp::new();
    let token = token_for(STORE_ID, 1);

    let response = app
        .send(post_json(
            "/store-user/menus",
            Some(&token),
            json!({ "label": "", "products": [] }),
        ))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.json()["message"].is_string());
    assert!(app.menus.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_upsert_missing_label_is_bad_request() {
    let app = TestApp::new();
    let token = token_for(STORE_ID, 1);

    let response = app
        .send(post_json("/store-user/menus", Some(&token), json!({ "products": [] })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!({ "message": "label is required" }));
}
