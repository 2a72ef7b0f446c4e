mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use agency_crm_backend::router::lead_router::lead_router;
use bson::oid::ObjectId;

use common::{lead_service, InMemoryDb};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

fn post(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

fn put(uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn lead_lifecycle_over_http() {
    let db = InMemoryDb::new();
    let app = lead_router(lead_service(&db));
    let agency_id = ObjectId::new().to_hex();

    // Create
    let response = app
        .clone()
        .oneshot(post(
            "/leads",
            &json!({
                "agency_id": agency_id,
                "platform": "facebook",
                "lead_data": { "name": "Dana", "email": "dana@x.com" },
                "value": 150000
            }),
        ))
        .await
        .expect("create response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["status"], "new");
    assert_eq!(created["value"], 150000);
    let lead_id = created["_id"]["$oid"].as_str().expect("lead id").to_string();

    // Qualify
    let response = app
        .clone()
        .oneshot(put(
            &format!("/leads/{}", lead_id),
            &json!({ "status": "qualified" }),
        ))
        .await
        .expect("update response");
    assert_eq!(response.status(), StatusCode::OK);

    // Search (case-insensitive substring)
    let response = app
        .clone()
        .oneshot(get("/leads?search=DANA"))
        .await
        .expect("list response");
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().expect("array").len(), 1);

    // Convert
    let response = app
        .clone()
        .oneshot(post(&format!("/leads/{}/convert", lead_id), &json!({})))
        .await
        .expect("convert response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let client = body_json(response).await;
    assert_eq!(client["name"], "Dana");
    assert_eq!(client["email"], "dana@x.com");

    // The lead row survives conversion with status won
    let response = app
        .clone()
        .oneshot(get(&format!("/leads/{}", lead_id)))
        .await
        .expect("get response");
    let lead = body_json(response).await;
    assert_eq!(lead["status"], "won");

    // Stats reflect the converted lead
    let response = app
        .clone()
        .oneshot(get("/leads/stats"))
        .await
        .expect("stats response");
    let stats = body_json(response).await;
    assert_eq!(stats["total"], 1);
    assert_eq!(stats["won"], 1);
    assert_eq!(stats["total_value"], 150000);
}

#[tokio::test]
async fn conversion_conflicts_surface_as_409() {
    let db = InMemoryDb::new();
    let app = lead_router(lead_service(&db));
    let agency_id = ObjectId::new().to_hex();

    let response = app
        .clone()
        .oneshot(post(
            "/leads",
            &json!({
                "agency_id": agency_id,
                "lead_data": { "name": "Dana" }
            }),
        ))
        .await
        .expect("create response");
    let created = body_json(response).await;
    let lead_id = created["_id"]["$oid"].as_str().expect("lead id").to_string();

    let response = app
        .clone()
        .oneshot(post(&format!("/leads/{}/convert", lead_id), &json!({})))
        .await
        .expect("first convert");
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(post(&format!("/leads/{}/convert", lead_id), &json!({})))
        .await
        .expect("second convert");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_ids_and_unknown_statuses_are_bad_requests() {
    let db = InMemoryDb::new();
    let app = lead_router(lead_service(&db));

    let response = app
        .clone()
        .oneshot(get("/leads/not-an-object-id"))
        .await
        .expect("get response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get("/leads?status=sideways"))
        .await
        .expect("list response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lead_without_contact_fields_is_a_validation_error() {
    let db = InMemoryDb::new();
    let app = lead_router(lead_service(&db));

    let response = app
        .clone()
        .oneshot(post(
            "/leads",
            &json!({
                "agency_id": ObjectId::new().to_hex(),
                "lead_data": {}
            }),
        ))
        .await
        .expect("create response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Validation");
}
