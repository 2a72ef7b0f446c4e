mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use agency_crm_backend::router::quote_router::quote_router;

use common::{quote_service, InMemoryDb, RecordingMailer};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

fn request(method: &str, uri: &str, payload: Option<&Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match payload {
        Some(payload) => builder
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

#[tokio::test]
async fn create_send_and_approve_over_http() {
    let db = InMemoryDb::new();
    let mailer = RecordingMailer::new();
    let app = quote_router(quote_service(&db, mailer.clone()));

    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", Some("dana@x.com"));
    let product = db.seed_product(
        agency.id.unwrap(),
        "Landing page",
        50_000,
        vec![("Design mockup", None), ("Build homepage", None)],
    );

    // Create: totals computed server-side
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/quotes",
            Some(&json!({
                "agency_id": agency.id.unwrap().to_hex(),
                "client_id": client.id.unwrap().to_hex(),
                "title": "Website rebuild",
                "valid_until": "2026-09-30",
                "items": [
                    { "name": "Landing page", "quantity": 1, "unit_price": 50000,
                      "product_id": product.id.unwrap().to_hex() },
                    { "name": "Copywriting", "quantity": 2, "unit_price": 10000 }
                ]
            })),
        ))
        .await
        .expect("create response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["status"], "draft");
    assert_eq!(created["subtotal_amount"], 70000);
    assert_eq!(created["vat_amount"], 12600);
    assert_eq!(created["total_amount"], 82600);
    let quote_id = created["_id"]["$oid"].as_str().expect("quote id").to_string();

    // Send: mails the rendered document, flips draft -> sent
    let response = app
        .clone()
        .oneshot(request("POST", &format!("/quotes/{}/send", quote_id), None))
        .await
        .expect("send response");
    assert_eq!(response.status(), StatusCode::OK);
    let sent = body_json(response).await;
    assert_eq!(sent["status"], "sent");
    assert_eq!(mailer.sent_count(), 1);

    // Approve: project + tasks appear atomically
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/quotes/{}/status", quote_id),
            Some(&json!({ "status": "approved" })),
        ))
        .await
        .expect("approve response");
    assert_eq!(response.status(), StatusCode::OK);
    let approved = body_json(response).await;
    assert_eq!(approved["status"], "approved");

    assert_eq!(db.projects().len(), 1);
    assert_eq!(db.task_count(), 2);
    let titles: Vec<String> = {
        let mut tasks = db.tasks();
        tasks.sort_by_key(|task| task.template_index);
        tasks.into_iter().map(|task| task.title).collect()
    };
    assert_eq!(titles, vec!["Design mockup", "Build homepage"]);
}

#[tokio::test]
async fn empty_item_list_is_rejected_before_anything_persists() {
    let db = InMemoryDb::new();
    let app = quote_router(quote_service(&db, RecordingMailer::new()));
    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", Some("dana@x.com"));

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/quotes",
            Some(&json!({
                "agency_id": agency.id.unwrap().to_hex(),
                "client_id": client.id.unwrap().to_hex(),
                "title": "Website rebuild",
                "valid_until": "2026-09-30",
                "items": []
            })),
        ))
        .await
        .expect("create response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(db.quote_count(), 0);
}

#[tokio::test]
async fn illegal_status_jumps_are_conflicts() {
    let db = InMemoryDb::new();
    let app = quote_router(quote_service(&db, RecordingMailer::new()));
    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", Some("dana@x.com"));

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/quotes",
            Some(&json!({
                "agency_id": agency.id.unwrap().to_hex(),
                "client_id": client.id.unwrap().to_hex(),
                "title": "Website rebuild",
                "valid_until": "2026-09-30",
                "items": [{ "name": "Design", "quantity": 1, "unit_price": 10000 }]
            })),
        ))
        .await
        .expect("create response");
    let created = body_json(response).await;
    let quote_id = created["_id"]["$oid"].as_str().expect("quote id").to_string();

    // draft -> approved skips the send entirely
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/quotes/{}/status", quote_id),
            Some(&json!({ "status": "approved" })),
        ))
        .await
        .expect("status response");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(db.projects().is_empty());
}

#[tokio::test]
async fn delivery_failure_maps_to_bad_gateway_and_keeps_the_quote() {
    let db = InMemoryDb::new();
    let mailer = RecordingMailer::new();
    let app = quote_router(quote_service(&db, mailer.clone()));
    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", Some("dana@x.com"));

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/quotes",
            Some(&json!({
                "agency_id": agency.id.unwrap().to_hex(),
                "client_id": client.id.unwrap().to_hex(),
                "title": "Website rebuild",
                "valid_until": "2026-09-30",
                "items": [{ "name": "Design", "quantity": 1, "unit_price": 10000 }]
            })),
        ))
        .await
        .expect("create response");
    let created = body_json(response).await;
    let quote_id = created["_id"]["$oid"].as_str().expect("quote id").to_string();

    mailer.set_fail(true);
    let response = app
        .clone()
        .oneshot(request("POST", &format!("/quotes/{}/send", quote_id), None))
        .await
        .expect("send response");
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    // Saved quote is still there, still draft; retry succeeds.
    mailer.set_fail(false);
    let response = app
        .clone()
        .oneshot(request("POST", &format!("/quotes/{}/send", quote_id), None))
        .await
        .expect("retry response");
    assert_eq!(response.status(), StatusCode::OK);
    let sent = body_json(response).await;
    assert_eq!(sent["status"], "sent");
}

#[tokio::test]
async fn malformed_quote_ids_are_bad_requests() {
    let db = InMemoryDb::new();
    let app = quote_router(quote_service(&db, RecordingMailer::new()));

    let response = app
        .clone()
        .oneshot(request("GET", "/quotes/nope", None))
        .await
        .expect("get response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
