mod common;

use bson::oid::ObjectId;

use agency_crm_backend::dto::quote_dto::{CreateQuoteRequest, QuoteItemRequest};
use agency_crm_backend::model::project::ProjectStatus;
use agency_crm_backend::model::quote::QuoteStatus;
use agency_crm_backend::model::task::TaskStatus;
use agency_crm_backend::service::quote_service::QuoteService;
use agency_crm_backend::util::error::ServiceError;

use common::{quote_service, InMemoryDb, RecordingMailer};

fn item(name: &str, quantity: u32, unit_price: i64, product_id: Option<String>) -> QuoteItemRequest {
    QuoteItemRequest {
        product_id,
        name: name.to_string(),
        description: None,
        quantity,
        unit_price,
        price_type: None,
    }
}

fn quote_request(
    agency_id: ObjectId,
    client_id: ObjectId,
    items: Vec<QuoteItemRequest>,
) -> CreateQuoteRequest {
    CreateQuoteRequest {
        agency_id: agency_id.to_hex(),
        client_id: client_id.to_hex(),
        title: "Website rebuild".to_string(),
        description: Some("Full redesign and build".to_string()),
        valid_until: "2026-09-30".to_string(),
        items,
        notes: None,
        sender_email: Some("account.manager@agency.example".to_string()),
        email_message: None,
    }
}

#[tokio::test]
async fn totals_are_recomputed_server_side() {
    let db = InMemoryDb::new();
    let service = quote_service(&db, RecordingMailer::new());
    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", Some("dana@x.com"));

    let quote = service
        .create_quote(quote_request(
            agency.id.unwrap(),
            client.id.unwrap(),
            vec![item("Design", 2, 10_000, None), item("Build", 1, 5_000, None)],
        ))
        .await
        .expect("create quote");

    assert_eq!(quote.status, QuoteStatus::Draft);
    assert_eq!(quote.subtotal_amount.minor(), 25_000);
    assert_eq!(quote.vat_amount.minor(), 4_500);
    assert_eq!(quote.total_amount.minor(), 29_500);
    assert_eq!(quote.items[0].total.minor(), 20_000);
    assert_eq!(
        quote.total_amount.minor(),
        quote.subtotal_amount.minor() + quote.vat_amount.minor()
    );
}

#[tokio::test]
async fn empty_item_list_persists_nothing() {
    let db = InMemoryDb::new();
    let service = quote_service(&db, RecordingMailer::new());
    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", Some("dana@x.com"));

    let err = service
        .create_quote(quote_request(agency.id.unwrap(), client.id.unwrap(), vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert_eq!(db.quote_count(), 0);
}

#[tokio::test]
async fn unknown_client_persists_nothing() {
    let db = InMemoryDb::new();
    let service = quote_service(&db, RecordingMailer::new());
    let agency = db.seed_agency("Studio North");

    let err = service
        .create_quote(quote_request(
            agency.id.unwrap(),
            ObjectId::new(),
            vec![item("Design", 1, 10_000, None)],
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(db.quote_count(), 0);
}

#[tokio::test]
async fn approval_creates_project_and_seeds_tasks_from_templates() {
    let db = InMemoryDb::new();
    let service = quote_service(&db, RecordingMailer::new());
    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", Some("dana@x.com"));
    let product = db.seed_product(
        agency.id.unwrap(),
        "Landing page",
        50_000,
        vec![("Design mockup", Some("noa")), ("Build homepage", None)],
    );

    let quote = service
        .create_quote(quote_request(
            agency.id.unwrap(),
            client.id.unwrap(),
            vec![item(
                "Landing page",
                1,
                50_000,
                Some(product.id.unwrap().to_hex()),
            )],
        ))
        .await
        .expect("create quote");
    let quote_id = quote.id.unwrap();

    service
        .update_quote_status(quote_id, QuoteStatus::Sent)
        .await
        .expect("send status");
    let approved = service
        .update_quote_status(quote_id, QuoteStatus::Approved)
        .await
        .expect("approve");
    assert_eq!(approved.status, QuoteStatus::Approved);

    let projects = db.projects();
    assert_eq!(projects.len(), 1);
    let project = &projects[0];
    assert_eq!(project.source_quote_id, Some(quote_id));
    assert_eq!(project.client_id, client.id.unwrap());
    assert_eq!(project.status, ProjectStatus::Planning);
    assert_eq!(project.budget, Some(quote.total_amount));

    let mut tasks = db.tasks();
    tasks.sort_by_key(|task| task.template_index);
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].title, "Design mockup");
    assert_eq!(tasks[0].assigned_to.as_deref(), Some("noa"));
    assert_eq!(tasks[1].title, "Build homepage");
    assert!(tasks[1].assigned_to.is_none());
    for task in &tasks {
        assert_eq!(task.project_id, project.id);
        assert_eq!(task.client_id, client.id);
        assert_eq!(task.status, TaskStatus::New);
        assert_eq!(task.source_product_id, product.id);
    }
}

#[tokio::test]
async fn reapproval_never_duplicates_the_project_or_its_tasks() {
    let db = InMemoryDb::new();
    let service = quote_service(&db, RecordingMailer::new());
    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", Some("dana@x.com"));
    let product = db.seed_product(
        agency.id.unwrap(),
        "Landing page",
        50_000,
        vec![("Design mockup", None), ("Build homepage", None)],
    );

    let quote = service
        .create_quote(quote_request(
            agency.id.unwrap(),
            client.id.unwrap(),
            vec![item(
                "Landing page",
                1,
                50_000,
                Some(product.id.unwrap().to_hex()),
            )],
        ))
        .await
        .expect("create quote");
    let quote_id = quote.id.unwrap();

    service
        .update_quote_status(quote_id, QuoteStatus::Sent)
        .await
        .expect("send status");
    service
        .update_quote_status(quote_id, QuoteStatus::Approved)
        .await
        .expect("approve");
    assert_eq!(db.task_count(), 2);

    // Setting approved again is a no-op success.
    service
        .update_quote_status(quote_id, QuoteStatus::Approved)
        .await
        .expect("re-approve");
    assert_eq!(db.projects().len(), 1);
    assert_eq!(db.task_count(), 2);

    // Even if the status write were lost out of band, the handoff keys on
    // the existing project and refuses to seed a second batch.
    db.0.lock().unwrap().quotes.get_mut(&quote_id).unwrap().status = QuoteStatus::Sent;
    let reapproved = service
        .update_quote_status(quote_id, QuoteStatus::Approved)
        .await
        .expect("approve after out-of-band status reset");
    assert_eq!(reapproved.status, QuoteStatus::Approved);
    assert_eq!(db.projects().len(), 1);
    assert_eq!(db.task_count(), 2);
}

#[tokio::test]
async fn dangling_product_reference_seeds_no_tasks_but_approval_succeeds() {
    let db = InMemoryDb::new();
    let service = quote_service(&db, RecordingMailer::new());
    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", Some("dana@x.com"));

    // Product id that no longer resolves: snapshot pricing survives, tasks
    // cannot be seeded from it.
    let quote = service
        .create_quote(quote_request(
            agency.id.unwrap(),
            client.id.unwrap(),
            vec![item(
                "Legacy package",
                1,
                80_000,
                Some(ObjectId::new().to_hex()),
            )],
        ))
        .await
        .expect("create quote");
    let quote_id = quote.id.unwrap();

    service
        .update_quote_status(quote_id, QuoteStatus::Sent)
        .await
        .expect("send status");
    let approved = service
        .update_quote_status(quote_id, QuoteStatus::Approved)
        .await
        .expect("approve");

    assert_eq!(approved.status, QuoteStatus::Approved);
    assert_eq!(db.projects().len(), 1);
    assert_eq!(db.task_count(), 0);
}

#[tokio::test]
async fn approval_aborts_entirely_when_the_client_is_gone() {
    let db = InMemoryDb::new();
    let service = quote_service(&db, RecordingMailer::new());
    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", Some("dana@x.com"));

    let quote = service
        .create_quote(quote_request(
            agency.id.unwrap(),
            client.id.unwrap(),
            vec![item("Design", 1, 10_000, None)],
        ))
        .await
        .expect("create quote");
    let quote_id = quote.id.unwrap();
    service
        .update_quote_status(quote_id, QuoteStatus::Sent)
        .await
        .expect("send status");

    db.0.lock().unwrap().clients.remove(&client.id.unwrap());

    let err = service
        .update_quote_status(quote_id, QuoteStatus::Approved)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert!(db.projects().is_empty());
    assert_eq!(db.task_count(), 0);
    assert_eq!(db.quote(quote_id).unwrap().status, QuoteStatus::Sent);
}

#[tokio::test]
async fn lifecycle_violations_are_conflicts() {
    let db = InMemoryDb::new();
    let service = quote_service(&db, RecordingMailer::new());
    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", Some("dana@x.com"));

    let quote = service
        .create_quote(quote_request(
            agency.id.unwrap(),
            client.id.unwrap(),
            vec![item("Design", 1, 10_000, None)],
        ))
        .await
        .expect("create quote");
    let quote_id = quote.id.unwrap();

    // Draft cannot jump straight to approved.
    let err = service
        .update_quote_status(quote_id, QuoteStatus::Approved)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
    assert!(db.projects().is_empty());

    service
        .update_quote_status(quote_id, QuoteStatus::Lost)
        .await
        .expect("lose quote");
    let err = service
        .update_quote_status(quote_id, QuoteStatus::Sent)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn send_marks_a_draft_sent_and_attaches_the_document() {
    let db = InMemoryDb::new();
    let mailer = RecordingMailer::new();
    let service = quote_service(&db, mailer.clone());
    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", Some("dana@x.com"));

    let quote = service
        .create_quote(quote_request(
            agency.id.unwrap(),
            client.id.unwrap(),
            vec![item("Design", 2, 10_000, None)],
        ))
        .await
        .expect("create quote");

    let sent = service.send_quote(quote.id.unwrap()).await.expect("send");
    assert_eq!(sent.status, QuoteStatus::Sent);
    assert_eq!(mailer.sent_count(), 1);

    let messages = mailer.sent.lock().unwrap();
    let message = &messages[0];
    assert_eq!(message.to, "dana@x.com");
    assert_eq!(
        message.reply_to.as_deref(),
        Some("account.manager@agency.example")
    );
    let attachment = message.attachment.as_ref().expect("attachment");
    let html = String::from_utf8(attachment.content.clone()).expect("utf8 document");
    assert!(html.contains("Website rebuild"));
    assert!(html.contains("236.00"));
}

#[tokio::test]
async fn delivery_failure_reports_but_never_rolls_back_the_save() {
    let db = InMemoryDb::new();
    let mailer = RecordingMailer::new();
    let service = quote_service(&db, mailer.clone());
    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", Some("dana@x.com"));

    let quote = service
        .create_quote(quote_request(
            agency.id.unwrap(),
            client.id.unwrap(),
            vec![item("Design", 1, 10_000, None)],
        ))
        .await
        .expect("create quote");
    let quote_id = quote.id.unwrap();

    mailer.set_fail(true);
    let err = service.send_quote(quote_id).await.unwrap_err();
    assert!(matches!(err, ServiceError::ExternalDelivery(_)));

    // The saved quote is untouched and the send alone can be retried.
    let stored = db.quote(quote_id).expect("quote still stored");
    assert_eq!(stored.status, QuoteStatus::Draft);

    mailer.set_fail(false);
    let sent = service.send_quote(quote_id).await.expect("retry send");
    assert_eq!(sent.status, QuoteStatus::Sent);
    assert_eq!(mailer.sent_count(), 1);
}

#[tokio::test]
async fn resending_keeps_the_current_status() {
    let db = InMemoryDb::new();
    let mailer = RecordingMailer::new();
    let service = quote_service(&db, mailer.clone());
    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", Some("dana@x.com"));

    let quote = service
        .create_quote(quote_request(
            agency.id.unwrap(),
            client.id.unwrap(),
            vec![item("Design", 1, 10_000, None)],
        ))
        .await
        .expect("create quote");
    let quote_id = quote.id.unwrap();

    service.send_quote(quote_id).await.expect("first send");
    service
        .update_quote_status(quote_id, QuoteStatus::Viewed)
        .await
        .expect("viewed");

    let resent = service.send_quote(quote_id).await.expect("resend");
    assert_eq!(resent.status, QuoteStatus::Viewed);
    assert_eq!(mailer.sent_count(), 2);
}

#[tokio::test]
async fn sending_without_a_client_email_is_invalid() {
    let db = InMemoryDb::new();
    let mailer = RecordingMailer::new();
    let service = quote_service(&db, mailer.clone());
    let agency = db.seed_agency("Studio North");
    let client = db.seed_client(agency.id.unwrap(), "Dana", None);

    let quote = service
        .create_quote(quote_request(
            agency.id.unwrap(),
            client.id.unwrap(),
            vec![item("Design", 1, 10_000, None)],
        ))
        .await
        .expect("create quote");

    let err = service.send_quote(quote.id.unwrap()).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert_eq!(mailer.sent_count(), 0);
}
