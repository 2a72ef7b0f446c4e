mod common;

use bson::oid::ObjectId;

use agency_crm_backend::dto::product_dto::{
    CreateProductRequest, TaskTemplateRequest, UpdateProductRequest,
};
use agency_crm_backend::service::product_service::ProductService;
use agency_crm_backend::util::error::ServiceError;

use common::{product_service, InMemoryDb};

fn create_request(price_major: f64, templates: Vec<&str>) -> CreateProductRequest {
    CreateProductRequest {
        agency_id: ObjectId::new().to_hex(),
        name: "Landing page".to_string(),
        description: None,
        category: Some("web".to_string()),
        price_major,
        unit: "project".to_string(),
        is_active: None,
        predefined_tasks: templates
            .into_iter()
            .map(|title| TaskTemplateRequest {
                title: title.to_string(),
                description: None,
                estimated_hours: Some(2.0),
                assigned_to: None,
            })
            .collect(),
    }
}

#[tokio::test]
async fn price_is_stored_in_minor_units() {
    let db = InMemoryDb::new();
    let service = product_service(&db);

    let product = service
        .create_product(create_request(500.0, vec![]))
        .await
        .expect("create product");
    assert_eq!(product.price.minor(), 50_000);

    // Fractional major amounts round to the nearest agora.
    let product = service
        .create_product(create_request(499.995, vec![]))
        .await
        .expect("create product");
    assert_eq!(product.price.minor(), 50_000);

    let product = service
        .create_product(create_request(123.45, vec![]))
        .await
        .expect("create product");
    assert_eq!(product.price.minor(), 12_345);
}

#[tokio::test]
async fn update_applies_the_same_rounding_as_create() {
    let db = InMemoryDb::new();
    let service = product_service(&db);

    let product = service
        .create_product(create_request(100.0, vec![]))
        .await
        .expect("create product");
    let id = product.id.unwrap();

    let updated = service
        .update_product(
            id,
            UpdateProductRequest {
                price_major: Some(250.505),
                ..Default::default()
            },
        )
        .await
        .expect("update product");
    assert_eq!(updated.price.minor(), 25_051);

    // Re-saving the same display price never drifts the stored amount.
    let updated_again = service
        .update_product(
            id,
            UpdateProductRequest {
                price_major: Some(updated.price.to_major()),
                ..Default::default()
            },
        )
        .await
        .expect("update product again");
    assert_eq!(updated_again.price, updated.price);
}

#[tokio::test]
async fn template_order_is_preserved() {
    let db = InMemoryDb::new();
    let service = product_service(&db);

    let product = service
        .create_product(create_request(
            500.0,
            vec!["Design mockup", "Build homepage", "QA pass"],
        ))
        .await
        .expect("create product");

    let titles: Vec<&str> = product
        .predefined_tasks
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Design mockup", "Build homepage", "QA pass"]);
}

#[tokio::test]
async fn negative_price_is_rejected() {
    let db = InMemoryDb::new();
    let service = product_service(&db);

    let err = service
        .create_product(create_request(-1.0, vec![]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert!(db.0.lock().unwrap().products.is_empty());
}

#[tokio::test]
async fn hard_delete_removes_the_product() {
    let db = InMemoryDb::new();
    let service = product_service(&db);

    let product = service
        .create_product(create_request(500.0, vec![]))
        .await
        .expect("create product");
    let id = product.id.unwrap();

    service.delete_product(id).await.expect("delete product");
    let err = service.get_product(id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
