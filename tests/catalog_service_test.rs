mod common;

use assert_matches::assert_matches;
use common::TestApp;
use rust_decimal_macros::dec;
use store_sales_api::{
    dto::{CreateProductRequest, CustomerRequest, UpdateProductRequest},
    errors::ServiceError,
};
use uuid::Uuid;

fn customer_request(name: &str, last_name: &str, email: &str) -> CustomerRequest {
    CustomerRequest {
        name: name.into(),
        last_name: last_name.into(),
        email: email.into(),
    }
}

#[tokio::test]
async fn empty_lists_are_not_errors() {
    let app = TestApp::new().await;
    let services = &app.state.services;
    assert!(services.customers.list_customers().await.unwrap().is_empty());
    assert!(services.products.list_products().await.unwrap().is_empty());
    assert!(services.sales.list_sales().await.unwrap().is_empty());
}

#[tokio::test]
async fn customer_email_must_be_unique() {
    let app = TestApp::new().await;
    app.seed_customer("Ada", "Lovelace", "ada@example.com").await;

    let err = app
        .state
        .services
        .customers
        .create_customer(customer_request("Other", "Person", "ada@example.com"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::CustomerAlreadyExists(ref email) if email == "ada@example.com");
}

#[tokio::test]
async fn customers_are_listed_by_last_name() {
    let app = TestApp::new().await;
    app.seed_customer("Alan", "Turing", "alan@example.com").await;
    app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    app.seed_customer("Grace", "Hopper", "grace@example.com").await;

    let last_names: Vec<_> = app
        .state
        .services
        .customers
        .list_customers()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.last_name)
        .collect();
    assert_eq!(last_names, vec!["Hopper", "Lovelace", "Turing"]);
}

#[tokio::test]
async fn customer_update_keeps_own_email_and_rejects_others() {
    let app = TestApp::new().await;
    let ada = app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    app.seed_customer("Alan", "Turing", "alan@example.com").await;
    let customers = &app.state.services.customers;

    let updated = customers
        .update_customer(ada.id, customer_request("Augusta Ada", "King", "ada@example.com"))
        .await
        .expect("keeping the same email is allowed");
    assert_eq!(updated.id, ada.id);
    assert_eq!(updated.last_name, "King");

    let err = customers
        .update_customer(ada.id, customer_request("Ada", "King", "alan@example.com"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::CustomerAlreadyExists(_));

    let missing = Uuid::new_v4();
    let err = customers
        .update_customer(missing, customer_request("X", "Y", "x@example.com"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::CustomerNotFound(id) if id == missing);
}

#[tokio::test]
async fn deleting_unknown_customer_is_not_found() {
    let app = TestApp::new().await;
    let err = app
        .state
        .services
        .customers
        .delete_customer(Uuid::new_v4())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::CustomerNotFound(_));
}

#[tokio::test]
async fn product_name_and_brand_pair_is_unique() {
    let app = TestApp::new().await;
    app.seed_product("Smart TV", "Acme", dec!(6000), 15).await;
    let products = &app.state.services.products;

    let err = products
        .create_product(CreateProductRequest {
            name: "Smart TV".into(),
            brand: "Acme".into(),
            price: dec!(5000),
            stock: 1,
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ProductAlreadyExists { .. });

    // Same name under another brand is a different product.
    products
        .create_product(CreateProductRequest {
            name: "Smart TV".into(),
            brand: "Globex".into(),
            price: dec!(5000),
            stock: 1,
        })
        .await
        .expect("different brand is allowed");
}

#[tokio::test]
async fn product_update_applies_only_given_fields() {
    let app = TestApp::new().await;
    let tv = app.seed_product("Smart TV", "Acme", dec!(6000), 15).await;
    let radio = app.seed_product("Radio", "Acme", dec!(40), 3).await;
    let products = &app.state.services.products;

    let updated = products
        .update_product(
            tv.id,
            UpdateProductRequest {
                stock: Some(20),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Smart TV");
    assert_eq!(updated.price, dec!(6000));
    assert_eq!(updated.stock, 20);

    let err = products
        .update_product(
            radio.id,
            UpdateProductRequest {
                name: Some("Smart TV".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ProductAlreadyExists { ref name, ref brand } if name == "Smart TV" && brand == "Acme");

    let err = products
        .update_product(Uuid::new_v4(), UpdateProductRequest::default())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::ProductNotFound(_));
}

#[tokio::test]
async fn deleted_product_is_gone() {
    let app = TestApp::new().await;
    let tv = app.seed_product("Smart TV", "Acme", dec!(6000), 15).await;
    let products = &app.state.services.products;

    products.delete_product(tv.id).await.unwrap();
    assert_matches!(
        products.get_product(tv.id).await,
        Err(ServiceError::ProductNotFound(id)) if id == tv.id
    );
    assert_matches!(
        products.delete_product(tv.id).await,
        Err(ServiceError::ProductNotFound(_))
    );
}
