mod common;

use assert_matches::assert_matches;
use common::TestApp;
use rust_decimal_macros::dec;
use sea_orm::Set;
use store_sales_api::{
    dto::{CreateSaleRequest, SaleLineItemRequest},
    entities::customer,
    errors::ServiceError,
    repositories::{CustomerRepository, ProductRepository, SaleRepository},
};
use uuid::Uuid;

#[tokio::test]
async fn decrement_beyond_stock_matches_no_row() {
    let app = TestApp::new().await;
    let tv = app.seed_product("Smart TV", "Acme", dec!(6000), 5).await;
    let db = &*app.state.db;

    assert!(!ProductRepository::decrement_stock(db, tv.id, 6).await.unwrap());
    assert_eq!(app.stock_of(tv.id).await, 5);

    assert!(ProductRepository::decrement_stock(db, tv.id, 5).await.unwrap());
    assert_eq!(app.stock_of(tv.id).await, 0);

    assert!(!ProductRepository::decrement_stock(db, tv.id, 1).await.unwrap());
    assert!(!ProductRepository::decrement_stock(db, Uuid::new_v4(), 1).await.unwrap());
}

#[tokio::test]
async fn increment_refuses_to_overflow_stock() {
    let app = TestApp::new().await;
    let tv = app.seed_product("Smart TV", "Acme", dec!(6000), i32::MAX - 2).await;
    let db = &*app.state.db;

    assert!(!ProductRepository::increment_stock(db, tv.id, 3).await.unwrap());
    assert_eq!(app.stock_of(tv.id).await, i32::MAX - 2);

    assert!(ProductRepository::increment_stock(db, tv.id, 2).await.unwrap());
    assert_eq!(app.stock_of(tv.id).await, i32::MAX);
}

#[tokio::test]
async fn only_the_first_cancel_claims_the_sale() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    let pen = app.seed_product("Pen", "Bic", dec!(2.25), 10).await;
    let sale = app
        .state
        .services
        .sales
        .create_sale(CreateSaleRequest {
            customer_id: customer.id,
            line_items: vec![SaleLineItemRequest {
                product_id: pen.id,
                quantity: 1,
                unit_price: dec!(2.25),
            }],
        })
        .await
        .unwrap();
    let db = &*app.state.db;

    assert!(SaleRepository::mark_canceled(db, sale.id).await.unwrap());
    assert!(!SaleRepository::mark_canceled(db, sale.id).await.unwrap());

    // A cancel arriving after the status flipped restores nothing.
    let err = app.state.services.sales.cancel_sale(sale.id).await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidSaleState(_));
    assert_eq!(app.stock_of(pen.id).await, 9);
}

#[tokio::test]
async fn duplicate_email_write_is_reported_as_unique_violation() {
    let app = TestApp::new().await;
    app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    let db = &*app.state.db;

    let err = CustomerRepository::insert(
        db,
        customer::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set("Other".into()),
            last_name: Set("Person".into()),
            email: Set("ada@example.com".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert!(err.is_unique_violation(), "{err:?}");
}
