mod common;

use assert_matches::assert_matches;
use common::TestApp;
use rust_decimal_macros::dec;
use store_sales_api::{
    dto::{CreateSaleRequest, SaleLineItemRequest, UpdateProductRequest},
    entities::SaleStatus,
    errors::ServiceError,
};
use uuid::Uuid;

fn line(product_id: Uuid, quantity: i32, unit_price: rust_decimal::Decimal) -> SaleLineItemRequest {
    SaleLineItemRequest {
        product_id,
        quantity,
        unit_price,
    }
}

#[tokio::test]
async fn recording_a_sale_takes_stock_and_totals_lines() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    let tv = app.seed_product("Smart TV", "Acme", dec!(6000), 15).await;
    let cable = app.seed_product("HDMI Cable", "Acme", dec!(12.5), 10).await;

    let sale = app
        .state
        .services
        .sales
        .create_sale(CreateSaleRequest {
            customer_id: customer.id,
            line_items: vec![line(tv.id, 2, dec!(6000)), line(cable.id, 4, dec!(12.5))],
        })
        .await
        .expect("sale should be recorded");

    assert_eq!(sale.total_amount, dec!(12050));
    assert_eq!(sale.status, SaleStatus::Active);
    assert_eq!(sale.customer.id, customer.id);
    assert_eq!(sale.sale_date, chrono::Utc::now().date_naive());

    let names: Vec<_> = sale.line_items.iter().map(|l| l.product_name.as_str()).collect();
    assert_eq!(names, vec!["Smart TV", "HDMI Cable"]);
    assert_eq!(sale.line_items[1].quantity, 4);
    assert_eq!(sale.line_items[1].unit_price, dec!(12.5));

    assert_eq!(app.stock_of(tv.id).await, 13);
    assert_eq!(app.stock_of(cable.id).await, 6);

    let fetched = app.state.services.sales.get_sale(sale.id).await.unwrap();
    assert_eq!(fetched, sale);
}

#[tokio::test]
async fn failing_line_leaves_earlier_lines_untouched() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    let tv = app.seed_product("Smart TV", "Acme", dec!(6000), 5).await;
    let cable = app.seed_product("HDMI Cable", "Acme", dec!(12.5), 1).await;

    let err = app
        .state
        .services
        .sales
        .create_sale(CreateSaleRequest {
            customer_id: customer.id,
            line_items: vec![line(tv.id, 2, dec!(6000)), line(cable.id, 3, dec!(12.5))],
        })
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::InsufficientStock(ref name) if name == "HDMI Cable");
    assert_eq!(app.stock_of(tv.id).await, 5);
    assert_eq!(app.stock_of(cable.id).await, 1);
    assert!(app.state.services.sales.list_sales().await.unwrap().is_empty());
}

#[tokio::test]
async fn out_of_stock_product_cannot_be_sold() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    let tv = app.seed_product("Smart TV", "Acme", dec!(6000), 0).await;

    let err = app
        .state
        .services
        .sales
        .create_sale(CreateSaleRequest {
            customer_id: customer.id,
            line_items: vec![line(tv.id, 1, dec!(6000))],
        })
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::InsufficientStock(_));
    assert_eq!(app.stock_of(tv.id).await, 0);
    assert!(app.state.services.sales.list_sales().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_customer_is_reported_before_products() {
    let app = TestApp::new().await;
    let missing_customer = Uuid::new_v4();

    let err = app
        .state
        .services
        .sales
        .create_sale(CreateSaleRequest {
            customer_id: missing_customer,
            line_items: vec![line(Uuid::new_v4(), 1, dec!(1))],
        })
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::CustomerNotFound(id) if id == missing_customer);
}

#[tokio::test]
async fn unknown_product_rolls_back_the_sale() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    let tv = app.seed_product("Smart TV", "Acme", dec!(6000), 3).await;
    let missing_product = Uuid::new_v4();

    let err = app
        .state
        .services
        .sales
        .create_sale(CreateSaleRequest {
            customer_id: customer.id,
            line_items: vec![line(tv.id, 1, dec!(6000)), line(missing_product, 1, dec!(1))],
        })
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::ProductNotFound(id) if id == missing_product);
    assert_eq!(app.stock_of(tv.id).await, 3);
}

#[tokio::test]
async fn fourth_sale_of_the_day_is_rejected() {
    let app = TestApp::new().await;
    let ada = app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    let alan = app.seed_customer("Alan", "Turing", "alan@example.com").await;
    let pen = app.seed_product("Pen", "Bic", dec!(2.25), 100).await;
    let sales = &app.state.services.sales;

    for _ in 0..3 {
        sales
            .create_sale(CreateSaleRequest {
                customer_id: ada.id,
                line_items: vec![line(pen.id, 1, dec!(2.25))],
            })
            .await
            .expect("sales within the daily limit succeed");
    }

    let err = sales
        .create_sale(CreateSaleRequest {
            customer_id: ada.id,
            line_items: vec![line(pen.id, 1, dec!(2.25))],
        })
        .await
        .unwrap_err();
    assert_matches!(
        err,
        ServiceError::MaxSalesPerDayExceeded { customer_id, limit: 3 } if customer_id == ada.id
    );
    assert_eq!(app.stock_of(pen.id).await, 97);

    // The limit is per customer.
    sales
        .create_sale(CreateSaleRequest {
            customer_id: alan.id,
            line_items: vec![line(pen.id, 1, dec!(2.25))],
        })
        .await
        .expect("another customer is unaffected");
}

#[tokio::test]
async fn canceled_sales_still_count_toward_the_daily_limit() {
    let app = TestApp::with_config(|cfg| cfg.max_sales_per_day = 1).await;
    let ada = app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    let pen = app.seed_product("Pen", "Bic", dec!(2.25), 10).await;
    let sales = &app.state.services.sales;
    assert_eq!(sales.policy().max_sales_per_day, 1);

    let first = sales
        .create_sale(CreateSaleRequest {
            customer_id: ada.id,
            line_items: vec![line(pen.id, 1, dec!(2.25))],
        })
        .await
        .unwrap();
    sales.cancel_sale(first.id).await.unwrap();

    let err = sales
        .create_sale(CreateSaleRequest {
            customer_id: ada.id,
            line_items: vec![line(pen.id, 1, dec!(2.25))],
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::MaxSalesPerDayExceeded { limit: 1, .. });
}

#[tokio::test]
async fn cancel_restores_stock_once() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    let tv = app.seed_product("Smart TV", "Acme", dec!(6000), 15).await;

    let sale = app
        .state
        .services
        .sales
        .create_sale(CreateSaleRequest {
            customer_id: customer.id,
            line_items: vec![line(tv.id, 2, dec!(6000))],
        })
        .await
        .unwrap();
    assert_eq!(sale.total_amount, dec!(12000));
    assert_eq!(app.stock_of(tv.id).await, 13);

    let canceled = app.state.services.sales.cancel_sale(sale.id).await.unwrap();
    assert_eq!(canceled.status, SaleStatus::Canceled);
    assert_eq!(canceled.total_amount, dec!(12000));
    assert_eq!(canceled.line_items.len(), 1);
    assert_eq!(app.stock_of(tv.id).await, 15);

    let err = app.state.services.sales.cancel_sale(sale.id).await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidSaleState(id) if id == sale.id);
    assert_eq!(app.stock_of(tv.id).await, 15);
}

#[tokio::test]
async fn canceling_unknown_sale_is_not_found() {
    let app = TestApp::new().await;
    let id = Uuid::new_v4();
    let err = app.state.services.sales.cancel_sale(id).await.unwrap_err();
    assert_matches!(err, ServiceError::SaleNotFound(missing) if missing == id);
}

#[tokio::test]
async fn line_price_is_a_snapshot() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    let tv = app.seed_product("Smart TV", "Acme", dec!(6000), 15).await;

    let sale = app
        .state
        .services
        .sales
        .create_sale(CreateSaleRequest {
            customer_id: customer.id,
            line_items: vec![line(tv.id, 1, dec!(5500))],
        })
        .await
        .unwrap();

    app.state
        .services
        .products
        .update_product(
            tv.id,
            UpdateProductRequest {
                price: Some(dec!(7000)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let fetched = app.state.services.sales.get_sale(sale.id).await.unwrap();
    assert_eq!(fetched.line_items[0].unit_price, dec!(5500));
    assert_eq!(fetched.total_amount, dec!(5500));
}

#[tokio::test]
async fn deleting_a_customer_removes_their_sales() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    let tv = app.seed_product("Smart TV", "Acme", dec!(6000), 15).await;

    let sale = app
        .state
        .services
        .sales
        .create_sale(CreateSaleRequest {
            customer_id: customer.id,
            line_items: vec![line(tv.id, 2, dec!(6000))],
        })
        .await
        .unwrap();

    app.state
        .services
        .customers
        .delete_customer(customer.id)
        .await
        .unwrap();

    assert_matches!(
        app.state.services.sales.get_sale(sale.id).await,
        Err(ServiceError::SaleNotFound(_))
    );
    // Stock taken by the deleted sale is not returned.
    assert_eq!(app.stock_of(tv.id).await, 13);
}

#[tokio::test]
async fn deleting_a_product_drops_its_line_items() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    let tv = app.seed_product("Smart TV", "Acme", dec!(6000), 15).await;
    let cable = app.seed_product("HDMI Cable", "Acme", dec!(12.5), 10).await;

    let sale = app
        .state
        .services
        .sales
        .create_sale(CreateSaleRequest {
            customer_id: customer.id,
            line_items: vec![line(tv.id, 1, dec!(6000)), line(cable.id, 2, dec!(12.5))],
        })
        .await
        .unwrap();

    app.state
        .services
        .products
        .delete_product(cable.id)
        .await
        .unwrap();

    let fetched = app.state.services.sales.get_sale(sale.id).await.unwrap();
    assert_eq!(fetched.line_items.len(), 1);
    assert_eq!(fetched.line_items[0].product_id, tv.id);
    assert_eq!(fetched.total_amount, dec!(6025));
}

#[tokio::test]
async fn total_outside_money_range_is_rejected_without_taking_stock() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    let tv = app.seed_product("Smart TV", "Acme", dec!(6000), 15).await;

    let err = app
        .state
        .services
        .sales
        .create_sale(CreateSaleRequest {
            customer_id: customer.id,
            line_items: vec![line(tv.id, 2, store_sales_api::dto::MAX_MONEY)],
        })
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::ValidationError(_));
    assert_eq!(app.stock_of(tv.id).await, 15);
    assert!(app.state.services.sales.list_sales().await.unwrap().is_empty());
}

#[tokio::test]
async fn cancel_that_would_overflow_stock_is_rolled_back() {
    let app = TestApp::new().await;
    let customer = app.seed_customer("Ada", "Lovelace", "ada@example.com").await;
    let tv = app.seed_product("Smart TV", "Acme", dec!(6000), 15).await;

    let sale = app
        .state
        .services
        .sales
        .create_sale(CreateSaleRequest {
            customer_id: customer.id,
            line_items: vec![line(tv.id, 2, dec!(6000))],
        })
        .await
        .unwrap();

    app.state
        .services
        .products
        .update_product(
            tv.id,
            UpdateProductRequest {
                stock: Some(i32::MAX - 1),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = app.state.services.sales.cancel_sale(sale.id).await.unwrap_err();
    assert_matches!(err, ServiceError::StockOverflow(id) if id == tv.id);

    assert_eq!(app.stock_of(tv.id).await, i32::MAX - 1);
    let fetched = app.state.services.sales.get_sale(sale.id).await.unwrap();
    assert_eq!(fetched.status, SaleStatus::Active);
}
