use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Store Sales API",
        version = "1.0.0",
        description = r#"
# Store Sales API

Inventory and point-of-sale backend for a small store.

- **Customers**: register, update and remove customers
- **Products**: maintain the catalog and stock levels
- **Sales**: record sales against stock and cancel them

## Error Handling

Failures share one body shape. `error` is a stable code such as
`INSUFFICIENT_STOCK` or `MAX_SALES_EXCEEDED`:

```json
{
  "status_code": 409,
  "error": "INSUFFICIENT_STOCK",
  "message": "Insufficient stock for product Smart TV",
  "request_id": "0b5c3a4e-...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

Money amounts are decimal strings.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Customers", description = "Customer management endpoints"),
        (name = "Products", description = "Product catalog and stock endpoints"),
        (name = "Sales", description = "Sale recording and cancellation endpoints"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        // Customers
        crate::handlers::customers::list_customers,
        crate::handlers::customers::get_customer,
        crate::handlers::customers::create_customer,
        crate::handlers::customers::update_customer,
        crate::handlers::customers::delete_customer,

        // Products
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::files::upload_products_csv,

        // Sales
        crate::handlers::sales::list_sales,
        crate::handlers::sales::get_sale,
        crate::handlers::sales::create_sale,
        crate::handlers::sales::cancel_sale,

        // Health
        crate::api_status,
        crate::health_check,
    ),
    components(
        schemas(
            crate::dto::CustomerRequest,
            crate::dto::CustomerView,
            crate::dto::CreateProductRequest,
            crate::dto::UpdateProductRequest,
            crate::dto::ProductView,
            crate::dto::ProductCsvUpload,
            crate::dto::ProductImportSummary,
            crate::dto::CreateSaleRequest,
            crate::dto::SaleLineItemRequest,
            crate::dto::SaleDetailView,
            crate::dto::SaleView,
            crate::entities::SaleStatus,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
