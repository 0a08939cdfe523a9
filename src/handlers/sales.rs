use super::common::{created_response, success_response, validate_input};
use crate::dto::{CreateSaleRequest, SaleView};
use crate::errors::ServiceError;
use crate::AppState;
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

/// List all sales, newest first
#[utoipa::path(
    get,
    path = "/api/v1/sales",
    responses(
        (status = 200, description = "Sales retrieved", body = [SaleView])
    ),
    tag = "Sales"
)]
pub async fn list_sales(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let sales = state.services.sales.list_sales().await?;
    Ok(success_response(sales))
}

/// Get a sale by ID
#[utoipa::path(
    get,
    path = "/api/v1/sales/{id}",
    params(
        ("id" = Uuid, Path, description = "Sale ID")
    ),
    responses(
        (status = 200, description = "Sale retrieved", body = SaleView),
        (status = 404, description = "Sale not found", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let sale = state.services.sales.get_sale(id).await?;
    Ok(success_response(sale))
}

/// Record a sale
#[utoipa::path(
    post,
    path = "/api/v1/sales",
    request_body = CreateSaleRequest,
    responses(
        (status = 201, description = "Sale recorded", body = SaleView),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 404, description = "Customer or product not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Insufficient stock", body = crate::errors::ErrorResponse),
        (status = 422, description = "Daily sale limit reached", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn create_sale(
    State(state): State<AppState>,
    Json(payload): Json<CreateSaleRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;
    let sale = state.services.sales.create_sale(payload).await?;
    Ok(created_response(sale))
}

/// Cancel a sale and restore its stock
#[utoipa::path(
    post,
    path = "/api/v1/sales/{id}/cancel",
    params(
        ("id" = Uuid, Path, description = "Sale ID")
    ),
    responses(
        (status = 200, description = "Sale canceled", body = SaleView),
        (status = 404, description = "Sale not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Sale already canceled", body = crate::errors::ErrorResponse)
    ),
    tag = "Sales"
)]
pub async fn cancel_sale(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let sale = state.services.sales.cancel_sale(id).await?;
    Ok(success_response(sale))
}

pub fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales).post(create_sale))
        .route("/:id", get(get_sale))
        .route("/:id/cancel", post(cancel_sale))
}
