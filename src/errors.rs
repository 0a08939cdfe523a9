use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use sea_orm::SqlErr;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status_code": 404,
    "error": "CUSTOMER_NOT_FOUND",
    "message": "Customer with id 550e8400-e29b-41d4-a716-446655440000 not found",
    "request_id": "req-abc123xyz",
    "timestamp": "2024-12-09T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body
    #[schema(example = 404)]
    pub status_code: u16,
    /// Stable machine-readable error code
    #[schema(example = "CUSTOMER_NOT_FOUND")]
    pub error: String,
    /// Human-readable error description
    #[schema(example = "Customer with id 550e8400-e29b-41d4-a716-446655440000 not found")]
    pub message: String,
    /// Unique request identifier for support and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "req-abc123xyz")]
    pub request_id: Option<String>,
    /// ISO 8601 timestamp when error occurred
    #[schema(example = "2024-12-09T10:30:00.000Z")]
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Customer with id {0} not found")]
    CustomerNotFound(Uuid),

    #[error("Product with id {0} not found")]
    ProductNotFound(Uuid),

    #[error("Sale with id {0} not found")]
    SaleNotFound(Uuid),

    #[error("Customer with email {0} already exists")]
    CustomerAlreadyExists(String),

    #[error("Product with name {name} and brand {brand} already exists")]
    ProductAlreadyExists { name: String, brand: String },

    #[error("Insufficient stock for product {0}")]
    InsufficientStock(String),

    #[error("Restoring stock would overflow the stock of product {0}")]
    StockOverflow(Uuid),

    #[error("The sale with id {0} is already canceled")]
    InvalidSaleState(Uuid),

    #[error("The customer has reached the maximum sales limit of {limit} per day")]
    MaxSalesPerDayExceeded { customer_id: Uuid, limit: u32 },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(
        #[from]
        #[serde(skip)]
        sea_orm::error::DbErr,
    ),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::CustomerNotFound(_) | Self::ProductNotFound(_) | Self::SaleNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::CustomerAlreadyExists(_)
            | Self::ProductAlreadyExists { .. }
            | Self::InsufficientStock(_)
            | Self::StockOverflow(_)
            | Self::InvalidSaleState(_) => StatusCode::CONFLICT,
            Self::MaxSalesPerDayExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::DatabaseError(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code carried in the `error` field of the response body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::SaleNotFound(_) => "SALE_NOT_FOUND",
            Self::CustomerAlreadyExists(_) => "CUSTOMER_ALREADY_EXIST",
            Self::ProductAlreadyExists { .. } => "PRODUCT_ALREADY_EXIST",
            Self::InsufficientStock(_) => "INSUFFICIENT_STOCK",
            Self::StockOverflow(_) => "STOCK_OVERFLOW",
            Self::InvalidSaleState(_) => "INVALID_SALE_STATE",
            Self::MaxSalesPerDayExceeded { .. } => "MAX_SALES_EXCEEDED",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::DatabaseError(_) | Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// True when the database rejected a write because of a unique index.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(err)
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        )
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) | Self::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let err = ErrorResponse {
            status_code: status.as_u16(),
            error: self.code().to_string(),
            message: self.response_message(),
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}
