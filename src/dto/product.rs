use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::validate_money;
use crate::entities::product;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Smart TV")]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "Acme")]
    pub brand: String,
    #[validate(custom = "validate_money")]
    #[schema(value_type = String, example = "6000")]
    pub price: Decimal,
    #[validate(range(min = 0))]
    #[schema(example = 15)]
    pub stock: i32,
}

/// Partial update; omitted fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub brand: Option<String>,
    #[validate(custom = "validate_money")]
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    #[schema(value_type = String)]
    pub price: Decimal,
    pub stock: i32,
}

/// Multipart form accepted by the CSV upload endpoint.
#[derive(Debug, ToSchema)]
pub struct ProductCsvUpload {
    /// `name,brand,price,stock` rows
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Outcome of a CSV product import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductImportSummary {
    /// Products written
    pub imported: usize,
    /// Rows skipped as malformed, invalid or already present
    pub skipped: usize,
}

impl From<product::Model> for ProductView {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            brand: model.brand,
            price: model.price,
            stock: model.stock,
        }
    }
}
