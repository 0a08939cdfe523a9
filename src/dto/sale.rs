use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{validate_money, CustomerView};
use crate::entities::SaleStatus;
use crate::repositories::{SaleAggregate, SaleLine};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSaleRequest {
    pub customer_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    #[validate]
    pub line_items: Vec<SaleLineItemRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SaleLineItemRequest {
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    #[schema(example = 2)]
    pub quantity: i32,
    /// Price charged per unit; stored as a snapshot on the line item
    #[validate(custom = "validate_money")]
    #[schema(value_type = String, example = "6000")]
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SaleDetailView {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SaleView {
    pub id: Uuid,
    pub sale_date: NaiveDate,
    #[schema(value_type = String)]
    pub total_amount: Decimal,
    pub customer: CustomerView,
    pub line_items: Vec<SaleDetailView>,
    pub status: SaleStatus,
}

impl From<SaleLine> for SaleDetailView {
    fn from(line: SaleLine) -> Self {
        Self {
            product_id: line.detail.product_id,
            product_name: line.product.name,
            quantity: line.detail.quantity,
            unit_price: line.detail.price,
        }
    }
}

impl From<SaleAggregate> for SaleView {
    fn from(aggregate: SaleAggregate) -> Self {
        Self {
            id: aggregate.sale.id,
            sale_date: aggregate.sale.sale_date,
            total_amount: aggregate.sale.total_amount,
            customer: aggregate.customer.into(),
            line_items: aggregate.lines.into_iter().map(Into::into).collect(),
            status: aggregate.sale.status,
        }
    }
}
