//! Request payloads and the views returned by the API.

pub mod customer;
pub mod product;
pub mod sale;

use rust_decimal::Decimal;
use validator::ValidationError;

pub use customer::{CustomerRequest, CustomerView};
pub use product::{
    CreateProductRequest, ProductCsvUpload, ProductImportSummary, ProductView, UpdateProductRequest,
};
pub use sale::{CreateSaleRequest, SaleDetailView, SaleLineItemRequest, SaleView};

/// Largest amount a money column holds: `DECIMAL(16, 4)`, i.e. 999999999999.9999.
pub const MAX_MONEY: Decimal = Decimal::from_parts(1_874_919_423, 2_328_306, 0, false, 4);

/// Most line items accepted in a single sale.
pub const MAX_LINE_ITEMS: usize = 100;

pub(crate) fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("money_min");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    if *value > MAX_MONEY {
        let mut err = ValidationError::new("money_max");
        err.message = Some(format!("must not exceed {}", MAX_MONEY).into());
        return Err(err);
    }
    Ok(())
}
