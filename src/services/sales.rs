//! Sale workflow: recording a sale against stock and canceling it.

use chrono::{NaiveDate, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{DatabaseTransaction, Set};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::{
    db::{transaction, DbPool},
    dto::{CreateSaleRequest, SaleView, MAX_MONEY},
    entities::{sale, sale_detail, SaleStatus},
    errors::ServiceError,
    repositories::{CustomerRepository, ProductRepository, SaleRepository},
};

pub const DEFAULT_MAX_SALES_PER_DAY: u32 = 3;

/// Business limits applied when recording sales
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalesPolicy {
    pub max_sales_per_day: u32,
}

impl Default for SalesPolicy {
    fn default() -> Self {
        Self {
            max_sales_per_day: DEFAULT_MAX_SALES_PER_DAY,
        }
    }
}

/// Extended price of one line, `None` on overflow.
pub fn line_total(unit_price: Decimal, quantity: i32) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(quantity))
}

/// Sum of the extended prices of `lines`, given as `(unit_price, quantity)`.
///
/// Fails when the sum does not fit a money column.
pub fn sale_total<I>(lines: I) -> Result<Decimal, ServiceError>
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    let total_too_large =
        || ServiceError::ValidationError(format!("sale total must not exceed {}", MAX_MONEY));

    let total = lines
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, (unit_price, quantity)| {
            line_total(unit_price, quantity).and_then(|line| acc.checked_add(line))
        })
        .ok_or_else(total_too_large)?;

    if total > MAX_MONEY {
        return Err(total_too_large());
    }
    Ok(total)
}

/// Fails once the customer already has `limit` sales on the day.
pub fn ensure_daily_capacity(
    customer_id: Uuid,
    sales_today: u64,
    limit: u32,
) -> Result<(), ServiceError> {
    if sales_today >= u64::from(limit) {
        return Err(ServiceError::MaxSalesPerDayExceeded { customer_id, limit });
    }
    Ok(())
}

/// Only active sales can be canceled.
pub fn ensure_cancellable(sale_id: Uuid, status: SaleStatus) -> Result<(), ServiceError> {
    match status {
        SaleStatus::Active => Ok(()),
        SaleStatus::Canceled => Err(ServiceError::InvalidSaleState(sale_id)),
    }
}

/// Service that records and cancels sales
#[derive(Clone)]
pub struct SaleService {
    db_pool: Arc<DbPool>,
    policy: SalesPolicy,
}

impl SaleService {
    pub fn new(db_pool: Arc<DbPool>, policy: SalesPolicy) -> Self {
        Self { db_pool, policy }
    }

    pub fn policy(&self) -> SalesPolicy {
        self.policy
    }

    /// Gets a sale with its customer and line items
    #[instrument(skip(self))]
    pub async fn get_sale(&self, id: Uuid) -> Result<SaleView, ServiceError> {
        let db = &*self.db_pool;
        let sale = SaleRepository::find_by_id(db, id)
            .await?
            .ok_or(ServiceError::SaleNotFound(id))?;
        Ok(SaleRepository::load_aggregate(db, sale).await?.into())
    }

    /// Lists every sale, newest sale date first
    #[instrument(skip(self))]
    pub async fn list_sales(&self) -> Result<Vec<SaleView>, ServiceError> {
        let db = &*self.db_pool;
        let sales = SaleRepository::find_all(db).await?;
        let aggregates = SaleRepository::load_aggregates(db, sales).await?;
        Ok(aggregates.into_iter().map(SaleView::from).collect())
    }

    /// Records a sale for today.
    ///
    /// Stock for every line is taken inside the same transaction that writes
    /// the sale, so any failure leaves stock and sales as they were.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id, lines = request.line_items.len()))]
    pub async fn create_sale(&self, request: CreateSaleRequest) -> Result<SaleView, ServiceError> {
        let today = Utc::now().date_naive();
        let txn = transaction::begin(&self.db_pool).await?;

        let result = self.create_sale_in(&txn, request, today).await;
        let view = transaction::commit_or_rollback(txn, result).await?;

        counter!("store_sales.sale.created", 1);
        info!(sale_id = %view.id, total = %view.total_amount, "Sale created");
        Ok(view)
    }

    async fn create_sale_in(
        &self,
        txn: &DatabaseTransaction,
        request: CreateSaleRequest,
        today: NaiveDate,
    ) -> Result<SaleView, ServiceError> {
        let customer_id = request.customer_id;
        CustomerRepository::find_by_id(txn, customer_id)
            .await?
            .ok_or(ServiceError::CustomerNotFound(customer_id))?;

        let sales_today =
            SaleRepository::count_by_customer_and_date(txn, customer_id, today).await?;
        ensure_daily_capacity(customer_id, sales_today, self.policy.max_sales_per_day)?;

        let total = sale_total(
            request
                .line_items
                .iter()
                .map(|item| (item.unit_price, item.quantity)),
        )?;

        let sale_id = Uuid::new_v4();
        let mut details = Vec::with_capacity(request.line_items.len());

        for (index, item) in request.line_items.into_iter().enumerate() {
            let product = ProductRepository::find_by_id(txn, item.product_id)
                .await?
                .ok_or(ServiceError::ProductNotFound(item.product_id))?;

            if product.stock < item.quantity {
                warn!(
                    product_id = %product.id,
                    available = product.stock,
                    requested = item.quantity,
                    "Insufficient stock"
                );
                return Err(ServiceError::InsufficientStock(product.name));
            }

            if !ProductRepository::decrement_stock(txn, product.id, item.quantity).await? {
                warn!(product_id = %product.id, "Stock changed while recording sale");
                return Err(ServiceError::InsufficientStock(product.name));
            }

            let line_number = i32::try_from(index + 1).map_err(|_| {
                ServiceError::ValidationError("too many line items in one sale".into())
            })?;

            details.push(sale_detail::ActiveModel {
                id: Set(Uuid::new_v4()),
                sale_id: Set(sale_id),
                product_id: Set(product.id),
                line_number: Set(line_number),
                quantity: Set(item.quantity),
                price: Set(item.unit_price),
            });
        }

        debug!(sale_id = %sale_id, total = %total, "Persisting sale aggregate");

        let sale = SaleRepository::insert_aggregate(
            txn,
            sale::ActiveModel {
                id: Set(sale_id),
                customer_id: Set(customer_id),
                sale_date: Set(today),
                total_amount: Set(total),
                status: Set(SaleStatus::Active),
                ..Default::default()
            },
            details,
        )
        .await?;

        Ok(SaleRepository::load_aggregate(txn, sale).await?.into())
    }

    /// Cancels an active sale and puts its quantities back into stock
    #[instrument(skip(self))]
    pub async fn cancel_sale(&self, id: Uuid) -> Result<SaleView, ServiceError> {
        let txn = transaction::begin(&self.db_pool).await?;

        let result = Self::cancel_sale_in(&txn, id).await;
        let view = transaction::commit_or_rollback(txn, result).await?;

        counter!("store_sales.sale.canceled", 1);
        info!(sale_id = %id, "Sale canceled");
        Ok(view)
    }

    async fn cancel_sale_in(txn: &DatabaseTransaction, id: Uuid) -> Result<SaleView, ServiceError> {
        let sale = SaleRepository::find_by_id(txn, id)
            .await?
            .ok_or(ServiceError::SaleNotFound(id))?;

        ensure_cancellable(id, sale.status)?;

        // Only the cancel that flips the status restores stock.
        if !SaleRepository::mark_canceled(txn, id).await? {
            return Err(ServiceError::InvalidSaleState(id));
        }

        for detail in SaleRepository::find_details(txn, id).await? {
            if !ProductRepository::increment_stock(txn, detail.product_id, detail.quantity).await? {
                warn!(product_id = %detail.product_id, quantity = detail.quantity, "Stock restore would overflow");
                return Err(ServiceError::StockOverflow(detail.product_id));
            }
        }

        let sale = SaleRepository::find_by_id(txn, id)
            .await?
            .ok_or(ServiceError::SaleNotFound(id))?;
        Ok(SaleRepository::load_aggregate(txn, sale).await?.into())
    }
}
