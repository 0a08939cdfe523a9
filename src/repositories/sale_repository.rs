use chrono::{NaiveDate, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::customer::Model as CustomerModel;
use crate::entities::product::Model as ProductModel;
use crate::entities::sale::{self, ActiveModel as SaleActiveModel, Model as SaleModel};
use crate::entities::sale_detail::{self, ActiveModel as SaleDetailActiveModel, Model as SaleDetailModel};
use crate::entities::{Sale, SaleDetail, SaleStatus};
use crate::errors::ServiceError;

use super::{CustomerRepository, ProductRepository};

/// A line item joined with the product it refers to
#[derive(Debug, Clone)]
pub struct SaleLine {
    pub detail: SaleDetailModel,
    pub product: ProductModel,
}

/// A sale with its customer and its line items in input order
#[derive(Debug, Clone)]
pub struct SaleAggregate {
    pub sale: SaleModel,
    pub customer: CustomerModel,
    pub lines: Vec<SaleLine>,
}

/// Repository for sale aggregates
#[derive(Debug, Clone, Copy, Default)]
pub struct SaleRepository;

impl SaleRepository {
    /// Find a sale by ID
    pub async fn find_by_id<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
    ) -> Result<Option<SaleModel>, ServiceError> {
        Ok(Sale::find_by_id(id).one(conn).await?)
    }

    /// All sales, newest sale date first
    pub async fn find_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<SaleModel>, ServiceError> {
        Ok(Sale::find()
            .order_by_desc(sale::Column::SaleDate)
            .order_by_desc(sale::Column::CreatedAt)
            .all(conn)
            .await?)
    }

    /// Insert a sale row followed by its line items
    pub async fn insert_aggregate<C: ConnectionTrait>(
        conn: &C,
        sale: SaleActiveModel,
        details: Vec<SaleDetailActiveModel>,
    ) -> Result<SaleModel, ServiceError> {
        let sale = sale.insert(conn).await?;

        if !details.is_empty() {
            SaleDetail::insert_many(details)
                .exec_without_returning(conn)
                .await?;
        }

        Ok(sale)
    }

    /// Move an active sale to `CANCELED`.
    ///
    /// Only matches while the sale is still active, so of two concurrent
    /// cancels exactly one sees `true`.
    pub async fn mark_canceled<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
    ) -> Result<bool, ServiceError> {
        let result = Sale::update_many()
            .col_expr(sale::Column::Status, Expr::value(SaleStatus::Canceled))
            .col_expr(sale::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(sale::Column::Id.eq(id))
            .filter(sale::Column::Status.eq(SaleStatus::Active))
            .exec(conn)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Number of sales recorded for the customer on `date`, canceled ones included
    pub async fn count_by_customer_and_date<C: ConnectionTrait>(
        conn: &C,
        customer_id: Uuid,
        date: NaiveDate,
    ) -> Result<u64, ServiceError> {
        Ok(Sale::find()
            .filter(sale::Column::CustomerId.eq(customer_id))
            .filter(sale::Column::SaleDate.eq(date))
            .count(conn)
            .await?)
    }

    /// Line items of a sale ordered by line number
    pub async fn find_details<C: ConnectionTrait>(
        conn: &C,
        sale_id: Uuid,
    ) -> Result<Vec<SaleDetailModel>, ServiceError> {
        Ok(SaleDetail::find()
            .filter(sale_detail::Column::SaleId.eq(sale_id))
            .order_by_asc(sale_detail::Column::LineNumber)
            .all(conn)
            .await?)
    }

    /// Attach the customer, the ordered line items and their products to one sale
    pub async fn load_aggregate<C: ConnectionTrait>(
        conn: &C,
        sale: SaleModel,
    ) -> Result<SaleAggregate, ServiceError> {
        let mut aggregates = Self::load_aggregates(conn, vec![sale]).await?;
        aggregates
            .pop()
            .ok_or_else(|| ServiceError::InternalError("sale aggregate failed to load".into()))
    }

    /// Batch version of [`SaleRepository::load_aggregate`], keeping the order of `sales`
    pub async fn load_aggregates<C: ConnectionTrait>(
        conn: &C,
        sales: Vec<SaleModel>,
    ) -> Result<Vec<SaleAggregate>, ServiceError> {
        if sales.is_empty() {
            return Ok(Vec::new());
        }

        let sale_ids: Vec<Uuid> = sales.iter().map(|s| s.id).collect();
        let mut customer_ids: Vec<Uuid> = sales.iter().map(|s| s.customer_id).collect();
        customer_ids.sort();
        customer_ids.dedup();

        let details = SaleDetail::find()
            .filter(sale_detail::Column::SaleId.is_in(sale_ids))
            .order_by_asc(sale_detail::Column::SaleId)
            .order_by_asc(sale_detail::Column::LineNumber)
            .all(conn)
            .await?;

        let mut product_ids: Vec<Uuid> = details.iter().map(|d| d.product_id).collect();
        product_ids.sort();
        product_ids.dedup();

        let customers: HashMap<Uuid, CustomerModel> =
            CustomerRepository::find_by_ids(conn, customer_ids)
                .await?
                .into_iter()
                .map(|c| (c.id, c))
                .collect();
        let products: HashMap<Uuid, ProductModel> =
            ProductRepository::find_by_ids(conn, product_ids)
                .await?
                .into_iter()
                .map(|p| (p.id, p))
                .collect();

        let mut lines_by_sale: HashMap<Uuid, Vec<SaleLine>> = HashMap::new();
        for detail in details {
            let product = products.get(&detail.product_id).cloned().ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "line item {} references missing product {}",
                    detail.id, detail.product_id
                ))
            })?;
            lines_by_sale
                .entry(detail.sale_id)
                .or_default()
                .push(SaleLine { detail, product });
        }

        sales
            .into_iter()
            .map(|sale| {
                let customer = customers.get(&sale.customer_id).cloned().ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "sale {} references missing customer {}",
                        sale.id, sale.customer_id
                    ))
                })?;
                let mut lines = lines_by_sale.remove(&sale.id).unwrap_or_default();
                lines.sort_by_key(|line| line.detail.line_number);
                Ok(SaleAggregate {
                    sale,
                    customer,
                    lines,
                })
            })
            .collect()
    }
}
