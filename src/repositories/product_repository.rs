use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use crate::entities::product::{self, ActiveModel as ProductActiveModel, Model as ProductModel};
use crate::entities::{sale_detail, Product, SaleDetail};
use crate::errors::ServiceError;

/// Repository for product and stock operations
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductRepository;

impl ProductRepository {
    /// Find a product by ID
    pub async fn find_by_id<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
    ) -> Result<Option<ProductModel>, ServiceError> {
        Ok(Product::find_by_id(id).one(conn).await?)
    }

    /// Find the product carrying this exact name and brand
    pub async fn find_by_name_and_brand<C: ConnectionTrait>(
        conn: &C,
        name: &str,
        brand: &str,
    ) -> Result<Option<ProductModel>, ServiceError> {
        Ok(Product::find()
            .filter(product::Column::Name.eq(name))
            .filter(product::Column::Brand.eq(brand))
            .one(conn)
            .await?)
    }

    /// All products, ordered by name then brand
    pub async fn find_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<ProductModel>, ServiceError> {
        Ok(Product::find()
            .order_by_asc(product::Column::Name)
            .order_by_asc(product::Column::Brand)
            .all(conn)
            .await?)
    }

    /// Find products by a set of IDs
    pub async fn find_by_ids<C: ConnectionTrait>(
        conn: &C,
        ids: Vec<Uuid>,
    ) -> Result<Vec<ProductModel>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(Product::find()
            .filter(product::Column::Id.is_in(ids))
            .all(conn)
            .await?)
    }

    pub async fn insert<C: ConnectionTrait>(
        conn: &C,
        product: ProductActiveModel,
    ) -> Result<ProductModel, ServiceError> {
        Ok(product.insert(conn).await?)
    }

    pub async fn update<C: ConnectionTrait>(
        conn: &C,
        product: ProductActiveModel,
    ) -> Result<ProductModel, ServiceError> {
        Ok(product.update(conn).await?)
    }

    /// Take `quantity` units out of stock.
    ///
    /// The update only matches while enough stock remains, so it returns
    /// `false` instead of driving stock negative when a concurrent sale got
    /// there first.
    pub async fn decrement_stock<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
        quantity: i32,
    ) -> Result<bool, ServiceError> {
        let result = Product::update_many()
            .col_expr(
                product::Column::Stock,
                Expr::col(product::Column::Stock).sub(quantity),
            )
            .col_expr(product::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(product::Column::Id.eq(id))
            .filter(product::Column::Stock.gte(quantity))
            .exec(conn)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Put `quantity` units back into stock.
    ///
    /// Returns `false` when the product is gone or the new stock would not
    /// fit an `i32`.
    pub async fn increment_stock<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
        quantity: i32,
    ) -> Result<bool, ServiceError> {
        let Some(headroom) = i32::MAX.checked_sub(quantity) else {
            return Ok(false);
        };

        let result = Product::update_many()
            .col_expr(
                product::Column::Stock,
                Expr::col(product::Column::Stock).add(quantity),
            )
            .col_expr(product::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(product::Column::Id.eq(id))
            .filter(product::Column::Stock.lte(headroom))
            .exec(conn)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Delete a product and every line item that references it.
    ///
    /// Totals of the affected sales are not recomputed. Must run inside a
    /// transaction.
    pub async fn delete_aggregate<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
    ) -> Result<(), ServiceError> {
        SaleDetail::delete_many()
            .filter(sale_detail::Column::ProductId.eq(id))
            .exec(conn)
            .await?;

        Product::delete_by_id(id).exec(conn).await?;

        Ok(())
    }
}
