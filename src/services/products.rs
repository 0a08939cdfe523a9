use sea_orm::Set;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::{transaction, DbPool},
    dto::{CreateProductRequest, ProductView, UpdateProductRequest},
    entities::product,
    errors::ServiceError,
    repositories::ProductRepository,
};

/// Maps a unique-index rejection of `(name, brand)` to `ProductAlreadyExists`.
fn name_taken(err: ServiceError, (name, brand): (String, String)) -> ServiceError {
    if err.is_unique_violation() {
        ServiceError::ProductAlreadyExists { name, brand }
    } else {
        err
    }
}

/// Service for managing the product catalog and its stock levels
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
}

impl ProductService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Gets a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> Result<ProductView, ServiceError> {
        ProductRepository::find_by_id(&*self.db_pool, id)
            .await?
            .map(ProductView::from)
            .ok_or(ServiceError::ProductNotFound(id))
    }

    /// Lists all products ordered by name then brand
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductView>, ServiceError> {
        let products = ProductRepository::find_all(&*self.db_pool).await?;
        Ok(products.into_iter().map(ProductView::from).collect())
    }

    /// Creates a product; the (name, brand) pair must be unused
    #[instrument(skip(self, request), fields(name = %request.name, brand = %request.brand))]
    pub async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<ProductView, ServiceError> {
        let db = &*self.db_pool;

        if ProductRepository::find_by_name_and_brand(db, &request.name, &request.brand)
            .await?
            .is_some()
        {
            return Err(ServiceError::ProductAlreadyExists {
                name: request.name,
                brand: request.brand,
            });
        }

        let key = (request.name.clone(), request.brand.clone());
        let model = ProductRepository::insert(
            db,
            product::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(request.name),
                brand: Set(request.brand),
                price: Set(request.price),
                stock: Set(request.stock),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| name_taken(e, key))?;

        info!(product_id = %model.id, stock = model.stock, "Product created");
        Ok(model.into())
    }

    /// Applies the fields present in `request` to an existing product
    #[instrument(skip(self, request))]
    pub async fn update_product(
        &self,
        id: Uuid,
        request: UpdateProductRequest,
    ) -> Result<ProductView, ServiceError> {
        let db = &*self.db_pool;

        let existing = ProductRepository::find_by_id(db, id)
            .await?
            .ok_or(ServiceError::ProductNotFound(id))?;

        let name = request.name.unwrap_or_else(|| existing.name.clone());
        let brand = request.brand.unwrap_or_else(|| existing.brand.clone());

        if name != existing.name || brand != existing.brand {
            if let Some(other) = ProductRepository::find_by_name_and_brand(db, &name, &brand).await? {
                if other.id != id {
                    return Err(ServiceError::ProductAlreadyExists { name, brand });
                }
            }
        }

        let key = (name.clone(), brand.clone());
        let mut active: product::ActiveModel = existing.into();
        active.name = Set(name);
        active.brand = Set(brand);
        if let Some(price) = request.price {
            active.price = Set(price);
        }
        if let Some(stock) = request.stock {
            active.stock = Set(stock);
        }

        let model = ProductRepository::update(db, active)
            .await
            .map_err(|e| name_taken(e, key))?;
        info!(product_id = %id, "Product updated");
        Ok(model.into())
    }

    /// Deletes a product and the line items that reference it
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = transaction::begin(&self.db_pool).await?;

        let result = async {
            ProductRepository::find_by_id(&txn, id)
                .await?
                .ok_or(ServiceError::ProductNotFound(id))?;
            ProductRepository::delete_aggregate(&txn, id).await
        }
        .await;

        transaction::commit_or_rollback(txn, result).await?;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
