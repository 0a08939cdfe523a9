use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

use crate::entities::customer::{self, ActiveModel as CustomerActiveModel, Model as CustomerModel};
use crate::entities::{sale, sale_detail, Customer, Sale, SaleDetail};
use crate::errors::ServiceError;

/// Repository for customer operations
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerRepository;

impl CustomerRepository {
    /// Find a customer by ID
    pub async fn find_by_id<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
    ) -> Result<Option<CustomerModel>, ServiceError> {
        Ok(Customer::find_by_id(id).one(conn).await?)
    }

    /// Find a customer by email
    pub async fn find_by_email<C: ConnectionTrait>(
        conn: &C,
        email: &str,
    ) -> Result<Option<CustomerModel>, ServiceError> {
        Ok(Customer::find()
            .filter(customer::Column::Email.eq(email))
            .one(conn)
            .await?)
    }

    /// All customers, ordered by last name then name
    pub async fn find_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<CustomerModel>, ServiceError> {
        Ok(Customer::find()
            .order_by_asc(customer::Column::LastName)
            .order_by_asc(customer::Column::Name)
            .all(conn)
            .await?)
    }

    /// Find customers by a set of IDs
    pub async fn find_by_ids<C: ConnectionTrait>(
        conn: &C,
        ids: Vec<Uuid>,
    ) -> Result<Vec<CustomerModel>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(Customer::find()
            .filter(customer::Column::Id.is_in(ids))
            .all(conn)
            .await?)
    }

    pub async fn insert<C: ConnectionTrait>(
        conn: &C,
        customer: CustomerActiveModel,
    ) -> Result<CustomerModel, ServiceError> {
        Ok(customer.insert(conn).await?)
    }

    pub async fn update<C: ConnectionTrait>(
        conn: &C,
        customer: CustomerActiveModel,
    ) -> Result<CustomerModel, ServiceError> {
        Ok(customer.update(conn).await?)
    }

    /// Delete a customer together with its sales and their line items.
    ///
    /// Stock is left untouched. Must run inside a transaction.
    pub async fn delete_aggregate<C: ConnectionTrait>(
        conn: &C,
        id: Uuid,
    ) -> Result<(), ServiceError> {
        let sale_ids: Vec<Uuid> = Sale::find()
            .filter(sale::Column::CustomerId.eq(id))
            .all(conn)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();

        if !sale_ids.is_empty() {
            SaleDetail::delete_many()
                .filter(sale_detail::Column::SaleId.is_in(sale_ids))
                .exec(conn)
                .await?;
        }

        Sale::delete_many()
            .filter(sale::Column::CustomerId.eq(id))
            .exec(conn)
            .await?;

        Customer::delete_by_id(id).exec(conn).await?;

        Ok(())
    }
}
