use sea_orm::Set;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::{transaction, DbPool},
    dto::{CustomerRequest, CustomerView},
    entities::customer,
    errors::ServiceError,
    repositories::CustomerRepository,
};

/// A concurrent writer can claim the email between the lookup and the write;
/// the unique index then rejects it.
fn email_taken(err: ServiceError, email: String) -> ServiceError {
    if err.is_unique_violation() {
        ServiceError::CustomerAlreadyExists(email)
    } else {
        err
    }
}

/// Service for managing customers
#[derive(Clone)]
pub struct CustomerService {
    db_pool: Arc<DbPool>,
}

impl CustomerService {
    /// Creates a new customer service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Gets a customer by ID
    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: Uuid) -> Result<CustomerView, ServiceError> {
        CustomerRepository::find_by_id(&*self.db_pool, id)
            .await?
            .map(CustomerView::from)
            .ok_or(ServiceError::CustomerNotFound(id))
    }

    /// Lists all customers ordered by last name then name
    #[instrument(skip(self))]
    pub async fn list_customers(&self) -> Result<Vec<CustomerView>, ServiceError> {
        let customers = CustomerRepository::find_all(&*self.db_pool).await?;
        Ok(customers.into_iter().map(CustomerView::from).collect())
    }

    /// Creates a new customer; the email must not be in use
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create_customer(
        &self,
        request: CustomerRequest,
    ) -> Result<CustomerView, ServiceError> {
        let db = &*self.db_pool;

        if CustomerRepository::find_by_email(db, &request.email)
            .await?
            .is_some()
        {
            return Err(ServiceError::CustomerAlreadyExists(request.email));
        }

        let email = request.email.clone();
        let model = CustomerRepository::insert(
            db,
            customer::ActiveModel {
                id: Set(Uuid::new_v4()),
                name: Set(request.name),
                last_name: Set(request.last_name),
                email: Set(request.email),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| email_taken(e, email))?;

        info!(customer_id = %model.id, "Customer created");
        Ok(model.into())
    }

    /// Replaces name, last name and email of an existing customer
    #[instrument(skip(self, request))]
    pub async fn update_customer(
        &self,
        id: Uuid,
        request: CustomerRequest,
    ) -> Result<CustomerView, ServiceError> {
        let db = &*self.db_pool;

        let existing = CustomerRepository::find_by_id(db, id)
            .await?
            .ok_or(ServiceError::CustomerNotFound(id))?;

        if let Some(owner) = CustomerRepository::find_by_email(db, &request.email).await? {
            if owner.id != id {
                return Err(ServiceError::CustomerAlreadyExists(request.email));
            }
        }

        let mut active: customer::ActiveModel = existing.into();
        active.name = Set(request.name);
        active.last_name = Set(request.last_name);
        let email = request.email.clone();
        active.email = Set(request.email);

        let model = CustomerRepository::update(db, active)
            .await
            .map_err(|e| email_taken(e, email))?;
        info!(customer_id = %id, "Customer updated");
        Ok(model.into())
    }

    /// Deletes a customer together with all of its sales.
    ///
    /// Stock consumed by those sales is not given back.
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = transaction::begin(&self.db_pool).await?;

        let result = async {
            CustomerRepository::find_by_id(&txn, id)
                .await?
                .ok_or(ServiceError::CustomerNotFound(id))?;
            CustomerRepository::delete_aggregate(&txn, id).await
        }
        .await;

        transaction::commit_or_rollback(txn, result).await?;
        info!(customer_id = %id, "Customer deleted");
        Ok(())
    }
}
