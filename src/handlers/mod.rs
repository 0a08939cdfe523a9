pub mod common;
pub mod customers;
pub mod files;
pub mod products;
pub mod sales;

use crate::db::DbPool;
use crate::services::{
    csv_import::CsvImportService,
    customers::CustomerService,
    products::ProductService,
    sales::{SaleService, SalesPolicy},
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub customers: Arc<CustomerService>,
    pub products: Arc<ProductService>,
    pub csv_import: Arc<CsvImportService>,
    pub sales: Arc<SaleService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, policy: SalesPolicy) -> Self {
        Self {
            customers: Arc::new(CustomerService::new(db_pool.clone())),
            products: Arc::new(ProductService::new(db_pool.clone())),
            csv_import: Arc::new(CsvImportService::new(db_pool.clone())),
            sales: Arc::new(SaleService::new(db_pool, policy)),
        }
    }
}
