//! Persistence operations over the four tables.
//!
//! Every function takes the connection as a generic `ConnectionTrait`, so the
//! same call works on the pool or inside an open transaction.

pub mod customer_repository;
pub mod product_repository;
pub mod sale_repository;

pub use customer_repository::CustomerRepository;
pub use product_repository::ProductRepository;
pub use sale_repository::{SaleAggregate, SaleLine, SaleRepository};
