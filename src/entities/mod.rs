pub mod customer;
pub mod product;
pub mod sale;
pub mod sale_detail;

pub use customer::Entity as Customer;
pub use product::Entity as Product;
pub use sale::{Entity as Sale, SaleStatus};
pub use sale_detail::Entity as SaleDetail;
