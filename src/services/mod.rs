// Customer and catalog management
pub mod customers;
pub mod products;

// Bulk import
pub mod csv_import;

// Sale workflow
pub mod sales;
