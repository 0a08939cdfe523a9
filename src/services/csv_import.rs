//! Bulk product import from `name,brand,price,stock` CSV files.

use csv::{ReaderBuilder, StringRecord, Trim};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{DatabaseTransaction, Set};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{transaction, DbPool},
    dto::{CreateProductRequest, ProductImportSummary},
    entities::product,
    errors::ServiceError,
    repositories::ProductRepository,
};

/// Rows that parsed into valid products, plus how many were dropped.
#[derive(Debug, Default)]
pub struct ParsedProducts {
    pub products: Vec<CreateProductRequest>,
    pub skipped: usize,
}

/// Turns one CSV record into a validated product request.
pub fn parse_product_record(record: &StringRecord) -> Result<CreateProductRequest, String> {
    if record.len() < 4 {
        return Err(format!("expected 4 columns, found {}", record.len()));
    }

    let price = Decimal::from_str(&record[2]).map_err(|e| format!("bad price: {e}"))?;
    let stock = record[3]
        .parse::<i32>()
        .map_err(|e| format!("bad stock: {e}"))?;

    let request = CreateProductRequest {
        name: record[0].to_string(),
        brand: record[1].to_string(),
        price,
        stock,
    };
    request.validate().map_err(|e| e.to_string())?;
    Ok(request)
}

/// Reads every record of `data`, skipping the first line when `has_header`
/// is set. Malformed rows are logged and counted, never fatal.
pub fn parse_products(data: &[u8], has_header: bool) -> ParsedProducts {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let mut parsed = ParsedProducts::default();
    for record in reader.records() {
        let line = match &record {
            Ok(r) => r.position().map(|p| p.line()),
            Err(e) => e.position().map(|p| p.line()),
        };
        match record
            .map_err(|e| e.to_string())
            .and_then(|r| parse_product_record(&r))
        {
            Ok(product) => parsed.products.push(product),
            Err(reason) => {
                warn!(line = ?line, %reason, "Skipping CSV row");
                parsed.skipped += 1;
            }
        }
    }
    parsed
}

/// Imports products from CSV uploads
#[derive(Clone)]
pub struct CsvImportService {
    db_pool: Arc<DbPool>,
}

impl CsvImportService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Inserts every valid row of `data` in one transaction.
    ///
    /// Rows whose `(name, brand)` already exists, in the store or earlier in
    /// the same file, are skipped.
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn import_products(
        &self,
        data: &[u8],
        has_header: bool,
    ) -> Result<ProductImportSummary, ServiceError> {
        let parsed = parse_products(data, has_header);

        let txn = transaction::begin(&self.db_pool).await?;
        let result = Self::insert_all(&txn, parsed.products).await;
        let (imported, duplicates) = transaction::commit_or_rollback(txn, result).await?;

        let summary = ProductImportSummary {
            imported,
            skipped: parsed.skipped + duplicates,
        };
        counter!("store_sales.product.imported", imported as u64);
        info!(
            imported = summary.imported,
            skipped = summary.skipped,
            "CSV product import finished"
        );
        Ok(summary)
    }

    async fn insert_all(
        txn: &DatabaseTransaction,
        products: Vec<CreateProductRequest>,
    ) -> Result<(usize, usize), ServiceError> {
        let mut imported = 0;
        let mut duplicates = 0;

        for request in products {
            if ProductRepository::find_by_name_and_brand(txn, &request.name, &request.brand)
                .await?
                .is_some()
            {
                warn!(name = %request.name, brand = %request.brand, "Skipping existing product");
                duplicates += 1;
                continue;
            }

            ProductRepository::insert(
                txn,
                product::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    name: Set(request.name),
                    brand: Set(request.brand),
                    price: Set(request.price),
                    stock: Set(request.stock),
                    ..Default::default()
                },
            )
            .await?;
            imported += 1;
        }

        Ok((imported, duplicates))
    }
}
