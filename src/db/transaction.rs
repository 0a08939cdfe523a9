//! Explicit transaction boundaries.
//!
//! A unit of work calls [`begin`], threads the returned transaction through
//! every repository call, and hands its result to [`commit_or_rollback`].
//! Domain errors raised inside the unit of work come back unchanged.

use crate::errors::ServiceError;
use metrics::counter;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{debug, warn};

/// Opens a transaction on the pool.
pub async fn begin(db: &DatabaseConnection) -> Result<DatabaseTransaction, ServiceError> {
    let txn = db.begin().await?;
    debug!("Starting database transaction");
    counter!("store_sales_db.transaction.started", 1);
    Ok(txn)
}

/// Commits `txn` when `result` is `Ok`, rolls it back otherwise.
///
/// A failed commit surfaces as `DatabaseError`. A failed rollback is logged
/// and the original error is returned.
pub async fn commit_or_rollback<T>(
    txn: DatabaseTransaction,
    result: Result<T, ServiceError>,
) -> Result<T, ServiceError> {
    match result {
        Ok(value) => {
            txn.commit().await?;
            counter!("store_sales_db.transaction.committed", 1);
            debug!("Transaction committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "Transaction rollback failed");
            }
            counter!("store_sales_db.transaction.rolled_back", 1);
            warn!(error = %err, "Transaction rolled back");
            Err(err)
        }
    }
}
