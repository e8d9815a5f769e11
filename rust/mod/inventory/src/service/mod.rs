pub mod product;
pub mod schema;
pub mod stock_move;
pub mod supplier;

use std::sync::Arc;

use thiserror::Error;

use inventory_sql::{SQLError, SQLStore};

/// Inventory service error type.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<InventoryError> for inventory_core::ServiceError {
    fn from(e: InventoryError) -> Self {
        match e {
            InventoryError::NotFound(m) => inventory_core::ServiceError::NotFound(m),
            InventoryError::Conflict(m) => inventory_core::ServiceError::Conflict(m),
            InventoryError::Validation(m) => inventory_core::ServiceError::Validation(m),
            InventoryError::InsufficientStock(m) => {
                inventory_core::ServiceError::InsufficientStock(m)
            }
            InventoryError::Storage(m) => inventory_core::ServiceError::Storage(m),
            InventoryError::Internal(m) => inventory_core::ServiceError::Internal(m),
        }
    }
}

impl From<SQLError> for InventoryError {
    fn from(e: SQLError) -> Self {
        InventoryError::Storage(e.to_string())
    }
}

/// The Inventory service. Holds the SQL storage backend.
pub struct InventoryService {
    pub(crate) sql: Arc<dyn SQLStore>,
}

impl InventoryService {
    /// Create a new InventoryService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Arc<Self>, InventoryError> {
        schema::init_schema(sql.as_ref())?;
        tracing::debug!("inventory schema ready");
        Ok(Arc::new(Self { sql }))
    }

    /// Map a storage-layer insert error, surfacing unique-key violations
    /// (duplicate sku) as conflicts.
    pub(crate) fn map_insert_err(e: SQLError) -> InventoryError {
        let msg = e.to_string();
        if msg.contains("UNIQUE constraint") {
            InventoryError::Conflict(msg)
        } else {
            InventoryError::Storage(msg)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use inventory_sql::SqliteStore;

    pub(crate) fn test_service() -> Arc<InventoryService> {
        let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        InventoryService::new(sql).unwrap()
    }

    #[test]
    fn test_schema_init_is_idempotent() {
        let sql: Arc<dyn SQLStore> = Arc::new(SqliteStore::open_in_memory().unwrap());
        schema::init_schema(sql.as_ref()).unwrap();
        schema::init_schema(sql.as_ref()).unwrap();
    }
}
