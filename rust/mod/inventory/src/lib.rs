//! Inventory module — product catalog, supplier directory, stock ledger.
//!
//! # Resources
//!
//! - **Product** — catalog item with a derived `stock` counter
//! - **Supplier** — standalone contact record
//! - **StockMove** — append-only ledger entry (IN/OUT); a product's stock
//!   always equals the signed sum of its moves
//!
//! # Usage
//!
//! ```ignore
//! use inventory::InventoryModule;
//!
//! let module = InventoryModule::new(sql)?;
//! let router = module.routes(); // serves /api/products, /api/suppliers, /api/stock_moves
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use inventory_core::Module;
use inventory_sql::SQLStore;

use crate::service::InventoryService;

/// Inventory module implementing the Module trait.
///
/// Holds the InventoryService and provides HTTP routes for all
/// inventory endpoints.
pub struct InventoryModule {
    service: Arc<InventoryService>,
}

impl InventoryModule {
    /// Create a new InventoryModule, initializing the storage schema.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Self, inventory_core::ServiceError> {
        let service =
            InventoryService::new(sql).map_err(inventory_core::ServiceError::from)?;
        Ok(Self { service })
    }

    /// Get a reference to the underlying InventoryService.
    pub fn service(&self) -> &Arc<InventoryService> {
        &self.service
    }
}

impl Module for InventoryModule {
    fn name(&self) -> &str {
        "inventory"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
