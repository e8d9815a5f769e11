use inventory_sql::SQLStore;

use crate::service::InventoryError;

/// Initialize the SQLite schema for all inventory resources.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), InventoryError> {
    let statements = [
        // Products: catalog + derived stock counter.
        // `stock` is maintained transactionally by apply_move and always
        // equals the signed sum of the product's ledger entries.
        "CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sku TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            unit_price REAL NOT NULL DEFAULT 0,
            stock INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",

        // Suppliers: standalone contact records.
        "CREATE TABLE IF NOT EXISTS suppliers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT,
            phone TEXT,
            created_at TEXT NOT NULL
        )",

        // Stock moves: append-only ledger.
        "CREATE TABLE IF NOT EXISTS stock_moves (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            product_id INTEGER NOT NULL,
            quantity INTEGER NOT NULL,
            move_type TEXT NOT NULL,
            note TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (product_id) REFERENCES products(id)
        )",
        "CREATE INDEX IF NOT EXISTS idx_moves_product ON stock_moves(product_id)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])
            .map_err(|e| InventoryError::Storage(e.to_string()))?;
    }

    Ok(())
}
