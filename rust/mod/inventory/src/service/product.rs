use inventory_core::{now_rfc3339, types::is_blank};
use inventory_sql::{Row, Value};

use crate::model::{Product, ProductInput};
use crate::service::{InventoryError, InventoryService};

const PRODUCT_COLS: &str = "id, sku, name, unit_price, stock, created_at";

impl InventoryService {
    /// Create a new product with zero stock.
    pub fn create_product(&self, input: ProductInput) -> Result<Product, InventoryError> {
        validate_product(&input)?;
        let now = now_rfc3339();

        let rows = self
            .sql
            .query(
                &format!(
                    "INSERT INTO products (sku, name, unit_price, stock, created_at) \
                     VALUES (?1, ?2, ?3, 0, ?4) RETURNING {PRODUCT_COLS}"
                ),
                &[
                    Value::Text(input.sku),
                    Value::Text(input.name),
                    Value::Real(input.unit_price),
                    Value::Text(now),
                ],
            )
            .map_err(Self::map_insert_err)?;

        rows.first()
            .map(row_to_product)
            .transpose()?
            .ok_or_else(|| InventoryError::Internal("insert returned no row".into()))
    }

    /// List all products, newest first.
    pub fn list_products(&self) -> Result<Vec<Product>, InventoryError> {
        let rows = self
            .sql
            .query(
                &format!("SELECT {PRODUCT_COLS} FROM products ORDER BY id DESC"),
                &[],
            )
            .map_err(|e| InventoryError::Storage(e.to_string()))?;
        rows.iter().map(row_to_product).collect()
    }

    /// Get a product by id.
    pub fn get_product(&self, id: i64) -> Result<Product, InventoryError> {
        let rows = self
            .sql
            .query(
                &format!("SELECT {PRODUCT_COLS} FROM products WHERE id = ?1"),
                &[Value::Integer(id)],
            )
            .map_err(|e| InventoryError::Storage(e.to_string()))?;
        rows.first()
            .map(row_to_product)
            .transpose()?
            .ok_or_else(|| InventoryError::NotFound(format!("product {id}")))
    }

    /// Replace a product's editable fields (sku, name, unit_price).
    /// Stock and created_at are never replaced.
    pub fn replace_product(
        &self,
        id: i64,
        input: ProductInput,
    ) -> Result<Product, InventoryError> {
        validate_product(&input)?;

        let rows = self
            .sql
            .query(
                &format!(
                    "UPDATE products SET sku = ?1, name = ?2, unit_price = ?3 \
                     WHERE id = ?4 RETURNING {PRODUCT_COLS}"
                ),
                &[
                    Value::Text(input.sku),
                    Value::Text(input.name),
                    Value::Real(input.unit_price),
                    Value::Integer(id),
                ],
            )
            .map_err(Self::map_insert_err)?;

        rows.first()
            .map(row_to_product)
            .transpose()?
            .ok_or_else(|| InventoryError::NotFound(format!("product {id}")))
    }

    /// Delete a product and its ledger entries, as one transaction.
    pub fn delete_product(&self, id: i64) -> Result<(), InventoryError> {
        let mut missing = false;
        self.sql.with_tx(&mut |tx| {
            tx.exec(
                "DELETE FROM stock_moves WHERE product_id = ?1",
                &[Value::Integer(id)],
            )?;
            let affected = tx.exec(
                "DELETE FROM products WHERE id = ?1",
                &[Value::Integer(id)],
            )?;
            missing = affected == 0;
            Ok(())
        })?;

        if missing {
            return Err(InventoryError::NotFound(format!("product {id}")));
        }
        Ok(())
    }
}

fn validate_product(input: &ProductInput) -> Result<(), InventoryError> {
    if is_blank(&input.sku) {
        return Err(InventoryError::Validation("sku must not be empty".into()));
    }
    if is_blank(&input.name) {
        return Err(InventoryError::Validation("name must not be empty".into()));
    }
    if input.unit_price < 0.0 {
        return Err(InventoryError::Validation(
            "unit_price must not be negative".into(),
        ));
    }
    Ok(())
}

fn row_to_product(row: &Row) -> Result<Product, InventoryError> {
    Ok(Product {
        id: row
            .get_i64("id")
            .ok_or_else(|| InventoryError::Internal("missing id column".into()))?,
        sku: row
            .get_str("sku")
            .ok_or_else(|| InventoryError::Internal("missing sku column".into()))?
            .to_string(),
        name: row
            .get_str("name")
            .ok_or_else(|| InventoryError::Internal("missing name column".into()))?
            .to_string(),
        unit_price: row.get_f64("unit_price").unwrap_or(0.0),
        stock: row.get_i64("stock").unwrap_or(0),
        created_at: row.get_str("created_at").unwrap_or_default().to_string(),
    })
}
