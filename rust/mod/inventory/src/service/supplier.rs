use inventory_core::{now_rfc3339, types::is_blank};
use inventory_sql::{Row, Value};

use crate::model::{Supplier, SupplierInput};
use crate::service::{InventoryError, InventoryService};

const SUPPLIER_COLS: &str = "id, name, email, phone, created_at";

impl InventoryService {
    /// Create a new supplier.
    pub fn create_supplier(&self, input: SupplierInput) -> Result<Supplier, InventoryError> {
        validate_supplier(&input)?;
        let now = now_rfc3339();

        let rows = self
            .sql
            .query(
                &format!(
                    "INSERT INTO suppliers (name, email, phone, created_at) \
                     VALUES (?1, ?2, ?3, ?4) RETURNING {SUPPLIER_COLS}"
                ),
                &[
                    Value::Text(input.name),
                    opt_text(input.email),
                    opt_text(input.phone),
                    Value::Text(now),
                ],
            )
            .map_err(|e| InventoryError::Storage(e.to_string()))?;

        rows.first()
            .map(row_to_supplier)
            .transpose()?
            .ok_or_else(|| InventoryError::Internal("insert returned no row".into()))
    }

    /// List all suppliers, newest first.
    pub fn list_suppliers(&self) -> Result<Vec<Supplier>, InventoryError> {
        let rows = self
            .sql
            .query(
                &format!("SELECT {SUPPLIER_COLS} FROM suppliers ORDER BY id DESC"),
                &[],
            )
            .map_err(|e| InventoryError::Storage(e.to_string()))?;
        rows.iter().map(row_to_supplier).collect()
    }

    /// Get a supplier by id.
    pub fn get_supplier(&self, id: i64) -> Result<Supplier, InventoryError> {
        let rows = self
            .sql
            .query(
                &format!("SELECT {SUPPLIER_COLS} FROM suppliers WHERE id = ?1"),
                &[Value::Integer(id)],
            )
            .map_err(|e| InventoryError::Storage(e.to_string()))?;
        rows.first()
            .map(row_to_supplier)
            .transpose()?
            .ok_or_else(|| InventoryError::NotFound(format!("supplier {id}")))
    }

    /// Replace a supplier's editable fields.
    pub fn replace_supplier(
        &self,
        id: i64,
        input: SupplierInput,
    ) -> Result<Supplier, InventoryError> {
        validate_supplier(&input)?;

        let rows = self
            .sql
            .query(
                &format!(
                    "UPDATE suppliers SET name = ?1, email = ?2, phone = ?3 \
                     WHERE id = ?4 RETURNING {SUPPLIER_COLS}"
                ),
                &[
                    Value::Text(input.name),
                    opt_text(input.email),
                    opt_text(input.phone),
                    Value::Integer(id),
                ],
            )
            .map_err(|e| InventoryError::Storage(e.to_string()))?;

        rows.first()
            .map(row_to_supplier)
            .transpose()?
            .ok_or_else(|| InventoryError::NotFound(format!("supplier {id}")))
    }

    /// Delete a supplier by id.
    pub fn delete_supplier(&self, id: i64) -> Result<(), InventoryError> {
        let affected = self
            .sql
            .exec(
                "DELETE FROM suppliers WHERE id = ?1",
                &[Value::Integer(id)],
            )
            .map_err(|e| InventoryError::Storage(e.to_string()))?;
        if affected == 0 {
            return Err(InventoryError::NotFound(format!("supplier {id}")));
        }
        Ok(())
    }
}

fn validate_supplier(input: &SupplierInput) -> Result<(), InventoryError> {
    if is_blank(&input.name) {
        return Err(InventoryError::Validation("name must not be empty".into()));
    }
    Ok(())
}

fn opt_text(v: Option<String>) -> Value {
    match v {
        Some(s) => Value::Text(s),
        None => Value::Null,
    }
}

fn row_to_supplier(row: &Row) -> Result<Supplier, InventoryError> {
    Ok(Supplier {
        id: row
            .get_i64("id")
            .ok_or_else(|| InventoryError::Internal("missing id column".into()))?,
        name: row
            .get_str("name")
            .ok_or_else(|| InventoryError::Internal("missing name column".into()))?
            .to_string(),
        email: row.get_str("email").map(str::to_string),
        phone: row.get_str("phone").map(str::to_string),
        created_at: row.get_str("created_at").unwrap_or_default().to_string(),
    })
}
