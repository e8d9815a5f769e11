use serde::{Deserialize, Serialize};

/// A catalog item tracked by the stock ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier, assigned by the database.
    pub id: i64,

    /// Stock-keeping unit. Unique across all products.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Price per unit. Never negative.
    pub unit_price: f64,

    /// On-hand quantity, derived from the stock-move ledger.
    /// Read-only through the API; maintained transactionally per move.
    pub stock: i64,

    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Input for creating a product or replacing its editable fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub unit_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_price_defaults_to_zero() {
        let input: ProductInput =
            serde_json::from_str(r#"{"sku": "A1", "name": "Widget"}"#).unwrap();
        assert_eq!(input.unit_price, 0.0);
    }

    #[test]
    fn test_product_serializes_stock() {
        let p = Product {
            id: 1,
            sku: "A1".into(),
            name: "Widget".into(),
            unit_price: 9.99,
            stock: 0,
            created_at: "2026-01-01T00:00:00+00:00".into(),
        };
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["stock"], 0);
        assert_eq!(v["unit_price"], 9.99);
    }
}
