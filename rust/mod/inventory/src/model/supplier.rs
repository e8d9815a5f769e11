use serde::{Deserialize, Serialize};

/// A supplier contact record. Not linked to products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique identifier, assigned by the database.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Input for creating a supplier or replacing its editable fields.
#[derive(Debug, Clone, Deserialize)]
pub struct SupplierInput {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_contacts_optional() {
        let input: SupplierInput = serde_json::from_str(r#"{"name": "Acme"}"#).unwrap();
        assert_eq!(input.name, "Acme");
        assert!(input.email.is_none());
        assert!(input.phone.is_none());
    }
}
