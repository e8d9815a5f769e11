use serde::{Deserialize, Serialize};

/// Direction of a stock move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveType {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
}

impl MoveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveType::In => "IN",
            MoveType::Out => "OUT",
        }
    }

    /// Parse the stored wire form. Anything but IN/OUT is rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IN" => Some(MoveType::In),
            "OUT" => Some(MoveType::Out),
            _ => None,
        }
    }

    /// Signed stock delta for a move of `quantity` units.
    pub fn signed(&self, quantity: i64) -> i64 {
        match self {
            MoveType::In => quantity,
            MoveType::Out => -quantity,
        }
    }
}

/// An immutable ledger entry. Corrections are compensating moves,
/// never edits — there is no update or delete for stock moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockMove {
    /// Unique identifier, assigned by the database.
    pub id: i64,

    /// The product this move applies to.
    pub product_id: i64,

    /// Units moved. Always >= 1.
    pub quantity: i64,

    /// IN adds to stock, OUT subtracts.
    pub move_type: MoveType,

    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Input for appending a ledger entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveInput {
    pub product_id: i64,
    pub quantity: i64,
    pub move_type: MoveType,
    #[serde(default)]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_type_wire_form() {
        assert_eq!(serde_json::to_string(&MoveType::In).unwrap(), r#""IN""#);
        assert_eq!(serde_json::to_string(&MoveType::Out).unwrap(), r#""OUT""#);
        let t: MoveType = serde_json::from_str(r#""OUT""#).unwrap();
        assert_eq!(t, MoveType::Out);
    }

    #[test]
    fn test_move_type_rejects_unknown() {
        assert!(serde_json::from_str::<MoveType>(r#""SIDEWAYS""#).is_err());
        assert!(MoveType::parse("sideways").is_none());
        assert_eq!(MoveType::parse("IN"), Some(MoveType::In));
    }

    #[test]
    fn test_signed_delta() {
        assert_eq!(MoveType::In.signed(5), 5);
        assert_eq!(MoveType::Out.signed(5), -5);
    }

    #[test]
    fn test_input_note_optional() {
        let input: MoveInput = serde_json::from_str(
            r#"{"product_id": 1, "quantity": 5, "move_type": "IN"}"#,
        )
        .unwrap();
        assert_eq!(input.quantity, 5);
        assert!(input.note.is_none());
    }
}
