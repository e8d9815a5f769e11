use inventory_core::now_rfc3339;
use inventory_sql::{Row, SQLError, Value};

use crate::model::{MoveInput, MoveType, StockMove};
use crate::service::{InventoryError, InventoryService};

const MOVE_COLS: &str = "id, product_id, quantity, move_type, note, created_at";

/// What happened inside the apply_move transaction.
enum TxOutcome {
    Applied(i64),
    MissingProduct,
    Short { on_hand: i64 },
}

impl InventoryService {
    /// Append a ledger entry and update the product's stock counter.
    ///
    /// Validation, the ledger insert, and the counter update run as one
    /// transaction: concurrent moves against the same product serialize,
    /// and a move is never applied partially. Domain rejections happen
    /// before any write, so they commit nothing.
    pub fn apply_move(&self, input: MoveInput) -> Result<StockMove, InventoryError> {
        if input.quantity < 1 {
            return Err(InventoryError::Validation(
                "quantity must be a positive integer".into(),
            ));
        }

        let now = now_rfc3339();
        let mut outcome: Option<TxOutcome> = None;

        self.sql.with_tx(&mut |tx| {
            let rows = tx.query(
                "SELECT stock FROM products WHERE id = ?1",
                &[Value::Integer(input.product_id)],
            )?;
            let Some(row) = rows.first() else {
                outcome = Some(TxOutcome::MissingProduct);
                return Ok(());
            };
            let on_hand = row.get_i64("stock").unwrap_or(0);

            if input.move_type == MoveType::Out && on_hand < input.quantity {
                outcome = Some(TxOutcome::Short { on_hand });
                return Ok(());
            }

            tx.exec(
                "UPDATE products SET stock = stock + ?1 WHERE id = ?2",
                &[
                    Value::Integer(input.move_type.signed(input.quantity)),
                    Value::Integer(input.product_id),
                ],
            )?;

            let rows = tx.query(
                "INSERT INTO stock_moves (product_id, quantity, move_type, note, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
                &[
                    Value::Integer(input.product_id),
                    Value::Integer(input.quantity),
                    Value::Text(input.move_type.as_str().to_string()),
                    match &input.note {
                        Some(n) => Value::Text(n.clone()),
                        None => Value::Null,
                    },
                    Value::Text(now.clone()),
                ],
            )?;
            let id = rows
                .first()
                .and_then(|r| r.get_i64("id"))
                .ok_or_else(|| SQLError::Query("insert returned no id".into()))?;

            outcome = Some(TxOutcome::Applied(id));
            Ok(())
        })?;

        match outcome {
            Some(TxOutcome::Applied(id)) => Ok(StockMove {
                id,
                product_id: input.product_id,
                quantity: input.quantity,
                move_type: input.move_type,
                note: input.note,
                created_at: now,
            }),
            Some(TxOutcome::MissingProduct) => Err(InventoryError::NotFound(format!(
                "product {}",
                input.product_id
            ))),
            Some(TxOutcome::Short { on_hand }) => Err(InventoryError::InsufficientStock(
                format!(
                    "cannot move {} OUT of product {}: {} on hand",
                    input.quantity, input.product_id, on_hand
                ),
            )),
            None => Err(InventoryError::Internal(
                "move transaction produced no outcome".into(),
            )),
        }
    }

    /// List all ledger entries, newest first.
    pub fn list_moves(&self) -> Result<Vec<StockMove>, InventoryError> {
        let rows = self
            .sql
            .query(
                &format!("SELECT {MOVE_COLS} FROM stock_moves ORDER BY id DESC"),
                &[],
            )
            .map_err(|e| InventoryError::Storage(e.to_string()))?;
        rows.iter().map(row_to_move).collect()
    }

    /// Recompute a product's stock from its ledger: Σ IN − Σ OUT.
    /// Always equals the stored counter; a product with no moves is 0.
    pub fn ledger_stock(&self, product_id: i64) -> Result<i64, InventoryError> {
        let rows = self
            .sql
            .query(
                "SELECT COALESCE(SUM(CASE WHEN move_type = 'IN' THEN quantity \
                 ELSE -quantity END), 0) AS total \
                 FROM stock_moves WHERE product_id = ?1",
                &[Value::Integer(product_id)],
            )
            .map_err(|e| InventoryError::Storage(e.to_string()))?;
        Ok(rows.first().and_then(|r| r.get_i64("total")).unwrap_or(0))
    }
}

fn row_to_move(row: &Row) -> Result<StockMove, InventoryError> {
    let move_type = row
        .get_str("move_type")
        .and_then(MoveType::parse)
        .ok_or_else(|| InventoryError::Internal("bad move_type column".into()))?;
    Ok(StockMove {
        id: row
            .get_i64("id")
            .ok_or_else(|| InventoryError::Internal("missing id column".into()))?,
        product_id: row
            .get_i64("product_id")
            .ok_or_else(|| InventoryError::Internal("missing product_id column".into()))?,
        quantity: row.get_i64("quantity").unwrap_or(0),
        move_type,
        note: row.get_str("note").map(str::to_string),
        created_at: row.get_str("created_at").unwrap_or_default().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductInput;
    use crate::service::tests::test_service;

    fn seed_product(svc: &InventoryService, sku: &str) -> i64 {
        svc.create_product(ProductInput {
            sku: sku.to_string(),
            name: format!("Item {sku}"),
            unit_price: 1.0,
        })
        .unwrap()
        .id
    }

    fn mv(product_id: i64, quantity: i64, move_type: MoveType) -> MoveInput {
        MoveInput {
            product_id,
            quantity,
            move_type,
            note: None,
        }
    }

    #[test]
    fn test_in_and_out_moves_update_stock() {
        let svc = test_service();
        let pid = seed_product(&svc, "B1");

        let entry = svc.apply_move(mv(pid, 5, MoveType::In)).unwrap();
        assert_eq!(entry.product_id, pid);
        assert_eq!(entry.quantity, 5);
        assert!(entry.id > 0);

        svc.apply_move(mv(pid, 2, MoveType::Out)).unwrap();

        let product = svc.get_product(pid).unwrap();
        assert_eq!(product.stock, 3);
        assert_eq!(svc.ledger_stock(pid).unwrap(), 3);
    }

    #[test]
    fn test_product_without_moves_has_zero_stock() {
        let svc = test_service();
        let pid = seed_product(&svc, "Z0");
        assert_eq!(svc.get_product(pid).unwrap().stock, 0);
        assert_eq!(svc.ledger_stock(pid).unwrap(), 0);
    }

    #[test]
    fn test_unknown_product_rejected() {
        let svc = test_service();
        let err = svc.apply_move(mv(999, 1, MoveType::In)).unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(_)));
        assert!(svc.list_moves().unwrap().is_empty());
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let svc = test_service();
        let pid = seed_product(&svc, "B1");

        for qty in [0, -3] {
            let err = svc.apply_move(mv(pid, qty, MoveType::In)).unwrap_err();
            assert!(matches!(err, InventoryError::Validation(_)));
        }
        assert_eq!(svc.get_product(pid).unwrap().stock, 0);
        assert!(svc.list_moves().unwrap().is_empty());
    }

    #[test]
    fn test_out_exceeding_stock_rejected() {
        let svc = test_service();
        let pid = seed_product(&svc, "B1");
        svc.apply_move(mv(pid, 3, MoveType::In)).unwrap();

        let err = svc.apply_move(mv(pid, 4, MoveType::Out)).unwrap_err();
        assert!(matches!(err, InventoryError::InsufficientStock(_)));

        // Nothing applied: counter and ledger untouched.
        assert_eq!(svc.get_product(pid).unwrap().stock, 3);
        assert_eq!(svc.list_moves().unwrap().len(), 1);
    }

    #[test]
    fn test_moves_list_newest_first_with_notes() {
        let svc = test_service();
        let pid = seed_product(&svc, "B1");

        svc.apply_move(MoveInput {
            product_id: pid,
            quantity: 5,
            move_type: MoveType::In,
            note: Some("initial delivery".to_string()),
        })
        .unwrap();
        svc.apply_move(mv(pid, 1, MoveType::Out)).unwrap();

        let moves = svc.list_moves().unwrap();
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[0].move_type, MoveType::Out);
        assert!(moves[0].note.is_none());
        assert_eq!(moves[1].note.as_deref(), Some("initial delivery"));
    }

    #[test]
    fn test_counter_matches_ledger_after_each_move() {
        let svc = test_service();
        let pid = seed_product(&svc, "B1");

        let steps = [
            (10, MoveType::In),
            (4, MoveType::Out),
            (2, MoveType::In),
            (8, MoveType::Out),
        ];
        for (qty, move_type) in steps {
            svc.apply_move(mv(pid, qty, move_type)).unwrap();
            let stored = svc.get_product(pid).unwrap().stock;
            assert_eq!(stored, svc.ledger_stock(pid).unwrap());
        }
        assert_eq!(svc.get_product(pid).unwrap().stock, 0);
    }

    #[test]
    fn test_delete_product_cascades_moves() {
        let svc = test_service();
        let pid = seed_product(&svc, "B1");
        svc.apply_move(mv(pid, 5, MoveType::In)).unwrap();

        svc.delete_product(pid).unwrap();
        assert!(svc.list_moves().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_moves_lose_no_updates() {
        let svc = test_service();
        let pid = seed_product(&svc, "B1");

        let mut handles = Vec::new();
        for _ in 0..10 {
            let svc = svc.clone();
            handles.push(std::thread::spawn(move || {
                svc.apply_move(MoveInput {
                    product_id: pid,
                    quantity: 1,
                    move_type: MoveType::In,
                    note: None,
                })
                .unwrap();
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let product = svc.get_product(pid).unwrap();
        assert_eq!(product.stock, 10);
        assert_eq!(svc.ledger_stock(pid).unwrap(), 10);
        assert_eq!(svc.list_moves().unwrap().len(), 10);
    }
}
