mod product;
mod stock_move;
mod supplier;

pub use product::{Product, ProductInput};
pub use stock_move::{MoveInput, MoveType, StockMove};
pub use supplier::{Supplier, SupplierInput};
