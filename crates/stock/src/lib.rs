//! Stock module: moves, anglo-saxon cost consumption and the accounting lines
//! of supplier moves on fixed-cost products.
//!
//! Pure domain logic; persistence is reached through [`MoveRepository`].

pub mod account_lines;
pub mod anglo_saxon;
pub mod location;
pub mod move_type;
pub mod repository;
pub mod stock_move;

pub use account_lines::account_stock_move_lines;
pub use anglo_saxon::{
    AngloSaxonCost, ConsumableMoves, Consumption, Shortfall, consumable_moves,
    update_anglo_saxon_quantity_product_cost,
};
pub use location::{Location, LocationKind};
pub use move_type::{Counterpart, Direction, MoveType};
pub use repository::MoveRepository;
pub use stock_move::{ANGLO_SAXON_QUANTITY_VIOLATION, Move, MoveOrigin, MoveState};
