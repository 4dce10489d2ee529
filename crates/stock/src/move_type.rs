//! Accounting view of a move: which way goods flow and who is on the other side.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockwork_core::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Goods enter the company's stock.
    Incoming,
    /// Goods leave the company's stock.
    Outgoing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counterpart {
    Supplier,
    Customer,
    Production,
    LostFound,
}

/// Typed form of the `in_supplier` / `out_customer` / ... move type strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveType {
    pub direction: Direction,
    pub counterpart: Counterpart,
}

impl MoveType {
    pub const IN_SUPPLIER: MoveType = MoveType::new(Direction::Incoming, Counterpart::Supplier);
    pub const OUT_SUPPLIER: MoveType = MoveType::new(Direction::Outgoing, Counterpart::Supplier);
    pub const IN_CUSTOMER: MoveType = MoveType::new(Direction::Incoming, Counterpart::Customer);
    pub const OUT_CUSTOMER: MoveType = MoveType::new(Direction::Outgoing, Counterpart::Customer);

    pub const fn new(direction: Direction, counterpart: Counterpart) -> Self {
        Self {
            direction,
            counterpart,
        }
    }

    pub fn is_incoming(&self) -> bool {
        self.direction == Direction::Incoming
    }

    pub fn is_supplier(&self) -> bool {
        self.counterpart == Counterpart::Supplier
    }
}

impl core::fmt::Display for MoveType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let direction = match self.direction {
            Direction::Incoming => "in",
            Direction::Outgoing => "out",
        };
        let counterpart = match self.counterpart {
            Counterpart::Supplier => "supplier",
            Counterpart::Customer => "customer",
            Counterpart::Production => "production",
            Counterpart::LostFound => "lost_found",
        };
        write!(f, "{direction}_{counterpart}")
    }
}

impl FromStr for MoveType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (direction, rest) = if let Some(rest) = s.strip_prefix("in_") {
            (Direction::Incoming, rest)
        } else if let Some(rest) = s.strip_prefix("out_") {
            (Direction::Outgoing, rest)
        } else {
            return Err(DomainError::validation(format!("wrong move type: {s}")));
        };
        let counterpart = match rest {
            "supplier" => Counterpart::Supplier,
            "customer" => Counterpart::Customer,
            "production" => Counterpart::Production,
            "lost_found" => Counterpart::LostFound,
            _ => return Err(DomainError::validation(format!("wrong move type: {s}"))),
        };
        Ok(Self::new(direction, counterpart))
    }
}
