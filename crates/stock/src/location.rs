use serde::{Deserialize, Serialize};

use stockwork_core::{Entity, LocationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Warehouse,
    Storage,
    Supplier,
    Customer,
    Production,
    LostFound,
}

/// A stock location. Warehouses point at the storage location goods are
/// picked from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub code: String,
    pub kind: LocationKind,
    pub storage: Option<LocationId>,
}

impl Location {
    pub fn new(name: impl Into<String>, code: impl Into<String>, kind: LocationKind) -> Self {
        Self {
            id: LocationId::new(),
            name: name.into(),
            code: code.into(),
            kind,
            storage: None,
        }
    }

    pub fn warehouse(name: impl Into<String>, code: impl Into<String>, storage: LocationId) -> Self {
        Self {
            storage: Some(storage),
            ..Self::new(name, code, LocationKind::Warehouse)
        }
    }

    pub fn is_customer(&self) -> bool {
        self.kind == LocationKind::Customer
    }
}

impl Entity for Location {
    type Id = LocationId;

    fn id(&self) -> LocationId {
        self.id
    }
}
