use serde::{Deserialize, Serialize};

use crate::slot::Slot;

/// Catalog identifier for an item, e.g. `"wooden_sword"`
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only catalog entry
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    pub price: u64,
    pub slot: Slot,
    /// Attack bonus while equipped (only meaningful for weapons)
    #[serde(default)]
    pub power: u32,
}

/// A catalog entry that a pet has bought.  `acquired_at` is the engine's
/// acquisition counter at the time of purchase, so later purchases always
/// carry larger values.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct OwnedItem {
    pub def: ItemDef,
    pub acquired_at: u64,
}

impl OwnedItem {
    pub fn id(&self) -> &ItemId {
        &self.def.id
    }
}

impl std::fmt::Display for ItemDef {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.slot.emoji(), self.name)?;
        if self.power > 0 {
            write!(f, " (+{} ATK)", self.power)?;
        }
        Ok(())
    }
}
