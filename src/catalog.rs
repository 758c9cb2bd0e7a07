use std::collections::HashSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{EngineError, EngineResult},
    item::{ItemDef, ItemId},
    pet::Stats,
};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.ron");

/// A pet that can be adopted from the shop
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PetTemplate {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub stats: Stats,
}

/// Static reference data handed to the engine at startup.  The engine never
/// modifies it.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Catalog {
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub pets: Vec<PetTemplate>,
}

impl Catalog {
    /// The catalog shipped in `data/catalog.ron`
    pub fn builtin() -> EngineResult<Self> {
        Self::from_ron(BUILTIN_CATALOG)
    }

    pub fn from_ron(s: &str) -> EngineResult<Self> {
        let catalog: Catalog =
            ron::from_str(s).map_err(|e| EngineError::Config(e.to_string()))?;
        catalog.validate()?;
        debug!(
            "Loaded catalog with {} items and {} pets",
            catalog.items.len(),
            catalog.pets.len()
        );
        Ok(catalog)
    }

    /// Checks that item and template ids are unique and that every template
    /// describes a usable pet.
    pub fn validate(&self) -> EngineResult<()> {
        let mut seen = HashSet::new();
        for i in &self.items {
            if !seen.insert(&i.id) {
                return Err(EngineError::Config(format!("duplicate item id '{}'", i.id)));
            }
        }
        let mut seen = HashSet::new();
        for p in &self.pets {
            if !seen.insert(&p.id) {
                return Err(EngineError::Config(format!("duplicate pet id '{}'", p.id)));
            }
            p.stats
                .validate()
                .map_err(|e| EngineError::Config(format!("pet '{}': {}", p.id, e)))?;
        }
        Ok(())
    }

    pub fn item(&self, id: &ItemId) -> Option<&ItemDef> {
        self.items.iter().find(|i| &i.id == id)
    }

    pub fn template(&self, id: &str) -> Option<&PetTemplate> {
        self.pets.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::Slot;

    #[test]
    fn test_builtin_catalog_parses() {
        let c = Catalog::builtin().unwrap();
        let sword = c.item(&ItemId::from("wooden_sword")).unwrap();
        assert_eq!(sword.slot, Slot::Weapon);
        assert_eq!(sword.power, 2);
        let hat = c.item(&ItemId::from("party_hat")).unwrap();
        assert_eq!(hat.power, 0);
        assert_eq!(c.template("rocky").unwrap().stats.attack, 7);
        assert!(c.item(&ItemId::from("laser")).is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let s = r#"(
            items: [
                (id: "a", name: "A", price: 1, slot: weapon, power: 1),
                (id: "a", name: "B", price: 2, slot: cosmetic),
            ],
        )"#;
        assert!(matches!(Catalog::from_ron(s), Err(EngineError::Config(..))));
    }

    #[test]
    fn test_bad_ron_rejected() {
        assert!(matches!(
            Catalog::from_ron("(items: [ nope ])"),
            Err(EngineError::Config(..))
        ));
    }
}
