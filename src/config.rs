use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::Catalog,
    errors::{EngineError, EngineResult},
    pet::Stats,
};

/// A pet present when the session starts
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PetSpec {
    pub name: String,
    pub stats: Stats,
}

/// Everything needed to start a session.  All fields are optional in the RON
/// form; missing ones fall back to [`Config::default`].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    pub starting_gold: u64,
    /// Stats given to pets created with [`Engine::add_pet`](crate::Engine::add_pet)
    pub starter: Stats,
    pub roster: Vec<PetSpec>,
    /// `None` uses the built-in catalog
    pub catalog: Option<Catalog>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            starting_gold: 150,
            starter: Stats::default(),
            roster: vec![
                PetSpec {
                    name: "Moon".to_owned(),
                    stats: Stats {
                        level: 3,
                        max_hp: 35,
                        attack: 7,
                        xp_to_next_level: 300,
                    },
                },
                PetSpec {
                    name: "Aqua".to_owned(),
                    stats: Stats::default(),
                },
            ],
            catalog: None,
        }
    }
}

impl Config {
    /// A config with no pets and no gold, using the built-in catalog
    pub fn empty() -> Self {
        Self {
            starting_gold: 0,
            roster: vec![],
            ..Self::default()
        }
    }

    pub fn from_ron(s: &str) -> EngineResult<Self> {
        let config: Config = ron::from_str(s).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> EngineResult<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_ron(&s)?;
        info!("Loaded config from '{}'", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        self.starter
            .validate()
            .map_err(|e| EngineError::Config(format!("starter: {}", e)))?;
        for p in &self.roster {
            p.stats
                .validate()
                .map_err(|e| EngineError::Config(format!("pet '{}': {}", p.name, e)))?;
        }
        if let Some(c) = &self.catalog {
            c.validate()?;
        }
        Ok(())
    }

    /// Resolves the catalog, falling back to the built-in one
    pub fn catalog(&self) -> EngineResult<Catalog> {
        match &self.catalog {
            Some(c) => Ok(c.clone()),
            None => Catalog::builtin(),
        }
    }
}
