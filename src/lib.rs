//! Progression and economy rules for a casual pet-raising game.
//!
//! The [`Engine`] owns a roster of pets and a shared gold purse.  Pets gain
//! experience and level up, buy and equip items from a static [`Catalog`],
//! and win gold and experience in [`Battle`]s.  Callers drive everything
//! through engine methods and re-read state afterwards; nothing here does I/O
//! or keeps its own threads.

pub mod battle;
pub mod catalog;
pub mod config;
pub mod dice;
pub mod economy;
pub mod engine;
pub mod errors;
pub mod item;
pub mod params;
pub mod pet;
pub mod rewards;
pub mod roster;
pub mod sim;
pub mod slot;

pub use battle::{resolve_hit, AttackOutcome, Battle, Hit, Strike, Victory};
pub use catalog::{Catalog, PetTemplate};
pub use config::{Config, PetSpec};
pub use dice::{DeterministicDice, Dice};
pub use economy::Economy;
pub use engine::{Engine, ExperienceGain, NewDay, Snapshot};
pub use errors::{EngineError, EngineResult};
pub use item::{ItemDef, ItemId, OwnedItem};
pub use pet::{LevelUp, Loadout, Pet, PetId, Stats};
pub use rewards::QuizResult;
pub use roster::Roster;
pub use slot::Slot;
