use enum_iterator::IntoEnumIterator;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Equipment categories; a pet holds at most one item per slot
#[derive(
    Copy,
    Clone,
    Debug,
    Deserialize,
    Eq,
    Hash,
    IntoEnumIterator,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Weapon,
    Cosmetic,
}

pub const SLOT_COUNT: usize = 2;

impl Slot {
    pub fn emoji(&self) -> char {
        match self {
            Self::Weapon => '🗡',
            Self::Cosmetic => '🎀',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Cosmetic => "cosmetic",
        }
    }

    /// Position of this slot in a [`Loadout`](crate::pet::Loadout)
    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Weapon => 0,
            Self::Cosmetic => 1,
        }
    }

    pub fn all() -> impl Iterator<Item = Slot> {
        Self::into_enum_iter()
    }
}

impl std::str::FromStr for Slot {
    type Err = EngineError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::all()
            .find(|slot| slot.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| EngineError::InvalidArgument(format!("unknown slot '{}'", s)))
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
