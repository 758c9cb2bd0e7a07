use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{EngineError, EngineResult},
    item::{ItemId, OwnedItem},
    params::{
        ATTACK_PER_LEVEL, HP_GROWTH_DEN, HP_GROWTH_NUM, LEVEL_UP_GOLD_PER_LEVEL, MAX_START_LEVEL,
        MIN_XP_THRESHOLD, XP_GROWTH_DEN, XP_GROWTH_NUM,
    },
    slot::{Slot, SLOT_COUNT},
};

/// Engine-assigned pet identifier; never reused within a session
#[derive(Copy, Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PetId(pub u64);

impl std::fmt::Display for PetId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Starting stats for a new pet, as found in the catalog and config
#[derive(Copy, Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Stats {
    pub level: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub xp_to_next_level: u64,
}

impl Stats {
    pub fn validate(&self) -> EngineResult<()> {
        if self.level == 0 || self.level > MAX_START_LEVEL {
            return Err(EngineError::InvalidArgument(format!(
                "level must be between 1 and {}",
                MAX_START_LEVEL
            )));
        }
        // A threshold of 1 never grows, so every xp point would be a level
        if self.xp_to_next_level < MIN_XP_THRESHOLD {
            return Err(EngineError::InvalidArgument(format!(
                "xp_to_next_level must be at least {}",
                MIN_XP_THRESHOLD
            )));
        }
        Ok(())
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            level: 1,
            max_hp: 20,
            attack: 5,
            xp_to_next_level: 100,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// One item id (or nothing) per equipment slot
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Loadout([Option<ItemId>; SLOT_COUNT]);

impl Loadout {
    pub fn iter(&self) -> impl Iterator<Item = (Slot, Option<&ItemId>)> + '_ {
        Slot::all().map(move |s| (s, self[s].as_ref()))
    }
}

impl std::ops::Index<Slot> for Loadout {
    type Output = Option<ItemId>;
    fn index(&self, index: Slot) -> &Self::Output {
        &self.0[index.index()]
    }
}

impl std::ops::IndexMut<Slot> for Loadout {
    fn index_mut(&mut self, index: Slot) -> &mut Self::Output {
        &mut self.0[index.index()]
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Record of a single level gained, in the order it happened
#[derive(Copy, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LevelUp {
    pub level: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub xp_to_next_level: u64,
    /// Gold found on reaching this level
    pub gold: u64,
}

/// A creature on the player's roster.  Fields are read through accessors;
/// all changes go through the [`Engine`](crate::Engine).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Pet {
    id: PetId,
    name: String,
    level: u32,
    hp: u32,
    max_hp: u32,
    attack: u32,
    xp: u64,
    xp_to_next_level: u64,
    inventory: Vec<OwnedItem>,
    equipped: Loadout,
    template: Option<String>,
}

impl Pet {
    pub(crate) fn new(id: PetId, name: String, stats: Stats, template: Option<String>) -> Self {
        Self {
            id,
            name,
            level: stats.level,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            attack: stats.attack,
            xp: 0,
            xp_to_next_level: stats.xp_to_next_level,
            inventory: vec![],
            equipped: Loadout::default(),
            template,
        }
    }

    pub fn id(&self) -> PetId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn level(&self) -> u32 {
        self.level
    }
    pub fn hp(&self) -> u32 {
        self.hp
    }
    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }
    pub fn attack(&self) -> u32 {
        self.attack
    }
    pub fn xp(&self) -> u64 {
        self.xp
    }
    pub fn xp_to_next_level(&self) -> u64 {
        self.xp_to_next_level
    }
    pub fn inventory(&self) -> &[OwnedItem] {
        &self.inventory
    }
    pub fn equipped(&self) -> &Loadout {
        &self.equipped
    }
    /// The catalog template this pet was adopted from, if any
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }
    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    pub fn owned(&self, id: &ItemId) -> Option<&OwnedItem> {
        self.inventory.iter().find(|i| i.id() == id)
    }

    pub fn owns(&self, id: &ItemId) -> bool {
        self.owned(id).is_some()
    }

    /// Base attack plus the power of the equipped weapon.  A weapon slot that
    /// points at an item no longer in the inventory contributes nothing.
    pub fn effective_attack(&self) -> u32 {
        let bonus = self.equipped[Slot::Weapon]
            .as_ref()
            .and_then(|id| self.owned(id))
            .map(|i| i.def.power)
            .unwrap_or(0);
        self.attack.saturating_add(bonus)
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
    }

    /// Adds experience, resolving every level crossed in order.  The gold in
    /// each [`LevelUp`] is not credited here; that's the engine's job.
    ///
    /// Fails if the level would overflow, in which case the pet is left
    /// partway through; callers work on a copy.
    pub(crate) fn gain_experience(&mut self, amount: u64) -> EngineResult<Vec<LevelUp>> {
        let mut out = vec![];
        self.xp = self.xp.saturating_add(amount);
        while self.xp >= self.xp_to_next_level {
            self.xp -= self.xp_to_next_level;
            self.level = self.level.checked_add(1).ok_or_else(|| {
                EngineError::InvalidArgument(format!("{} is at the level cap", self.name))
            })?;
            self.xp_to_next_level = grow(self.xp_to_next_level, XP_GROWTH_NUM, XP_GROWTH_DEN);
            self.max_hp = grow(self.max_hp.into(), HP_GROWTH_NUM, HP_GROWTH_DEN)
                .try_into()
                .unwrap_or(u32::MAX);
            self.attack = self.attack.saturating_add(ATTACK_PER_LEVEL);
            let up = LevelUp {
                level: self.level,
                max_hp: self.max_hp,
                attack: self.attack,
                xp_to_next_level: self.xp_to_next_level,
                gold: LEVEL_UP_GOLD_PER_LEVEL * self.level as u64,
            };
            trace!(
                "    {} grew to level {} (❤️  {}, ⚔️  {}, next at {})",
                self.name,
                up.level,
                up.max_hp,
                up.attack,
                up.xp_to_next_level
            );
            out.push(up);
        }
        if !out.is_empty() {
            self.hp = self.max_hp;
        }
        Ok(out)
    }

    pub(crate) fn add_item(&mut self, item: OwnedItem) {
        debug_assert!(!self.owns(item.id()));
        self.inventory.push(item);
    }

    /// Removes an item, clearing any slot that referred to it
    pub(crate) fn remove_item(&mut self, id: &ItemId) -> Option<OwnedItem> {
        let i = self.inventory.iter().position(|i| i.id() == id)?;
        let item = self.inventory.remove(i);
        for s in Slot::all() {
            if self.equipped[s].as_ref() == Some(id) {
                trace!("    Clearing {} slot of {}", s, self.name);
                self.equipped[s] = None;
            }
        }
        Some(item)
    }

    /// Equips an owned item into its slot, returning whatever it displaced
    pub(crate) fn equip(&mut self, id: &ItemId) -> EngineResult<Option<ItemId>> {
        let slot = self
            .owned(id)
            .map(|i| i.def.slot)
            .ok_or_else(|| EngineError::ItemNotFound(id.clone()))?;
        Ok(self.equipped[slot].replace(id.clone()))
    }

    pub(crate) fn unequip(&mut self, slot: Slot) -> Option<ItemId> {
        self.equipped[slot].take()
    }

    /// Heals by up to `amount`, returning the hp actually restored
    pub(crate) fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }

    pub(crate) fn heal_fully(&mut self) {
        self.hp = self.max_hp;
    }

    /// Takes damage, floored at zero hp; returns the damage actually taken
    pub(crate) fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_sub(amount);
        before - self.hp
    }
}

/// Scales `v` by `num / den`, rounding down and clamping at `u64::MAX`
fn grow(v: u64, num: u64, den: u64) -> u64 {
    (u128::from(v) * u128::from(num) / u128::from(den))
        .try_into()
        .unwrap_or(u64::MAX)
}

impl std::fmt::Display for Pet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} {} Lv{} │❤️  {}/{}│⚔️  {}",
            self.id,
            self.name,
            self.level,
            self.hp,
            self.max_hp,
            self.attack
        )?;
        let bonus = self.effective_attack() - self.attack;
        if bonus > 0 {
            write!(f, "+{}", bonus)?;
        }
        write!(f, "│ xp {}/{}", self.xp, self.xp_to_next_level)?;
        for (slot, id) in self.equipped.iter() {
            if let Some(id) = id {
                write!(f, " {}{}", slot.emoji(), id)?;
            }
        }
        Ok(())
    }
}
