use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::Catalog,
    config::Config,
    dice::Dice,
    economy::Economy,
    errors::{non_negative, EngineError, EngineResult},
    item::{ItemId, OwnedItem},
    params::{FEED_COST, FEED_HEAL, NEW_DAY_GOLD, NEW_DAY_HP_LOSS, SELL_DIVISOR},
    pet::{LevelUp, Pet, PetId, Stats},
    rewards::{grade_quiz, receipt_gold, savings_gold, QuizResult},
    roster::Roster,
    slot::Slot,
};

/// What a grant of experience did to a pet
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ExperienceGain {
    /// Every level gained, in order
    pub level_ups: Vec<LevelUp>,
    /// Total gold credited, including any level-up gold
    pub gold: u64,
}

impl ExperienceGain {
    pub fn leveled_up(&self) -> bool {
        !self.level_ups.is_empty()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NewDay {
    pub pet: PetId,
    pub gold: u64,
    pub hp_lost: u32,
}

/// A copy of the whole session, for display or for a collaborator to save
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    pub roster: Roster,
    pub economy: Economy,
}

/// Owns the roster, the gold purse and the catalog for one play session.
///
/// Every operation either succeeds completely or returns an error without
/// touching any state.
#[derive(Clone, Debug)]
pub struct Engine {
    roster: Roster,
    economy: Economy,
    catalog: Catalog,
    starter: Stats,

    /// Bumped on every purchase and stamped onto the item
    acquisitions: u64,
}

impl Engine {
    pub fn new(config: &Config) -> EngineResult<Self> {
        config.validate()?;
        let mut roster = Roster::new();
        for p in &config.roster {
            roster.add(p.name.clone(), p.stats, None);
        }
        let out = Self {
            roster,
            economy: Economy::new(config.starting_gold),
            catalog: config.catalog()?,
            starter: config.starter,
            acquisitions: 0,
        };
        info!(
            "Starting session with {} pets and {}",
            out.roster.len(),
            out.economy
        );
        Ok(out)
    }

    ////////////////////////////////////////////////////////////////////////////
    // Queries

    pub fn pet(&self, id: PetId) -> EngineResult<&Pet> {
        self.roster.get(id)
    }

    pub fn pets(&self) -> impl Iterator<Item = &Pet> {
        self.roster.iter()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn selected(&self) -> Option<&Pet> {
        self.roster.selected().and_then(|id| self.roster.get(id).ok())
    }

    pub fn currency(&self) -> u64 {
        self.economy.currency()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn effective_attack(&self, id: PetId) -> EngineResult<u32> {
        Ok(self.roster.get(id)?.effective_attack())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            roster: self.roster.clone(),
            economy: self.economy,
        }
    }

    ////////////////////////////////////////////////////////////////////////////
    // Roster

    /// Adds a free starter pet
    pub fn add_pet(&mut self, name: &str) -> EngineResult<PetId> {
        let name = valid_name(name)?;
        let id = self.roster.add(name, self.starter, None);
        debug!("Added starter pet {}", id);
        Ok(id)
    }

    /// Buys a pet from the catalog.  Each template can only be adopted once.
    pub fn adopt_pet(&mut self, template: &str) -> EngineResult<PetId> {
        let t = self
            .catalog
            .template(template)
            .ok_or_else(|| EngineError::TemplateNotFound(template.to_owned()))?;
        if self.roster.has_template(&t.id) {
            return Err(EngineError::AlreadyOwned(t.name.clone()));
        }
        self.economy.debit(t.price)?;
        let id = self.roster.add(t.name.clone(), t.stats, Some(t.id.clone()));
        debug!("Adopted {} as {} for {}", t.name, id, t.price);
        Ok(id)
    }

    pub fn rename_pet(&mut self, id: PetId, name: &str) -> EngineResult<()> {
        let name = valid_name(name)?;
        self.roster.get_mut(id)?.rename(name);
        Ok(())
    }

    pub fn select(&mut self, id: PetId) -> EngineResult<()> {
        self.roster.select(id)
    }

    pub fn select_next(&mut self) -> Option<PetId> {
        self.roster.select_next()
    }

    pub fn select_previous(&mut self) -> Option<PetId> {
        self.roster.select_previous()
    }

    fn selected_id(&self) -> EngineResult<PetId> {
        self.roster.selected().ok_or(EngineError::NoSelection)
    }

    ////////////////////////////////////////////////////////////////////////////
    // Experience and gold

    /// Adds experience to a pet, resolving every level-up it triggers and
    /// crediting the level-up gold.
    pub fn grant_experience(&mut self, id: PetId, amount: i64) -> EngineResult<ExperienceGain> {
        self.roster.get(id)?;
        let amount = non_negative(amount, "experience")?;
        self.award(id, amount, 0)
    }

    /// Applies experience and bonus gold together, or not at all
    pub(crate) fn award(&mut self, id: PetId, xp: u64, gold: u64) -> EngineResult<ExperienceGain> {
        let mut pet = self.roster.get(id)?.clone();
        let level_ups = if xp > 0 {
            pet.gain_experience(xp)?
        } else {
            vec![]
        };
        let total = level_ups
            .iter()
            .try_fold(gold, |acc, u| acc.checked_add(u.gold))
            .ok_or_else(|| EngineError::InvalidArgument("gold reward overflows".into()))?;
        self.economy.check_credit(total)?;

        trace!("{} gains {} xp and {} gold", pet.name(), xp, gold);
        for u in &level_ups {
            info!("{} grew to level {}!", pet.name(), u.level);
        }
        self.roster.replace(pet)?;
        self.economy.credit(total)?;
        Ok(ExperienceGain {
            level_ups,
            gold: total,
        })
    }

    pub fn credit_currency(&mut self, amount: i64) -> EngineResult<u64> {
        self.economy.credit_currency(amount)
    }

    pub fn debit_currency(&mut self, amount: i64) -> EngineResult<u64> {
        self.economy.debit_currency(amount)
    }

    ////////////////////////////////////////////////////////////////////////////
    // Inventory and equipment

    /// Buys a catalog item for a pet
    pub fn purchase_item(&mut self, id: PetId, item: &ItemId) -> EngineResult<&OwnedItem> {
        let pet = self.roster.get(id)?;
        let def = self
            .catalog
            .item(item)
            .ok_or_else(|| EngineError::ItemNotFound(item.clone()))?;
        if pet.owns(item) {
            return Err(EngineError::AlreadyOwned(def.name.clone()));
        }
        let def = def.clone();

        self.economy.debit(def.price)?;
        self.acquisitions += 1;
        debug!("{} bought {} for {}", pet.name(), def.name, def.price);
        let pet = self.roster.get_mut(id)?;
        pet.add_item(OwnedItem {
            def,
            acquired_at: self.acquisitions,
        });
        pet.owned(item).ok_or_else(|| EngineError::ItemNotFound(item.clone()))
    }

    /// Drops an item from a pet's inventory, unequipping it if needed
    pub fn remove_item(&mut self, id: PetId, item: &ItemId) -> EngineResult<OwnedItem> {
        let pet = self.roster.get_mut(id)?;
        let removed = pet
            .remove_item(item)
            .ok_or_else(|| EngineError::ItemNotFound(item.clone()))?;
        debug!("{} dropped {}", pet.name(), removed.def.name);
        Ok(removed)
    }

    /// Removes an item and refunds part of its price
    pub fn sell_item(&mut self, id: PetId, item: &ItemId) -> EngineResult<u64> {
        let price = self
            .roster
            .get(id)?
            .owned(item)
            .map(|i| i.def.price)
            .ok_or_else(|| EngineError::ItemNotFound(item.clone()))?;
        let refund = price / SELL_DIVISOR;
        self.economy.check_credit(refund)?;

        self.remove_item(id, item)?;
        self.economy.credit(refund)?;
        debug!("Sold {} for {}", item, refund);
        Ok(refund)
    }

    /// Equips an owned item, returning the item it displaced (which stays in
    /// the inventory)
    pub fn equip_item(&mut self, id: PetId, item: &ItemId) -> EngineResult<Option<ItemId>> {
        let pet = self.roster.get_mut(id)?;
        let prev = pet.equip(item)?;
        debug!("{} equipped {}", pet.name(), item);
        Ok(prev)
    }

    pub fn unequip_slot(&mut self, id: PetId, slot: Slot) -> EngineResult<Option<ItemId>> {
        let pet = self.roster.get_mut(id)?;
        let prev = pet.unequip(slot);
        if let Some(i) = &prev {
            debug!("{} unequipped {} from {}", pet.name(), i, slot);
        }
        Ok(prev)
    }

    /// As [`Engine::unequip_slot`], with the slot given by name
    pub fn unequip_slot_named(&mut self, id: PetId, slot: &str) -> EngineResult<Option<ItemId>> {
        let slot = slot.parse()?;
        self.unequip_slot(id, slot)
    }

    ////////////////////////////////////////////////////////////////////////////
    // Care

    /// Spends gold to restore a little hp
    pub fn feed(&mut self, id: PetId) -> EngineResult<u32> {
        let pet = self.roster.get(id)?;
        if pet.hp() >= pet.max_hp() {
            return Err(EngineError::FullHealth(pet.name().to_owned()));
        }
        self.economy.debit(FEED_COST)?;
        let healed = self.roster.get_mut(id)?.heal(FEED_HEAL);
        trace!("Fed {} for ❤️  +{}", id, healed);
        Ok(healed)
    }

    /// Finds some gold, but the selected pet gets a little worn out
    pub fn new_day<D: Dice>(&mut self, dice: &mut D) -> EngineResult<NewDay> {
        let id = self.selected_id()?;
        let gold = dice.roll(NEW_DAY_GOLD);
        let loss = dice.roll(NEW_DAY_HP_LOSS) as u32;
        self.economy.check_credit(gold)?;

        let hp_lost = self.roster.get_mut(id)?.take_damage(loss);
        self.economy.credit(gold)?;
        debug!("New day: found {} gold, {} lost {} hp", gold, id, hp_lost);
        Ok(NewDay { pet: id, gold, hp_lost })
    }

    pub(crate) fn damage(&mut self, id: PetId, amount: u32) -> EngineResult<&Pet> {
        let pet = self.roster.get_mut(id)?;
        pet.take_damage(amount);
        Ok(pet)
    }

    pub(crate) fn heal_fully(&mut self, id: PetId) -> EngineResult<()> {
        self.roster.get_mut(id)?.heal_fully();
        Ok(())
    }

    ////////////////////////////////////////////////////////////////////////////
    // Mini-game payouts

    pub fn reward_receipt(&mut self, total: f64) -> EngineResult<u64> {
        let gold = receipt_gold(total)?;
        self.economy.credit(gold)?;
        debug!("Receipt for {:.2} earned {} gold", total, gold);
        Ok(gold)
    }

    pub fn deposit_savings(&mut self, amount: f64) -> EngineResult<u64> {
        let gold = savings_gold(amount)?;
        self.economy.credit(gold)?;
        debug!("Saving {:.2} earned {} gold", amount, gold);
        Ok(gold)
    }

    pub fn complete_lesson(&mut self, correct: u32, total: u32) -> EngineResult<QuizResult> {
        let result = grade_quiz(correct, total)?;
        self.economy.credit(result.gold)?;
        debug!(
            "Quiz scored {:.0}% ({} gold)",
            result.score, result.gold
        );
        Ok(result)
    }
}

fn valid_name(name: &str) -> EngineResult<String> {
    let name = name.trim();
    if name.is_empty() {
        Err(EngineError::InvalidArgument("pet name must not be empty".into()))
    } else {
        Ok(name.to_owned())
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "{}", self.economy)?;
        write!(f, "{}", self.roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::DeterministicDice;

    fn engine(gold: u64) -> (Engine, PetId) {
        let mut e = Engine::new(&Config {
            starting_gold: gold,
            ..Config::empty()
        })
        .unwrap();
        let id = e.add_pet("Moon").unwrap();
        (e, id)
    }

    #[test]
    fn test_grant_zero_and_negative() {
        let (mut e, id) = engine(0);
        assert_eq!(e.grant_experience(id, 0), Ok(ExperienceGain::default()));
        assert!(matches!(
            e.grant_experience(id, -5),
            Err(EngineError::InvalidArgument(..))
        ));
        assert_eq!(
            e.grant_experience(PetId(42), 10),
            Err(EngineError::PetNotFound(PetId(42)))
        );
        assert_eq!(e.pet(id).unwrap().xp(), 0);
    }

    #[test]
    fn test_level_up_gold_is_credited() {
        let (mut e, id) = engine(0);
        let gain = e.grant_experience(id, 100).unwrap();
        assert!(gain.leveled_up());
        assert_eq!(gain.gold, 100);
        assert_eq!(e.currency(), 100);
    }

    #[test]
    fn test_purchase_is_atomic() {
        let (mut e, id) = engine(20);
        let sword = ItemId::from("wooden_sword");
        assert!(matches!(
            e.purchase_item(id, &sword),
            Err(EngineError::InsufficientFunds { .. })
        ));
        assert!(e.pet(id).unwrap().inventory().is_empty());
        assert_eq!(e.currency(), 20);

        e.credit_currency(100).unwrap();
        let owned = e.purchase_item(id, &sword).unwrap();
        assert_eq!(owned.acquired_at, 1);
        assert_eq!(e.currency(), 90);
        assert_eq!(
            e.purchase_item(id, &sword).unwrap_err(),
            EngineError::AlreadyOwned("Wooden Sword".into())
        );
        assert_eq!(e.currency(), 90);
    }

    #[test]
    fn test_unknown_item() {
        let (mut e, id) = engine(1000);
        let laser = ItemId::from("laser");
        assert_eq!(
            e.purchase_item(id, &laser).unwrap_err(),
            EngineError::ItemNotFound(laser.clone())
        );
        assert!(e.remove_item(id, &laser).unwrap_err().is_not_found());
        assert!(e.equip_item(id, &laser).unwrap_err().is_not_found());
    }

    #[test]
    fn test_sell_refunds_half_and_unequips() {
        let (mut e, id) = engine(80);
        let sword = ItemId::from("iron_sword");
        e.purchase_item(id, &sword).unwrap();
        e.equip_item(id, &sword).unwrap();
        assert_eq!(e.effective_attack(id), Ok(10));
        assert_eq!(e.sell_item(id, &sword), Ok(40));
        assert_eq!(e.currency(), 40);
        assert_eq!(e.effective_attack(id), Ok(5));
        assert_eq!(e.pet(id).unwrap().equipped()[Slot::Weapon], None);
    }

    #[test]
    fn test_unequip_by_name() {
        let (mut e, id) = engine(100);
        let hat = ItemId::from("party_hat");
        e.purchase_item(id, &hat).unwrap();
        assert_eq!(e.equip_item(id, &hat), Ok(None));
        assert_eq!(e.unequip_slot_named(id, "cosmetic"), Ok(Some(hat)));
        assert_eq!(e.unequip_slot_named(id, "cosmetic"), Ok(None));
        assert!(matches!(
            e.unequip_slot_named(id, "hat"),
            Err(EngineError::InvalidArgument(..))
        ));
    }

    #[test]
    fn test_feed() {
        let (mut e, id) = engine(6);
        assert_eq!(
            e.feed(id),
            Err(EngineError::FullHealth("Moon".into()))
        );
        e.damage(id, 1).unwrap();
        assert_eq!(e.feed(id), Ok(1));
        assert_eq!(e.currency(), 1);
        e.damage(id, 5).unwrap();
        assert!(matches!(
            e.feed(id),
            Err(EngineError::InsufficientFunds { .. })
        ));
        assert_eq!(e.pet(id).unwrap().hp(), 15);
    }

    #[test]
    fn test_adopt() {
        let (mut e, _) = engine(250);
        let id = e.adopt_pet("sparky").unwrap();
        assert_eq!(e.pet(id).unwrap().attack(), 4);
        assert_eq!(e.currency(), 150);
        assert_eq!(
            e.adopt_pet("sparky"),
            Err(EngineError::AlreadyOwned("Sparky".into()))
        );
        assert!(matches!(
            e.adopt_pet("sunny"),
            Err(EngineError::InsufficientFunds { .. })
        ));
        assert_eq!(e.roster().len(), 2);
        assert_eq!(
            e.adopt_pet("dragon"),
            Err(EngineError::TemplateNotFound("dragon".into()))
        );
    }

    #[test]
    fn test_new_day_rolls() {
        let mut dice = DeterministicDice::new();
        let mut count = 0;
        while dice.next() {
            let (mut e, id) = engine(0);
            let day = e.new_day(&mut dice).unwrap();
            assert!((50..=250).contains(&day.gold));
            assert!((1..=5).contains(&day.hp_lost));
            assert_eq!(e.currency(), day.gold);
            assert_eq!(e.pet(id).unwrap().hp(), 20 - day.hp_lost);
            count += 1;
        }
        assert_eq!(count, 201 * 5);
    }

    #[test]
    fn test_new_day_needs_a_pet() {
        let mut e = Engine::new(&Config::empty()).unwrap();
        let mut dice = DeterministicDice::new();
        dice.next();
        assert_eq!(e.new_day(&mut dice), Err(EngineError::NoSelection));
        assert_eq!(e.currency(), 0);
    }

    #[test]
    fn test_names() {
        let (mut e, id) = engine(0);
        assert!(e.add_pet("   ").is_err());
        e.rename_pet(id, " Luna ").unwrap();
        assert_eq!(e.pet(id).unwrap().name(), "Luna");
        assert!(e.rename_pet(id, "").is_err());
    }

    #[test]
    fn test_credit_overflow_leaves_state_alone() {
        let (mut e, id) = engine(u64::MAX);
        let sword = ItemId::from("wooden_sword");
        e.purchase_item(id, &sword).unwrap();
        e.equip_item(id, &sword).unwrap();
        e.credit_currency(30).unwrap();
        e.damage(id, 3).unwrap();
        let before = e.snapshot();

        assert!(matches!(
            e.sell_item(id, &sword),
            Err(EngineError::InvalidArgument(..))
        ));
        let mut dice = DeterministicDice::new();
        dice.next();
        assert!(matches!(
            e.new_day(&mut dice),
            Err(EngineError::InvalidArgument(..))
        ));
        assert!(matches!(
            e.grant_experience(id, 100),
            Err(EngineError::InvalidArgument(..))
        ));

        assert_eq!(e.snapshot(), before);
        let p = e.pet(id).unwrap();
        assert!(p.owns(&sword));
        assert_eq!(p.hp(), 17);
        assert_eq!(p.level(), 1);
        assert_eq!(e.effective_attack(id), Ok(7));
    }
}
