//! Random play-throughs, used by the binary and by tests to shake out
//! invariant violations.

use log::trace;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::{
    battle::{AttackOutcome, Battle},
    config::Config,
    dice::Dice,
    engine::Engine,
    errors::EngineResult,
    item::ItemId,
    slot::Slot,
};

/// An engine plus the state a player would carry between screens
pub struct Session<D> {
    pub engine: Engine,
    pub battle: Battle,
    dice: D,
}

impl<D: Dice> Session<D> {
    pub fn new(engine: Engine, dice: D) -> Self {
        Self {
            engine,
            battle: Battle::default(),
            dice,
        }
    }

    fn random_item(&mut self) -> Option<ItemId> {
        let items = &self.engine.catalog().items;
        if items.is_empty() {
            return None;
        }
        let i = self.dice.roll(0..items.len() as u64) as usize;
        Some(items[i].id.clone())
    }

    fn random_template(&mut self) -> Option<String> {
        let pets = &self.engine.catalog().pets;
        if pets.is_empty() {
            return None;
        }
        let i = self.dice.roll(0..pets.len() as u64) as usize;
        Some(pets[i].id.clone())
    }

    /// Performs one random player action.  Rejected actions are normal (the
    /// player can't always afford things) and are returned as errors.
    pub fn step(&mut self) -> EngineResult<()> {
        let pet = match self.engine.selected() {
            Some(p) => p.id(),
            None => {
                self.engine.add_pet("Stray")?;
                return Ok(());
            }
        };
        match self.dice.roll(0..12) {
            0 | 1 | 2 => {
                if self.battle.is_won() {
                    self.battle.next_enemy();
                }
                let out = self
                    .battle
                    .player_attack(&mut self.engine, pet, &mut self.dice)?;
                if let AttackOutcome::Won(v) = out {
                    trace!("Won {} gold and {} xp", v.gold, v.xp);
                }
            }
            3 => {
                let s = self.battle.enemy_strike(&mut self.engine, pet)?;
                if s.fainted {
                    self.battle.reset(&mut self.engine, pet)?;
                }
            }
            4 => {
                self.engine.feed(pet)?;
            }
            5 => {
                if let Some(item) = self.random_item() {
                    self.engine.purchase_item(pet, &item)?;
                }
            }
            6 => {
                if let Some(item) = self.random_item() {
                    self.engine.equip_item(pet, &item)?;
                }
            }
            7 => {
                if let Some(item) = self.random_item() {
                    if self.dice.roll(0..2) == 0 {
                        self.engine.remove_item(pet, &item)?;
                    } else {
                        self.engine.sell_item(pet, &item)?;
                    }
                }
            }
            8 => {
                let slot = if self.dice.roll(0..2) == 0 {
                    Slot::Weapon
                } else {
                    Slot::Cosmetic
                };
                self.engine.unequip_slot(pet, slot)?;
            }
            9 => {
                self.engine.new_day(&mut self.dice)?;
            }
            10 => {
                if let Some(t) = self.random_template() {
                    self.engine.adopt_pet(&t)?;
                }
            }
            11 => {
                match self.dice.roll(0..3) {
                    0 => {
                        let correct = self.dice.roll(0..6) as u32;
                        self.engine.complete_lesson(correct, 5)?;
                    }
                    1 => {
                        let cents = self.dice.roll(0..10_000);
                        self.engine.reward_receipt(cents as f64 / 100.0)?;
                    }
                    _ => {
                        self.engine.select_next();
                    }
                };
            }
            i => panic!("Invalid random choice {}", i),
        }
        Ok(())
    }
}

/// Checks the invariants that must hold between any two engine calls
pub fn check_invariants(engine: &Engine) -> Result<(), String> {
    let snapshot = engine.snapshot();
    let roster = &snapshot.roster;
    match roster.selected() {
        Some(id) if roster.get(id).is_err() => {
            return Err(format!("selection {} is not on the roster", id))
        }
        None if !roster.is_empty() => return Err("nothing selected".to_owned()),
        _ => (),
    }
    for p in roster.iter() {
        if p.level() == 0 {
            return Err(format!("{} has level 0", p.id()));
        }
        if p.hp() > p.max_hp() {
            return Err(format!("{} has {} / {} hp", p.id(), p.hp(), p.max_hp()));
        }
        if p.xp() >= p.xp_to_next_level() {
            return Err(format!(
                "{} has {} xp past its {} threshold",
                p.id(),
                p.xp(),
                p.xp_to_next_level()
            ));
        }
        for (i, a) in p.inventory().iter().enumerate() {
            if p.inventory()[..i].iter().any(|b| b.id() == a.id()) {
                return Err(format!("{} owns {} twice", p.id(), a.id()));
            }
        }
        for (slot, id) in p.equipped().iter() {
            if let Some(id) = id {
                match p.owned(id) {
                    Some(i) if i.def.slot == slot => (),
                    _ => return Err(format!("{} has {} dangling in {}", p.id(), id, slot)),
                }
            }
        }
    }
    Ok(())
}

/// Plays `steps` random actions from the given seed, returning the final
/// engine or the first invariant violation
pub fn random_session(config: &Config, seed: u64, steps: usize) -> Result<Engine, String> {
    let engine = Engine::new(config).map_err(|e| e.to_string())?;
    let mut session = Session::new(engine, ChaChaRng::seed_from_u64(seed));
    for i in 0..steps {
        if let Err(e) = session.step() {
            trace!("Step {} rejected: {}", i, e);
        }
        check_invariants(&session.engine).map_err(|e| format!("step {}: {}", i, e))?;
    }
    Ok(session.engine)
}
