use log::{debug, trace};

use crate::{
    dice::Dice,
    engine::{Engine, ExperienceGain},
    errors::{EngineError, EngineResult},
    params::{ENEMY_ATTACK, ENEMY_MAX_HP, VICTORY_GOLD, VICTORY_XP},
    pet::PetId,
};

/// Result of a single blow against the enemy
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Hit {
    Lethal,
    Wounded { remaining: u32 },
}

/// Decides whether `attack` finishes off an enemy with `enemy_hp` left
pub fn resolve_hit(attack: u32, enemy_hp: u32) -> Hit {
    if attack >= enemy_hp {
        Hit::Lethal
    } else {
        Hit::Wounded {
            remaining: enemy_hp - attack,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Victory {
    pub gold: u64,
    pub xp: u64,
    /// The experience grant, including any level-up gold on top of `gold`
    pub gain: ExperienceGain,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AttackOutcome {
    Hit { damage: u32, enemy_hp: u32 },
    Won(Victory),
}

/// What happened when the enemy struck back
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct Strike {
    pub damage: u32,
    pub hp: u32,
    /// The pet is out of hp.  It stays on the roster; what happens next is up
    /// to the caller.
    pub fainted: bool,
}

/// A training fight against a single enemy
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct Battle {
    enemy_hp: u32,
    enemy_max_hp: u32,
    enemy_attack: u32,
}

impl Default for Battle {
    fn default() -> Self {
        Self::new(ENEMY_MAX_HP, ENEMY_ATTACK)
    }
}

impl Battle {
    pub fn new(enemy_max_hp: u32, enemy_attack: u32) -> Self {
        Self {
            enemy_hp: enemy_max_hp,
            enemy_max_hp,
            enemy_attack,
        }
    }

    pub fn enemy_hp(&self) -> u32 {
        self.enemy_hp
    }

    pub fn is_won(&self) -> bool {
        self.enemy_hp == 0
    }

    /// Attacks the enemy with the pet's effective attack.  A lethal blow rolls
    /// the victory reward and pays it out; gold and xp land together or the
    /// win is not recorded at all.
    pub fn player_attack<D: Dice>(
        &mut self,
        engine: &mut Engine,
        pet: PetId,
        dice: &mut D,
    ) -> EngineResult<AttackOutcome> {
        let attack = engine.effective_attack(pet)?;
        if self.is_won() {
            return Err(EngineError::InvalidArgument(
                "the enemy is already defeated".into(),
            ));
        }
        match resolve_hit(attack, self.enemy_hp) {
            Hit::Wounded { remaining } => {
                trace!("{} hits for {}, enemy at {}", pet, attack, remaining);
                self.enemy_hp = remaining;
                Ok(AttackOutcome::Hit {
                    damage: attack,
                    enemy_hp: remaining,
                })
            }
            Hit::Lethal => {
                let gold = dice.roll(VICTORY_GOLD);
                let xp = dice.roll(VICTORY_XP);
                let gain = engine.award(pet, xp, gold)?;
                self.enemy_hp = 0;
                debug!("{} won! Gained {} gold and {} xp", pet, gold, xp);
                Ok(AttackOutcome::Won(Victory { gold, xp, gain }))
            }
        }
    }

    /// The enemy hits the pet, flooring its hp at zero
    pub fn enemy_strike(&self, engine: &mut Engine, pet: PetId) -> EngineResult<Strike> {
        let before = engine.pet(pet)?.hp();
        let p = engine.damage(pet, self.enemy_attack)?;
        let strike = Strike {
            damage: before - p.hp(),
            hp: p.hp(),
            fainted: p.is_fainted(),
        };
        trace!("Enemy strikes {} for {}", pet, strike.damage);
        if strike.fainted {
            debug!("{} fainted", pet);
        }
        Ok(strike)
    }

    /// Brings in a fresh enemy, leaving the pet as it is
    pub fn next_enemy(&mut self) {
        self.enemy_hp = self.enemy_max_hp;
    }

    /// Fully heals the pet and brings in a fresh enemy
    pub fn reset(&mut self, engine: &mut Engine, pet: PetId) -> EngineResult<()> {
        engine.heal_fully(pet)?;
        self.next_enemy();
        Ok(())
    }
}

impl std::fmt::Display for Battle {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "👾 │❤️  {}/{}│⚔️  {}",
            self.enemy_hp, self.enemy_max_hp, self.enemy_attack
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, dice::DeterministicDice, pet::Stats};

    fn engine() -> (Engine, PetId) {
        let mut e = Engine::new(&Config::empty()).unwrap();
        let id = e.add_pet("Aqua").unwrap();
        (e, id)
    }

    #[test]
    fn test_resolve_hit() {
        assert_eq!(resolve_hit(10, 8), Hit::Lethal);
        assert_eq!(resolve_hit(8, 8), Hit::Lethal);
        assert_eq!(resolve_hit(5, 8), Hit::Wounded { remaining: 3 });
        assert_eq!(resolve_hit(0, 8), Hit::Wounded { remaining: 8 });
    }

    #[test]
    fn test_every_reward_is_in_range() {
        let mut dice = DeterministicDice::new();
        let mut wins = 0;
        while dice.next() {
            let (mut e, id) = engine();
            let mut b = Battle::new(5, 3);
            match b.player_attack(&mut e, id, &mut dice).unwrap() {
                AttackOutcome::Won(v) => {
                    assert!((5..=14).contains(&v.gold));
                    assert!((10..=24).contains(&v.xp));
                    assert_eq!(e.currency(), v.gold);
                    assert_eq!(e.pet(id).unwrap().xp(), v.xp);
                }
                o => panic!("Expected a win, got {:?}", o),
            }
            assert!(b.is_won());
            wins += 1;
        }
        assert_eq!(wins, 10 * 15);
    }

    #[test]
    fn test_wounding_changes_nothing_else() {
        let (mut e, id) = engine();
        let mut b = Battle::default();
        let mut dice = DeterministicDice::new();
        dice.next();
        assert_eq!(
            b.player_attack(&mut e, id, &mut dice),
            Ok(AttackOutcome::Hit {
                damage: 5,
                enemy_hp: 25
            })
        );
        assert_eq!(e.currency(), 0);
        assert_eq!(e.pet(id).unwrap().xp(), 0);
        assert!(dice.key().is_empty());
    }

    #[test]
    fn test_defeated_enemy_pays_once() {
        let (mut e, id) = engine();
        let mut b = Battle::new(1, 3);
        let mut rng = rand::rngs::mock::StepRng::new(0, 1);
        assert!(matches!(
            b.player_attack(&mut e, id, &mut rng),
            Ok(AttackOutcome::Won(..))
        ));
        let gold = e.currency();
        assert!(b.player_attack(&mut e, id, &mut rng).is_err());
        assert_eq!(e.currency(), gold);
        b.next_enemy();
        assert_eq!(b.enemy_hp(), 1);
    }

    #[test]
    fn test_enemy_strike_floors_at_zero() {
        let (mut e, id) = engine();
        let mut b = Battle::new(30, 7);
        let s = b.enemy_strike(&mut e, id).unwrap();
        assert_eq!(s, Strike { damage: 7, hp: 13, fainted: false });
        b.enemy_strike(&mut e, id).unwrap();
        let s = b.enemy_strike(&mut e, id).unwrap();
        assert_eq!(s, Strike { damage: 6, hp: 0, fainted: true });
        assert_eq!(e.roster().len(), 1);

        b.reset(&mut e, id).unwrap();
        assert_eq!(e.pet(id).unwrap().hp(), 20);
    }

    #[test]
    fn test_unpayable_victory_is_not_recorded() {
        let mut e = Engine::new(&Config {
            starting_gold: u64::MAX,
            ..Config::empty()
        })
        .unwrap();
        let id = e.add_pet("Aqua").unwrap();
        let before = e.snapshot();

        let mut b = Battle::new(1, 3);
        let mut dice = DeterministicDice::new();
        dice.next();
        assert!(matches!(
            b.player_attack(&mut e, id, &mut dice),
            Err(EngineError::InvalidArgument(..))
        ));
        assert_eq!(e.snapshot(), before);
        assert_eq!(e.currency(), u64::MAX);
        assert_eq!(e.pet(id).unwrap().xp(), 0);
        assert_eq!(b.enemy_hp(), 1);
        assert!(!b.is_won());
    }

    #[test]
    fn test_unpayable_level_up_gold_keeps_level() {
        let mut e = Engine::new(&Config {
            starting_gold: u64::MAX - 50,
            roster: vec![crate::config::PetSpec {
                name: "Moon".to_owned(),
                stats: Stats {
                    xp_to_next_level: 10,
                    ..Stats::default()
                },
            }],
            ..Config::empty()
        })
        .unwrap();
        let id = e.selected().unwrap().id();

        // 5 gold fits, but the level-up's 100 does not
        let mut b = Battle::new(1, 3);
        let mut dice = DeterministicDice::new();
        dice.next();
        assert!(b.player_attack(&mut e, id, &mut dice).is_err());
        let p = e.pet(id).unwrap();
        assert_eq!((p.level(), p.xp()), (1, 0));
        assert_eq!(e.currency(), u64::MAX - 50);
        assert_eq!(b.enemy_hp(), 1);
    }
}
