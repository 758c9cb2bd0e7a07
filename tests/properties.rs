use proptest::prelude::*;

use petcare::{
    sim::{check_invariants, random_session},
    Config, Engine, EngineError, PetId, PetSpec, Stats,
};

fn stats() -> impl Strategy<Value = Stats> {
    (1u32..20, 1u32..500, 0u32..50, 2u64..5000).prop_map(|(level, max_hp, attack, xp)| Stats {
        level,
        max_hp,
        attack,
        xp_to_next_level: xp,
    })
}

fn engine(gold: u64, stats: Stats) -> (Engine, PetId) {
    let config = Config {
        starting_gold: gold,
        roster: vec![PetSpec {
            name: "Aqua".to_owned(),
            stats,
        }],
        ..Config::empty()
    };
    let e = Engine::new(&config).unwrap();
    let id = e.selected().unwrap().id();
    (e, id)
}

proptest! {
    #[test]
    fn xp_stays_below_threshold(stats in stats(), grants in prop::collection::vec(0i64..10_000, 1..8)) {
        let (mut e, id) = engine(0, stats);
        let mut levels = 0;
        let mut gold = 0;
        for g in grants {
            let gain = e.grant_experience(id, g).unwrap();
            levels += gain.level_ups.len() as u32;
            gold += gain.gold;

            let p = e.pet(id).unwrap();
            prop_assert!(p.xp() < p.xp_to_next_level());
            prop_assert!(p.hp() <= p.max_hp());
        }
        let p = e.pet(id).unwrap();
        prop_assert_eq!(p.level(), stats.level + levels);
        prop_assert_eq!(p.attack(), stats.attack + 2 * levels);
        prop_assert_eq!(e.currency(), gold);
    }

    #[test]
    fn level_up_gold_matches_new_level(stats in stats(), xp in 0i64..100_000) {
        let (mut e, id) = engine(0, stats);
        let gain = e.grant_experience(id, xp).unwrap();
        let mut level = stats.level;
        for u in &gain.level_ups {
            level += 1;
            prop_assert_eq!(u.level, level);
            prop_assert_eq!(u.gold, 50 * level as u64);
        }
        if gain.leveled_up() {
            let p = e.pet(id).unwrap();
            prop_assert_eq!(p.hp(), p.max_hp());
        }
    }

    #[test]
    fn currency_never_goes_negative(start in 0u64..1000, ops in prop::collection::vec(-500i64..500, 0..32)) {
        let (mut e, _) = engine(start, Stats::default());
        let mut expected = start;
        for op in ops {
            if op >= 0 {
                prop_assert_eq!(e.credit_currency(op), Ok(expected + op as u64));
                expected += op as u64;
            } else {
                let cost = op.unsigned_abs();
                match e.debit_currency(op.abs()) {
                    Ok(left) => {
                        prop_assert!(cost <= expected);
                        expected -= cost;
                        prop_assert_eq!(left, expected);
                    }
                    Err(err) => {
                        prop_assert!(cost > expected);
                        prop_assert_eq!(err, EngineError::InsufficientFunds { needed: cost, available: expected });
                    }
                }
            }
            prop_assert_eq!(e.currency(), expected);
        }
    }

    #[test]
    fn negative_amounts_are_rejected(amount in i64::MIN..0) {
        let (mut e, id) = engine(100, Stats::default());
        let before = e.snapshot();
        prop_assert!(e.credit_currency(amount).is_err());
        prop_assert!(e.debit_currency(amount).is_err());
        prop_assert!(e.grant_experience(id, amount).is_err());
        prop_assert_eq!(e.snapshot(), before);
    }

    #[test]
    fn random_sessions_hold_invariants(seed in any::<u64>()) {
        let e = random_session(&Config::default(), seed, 200).map_err(TestCaseError::fail)?;
        prop_assert_eq!(check_invariants(&e), Ok(()));
    }
}
