//! Tuning constants for progression, the economy and battles.

/// Each level-up multiplies the xp threshold by 3/2 (floored)
pub const XP_GROWTH_NUM: u64 = 3;
pub const XP_GROWTH_DEN: u64 = 2;

/// Each level-up multiplies max hp by 6/5 (floored)
pub const HP_GROWTH_NUM: u64 = 6;
pub const HP_GROWTH_DEN: u64 = 5;

pub const ATTACK_PER_LEVEL: u32 = 2;

/// Bounds on configured starting stats
pub const MAX_START_LEVEL: u32 = 10_000;
pub const MIN_XP_THRESHOLD: u64 = 2;

/// Gold found on level-up is this times the new level
pub const LEVEL_UP_GOLD_PER_LEVEL: u64 = 50;

pub const FEED_COST: u64 = 5;
pub const FEED_HEAL: u32 = 2;

pub const ENEMY_MAX_HP: u32 = 30;
pub const ENEMY_ATTACK: u32 = 3;

/// Half-open ranges, as passed to [`Dice::roll`](crate::dice::Dice::roll)
pub const VICTORY_GOLD: std::ops::Range<u64> = 5..15;
pub const VICTORY_XP: std::ops::Range<u64> = 10..25;
pub const NEW_DAY_GOLD: std::ops::Range<u64> = 50..251;
pub const NEW_DAY_HP_LOSS: std::ops::Range<u64> = 1..6;

pub const RECEIPT_MIN_GOLD: u64 = 5;
pub const SAVINGS_PER_GOLD: f64 = 10.0;

pub const LESSON_PASS_SCORE: f64 = 70.0;
pub const LESSON_GOLD: u64 = 50;

/// Selling an item refunds price / SELL_DIVISOR
pub const SELL_DIVISOR: u64 = 2;
