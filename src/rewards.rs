//! Gold payouts for the banking and lesson mini-games.  The games themselves
//! live in the presentation layer; only the final numbers reach the engine.

use crate::{
    errors::{EngineError, EngineResult},
    params::{LESSON_GOLD, LESSON_PASS_SCORE, RECEIPT_MIN_GOLD, SAVINGS_PER_GOLD},
};

/// Gold for an uploaded receipt: the purchase total rounded down, but never
/// less than [`RECEIPT_MIN_GOLD`]
pub fn receipt_gold(total: f64) -> EngineResult<u64> {
    if !total.is_finite() || total < 0.0 {
        return Err(EngineError::InvalidArgument(format!(
            "receipt total must be a non-negative number, got {}",
            total
        )));
    }
    whole_gold(total.floor(), "receipt total").map(|g| g.max(RECEIPT_MIN_GOLD))
}

/// Gold for depositing real-world savings: one gold per ten saved
pub fn savings_gold(amount: f64) -> EngineResult<u64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::InvalidArgument(format!(
            "savings must be a positive number, got {}",
            amount
        )));
    }
    whole_gold((amount / SAVINGS_PER_GOLD).floor(), "savings")
}

/// Converts a non-negative, already floored value to gold, rejecting values
/// too large to hold
fn whole_gold(v: f64, what: &str) -> EngineResult<u64> {
    // u64::MAX rounds up to 2^64 as an f64, which is itself out of range
    if v >= u64::MAX as f64 {
        return Err(EngineError::InvalidArgument(format!(
            "{} is too large to pay out",
            what
        )));
    }
    Ok(v as u64)
}

/// Outcome of a lesson quiz
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct QuizResult {
    pub correct: u32,
    pub total: u32,
    /// Percentage of correct answers, 0 to 100
    pub score: f64,
    pub gold: u64,
}

impl QuizResult {
    pub fn passed(&self) -> bool {
        self.score >= LESSON_PASS_SCORE
    }
}

pub fn grade_quiz(correct: u32, total: u32) -> EngineResult<QuizResult> {
    if total == 0 {
        return Err(EngineError::InvalidArgument("quiz has no questions".into()));
    }
    if correct > total {
        return Err(EngineError::InvalidArgument(format!(
            "{} correct answers out of {} questions",
            correct, total
        )));
    }
    let score = correct as f64 * 100.0 / total as f64;
    let gold = if score >= LESSON_PASS_SCORE {
        LESSON_GOLD
    } else {
        0
    };
    Ok(QuizResult {
        correct,
        total,
        score,
        gold,
    })
}
