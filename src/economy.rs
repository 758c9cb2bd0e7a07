use log::trace;
use serde::{Deserialize, Serialize};

use crate::errors::{non_negative, EngineError, EngineResult};

/// The session's shared gold purse.  The balance is unsigned and every
/// change is checked, so it can never go negative or wrap.
#[derive(Copy, Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Economy {
    currency: u64,
}

impl Economy {
    pub fn new(currency: u64) -> Self {
        Self { currency }
    }

    pub fn currency(&self) -> u64 {
        self.currency
    }

    /// Adds a caller-supplied amount, rejecting negative values
    pub fn credit_currency(&mut self, amount: i64) -> EngineResult<u64> {
        let amount = non_negative(amount, "credit")?;
        self.credit(amount)
    }

    /// Removes a caller-supplied amount, rejecting negative values and
    /// overdrafts
    pub fn debit_currency(&mut self, amount: i64) -> EngineResult<u64> {
        let amount = non_negative(amount, "debit")?;
        self.debit(amount)
    }

    /// Returns the balance that crediting `amount` would produce, without
    /// changing anything
    pub(crate) fn check_credit(&self, amount: u64) -> EngineResult<u64> {
        self.currency
            .checked_add(amount)
            .ok_or_else(|| EngineError::InvalidArgument(format!("crediting {} overflows", amount)))
    }

    pub(crate) fn check_debit(&self, amount: u64) -> EngineResult<u64> {
        self.currency
            .checked_sub(amount)
            .ok_or(EngineError::InsufficientFunds {
                needed: amount,
                available: self.currency,
            })
    }

    pub(crate) fn credit(&mut self, amount: u64) -> EngineResult<u64> {
        self.currency = self.check_credit(amount)?;
        trace!("    🪙 +{} => {}", amount, self.currency);
        Ok(self.currency)
    }

    pub(crate) fn debit(&mut self, amount: u64) -> EngineResult<u64> {
        self.currency = self.check_debit(amount)?;
        trace!("    🪙 -{} => {}", amount, self.currency);
        Ok(self.currency)
    }
}

impl std::fmt::Display for Economy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "🪙 {}", self.currency)
    }
}
