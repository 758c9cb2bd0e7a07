use thiserror::Error;

use crate::{item::ItemId, pet::PetId};

/// Everything that can go wrong when calling into the [`Engine`](crate::Engine).
///
/// Every error is returned before any state is touched, so a failed call can be
/// retried with corrected input.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum EngineError {
    #[error("no pet with id {0}")]
    PetNotFound(PetId),

    /// The item is neither in the catalog nor (for inventory operations) owned
    /// by the pet in question.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("pet template not found: {0}")]
    TemplateNotFound(String),

    /// Returned by operations that act on the selected pet when the roster is
    /// empty.
    #[error("no pet is selected")]
    NoSelection,

    #[error("already owned: {0}")]
    AlreadyOwned(String),

    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0} is already at full health")]
    FullHealth(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// True for all of the "unknown id" flavours
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PetNotFound(..)
                | Self::ItemNotFound(..)
                | Self::TemplateNotFound(..)
                | Self::NoSelection
        )
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Converts a caller-supplied signed amount into the unsigned domain used
/// internally, rejecting negative values.
pub(crate) fn non_negative(amount: i64, what: &str) -> EngineResult<u64> {
    u64::try_from(amount).map_err(|_| {
        EngineError::InvalidArgument(format!("{} must not be negative, got {}", what, amount))
    })
}
