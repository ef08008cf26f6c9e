use thiserror::Error;

use crate::ledger::UnitKey;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("on-board unit {0} does not exist")]
    NotFound(UnitKey),

    #[error("on-board unit {0} already exists")]
    AlreadyExists(UnitKey),

    #[error("cannot credit {amount} to {key}")]
    InvalidAmount { key: UnitKey, amount: f64 },
}
