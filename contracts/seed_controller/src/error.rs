use cosmwasm_std::{OverflowError, StdError, Uint128};
use cw_utils::PaymentError;
use thiserror::Error;

/// ## Description
/// This enum describes seed controller errors
#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("Payment error: {0}")]
    PaymentError(#[from] PaymentError),

    #[error("Only the manager can execute this")]
    NotManager {},

    #[error("The pool has not been created yet")]
    PoolNotCreated {},

    #[error("Project and reserve assets must be two different valid tokens")]
    InvalidAssets {},

    #[error("The pool is already funded")]
    AlreadyFunded {},

    #[error("Pool is not funded")]
    PoolNotFunded {},

    #[error("Amount cannot be 0")]
    InvalidZeroAmount {},

    #[error("Insufficient cash balance of {asset}")]
    InsufficientCashBalance { asset: String },

    #[error("Cannot repay {requested}, only {owed} is owed")]
    OverRepayment { requested: Uint128, owed: Uint128 },

    #[error("No seed debt is outstanding")]
    NoOutstandingDebt {},

    #[error("Seed debt must be repaid first")]
    DebtOutstanding {},

    #[error("Partial repayment is disabled")]
    PartialRepayDisabled {},

    #[error("Repay fraction must be in (0, 1]")]
    InvalidRepayFraction {},

    #[error("Insufficient number of {denom} tokens sent. Tokens sent = {sent}. Tokens needed = {needed}")]
    InsufficientNativeTokensSent {
        denom: String,
        sent: Uint128,
        needed: Uint128,
    },

    #[error("Managed reserve grew by {actual}, expected {expected}")]
    SeedNotReconciled { expected: Uint128, actual: Uint128 },
}

impl From<OverflowError> for ContractError {
    fn from(o: OverflowError) -> Self {
        StdError::from(o).into()
    }
}
