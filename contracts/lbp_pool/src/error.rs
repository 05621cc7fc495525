use cosmwasm_std::{ConversionOverflowError, OverflowError, StdError};
use cw_utils::ParseReplyError;
use thiserror::Error;

/// ## Description
/// This enum describes pool contract errors
#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(StdError),

    #[error("{0}")]
    ParseReply(#[from] ParseReplyError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("LP token already set")]
    LpTokenAlreadySet {},

    #[error("A bootstrapping pool holds exactly two tokens")]
    InvalidNumberOfAssets {},

    #[error("Doubling assets in asset infos")]
    RepeatedAssets {},

    #[error("You need to provide init params")]
    InitParamsNotFound {},

    #[error("Fee bps must be smaller than or equal to the maximum pool fee")]
    InvalidFeeInfo {},

    #[error("Invalid asset managers: {reason}")]
    InvalidAssetManagers { reason: String },

    #[error("Invalid weights: {reason}")]
    InvalidWeights { reason: String },

    #[error("Invalid weight schedule: {reason}")]
    InvalidSchedule { reason: String },

    #[error("Token {asset} is not part of the pool")]
    UnknownToken { asset: String },

    #[error("Source and target assets are the same")]
    SameAssets {},

    #[error("Pool is not funded")]
    PoolNotFunded {},

    #[error("Swaps are disabled")]
    SwapsDisabled {},

    #[error("Amount cannot be 0")]
    InvalidZeroAmount {},

    #[error("Initial join must provide every token of the pool")]
    IncompleteInitialJoin {},

    #[error("Insufficient liquidity: {reason}")]
    InsufficientLiquidity { reason: String },

    #[error("Invariant violation: {reason}")]
    InvariantViolation { reason: String },

    #[error("Token {asset} has {precision} decimals, at most 18 are supported")]
    UnsupportedPrecision { asset: String, precision: u8 },
}

/// Arithmetic failures inside the pool are out of range math, everything else stays a [`StdError`]
impl From<StdError> for ContractError {
    fn from(e: StdError) -> Self {
        match e {
            e @ (StdError::Overflow { .. }
            | StdError::ConversionOverflow { .. }
            | StdError::DivideByZero { .. }) => ContractError::InvariantViolation {
                reason: e.to_string(),
            },
            e => ContractError::Std(e),
        }
    }
}

impl From<OverflowError> for ContractError {
    fn from(o: OverflowError) -> Self {
        StdError::from(o).into()
    }
}

impl From<ConversionOverflowError> for ContractError {
    fn from(o: ConversionOverflowError) -> Self {
        StdError::from(o).into()
    }
}
