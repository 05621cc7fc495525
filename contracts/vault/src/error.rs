use cosmwasm_std::{ConversionOverflowError, OverflowError, StdError, Uint128};
use cw_utils::ParseReplyError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    ParseReply(#[from] ParseReplyError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Pool {pool_id} does not exist")]
    InvalidPoolId { pool_id: Uint128 },

    #[error("LP Token address not found")]
    LpTokenNotFound {},

    #[error("Insufficient number of {denom} tokens sent. Tokens sent = {sent}. Tokens needed = {needed}")]
    InsufficientNativeTokensSent {
        denom: String,
        sent: Uint128,
        needed: Uint128,
    },

    #[error("Cannot burn more LP tokens than what's been sent by the users")]
    InsufficientLpTokensToExit {},

    #[error("Invalid number of assets")]
    InvalidNumberOfAssets {},

    #[error("Pool query failed: {reason}")]
    PoolQueryFailed { reason: String },

    #[error("Mismatched assets")]
    MismatchedAssets {},

    #[error("Invalid sequence of assets")]
    InvalidSequenceOfAssets {},

    #[error("Amount cannot be 0")]
    InvalidAmount {},

    #[error("Cannot swap same tokens")]
    SameTokenError {},

    #[error("Duplicate of pool configs")]
    PoolConfigDuplicate {},

    #[error("Fee bps in pool config must be smaller than or equal to the maximum fee")]
    InvalidFeeInfo {},

    #[error("Pool config not found")]
    PoolConfigNotFound {},

    #[error("Pool is currently disabled. No new pool instances can be created")]
    PoolConfigDisabled {},

    #[error("Doubling assets in asset infos")]
    RepeatedAssets {},

    #[error("Invalid asset managers: {reason}")]
    InvalidAssetManagers { reason: String },

    #[error("Sender is not the asset manager of {asset}")]
    NotAssetManager { asset: String },

    #[error("Insufficient cash balance of {asset}: available {available}, needed {needed}")]
    InsufficientCashBalance {
        asset: String,
        available: Uint128,
        needed: Uint128,
    },

    #[error("Insufficient managed balance of {asset}: available {available}, needed {needed}")]
    InsufficientManagedBalance {
        asset: String,
        available: Uint128,
        needed: Uint128,
    },

    #[error("Received {received} which is less than the minimum of {min_receive}")]
    MinReceiveError {
        min_receive: Uint128,
        received: Uint128,
    },

    #[error("Swap requires {spent} which is more than the maximum of {max_spend}")]
    MaxSpendError { max_spend: Uint128, spent: Uint128 },

    #[error("LP tokens minted {minted} are less than the minimum of {min_lp}")]
    MinLpReceive { min_lp: Uint128, minted: Uint128 },

    #[error("Received {received} of {asset} which is less than the minimum of {min}")]
    MinAssetsOut {
        asset: String,
        min: Uint128,
        received: Uint128,
    },
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
