use crate::asset::{Asset, AssetInfo, NativeAssetPrecisionInfo};
use crate::vault::{AssetManager, FeeInfo, PoolType, SwapType};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Decimal, Decimal256, Uint128};
use std::fmt::{Display, Formatter, Result};

/// Decimals of the pool share token
pub const LP_TOKEN_PRECISION: u8 = 18;

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x     {{Pool}} state types        x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// A pair of weights, one per role. The pair always sums to one.
#[cw_serde]
#[derive(Copy)]
pub struct WeightPair {
    pub project: Decimal,
    pub reserve: Decimal,
}

/// Lifecycle of a bootstrapping pool
#[cw_serde]
#[derive(Copy)]
pub enum PoolStatus {
    /// Created, no liquidity yet
    Uninitialized,
    /// Seeded by its owner, no trade yet
    Funded,
    /// At least one swap has been executed
    Active,
}

impl Display for PoolStatus {
    fn fmt(&self, fmt: &mut Formatter) -> Result {
        match self {
            PoolStatus::Uninitialized => fmt.write_str("uninitialized"),
            PoolStatus::Funded => fmt.write_str("funded"),
            PoolStatus::Active => fmt.write_str("active"),
        }
    }
}

/// Balance update pushed by the Vault after it committed a pool operation
#[cw_serde]
#[derive(Copy)]
pub enum LiquidityOperation {
    Join,
    Exit,
    Swap,
}

impl Display for LiquidityOperation {
    fn fmt(&self, fmt: &mut Formatter) -> Result {
        match self {
            LiquidityOperation::Join => fmt.write_str("join"),
            LiquidityOperation::Exit => fmt.write_str("exit"),
            LiquidityOperation::Swap => fmt.write_str("swap"),
        }
    }
}

/// ## Description
/// Pool specific parameters passed by the creator through the Vault as `init_params`
#[cw_serde]
pub struct LbpParams {
    /// Only the owner may seed the pool, toggle swaps and schedule weight changes.
    /// It must also be the asset manager of the reserve token.
    pub owner: String,
    /// The token being bootstrapped. The other token of the pair is the reserve.
    pub project_asset: AssetInfo,
    /// Weights at creation; constant until a gradual update is scheduled
    pub weights: WeightPair,
    pub swap_enabled_on_start: bool,
}

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x     {{Trade}} / responses       x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// Amounts of a computed swap. `amount_out` is net of fees.
#[cw_serde]
pub struct Trade {
    pub amount_in: Uint128,
    pub amount_out: Uint128,
    /// Difference between the output at spot price and `amount_out`, fees excluded
    pub spread: Uint128,
}

/// Outcome of a pool computation. Failures carry the reason so the Vault can surface it.
#[cw_serde]
pub enum ResponseType {
    Success {},
    Failure(String),
}

impl Display for ResponseType {
    fn fmt(&self, fmt: &mut Formatter) -> Result {
        match self {
            ResponseType::Success {} => fmt.write_str("success"),
            ResponseType::Failure(error) => fmt.write_str(format!("error : {}", error).as_str()),
        }
    }
}

impl ResponseType {
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseType::Success {})
    }
}

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x    Instantiate, Execute Msgs    x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// ## Description
/// Sent by the Vault when it creates a pool instance.
#[cw_serde]
pub struct InstantiateMsg {
    pub pool_id: Uint128,
    pub pool_type: PoolType,
    pub vault_addr: Addr,
    pub asset_infos: Vec<AssetInfo>,
    pub native_asset_precisions: Vec<NativeAssetPrecisionInfo>,
    pub fee_info: FeeInfo,
    pub lp_token_code_id: u64,
    pub lp_token_name: Option<String>,
    pub lp_token_symbol: Option<String>,
    pub asset_managers: Vec<AssetManager>,
    /// Serialized [`LbpParams`]
    pub init_params: Option<Binary>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Vault only. Mirrors the ledger totals (cash + managed) after a committed operation.
    UpdateLiquidity {
        assets: Vec<Asset>,
        operation: LiquidityOperation,
    },
    /// Owner only
    SetSwapEnabled { enabled: bool },
    /// Owner only. Moves the weights linearly from their current value to `end_weights`.
    UpdateWeightsGradually {
        start_time: u64,
        end_time: u64,
        end_weights: WeightPair,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x        Query Msgs               x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(FeeResponse)]
    FeeParams {},
    #[returns(Uint128)]
    PoolId {},
    /// Number of BPT minted and assets taken for a join by `sender`
    #[returns(AfterJoinResponse)]
    OnJoinPool {
        sender: String,
        assets_in: Vec<Asset>,
    },
    /// Assets returned for burning `burn_amount` BPT
    #[returns(AfterExitResponse)]
    OnExitPool { burn_amount: Uint128 },
    #[returns(SwapResponse)]
    OnSwap {
        swap_type: SwapType,
        offer_asset: AssetInfo,
        ask_asset: AssetInfo,
        amount: Uint128,
    },
    #[returns(CurrentWeightsResponse)]
    CurrentWeights {},
    #[returns(GradualWeightUpdateResponse)]
    GradualWeightUpdateParams {},
    #[returns(bool)]
    SwapEnabled {},
    /// Ledger entry of one of the pool's tokens
    #[returns(TokenInfoResponse)]
    TokenInfo { asset_info: AssetInfo },
    /// Price of one `offer_asset` unit in `ask_asset` units, fees excluded
    #[returns(SpotPriceResponse)]
    SpotPrice {
        offer_asset: AssetInfo,
        ask_asset: AssetInfo,
    },
    #[returns(InvariantResponse)]
    Invariant {},
    #[returns(PoolStatusResponse)]
    Status {},
}

#[cw_serde]
pub struct ConfigResponse {
    pub pool_id: Uint128,
    pub lp_token_addr: Option<Addr>,
    pub vault_addr: Addr,
    pub owner: Addr,
    pub pool_type: PoolType,
    pub project_asset: AssetInfo,
    pub reserve_asset: AssetInfo,
    /// Totals last reported by the Vault
    pub assets: Vec<Asset>,
    pub fee_info: FeeInfo,
    pub swap_enabled: bool,
    pub block_time_last: u64,
}

#[cw_serde]
pub struct FeeResponse {
    pub total_fee_bps: u16,
}

#[cw_serde]
pub struct AfterJoinResponse {
    /// Assets to pull into the pool, in the Vault's asset order
    pub provided_assets: Vec<Asset>,
    pub new_shares: Uint128,
    pub response: ResponseType,
}

#[cw_serde]
pub struct AfterExitResponse {
    pub assets_out: Vec<Asset>,
    pub burn_shares: Uint128,
    pub response: ResponseType,
}

#[cw_serde]
pub struct SwapResponse {
    pub trade_params: Trade,
    pub response: ResponseType,
    /// Fee retained by the pool, denominated in the ask asset
    pub fee: Option<Asset>,
}

#[cw_serde]
pub struct CurrentWeightsResponse {
    pub weights: Vec<(AssetInfo, Decimal)>,
}

#[cw_serde]
pub struct GradualWeightUpdateResponse {
    pub start_time: u64,
    pub end_time: u64,
    pub start_weights: WeightPair,
    pub end_weights: WeightPair,
}

#[cw_serde]
pub struct TokenInfoResponse {
    pub asset_info: AssetInfo,
    pub balance: Uint128,
    pub cash: Uint128,
    pub managed: Uint128,
    pub asset_manager: Option<Addr>,
}

#[cw_serde]
pub struct SpotPriceResponse {
    pub price: Decimal256,
}

#[cw_serde]
pub struct InvariantResponse {
    pub invariant: Decimal256,
}

#[cw_serde]
pub struct PoolStatusResponse {
    pub status: PoolStatus,
    pub swap_enabled: bool,
}

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x     Failure response helpers    x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

pub fn return_join_failure(error: String) -> AfterJoinResponse {
    AfterJoinResponse {
        provided_assets: vec![],
        new_shares: Uint128::zero(),
        response: ResponseType::Failure(error),
    }
}

pub fn return_exit_failure(error: String) -> AfterExitResponse {
    AfterExitResponse {
        assets_out: vec![],
        burn_shares: Uint128::zero(),
        response: ResponseType::Failure(error),
    }
}

pub fn return_swap_failure(error: String) -> SwapResponse {
    SwapResponse {
        trade_params: Trade {
            amount_in: Uint128::zero(),
            amount_out: Uint128::zero(),
            spread: Uint128::zero(),
        },
        response: ResponseType::Failure(error),
        fee: None,
    }
}
