use crate::asset::{Asset, AssetInfo, NativeAssetPrecisionInfo};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Decimal, StdResult, Uint128};
use cw20::Cw20ReceiveMsg;
use std::fmt::{Display, Formatter, Result};

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x    {{PoolType}} enum Type       x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// This enum describes the key for the different Pool types supported by the Vault
#[cw_serde]
pub enum PoolType {
    /// Two token liquidity bootstrapping pool
    Lbp {},
}

// Return a raw encoded string representing the name of each pool type
impl Display for PoolType {
    fn fmt(&self, fmt: &mut Formatter) -> Result {
        match self {
            PoolType::Lbp {} => fmt.write_str("lbp"),
        }
    }
}

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x    {{SwapType}} enum Type    x----------------x-------------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// This enum describes available Swap types.
#[cw_serde]
pub enum SwapType {
    /// `amount` is what the trader gives
    GiveIn {},
    /// `amount` is what the trader wants to receive
    GiveOut {},
}

impl Display for SwapType {
    fn fmt(&self, fmt: &mut Formatter) -> Result {
        match self {
            SwapType::GiveIn {} => fmt.write_str("give-in"),
            SwapType::GiveOut {} => fmt.write_str("give-out"),
        }
    }
}

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x    {{FeeInfo}} struct Type    x----------------x-------------------
// ----------------x----------------x----------------x----------------x----------------x----------------

// FEE PRECISION is 4 decimal places
pub const FEE_PRECISION: u16 = 10_000u16;
// Maximum swap fee in bps. 1_000 bps is a 10% fee.
const MAX_TOTAL_FEE_BPS: u16 = 1_000u16;

/// ## Description - Swap fee charged by the pools of a pool type
#[cw_serde]
#[derive(Copy)]
pub struct FeeInfo {
    pub total_fee_bps: u16,
}

impl FeeInfo {
    /// Checks that the fee lies within the allowed range
    pub fn valid_fee_info(&self) -> bool {
        self.total_fee_bps <= MAX_TOTAL_FEE_BPS
    }

    pub fn fee_rate(&self) -> Decimal {
        Decimal::from_ratio(self.total_fee_bps, FEE_PRECISION)
    }
}

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x      Pool registry types        x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// ## Description
/// Code and default parameters used when creating pools of a given type
#[cw_serde]
pub struct PoolTypeConfig {
    /// ID of contract which is used to create pools of this type
    pub code_id: u64,
    pub pool_type: PoolType,
    pub default_fee_info: FeeInfo,
    /// Disables the creation of new pools of this type
    pub is_disabled: bool,
}

/// ## Description
/// Vault configuration
#[cw_serde]
pub struct Config {
    /// Owner of the registry
    pub owner: Addr,
    /// The LP token code ID used when creating pools
    pub lp_token_code_id: u64,
    /// ID assigned to the next pool instance
    pub next_pool_id: Uint128,
}

/// Grants `manager` the asset manager capability over `asset_info` in a new pool
#[cw_serde]
pub struct AssetManager {
    pub asset_info: AssetInfo,
    pub manager: String,
}

/// ## Description
/// Ledger entry for one token of a pool.
///
/// `cash` is held by the Vault and can be paid out. `managed` is accounted to the pool but
/// held (or owed) by the asset manager. Pool math always sees `cash + managed`.
#[cw_serde]
pub struct PoolAssetBalance {
    pub info: AssetInfo,
    pub cash: Uint128,
    pub managed: Uint128,
    pub asset_manager: Option<Addr>,
}

impl PoolAssetBalance {
    pub fn total(&self) -> StdResult<Uint128> {
        Ok(self.cash.checked_add(self.managed)?)
    }

    pub fn is_managed_by(&self, addr: &Addr) -> bool {
        self.asset_manager.as_ref() == Some(addr)
    }
}

/// ## Description
/// A pool instance registered in the Vault
#[cw_serde]
pub struct PoolInfo {
    pub pool_id: Uint128,
    pub pool_addr: Addr,
    pub lp_token_addr: Addr,
    pub pool_type: PoolType,
    pub fee_info: FeeInfo,
    /// Sorted by asset identity
    pub assets: Vec<PoolAssetBalance>,
}

impl PoolInfo {
    /// Ledger totals as plain assets, the view handed to the pool contract
    pub fn total_assets(&self) -> StdResult<Vec<Asset>> {
        self.assets
            .iter()
            .map(|a| Ok(Asset::new(a.info.clone(), a.total()?)))
            .collect()
    }
}

/// ## Description
/// Pool under creation, kept until the instantiate reply arrives
#[cw_serde]
pub struct TmpPoolInfo {
    pub pool_id: Uint128,
    pub pool_type: PoolType,
    pub fee_info: FeeInfo,
    pub assets: Vec<PoolAssetBalance>,
}

/// Direction of an asset manager transfer
#[cw_serde]
#[derive(Copy)]
pub enum ManagedTransferDirection {
    /// Vault cash is sent to the manager and booked as managed
    ToManaged,
    /// The manager returns tokens, booked back from managed to cash
    ToCash,
}

impl Display for ManagedTransferDirection {
    fn fmt(&self, fmt: &mut Formatter) -> Result {
        match self {
            ManagedTransferDirection::ToManaged => fmt.write_str("to_managed"),
            ManagedTransferDirection::ToCash => fmt.write_str("to_cash"),
        }
    }
}

/// ## Description
/// A swap against a single pool
#[cw_serde]
pub struct SingleSwapRequest {
    pub pool_id: Uint128,
    pub asset_in: AssetInfo,
    pub asset_out: AssetInfo,
    pub swap_type: SwapType,
    pub amount: Uint128,
}

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x    Instantiate, Execute Msgs    x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

#[cw_serde]
pub struct InstantiateMsg {
    pub owner: String,
    pub pool_configs: Vec<PoolTypeConfig>,
    pub lp_token_code_id: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Exits a pool when BPT tokens are sent with [`Cw20HookMsg::ExitPool`]
    Receive(Cw20ReceiveMsg),
    /// Owner only
    UpdateConfig { lp_token_code_id: Option<u64> },
    /// Owner only
    UpdatePoolTypeConfig {
        pool_type: PoolType,
        is_disabled: Option<bool>,
        new_fee_info: Option<FeeInfo>,
    },
    /// Creates a pool. `asset_managers` are fixed for the lifetime of the pool.
    CreatePoolInstance {
        pool_type: PoolType,
        asset_infos: Vec<AssetInfo>,
        native_asset_precisions: Vec<NativeAssetPrecisionInfo>,
        lp_token_name: Option<String>,
        lp_token_symbol: Option<String>,
        asset_managers: Vec<AssetManager>,
        init_params: Option<Binary>,
    },
    /// Joins with real tokens; every leg is credited to cash
    JoinPool {
        pool_id: Uint128,
        recipient: Option<String>,
        assets: Vec<Asset>,
        min_lp_to_receive: Option<Uint128>,
    },
    /// Like `JoinPool`, but legs of tokens managed by the sender are credited to the managed
    /// balance without any transfer
    ManagedJoinPool {
        pool_id: Uint128,
        recipient: Option<String>,
        assets: Vec<Asset>,
        min_lp_to_receive: Option<Uint128>,
    },
    Swap {
        swap_request: SingleSwapRequest,
        recipient: Option<String>,
        /// Minimum amount out (GiveIn)
        min_receive: Option<Uint128>,
        /// Maximum amount in (GiveOut)
        max_spend: Option<Uint128>,
    },
    /// Asset manager only. Moves `amount` between cash and managed, transferring the tokens.
    TransferAsManager {
        pool_id: Uint128,
        asset_info: AssetInfo,
        amount: Uint128,
        direction: ManagedTransferDirection,
    },
}

#[cw_serde]
pub enum Cw20HookMsg {
    ExitPool {
        pool_id: Uint128,
        recipient: Option<String>,
        min_assets_out: Option<Vec<Asset>>,
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
    #[returns(Option<PoolTypeConfig>)]
    QueryRegistry { pool_type: PoolType },
    #[returns(PoolInfoResponse)]
    GetPoolById { pool_id: Uint128 },
    #[returns(PoolInfoResponse)]
    GetPoolByAddress { pool_addr: String },
    /// Tokens of a pool with their total, cash and managed balances
    #[returns(PoolTokensResponse)]
    GetPoolTokens { pool_id: Uint128 },
    #[returns(PoolTokenInfoResponse)]
    GetPoolTokenInfo {
        pool_id: Uint128,
        asset_info: AssetInfo,
    },
}

#[cw_serde]
pub struct ConfigResponse {
    pub owner: Addr,
    pub lp_token_code_id: u64,
    pub next_pool_id: Uint128,
}

pub type PoolInfoResponse = PoolInfo;

#[cw_serde]
pub struct PoolTokensResponse {
    pub tokens: Vec<AssetInfo>,
    /// cash + managed
    pub balances: Vec<Uint128>,
    pub cash_balances: Vec<Uint128>,
    pub managed_balances: Vec<Uint128>,
    pub asset_managers: Vec<Option<Addr>>,
}

#[cw_serde]
pub struct PoolTokenInfoResponse {
    pub asset_info: AssetInfo,
    pub balance: Uint128,
    pub cash: Uint128,
    pub managed: Uint128,
    pub asset_manager: Option<Addr>,
}
