use crate::asset::{AssetInfo, NativeAssetPrecisionInfo};
use crate::pool::WeightPair;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Decimal, Uint128};
use std::fmt::{Display, Formatter, Result};

/// ## Description
/// How much `RepaySeedFunds { full: false }` repays
#[cw_serde]
pub enum PartialRepayPolicy {
    /// Partial repayments are refused
    Disabled {},
    /// A fixed amount of reserve tokens per call
    Fixed { amount: Uint128 },
    /// A fraction of the debt outstanding at the time of the call
    Fraction { ratio: Decimal },
}

impl Default for PartialRepayPolicy {
    fn default() -> Self {
        PartialRepayPolicy::Disabled {}
    }
}

impl PartialRepayPolicy {
    /// Amount to repay against `owed`, or [`None`] when partial repayment is disabled
    pub fn amount(&self, owed: Uint128) -> Option<Uint128> {
        match self {
            PartialRepayPolicy::Disabled {} => None,
            PartialRepayPolicy::Fixed { amount } => Some(*amount),
            PartialRepayPolicy::Fraction { ratio } => Some(owed * *ratio),
        }
    }
}

/// Seed cycle states of the controller
#[cw_serde]
#[derive(Copy)]
pub enum SeedStatus {
    /// No debt outstanding
    NoDebt,
    /// A seed join is in flight
    Funding,
    /// Seed placed, debt outstanding
    Funded,
    /// Debt partially repaid
    Repaying,
}

impl Display for SeedStatus {
    fn fmt(&self, fmt: &mut Formatter) -> Result {
        match self {
            SeedStatus::NoDebt => fmt.write_str("no_debt"),
            SeedStatus::Funding => fmt.write_str("funding"),
            SeedStatus::Funded => fmt.write_str("funded"),
            SeedStatus::Repaying => fmt.write_str("repaying"),
        }
    }
}

/// ## Description
/// Reserve tokens supplied to the pool as managed liquidity and not yet paid back
#[cw_serde]
pub struct SeedDebt {
    pub owed_amount: Uint128,
    pub asset_info: AssetInfo,
    pub outstanding: bool,
}

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x    Instantiate, Execute Msgs    x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

#[cw_serde]
pub struct InstantiateMsg {
    pub vault_addr: String,
    pub manager: String,
    pub project_asset: AssetInfo,
    pub reserve_asset: AssetInfo,
    pub weights: WeightPair,
    pub native_asset_precisions: Vec<NativeAssetPrecisionInfo>,
    pub swap_enabled_on_start: bool,
    pub lp_token_name: Option<String>,
    pub lp_token_symbol: Option<String>,
    pub partial_repay: Option<PartialRepayPolicy>,
    /// Whether a new seed cycle may start once the debt was repaid in full
    pub allow_refunding: Option<bool>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Seeds the pool: project tokens come from the manager, reserve tokens are borrowed
    FundPool {
        project_amount: Uint128,
        reserve_amount: Uint128,
    },
    /// Adds real liquidity from the manager's wallet
    AddLiquidity {
        project_amount: Uint128,
        reserve_amount: Uint128,
        min_bpt_out: Option<Uint128>,
    },
    /// Pays back the whole debt, or the amount given by the partial repay policy
    RepaySeedFunds { full: bool },
    /// Exits the pool to the manager. Refused while debt is outstanding.
    WithdrawLiquidity { bpt_amount: Option<Uint128> },
    SetSwapEnabled { enabled: bool },
    UpdateWeightsGradually {
        start_time: u64,
        end_time: u64,
        end_weights: WeightPair,
    },
    UpdateRepayPolicy { partial_repay: PartialRepayPolicy },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},
    #[returns(SeedDebt)]
    SeedDebt {},
    #[returns(StateResponse)]
    State {},
}

#[cw_serde]
pub struct ConfigResponse {
    pub vault_addr: Addr,
    pub manager: Addr,
    pub pool_id: Uint128,
    pub pool_addr: Option<Addr>,
    pub lp_token_addr: Option<Addr>,
    pub project_asset: AssetInfo,
    pub reserve_asset: AssetInfo,
    pub partial_repay: PartialRepayPolicy,
    pub allow_refunding: bool,
}

#[cw_serde]
pub struct StateResponse {
    pub status: SeedStatus,
    pub owed_amount: Uint128,
    pub completed_cycles: u32,
    /// No further seed cycle can be opened
    pub funding_closed: bool,
}
