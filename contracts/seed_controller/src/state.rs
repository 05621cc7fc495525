use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::Item;

use lbp::asset::AssetInfo;
use lbp::controller::{PartialRepayPolicy, SeedDebt, SeedStatus};

/// ## Description
/// Controller configuration. The pool addresses are filled in once the Vault created the pool.
#[cw_serde]
pub struct Config {
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
pub struct State {
    pub status: SeedStatus,
    pub completed_cycles: u32,
    pub funding_closed: bool,
}

/// Seed join in flight, reconciled in the reply
#[cw_serde]
pub struct PendingSeed {
    pub managed_before: Uint128,
    pub reserve_amount: Uint128,
}

pub const CONFIG: Item<Config> = Item::new("config");

pub const STATE: Item<State> = Item::new("state");

pub const SEED_DEBT: Item<SeedDebt> = Item::new("seed_debt");

pub const PENDING_SEED: Item<PendingSeed> = Item::new("pending_seed");
