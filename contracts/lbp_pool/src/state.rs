use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Decimal256, QuerierWrapper, StdResult, Storage, Uint128};
use cw_storage_plus::{Item, Map};

use lbp::asset::{Asset, AssetInfo, NativeAssetPrecisionInfo};
use lbp::pool::PoolStatus;
use lbp::vault::{FeeInfo, PoolType};

use crate::error::ContractError;
use crate::schedule::GradualWeightUpdate;

/// ## Description
/// This struct describes the main control config of the pool.
#[cw_serde]
pub struct Config {
    pub pool_id: Uint128,
    /// Set in `reply` once the BPT token is instantiated
    pub lp_token_addr: Option<Addr>,
    pub vault_addr: Addr,
    /// Pool owner, also the asset manager of the reserve token
    pub owner: Addr,
    pub pool_type: PoolType,
    pub fee_info: FeeInfo,
    pub project_asset: AssetInfo,
    pub reserve_asset: AssetInfo,
    /// Totals (cash + managed) as last pushed by the Vault, in the Vault's order
    pub assets: Vec<Asset>,
    pub swap_enabled: bool,
    pub status: PoolStatus,
    /// Timestamp of the last `UpdateLiquidity`
    pub block_time_last: u64,
}

impl Config {
    /// Stored balance of `asset_info`, if it belongs to the pool
    pub fn asset(&self, asset_info: &AssetInfo) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.info.eq(asset_info))
    }

    pub fn is_funded(&self) -> bool {
        !self.assets.is_empty() && self.assets.iter().all(|asset| !asset.amount.is_zero())
    }
}

pub const CONFIG: Item<Config> = Item::new("config");

/// Stores map of AssetInfo (as String) -> precision
pub const PRECISIONS: Map<String, u8> = Map::new("precisions");

pub const WEIGHT_SCHEDULE: Item<GradualWeightUpdate> = Item::new("weight_schedule");

// ----------------x----------------x----------------x----------------
// ----------------x      PRECISION : Store and getter fns     x------
// ----------------x----------------x----------------x----------------

/// ## Description
/// Store all token precisions. Native denoms are looked up in `native_asset_precisions`,
/// cw20 decimals are queried from the token contract.
pub(crate) fn store_precisions(
    storage: &mut dyn Storage,
    querier: &QuerierWrapper,
    asset_infos: &[AssetInfo],
    native_asset_precisions: &[NativeAssetPrecisionInfo],
) -> Result<(), ContractError> {
    for asset_info in asset_infos {
        let precision = asset_info.decimals(native_asset_precisions, querier)?;
        if u32::from(precision) > Decimal256::DECIMAL_PLACES {
            return Err(ContractError::UnsupportedPrecision {
                asset: asset_info.to_string(),
                precision,
            });
        }
        PRECISIONS.save(storage, asset_info.to_string(), &precision)?;
    }
    Ok(())
}

pub(crate) fn get_precision(storage: &dyn Storage, asset_info: &AssetInfo) -> StdResult<u8> {
    PRECISIONS.load(storage, asset_info.to_string())
}
