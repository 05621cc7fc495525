use cw_storage_plus::{Item, Map};
use lbp::vault::{Config, PoolInfo, PoolTypeConfig, TmpPoolInfo};

// Stores Vault contract's core Configuration parameters in a [`Config`] struct
pub const CONFIG: Item<Config> = Item::new("config");

// Stores configuration data associated with each [`PoolType`] supported by the Vault
pub const REGISTRY: Map<String, PoolTypeConfig> = Map::new("pool_configs");

// Ledger of every pool instance, keyed by pool id
pub const POOLS: Map<u128, PoolInfo> = Map::new("pool_info");

// Temporarily stores the PoolInfo of the Pool which is currently being created
pub const TMP_POOL_INFO: Item<TmpPoolInfo> = Item::new("tmp_pool_info");
