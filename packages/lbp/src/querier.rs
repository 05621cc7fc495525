use crate::asset::AssetInfo;
use crate::{pool, vault};
use cosmwasm_std::{
    to_json_binary, Addr, QuerierWrapper, QueryRequest, StdResult,
    Uint128, WasmQuery,
};
use cw20::{BalanceResponse as Cw20BalanceResponse, Cw20QueryMsg, TokenInfoResponse};

/// ## Description
/// Returns the cw20 token balance of `account_addr`.
pub fn query_token_balance(
    querier: &QuerierWrapper,
    contract_addr: Addr,
    account_addr: Addr,
) -> StdResult<Uint128> {
    let res: Cw20BalanceResponse = querier.query(&QueryRequest::Wasm(WasmQuery::Smart {
        contract_addr: String::from(contract_addr),
        msg: to_json_binary(&Cw20QueryMsg::Balance {
            address: String::from(account_addr),
        })?,
    }))?;
    Ok(res.balance)
}

/// ## Description
/// Returns the total supply at the specified contract address.
pub fn query_supply(querier: &QuerierWrapper, contract_addr: Addr) -> StdResult<Uint128> {
    let res: TokenInfoResponse =
        querier.query_wasm_smart(contract_addr, &Cw20QueryMsg::TokenInfo {})?;
    Ok(res.total_supply)
}

/// Returns the configuration of the Vault contract.
pub fn query_vault_config(
    querier: &QuerierWrapper,
    vault_contract: impl Into<String>,
) -> StdResult<vault::ConfigResponse> {
    querier.query_wasm_smart(vault_contract, &vault::QueryMsg::Config {})
}

/// Returns the cash / managed split of every token in a pool, read from the Vault ledger.
pub fn query_pool_tokens(
    querier: &QuerierWrapper,
    vault_contract: impl Into<String>,
    pool_id: Uint128,
) -> StdResult<vault::PoolTokensResponse> {
    querier.query_wasm_smart(vault_contract, &vault::QueryMsg::GetPoolTokens { pool_id })
}

/// Returns the ledger entry of a single token in a pool.
pub fn query_pool_token_info(
    querier: &QuerierWrapper,
    vault_contract: impl Into<String>,
    pool_id: Uint128,
    asset_info: AssetInfo,
) -> StdResult<vault::PoolTokenInfoResponse> {
    querier.query_wasm_smart(
        vault_contract,
        &vault::QueryMsg::GetPoolTokenInfo {
            pool_id,
            asset_info,
        },
    )
}

/// Returns the pool registration stored in the Vault.
pub fn query_pool_info(
    querier: &QuerierWrapper,
    vault_contract: impl Into<String>,
    pool_id: Uint128,
) -> StdResult<vault::PoolInfoResponse> {
    querier.query_wasm_smart(vault_contract, &vault::QueryMsg::GetPoolById { pool_id })
}

/// Returns the configuration for the Pool contract.
pub fn config_info_by_pool(
    querier: &QuerierWrapper,
    pool_contract: impl Into<String>,
) -> StdResult<pool::ConfigResponse> {
    querier.query_wasm_smart(pool_contract, &pool::QueryMsg::Config {})
}
