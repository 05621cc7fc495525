use crate::asset::AssetInfo;
use cosmwasm_std::{
    to_json_binary, Addr, BankMsg, Coin, CosmosMsg, MessageInfo, StdResult, Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x        Transfer tokens helper functions          x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// Returns a wasm msg transferring `amount` cw20 tokens held by the caller to `recipient`
pub fn build_transfer_cw20_token_msg(
    recipient: Addr,
    token_contract_address: String,
    amount: Uint128,
) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: token_contract_address,
        msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
            recipient: recipient.into(),
            amount,
        })?,
        funds: vec![],
    }))
}

/// Returns a bank msg sending `amount` of `denom` to `recipient`
pub fn build_send_native_asset_msg(
    recipient: Addr,
    denom: &str,
    amount: Uint128,
) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Bank(BankMsg::Send {
        to_address: recipient.into(),
        amount: vec![Coin {
            denom: denom.to_string(),
            amount,
        }],
    }))
}

/// Returns a wasm msg pulling cw20 tokens from `owner` to `recipient`. Requires an allowance
/// granted by `owner` to the sender of the message.
pub fn build_transfer_cw20_from_user_msg(
    cw20_token_address: String,
    owner: String,
    recipient: String,
    amount: Uint128,
) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: cw20_token_address,
        funds: vec![],
        msg: to_json_binary(&Cw20ExecuteMsg::TransferFrom {
            owner,
            recipient,
            amount,
        })?,
    }))
}

/// Returns a wasm msg approving `spender` to pull `amount` cw20 tokens from the caller
pub fn build_increase_allowance_msg(
    cw20_token_address: String,
    spender: String,
    amount: Uint128,
) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: cw20_token_address,
        funds: vec![],
        msg: to_json_binary(&Cw20ExecuteMsg::IncreaseAllowance {
            spender,
            amount,
            expires: None,
        })?,
    }))
}

/// Returns a msg sending `amount` of `asset` held by the caller to `recipient`
pub fn build_transfer_token_to_user_msg(
    asset: AssetInfo,
    recipient: Addr,
    amount: Uint128,
) -> StdResult<CosmosMsg> {
    match asset {
        AssetInfo::NativeToken { denom } => build_send_native_asset_msg(recipient, &denom, amount),
        AssetInfo::Token { contract_addr } => {
            build_transfer_cw20_token_msg(recipient, contract_addr.to_string(), amount)
        }
    }
}

/// Returns the number of native tokens of `denom` sent along with the message
pub fn find_sent_native_token_balance(message_info: &MessageInfo, denom: &str) -> Uint128 {
    message_info
        .funds
        .iter()
        .find(|coin| coin.denom == denom)
        .map(|coin| coin.amount)
        .unwrap_or_default()
}

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x        LP token naming helper functions          x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// Returns LP token name to be set for a new LP token being initialized
///
/// ## Params
/// * **pool_id** is the ID of the pool being created
/// * **lp_token_name** is the optional name provided by the creator of the pool
pub fn get_lp_token_name(pool_id: Uint128, lp_token_name: Option<String>) -> String {
    match lp_token_name {
        Some(name) => format!("{}-{}", pool_id, name),
        None => format!("{}-LBP-BPT", pool_id),
    }
}

/// Returns LP token symbol to be set for a new LP token being initialized
pub fn get_lp_token_symbol(lp_token_symbol: Option<String>) -> String {
    // numbers in symbol not supported
    match lp_token_symbol {
        Some(symbol) => format!("BPT-{}", symbol),
        None => "LBP-BPT".to_string(),
    }
}

pub fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 3 && bytes.len() <= 50
}

pub fn is_valid_symbol(symbol: &str) -> bool {
    let bytes = symbol.as_bytes();
    if bytes.len() < 3 || bytes.len() > 12 {
        return false;
    }
    bytes
        .iter()
        .all(|byte| *byte == b'-' || byte.is_ascii_alphabetic())
}
