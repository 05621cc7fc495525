use cosmwasm_std::{
    attr, entry_point, from_json, to_json_binary, Addr, Binary, CosmosMsg, Deps, DepsMut, Env,
    Event, MessageInfo, Reply, ReplyOn, Response, StdError, StdResult, Storage, SubMsg, Uint128,
    WasmMsg,
};
use cw2::{get_contract_version, set_contract_version};
use cw20::{Cw20ExecuteMsg, Cw20ReceiveMsg};
use cw_utils::parse_reply_instantiate_data;
use itertools::Itertools;

use crate::error::ContractError;
use crate::state::{CONFIG, POOLS, REGISTRY, TMP_POOL_INFO};

use lbp::asset::{Asset, AssetInfo, NativeAssetPrecisionInfo};
use lbp::helper::{
    build_send_native_asset_msg, build_transfer_cw20_from_user_msg,
    build_transfer_token_to_user_msg, find_sent_native_token_balance,
};
use lbp::pool::{
    AfterExitResponse, AfterJoinResponse, ExecuteMsg as PoolExecuteMsg,
    InstantiateMsg as PoolInstantiateMsg, LiquidityOperation, QueryMsg as PoolQueryMsg,
    SwapResponse,
};
use lbp::querier::config_info_by_pool;
use lbp::vault::{
    AssetManager, Config, ConfigResponse, Cw20HookMsg, ExecuteMsg, FeeInfo, InstantiateMsg,
    ManagedTransferDirection, MigrateMsg, PoolAssetBalance, PoolInfo, PoolInfoResponse,
    PoolTokenInfoResponse, PoolTokensResponse, PoolType, PoolTypeConfig, QueryMsg,
    SingleSwapRequest, SwapType, TmpPoolInfo,
};

/// Contract name that is used for migration.
const CONTRACT_NAME: &str = "lbp-vault";
/// Contract version that is used for migration.
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");
/// A `reply` call code ID of sub-message.
const INSTANTIATE_POOL_REPLY_ID: u64 = 1;

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x      Instantiate Contract : Execute function     x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// ## Description
/// Creates a new contract with the specified parameters in the [`InstantiateMsg`].
/// Returns the [`Response`] with the specified attributes if the operation was successful, or a [`ContractError`] if the contract was not created
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = Config {
        owner: deps.api.addr_validate(&msg.owner)?,
        lp_token_code_id: msg.lp_token_code_id,
        next_pool_id: Uint128::one(),
    };

    let unique_types = msg
        .pool_configs
        .iter()
        .map(|pc| pc.pool_type.to_string())
        .unique()
        .count();
    if unique_types != msg.pool_configs.len() {
        return Err(ContractError::PoolConfigDuplicate {});
    }

    for pc in msg.pool_configs.iter() {
        if !pc.default_fee_info.valid_fee_info() {
            return Err(ContractError::InvalidFeeInfo {});
        }
        REGISTRY.save(deps.storage, pc.pool_type.to_string(), pc)?;
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_event(
        Event::new("lbp-vault::instantiate")
            .add_attribute("owner", config.owner.to_string())
            .add_attribute("lp_token_code_id", config.lp_token_code_id.to_string()),
    ))
}

// ----------------x----------------x----------------x------------------x----------------x----------------
// ----------------x----------------x  Execute function :: Entry Point  x----------------x----------------
// ----------------x----------------x----------------x------------------x----------------x----------------

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Receive(msg) => receive_cw20(deps, env, info, msg),
        ExecuteMsg::UpdateConfig { lp_token_code_id } => {
            execute_update_config(deps, info, lp_token_code_id)
        }
        ExecuteMsg::UpdatePoolTypeConfig {
            pool_type,
            is_disabled,
            new_fee_info,
        } => execute_update_pool_type_config(deps, info, pool_type, is_disabled, new_fee_info),
        ExecuteMsg::CreatePoolInstance {
            pool_type,
            asset_infos,
            native_asset_precisions,
            lp_token_name,
            lp_token_symbol,
            asset_managers,
            init_params,
        } => execute_create_pool_instance(
            deps,
            env,
            pool_type,
            asset_infos,
            native_asset_precisions,
            lp_token_name,
            lp_token_symbol,
            asset_managers,
            init_params,
        ),
        ExecuteMsg::JoinPool {
            pool_id,
            recipient,
            assets,
            min_lp_to_receive,
        } => execute_join_pool(
            deps,
            env,
            info,
            pool_id,
            recipient,
            assets,
            min_lp_to_receive,
            false,
        ),
        ExecuteMsg::ManagedJoinPool {
            pool_id,
            recipient,
            assets,
            min_lp_to_receive,
        } => execute_join_pool(
            deps,
            env,
            info,
            pool_id,
            recipient,
            assets,
            min_lp_to_receive,
            true,
        ),
        ExecuteMsg::Swap {
            swap_request,
            recipient,
            min_receive,
            max_spend,
        } => execute_swap(deps, env, info, swap_request, recipient, min_receive, max_spend),
        ExecuteMsg::TransferAsManager {
            pool_id,
            asset_info,
            amount,
            direction,
        } => execute_transfer_as_manager(deps, env, info, pool_id, asset_info, amount, direction),
    }
}

/// ## Description
/// Receives BPT sent with a [`Cw20HookMsg`]. Exiting a pool is the only supported hook.
pub fn receive_cw20(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    match from_json(&cw20_msg.msg)? {
        Cw20HookMsg::ExitPool {
            pool_id,
            recipient,
            min_assets_out,
        } => execute_exit_pool(
            deps,
            env,
            info,
            pool_id,
            cw20_msg.sender,
            cw20_msg.amount,
            recipient,
            min_assets_out,
        ),
    }
}

//--------x---------------x--------------x-----
//--------x  Execute :: Config Updates   x-----
//--------x---------------x--------------x-----

/// ## Description - Updates general settings.
///
/// ##Executor - Only owner can execute it
pub fn execute_update_config(
    deps: DepsMut,
    info: MessageInfo,
    lp_token_code_id: Option<u64>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }

    if let Some(lp_token_code_id) = lp_token_code_id {
        config.lp_token_code_id = lp_token_code_id;
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "update_config"),
        attr("lp_token_code_id", config.lp_token_code_id.to_string()),
    ]))
}

/// ## Description - Updates a pool type's registry entry. Only affects pools created afterwards.
///
/// ## Executor
/// Only owner can execute it
pub fn execute_update_pool_type_config(
    deps: DepsMut,
    info: MessageInfo,
    pool_type: PoolType,
    is_disabled: Option<bool>,
    new_fee_info: Option<FeeInfo>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }

    let mut pool_config = REGISTRY
        .load(deps.storage, pool_type.to_string())
        .map_err(|_| ContractError::PoolConfigNotFound {})?;

    if let Some(is_disabled) = is_disabled {
        pool_config.is_disabled = is_disabled;
    }
    if let Some(new_fee_info) = new_fee_info {
        if !new_fee_info.valid_fee_info() {
            return Err(ContractError::InvalidFeeInfo {});
        }
        pool_config.default_fee_info = new_fee_info;
    }
    REGISTRY.save(deps.storage, pool_type.to_string(), &pool_config)?;

    Ok(Response::new().add_attributes(vec![
        attr("action", "update_pool_type_config"),
        attr("pool_type", pool_type.to_string()),
        attr("is_disabled", pool_config.is_disabled.to_string()),
        attr(
            "total_fee_bps",
            pool_config.default_fee_info.total_fee_bps.to_string(),
        ),
    ]))
}

//--------x---------------x--------------x-----
//--------x  Execute :: Create Pool      x-----
//--------x---------------x--------------x-----

/// ## Description - Creates a new pool of `pool_type` holding `asset_infos`.
///
/// `asset_managers` grant the asset manager capability over pool tokens. They are recorded in the
/// pool ledger and cannot be changed afterwards.
#[allow(clippy::too_many_arguments)]
pub fn execute_create_pool_instance(
    deps: DepsMut,
    env: Env,
    pool_type: PoolType,
    mut asset_infos: Vec<AssetInfo>,
    native_asset_precisions: Vec<NativeAssetPrecisionInfo>,
    lp_token_name: Option<String>,
    lp_token_symbol: Option<String>,
    asset_managers: Vec<AssetManager>,
    init_params: Option<Binary>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let pool_config = REGISTRY
        .load(deps.storage, pool_type.to_string())
        .map_err(|_| ContractError::PoolConfigNotFound {})?;
    if pool_config.is_disabled {
        return Err(ContractError::PoolConfigDisabled {});
    }

    // Assets are kept sorted, every ledger vector follows this order
    asset_infos.sort();
    for asset_info in asset_infos.iter() {
        asset_info.check(deps.api)?;
    }
    if asset_infos.iter().map(|a| a.as_string()).unique().count() != asset_infos.len() {
        return Err(ContractError::RepeatedAssets {});
    }
    if asset_infos.len() < 2 {
        return Err(ContractError::InvalidNumberOfAssets {});
    }

    let mut assets: Vec<PoolAssetBalance> = asset_infos
        .iter()
        .map(|info| PoolAssetBalance {
            info: info.clone(),
            cash: Uint128::zero(),
            managed: Uint128::zero(),
            asset_manager: None,
        })
        .collect();
    for asset_manager in asset_managers.iter() {
        let entry = assets
            .iter_mut()
            .find(|asset| asset.info.eq(&asset_manager.asset_info))
            .ok_or_else(|| ContractError::InvalidAssetManagers {
                reason: format!("{} is not a pool asset", asset_manager.asset_info),
            })?;
        if entry.asset_manager.is_some() {
            return Err(ContractError::InvalidAssetManagers {
                reason: format!("{} has more than one manager", asset_manager.asset_info),
            });
        }
        entry.asset_manager = Some(deps.api.addr_validate(&asset_manager.manager)?);
    }

    let pool_id = config.next_pool_id;
    TMP_POOL_INFO.save(
        deps.storage,
        &TmpPoolInfo {
            pool_id,
            pool_type: pool_config.pool_type.clone(),
            fee_info: pool_config.default_fee_info,
            assets,
        },
    )?;

    let sub_msg = SubMsg {
        id: INSTANTIATE_POOL_REPLY_ID,
        msg: WasmMsg::Instantiate {
            admin: Some(config.owner.to_string()),
            code_id: pool_config.code_id,
            msg: to_json_binary(&PoolInstantiateMsg {
                pool_id,
                pool_type: pool_config.pool_type.clone(),
                vault_addr: env.contract.address,
                asset_infos: asset_infos.clone(),
                native_asset_precisions,
                fee_info: pool_config.default_fee_info,
                lp_token_code_id: config.lp_token_code_id,
                lp_token_name,
                lp_token_symbol,
                asset_managers,
                init_params,
            })?,
            funds: vec![],
            label: format!("lbp-pool-{}", pool_id),
        }
        .into(),
        gas_limit: None,
        reply_on: ReplyOn::Success,
    };

    Ok(Response::new().add_submessage(sub_msg).add_attributes(vec![
        attr("action", "create_pool"),
        attr("pool_type", pool_type.to_string()),
        attr("pool_id", pool_id.to_string()),
    ]))
}

/// # Description
/// Registers the pool created by [`execute_create_pool_instance`] once its contract exists.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    if msg.id != INSTANTIATE_POOL_REPLY_ID {
        return Err(StdError::generic_err(format!("Unknown reply id {}", msg.id)).into());
    }
    let tmp_pool_info = TMP_POOL_INFO.load(deps.storage)?;

    let res = parse_reply_instantiate_data(msg)?;
    let pool_addr = deps.api.addr_validate(&res.contract_address)?;

    // The pool created its LP token in its own reply, which already ran
    let pool_config = config_info_by_pool(&deps.querier, pool_addr.to_string())?;
    let lp_token_addr = pool_config
        .lp_token_addr
        .ok_or(ContractError::LpTokenNotFound {})?;

    let pool_info = PoolInfo {
        pool_id: tmp_pool_info.pool_id,
        pool_addr: pool_addr.clone(),
        lp_token_addr: lp_token_addr.clone(),
        pool_type: tmp_pool_info.pool_type,
        fee_info: tmp_pool_info.fee_info,
        assets: tmp_pool_info.assets,
    };
    POOLS.save(deps.storage, pool_info.pool_id.u128(), &pool_info)?;
    TMP_POOL_INFO.remove(deps.storage);

    let mut config = CONFIG.load(deps.storage)?;
    config.next_pool_id = config.next_pool_id.checked_add(Uint128::one())?;
    CONFIG.save(deps.storage, &config)?;

    let mut event = Event::new("lbp-vault::create_pool")
        .add_attribute("pool_id", pool_info.pool_id.to_string())
        .add_attribute("pool_addr", pool_addr.to_string())
        .add_attribute("lp_token_addr", lp_token_addr.to_string());
    for asset in pool_info.assets.iter() {
        if let Some(manager) = &asset.asset_manager {
            event = event.add_attribute(format!("asset_manager_{}", asset.info), manager.to_string());
        }
    }

    Ok(Response::new().add_event(event))
}

//--------x---------------x--------------x-----x-----
//--------x    Execute :: Join / Exit Pool     x-----
//--------x---------------x--------------x-----x-----

/// ## Description - Joins a pool. The number of LP tokens and the amounts taken are decided by the
/// pool contract; the Vault collects the tokens, updates its ledger and mints the LP tokens.
///
/// With `managed` set, legs of tokens whose asset manager is the sender are booked to the
/// `managed` counter and no tokens move for them. Every other leg is collected and booked as cash.
#[allow(clippy::too_many_arguments)]
pub fn execute_join_pool(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pool_id: Uint128,
    recipient: Option<String>,
    assets: Vec<Asset>,
    min_lp_to_receive: Option<Uint128>,
    managed: bool,
) -> Result<Response, ContractError> {
    let mut pool_info = load_pool(deps.storage, pool_id)?;

    if managed
        && !pool_info
            .assets
            .iter()
            .any(|asset| asset.is_managed_by(&info.sender))
    {
        return Err(ContractError::NotAssetManager {
            asset: "any pool asset".to_string(),
        });
    }

    let after_join_res: AfterJoinResponse = deps.querier.query_wasm_smart(
        pool_info.pool_addr.to_string(),
        &PoolQueryMsg::OnJoinPool {
            sender: info.sender.to_string(),
            assets_in: assets,
        },
    )?;
    if let lbp::pool::ResponseType::Failure(reason) = after_join_res.response {
        return Err(ContractError::PoolQueryFailed { reason });
    }
    if after_join_res.provided_assets.len() != pool_info.assets.len() {
        return Err(ContractError::InvalidNumberOfAssets {});
    }

    let new_shares = after_join_res.new_shares;
    if let Some(min_lp) = min_lp_to_receive {
        if new_shares < min_lp {
            return Err(ContractError::MinLpReceive {
                min_lp,
                minted: new_shares,
            });
        }
    }

    let recipient = match recipient {
        Some(recipient) => deps.api.addr_validate(&recipient)?,
        None => info.sender.clone(),
    };

    let mut event = Event::new("lbp-vault::join_pool")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("pool_addr", pool_info.pool_addr.to_string())
        .add_attribute("sender", info.sender.to_string())
        .add_attribute("recipient", recipient.to_string())
        .add_attribute("lp_tokens_minted", new_shares.to_string());

    let mut execute_msgs: Vec<CosmosMsg> = vec![];
    for (stored_asset, provided) in pool_info
        .assets
        .iter_mut()
        .zip(after_join_res.provided_assets.iter())
    {
        // the returned list of assets needs to be in the same order as the stored one
        if stored_asset.info != provided.info {
            return Err(ContractError::InvalidSequenceOfAssets {});
        }

        if managed && stored_asset.is_managed_by(&info.sender) {
            stored_asset.managed = stored_asset.managed.checked_add(provided.amount)?;
            // nothing is collected for a managed leg, native funds sent for it go back
            execute_msgs.extend(collect_asset_msgs(
                &info,
                &env.contract.address,
                &stored_asset.info,
                Uint128::zero(),
            )?);
            event = event.add_attribute(
                format!("managed_{}", stored_asset.info),
                provided.amount.to_string(),
            );
        } else {
            stored_asset.cash = stored_asset.cash.checked_add(provided.amount)?;
            execute_msgs.extend(collect_asset_msgs(
                &info,
                &env.contract.address,
                &stored_asset.info,
                provided.amount,
            )?);
            event = event.add_attribute(
                format!("cash_{}", stored_asset.info),
                provided.amount.to_string(),
            );
        }
    }
    POOLS.save(deps.storage, pool_id.u128(), &pool_info)?;

    execute_msgs.push(build_update_pool_state_msg(
        &pool_info,
        LiquidityOperation::Join,
    )?);
    execute_msgs.push(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: pool_info.lp_token_addr.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::Mint {
            recipient: recipient.to_string(),
            amount: new_shares,
        })?,
        funds: vec![],
    }));

    Ok(Response::new()
        .add_messages(execute_msgs)
        .add_attribute("action", "join_pool")
        .add_event(event))
}

/// ## Description - Exits a pool by burning the LP tokens sent to the Vault. The amounts returned are
/// decided by the pool contract and are paid out of the cash balances only.
#[allow(clippy::too_many_arguments)]
pub fn execute_exit_pool(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    pool_id: Uint128,
    sender: String,
    lp_amount: Uint128,
    recipient: Option<String>,
    min_assets_out: Option<Vec<Asset>>,
) -> Result<Response, ContractError> {
    let mut pool_info = load_pool(deps.storage, pool_id)?;

    // Only the pool's LP token can trigger an exit
    if info.sender != pool_info.lp_token_addr {
        return Err(ContractError::Unauthorized {});
    }

    let after_burn_res: AfterExitResponse = deps.querier.query_wasm_smart(
        pool_info.pool_addr.to_string(),
        &PoolQueryMsg::OnExitPool {
            burn_amount: lp_amount,
        },
    )?;
    if let lbp::pool::ResponseType::Failure(reason) = after_burn_res.response {
        return Err(ContractError::PoolQueryFailed { reason });
    }
    if after_burn_res.burn_shares > lp_amount {
        return Err(ContractError::InsufficientLpTokensToExit {});
    }
    if after_burn_res.assets_out.len() != pool_info.assets.len() {
        return Err(ContractError::InvalidNumberOfAssets {});
    }
    let lp_to_return = lp_amount.checked_sub(after_burn_res.burn_shares)?;

    let sender = deps.api.addr_validate(&sender)?;
    let recipient = match recipient {
        Some(recipient) => deps.api.addr_validate(&recipient)?,
        None => sender.clone(),
    };

    let mut event = Event::new("lbp-vault::exit_pool")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("pool_addr", pool_info.pool_addr.to_string())
        .add_attribute("sender", sender.to_string())
        .add_attribute("recipient", recipient.to_string())
        .add_attribute("lp_tokens_burnt", after_burn_res.burn_shares.to_string());

    let mut execute_msgs: Vec<CosmosMsg> = vec![];
    for (stored_asset, asset_out) in pool_info
        .assets
        .iter_mut()
        .zip(after_burn_res.assets_out.iter())
    {
        if stored_asset.info != asset_out.info {
            return Err(ContractError::InvalidSequenceOfAssets {});
        }
        if let Some(min_out) = min_assets_out
            .iter()
            .flatten()
            .find(|min| min.info.eq(&asset_out.info))
        {
            if asset_out.amount < min_out.amount {
                return Err(ContractError::MinAssetsOut {
                    asset: asset_out.info.to_string(),
                    min: min_out.amount,
                    received: asset_out.amount,
                });
            }
        }
        if asset_out.amount.is_zero() {
            continue;
        }

        pay_out_of_cash(stored_asset, asset_out.amount)?;
        execute_msgs.push(asset_out.clone().into_msg(recipient.clone())?);
        event = event.add_attribute(asset_out.info.to_string(), asset_out.amount.to_string());
    }
    POOLS.save(deps.storage, pool_id.u128(), &pool_info)?;

    execute_msgs.push(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: pool_info.lp_token_addr.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::Burn {
            amount: after_burn_res.burn_shares,
        })?,
        funds: vec![],
    }));
    if !lp_to_return.is_zero() {
        execute_msgs.push(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: pool_info.lp_token_addr.to_string(),
            msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                recipient: sender.to_string(),
                amount: lp_to_return,
            })?,
            funds: vec![],
        }));
    }
    execute_msgs.push(build_update_pool_state_msg(
        &pool_info,
        LiquidityOperation::Exit,
    )?);

    Ok(Response::new()
        .add_messages(execute_msgs)
        .add_attribute("action", "exit_pool")
        .add_event(event))
}

//--------x---------------x--------------x-----x-----
//--------x    Execute :: Swap Tx Execution    x-----
//--------x---------------x--------------x-----x-----

/// ## Description - Swaps against a single pool. The amounts are computed by the pool contract.
///
/// The offer asset is booked as cash. The ask asset is paid out of cash only, so managed balances
/// can never be swapped out of the Vault.
///
/// ## Params
/// * **min_receive** minimum amount out for `GiveIn` swaps
/// * **max_spend** maximum amount in for `GiveOut` swaps
pub fn execute_swap(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    swap_request: SingleSwapRequest,
    recipient: Option<String>,
    min_receive: Option<Uint128>,
    max_spend: Option<Uint128>,
) -> Result<Response, ContractError> {
    let mut pool_info = load_pool(deps.storage, swap_request.pool_id)?;

    if swap_request.amount.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }
    if swap_request.asset_in == swap_request.asset_out {
        return Err(ContractError::SameTokenError {});
    }

    let swap_response: SwapResponse = deps.querier.query_wasm_smart(
        pool_info.pool_addr.to_string(),
        &PoolQueryMsg::OnSwap {
            swap_type: swap_request.swap_type.clone(),
            offer_asset: swap_request.asset_in.clone(),
            ask_asset: swap_request.asset_out.clone(),
            amount: swap_request.amount,
        },
    )?;
    if let lbp::pool::ResponseType::Failure(reason) = swap_response.response {
        return Err(ContractError::PoolQueryFailed { reason });
    }
    let trade = swap_response.trade_params;

    match swap_request.swap_type {
        SwapType::GiveIn {} => {
            if let Some(min_receive) = min_receive {
                if trade.amount_out < min_receive {
                    return Err(ContractError::MinReceiveError {
                        min_receive,
                        received: trade.amount_out,
                    });
                }
            }
        }
        SwapType::GiveOut {} => {
            if let Some(max_spend) = max_spend {
                if trade.amount_in > max_spend {
                    return Err(ContractError::MaxSpendError {
                        max_spend,
                        spent: trade.amount_in,
                    });
                }
            }
        }
    }

    let recipient = match recipient {
        Some(recipient) => deps.api.addr_validate(&recipient)?,
        None => info.sender.clone(),
    };

    let offer_asset = Asset::new(swap_request.asset_in.clone(), trade.amount_in);
    let ask_asset = Asset::new(swap_request.asset_out.clone(), trade.amount_out);

    let mut execute_msgs: Vec<CosmosMsg> = vec![];
    let mut offer_asset_updated = false;
    let mut ask_asset_updated = false;
    for stored_asset in pool_info.assets.iter_mut() {
        if stored_asset.info == offer_asset.info {
            stored_asset.cash = stored_asset.cash.checked_add(offer_asset.amount)?;
            execute_msgs.extend(collect_asset_msgs(
                &info,
                &env.contract.address,
                &offer_asset.info,
                offer_asset.amount,
            )?);
            offer_asset_updated = true;
        } else if stored_asset.info == ask_asset.info {
            pay_out_of_cash(stored_asset, ask_asset.amount)?;
            execute_msgs.push(ask_asset.clone().into_msg(recipient.clone())?);
            ask_asset_updated = true;
        }
    }
    if !offer_asset_updated || !ask_asset_updated {
        return Err(ContractError::MismatchedAssets {});
    }
    POOLS.save(deps.storage, swap_request.pool_id.u128(), &pool_info)?;

    execute_msgs.push(build_update_pool_state_msg(
        &pool_info,
        LiquidityOperation::Swap,
    )?);

    let mut event = Event::new("lbp-vault::swap")
        .add_attribute("pool_id", swap_request.pool_id.to_string())
        .add_attribute("pool_addr", pool_info.pool_addr.to_string())
        .add_attribute("swap_type", swap_request.swap_type.to_string())
        .add_attribute("sender", info.sender.to_string())
        .add_attribute("recipient", recipient.to_string())
        .add_attribute("offer_asset", offer_asset.info.to_string())
        .add_attribute("offer_amount", offer_asset.amount.to_string())
        .add_attribute("ask_asset", ask_asset.info.to_string())
        .add_attribute("ask_amount", ask_asset.amount.to_string())
        .add_attribute("spread", trade.spread.to_string());
    if let Some(fee) = swap_response.fee {
        event = event.add_attribute("fee", fee.to_string());
    }

    Ok(Response::new()
        .add_messages(execute_msgs)
        .add_attribute("action", "swap")
        .add_event(event))
}

//--------x---------------x--------------x-----x-----
//--------x    Execute :: Asset Manager        x-----
//--------x---------------x--------------x-----x-----

/// ## Description - Moves `amount` of a pool token between its cash and managed counters.
///
/// * `ToManaged` sends cash held by the Vault to the asset manager.
/// * `ToCash` collects the tokens back from the asset manager.
///
/// The pool total (cash + managed) is unchanged, so the pool contract is not notified.
///
/// ## Executor
/// Only the asset manager of `asset_info` in the pool
pub fn execute_transfer_as_manager(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    pool_id: Uint128,
    asset_info: AssetInfo,
    amount: Uint128,
    direction: ManagedTransferDirection,
) -> Result<Response, ContractError> {
    let mut pool_info = load_pool(deps.storage, pool_id)?;
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {});
    }

    let stored_asset = pool_info
        .assets
        .iter_mut()
        .find(|asset| asset.info.eq(&asset_info))
        .ok_or(ContractError::MismatchedAssets {})?;
    if !stored_asset.is_managed_by(&info.sender) {
        return Err(ContractError::NotAssetManager {
            asset: asset_info.to_string(),
        });
    }

    let mut execute_msgs: Vec<CosmosMsg> = vec![];
    match direction {
        ManagedTransferDirection::ToManaged => {
            pay_out_of_cash(stored_asset, amount)?;
            stored_asset.managed = stored_asset.managed.checked_add(amount)?;
            execute_msgs.push(build_transfer_token_to_user_msg(
                asset_info.clone(),
                info.sender.clone(),
                amount,
            )?);
        }
        ManagedTransferDirection::ToCash => {
            if stored_asset.managed < amount {
                return Err(ContractError::InsufficientManagedBalance {
                    asset: asset_info.to_string(),
                    available: stored_asset.managed,
                    needed: amount,
                });
            }
            stored_asset.managed = stored_asset.managed.checked_sub(amount)?;
            stored_asset.cash = stored_asset.cash.checked_add(amount)?;
            execute_msgs.extend(collect_asset_msgs(
                &info,
                &env.contract.address,
                &asset_info,
                amount,
            )?);
        }
    }

    let event = Event::new("lbp-vault::transfer_as_manager")
        .add_attribute("pool_id", pool_id.to_string())
        .add_attribute("asset", asset_info.to_string())
        .add_attribute("manager", info.sender.to_string())
        .add_attribute("direction", direction.to_string())
        .add_attribute("amount", amount.to_string())
        .add_attribute("cash", stored_asset.cash.to_string())
        .add_attribute("managed", stored_asset.managed.to_string());
    POOLS.save(deps.storage, pool_id.u128(), &pool_info)?;

    Ok(Response::new()
        .add_messages(execute_msgs)
        .add_attribute("action", "transfer_as_manager")
        .add_event(event))
}

// ----------------x----------------x---------------------x-----------------------x----------------x----------------
// ----------------x----------------x  :::: VAULT::QUERIES Implementation   ::::  x----------------x----------------
// ----------------x----------------x---------------------x-----------------------x----------------x----------------

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::QueryRegistry { pool_type } => {
            to_json_binary(&query_registry(deps, pool_type)?)
        }
        QueryMsg::GetPoolById { pool_id } => to_json_binary(&query_pool_by_id(deps, pool_id)?),
        QueryMsg::GetPoolByAddress { pool_addr } => {
            to_json_binary(&query_pool_by_addr(deps, pool_addr)?)
        }
        QueryMsg::GetPoolTokens { pool_id } => {
            to_json_binary(&query_pool_tokens(deps, pool_id)?)
        }
        QueryMsg::GetPoolTokenInfo {
            pool_id,
            asset_info,
        } => to_json_binary(&query_pool_token_info(deps, pool_id, asset_info)?),
    }
}

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        owner: config.owner,
        lp_token_code_id: config.lp_token_code_id,
        next_pool_id: config.next_pool_id,
    })
}

pub fn query_registry(deps: Deps, pool_type: PoolType) -> StdResult<Option<PoolTypeConfig>> {
    REGISTRY.may_load(deps.storage, pool_type.to_string())
}

pub fn query_pool_by_id(deps: Deps, pool_id: Uint128) -> StdResult<PoolInfoResponse> {
    POOLS.load(deps.storage, pool_id.u128())
}

/// The pool is asked for its id, then looked up in the registry
pub fn query_pool_by_addr(deps: Deps, pool_addr: String) -> StdResult<PoolInfoResponse> {
    let pool_id: Uint128 = deps
        .querier
        .query_wasm_smart(pool_addr.clone(), &PoolQueryMsg::PoolId {})?;
    let pool_info = POOLS.load(deps.storage, pool_id.u128())?;
    if pool_info.pool_addr.as_str() != pool_addr {
        return Err(StdError::generic_err(format!(
            "{} is not a registered pool",
            pool_addr
        )));
    }
    Ok(pool_info)
}

pub fn query_pool_tokens(deps: Deps, pool_id: Uint128) -> StdResult<PoolTokensResponse> {
    let pool_info = POOLS.load(deps.storage, pool_id.u128())?;
    Ok(PoolTokensResponse {
        tokens: pool_info.assets.iter().map(|a| a.info.clone()).collect(),
        balances: pool_info
            .assets
            .iter()
            .map(|a| a.total())
            .collect::<StdResult<Vec<_>>>()?,
        cash_balances: pool_info.assets.iter().map(|a| a.cash).collect(),
        managed_balances: pool_info.assets.iter().map(|a| a.managed).collect(),
        asset_managers: pool_info
            .assets
            .iter()
            .map(|a| a.asset_manager.clone())
            .collect(),
    })
}

pub fn query_pool_token_info(
    deps: Deps,
    pool_id: Uint128,
    asset_info: AssetInfo,
) -> StdResult<PoolTokenInfoResponse> {
    let pool_info = POOLS.load(deps.storage, pool_id.u128())?;
    let entry = pool_info
        .assets
        .into_iter()
        .find(|a| a.info.eq(&asset_info))
        .ok_or_else(|| {
            StdError::generic_err(format!("{} is not a token of pool {}", asset_info, pool_id))
        })?;
    Ok(PoolTokenInfoResponse {
        balance: entry.total()?,
        asset_info: entry.info,
        cash: entry.cash,
        managed: entry.managed,
        asset_manager: entry.asset_manager,
    })
}

// ----------------x----------------x---------------------x-------------------x----------------x----------------
// ----------------x----------------x  :::: VAULT::Migration function   ::::  x----------------x----------------
// ----------------x----------------x---------------------x-------------------x----------------x----------------

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let contract_version = get_contract_version(deps.storage)?;
    if contract_version.contract != CONTRACT_NAME {
        return Err(StdError::generic_err("Can only upgrade from same contract type").into());
    }
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("previous_contract_name", &contract_version.contract)
        .add_attribute("previous_contract_version", &contract_version.version)
        .add_attribute("new_contract_name", CONTRACT_NAME)
        .add_attribute("new_contract_version", CONTRACT_VERSION))
}

// ----------------x----------------x---------------------x-------------------x----------------x-----
// ----------------x----------------x  :::: helper functions  ::::  x----------------x---------------
// ----------------x----------------x---------------------x-------------------x----------------x-----

fn load_pool(storage: &dyn Storage, pool_id: Uint128) -> Result<PoolInfo, ContractError> {
    POOLS
        .may_load(storage, pool_id.u128())?
        .ok_or(ContractError::InvalidPoolId { pool_id })
}

/// Debits `amount` from the cash counter, the only balance the Vault can pay out of
fn pay_out_of_cash(asset: &mut PoolAssetBalance, amount: Uint128) -> Result<(), ContractError> {
    if asset.cash < amount {
        return Err(ContractError::InsufficientCashBalance {
            asset: asset.info.to_string(),
            available: asset.cash,
            needed: amount,
        });
    }
    asset.cash = asset.cash.checked_sub(amount)?;
    Ok(())
}

/// ## Description
/// Messages collecting `amount` of `asset_info` from the sender into the Vault.
/// CW20 tokens are pulled with `TransferFrom`. Native tokens must be attached to the message,
/// anything above `amount` is refunded.
fn collect_asset_msgs(
    info: &MessageInfo,
    vault: &Addr,
    asset_info: &AssetInfo,
    amount: Uint128,
) -> Result<Vec<CosmosMsg>, ContractError> {
    match asset_info {
        AssetInfo::Token { contract_addr } => {
            if amount.is_zero() {
                return Ok(vec![]);
            }
            Ok(vec![build_transfer_cw20_from_user_msg(
                contract_addr.to_string(),
                info.sender.to_string(),
                vault.to_string(),
                amount,
            )?])
        }
        AssetInfo::NativeToken { denom } => {
            let sent = find_sent_native_token_balance(info, denom);
            if sent < amount {
                return Err(ContractError::InsufficientNativeTokensSent {
                    denom: denom.to_string(),
                    sent,
                    needed: amount,
                });
            }
            if sent > amount {
                return Ok(vec![build_send_native_asset_msg(
                    info.sender.clone(),
                    denom,
                    sent.checked_sub(amount)?,
                )?]);
            }
            Ok(vec![])
        }
    }
}

pub fn build_update_pool_state_msg(
    pool_info: &PoolInfo,
    operation: LiquidityOperation,
) -> StdResult<CosmosMsg> {
    Ok(CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: pool_info.pool_addr.to_string(),
        funds: vec![],
        msg: to_json_binary(&PoolExecuteMsg::UpdateLiquidity {
            assets: pool_info.total_assets()?,
            operation,
        })?,
    }))
}
