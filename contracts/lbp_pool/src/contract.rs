use cosmwasm_std::{
    entry_point, from_json, to_json_binary, Addr, Binary, Decimal256, Deps, DepsMut, Env, Event,
    MessageInfo, Reply, ReplyOn, Response, StdError, SubMsg, Uint128, WasmMsg,
};
use cw2::{get_contract_version, set_contract_version};
use cw20::MinterResponse;
use cw_utils::parse_reply_instantiate_data;

use lbp::asset::{Asset, AssetInfo, Decimal256Ext, DecimalAsset};
use lbp::decimal2decimal256;
use lbp::helper::{get_lp_token_name, get_lp_token_symbol};
use lbp::lp_token::InstantiateMsg as TokenInstantiateMsg;
use lbp::pool::{
    return_exit_failure, return_join_failure, return_swap_failure, AfterExitResponse,
    AfterJoinResponse, ConfigResponse, CurrentWeightsResponse, ExecuteMsg, FeeResponse,
    InstantiateMsg, InvariantResponse, LbpParams, LiquidityOperation, MigrateMsg, PoolStatus,
    PoolStatusResponse, QueryMsg, ResponseType, SpotPriceResponse, SwapResponse,
    TokenInfoResponse, WeightPair, LP_TOKEN_PRECISION,
};
use lbp::querier::{query_pool_token_info, query_supply};
use lbp::vault::SwapType;

use crate::error::ContractError;
use crate::math::{
    calc_bpt_out_given_exact_tokens_in, calc_initial_bpt, calc_spot_price,
    calc_tokens_out_given_exact_bpt_in, calculate_invariant,
};
use crate::schedule::{validate_weights, GradualWeightUpdate};
use crate::state::{store_precisions, Config, CONFIG, WEIGHT_SCHEDULE};
use crate::utils::{
    compute_offer_amount, compute_swap, ordered_weights, swap_leg, transform_to_decimal_asset,
};

/// Contract name that is used for migration.
const CONTRACT_NAME: &str = "lbp-pool";
/// Contract version that is used for migration.
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");
/// A `reply` call code ID of sub-message.
const INSTANTIATE_TOKEN_REPLY_ID: u64 = 1;

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x      Instantiate Contract : Execute function     x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// ## Description
/// Creates a new bootstrapping pool. Called by the Vault from `CreatePoolInstance`.
///
/// The pool holds exactly two tokens with explicit roles. The reserve token must be the only
/// asset managed token and its manager must be the pool owner.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.asset_infos.len() != 2 {
        return Err(ContractError::InvalidNumberOfAssets {});
    }
    if msg.asset_infos[0].eq(&msg.asset_infos[1]) {
        return Err(ContractError::RepeatedAssets {});
    }
    if !msg.fee_info.valid_fee_info() {
        return Err(ContractError::InvalidFeeInfo {});
    }

    let params: LbpParams = match &msg.init_params {
        Some(init_params) => from_json(init_params)?,
        None => return Err(ContractError::InitParamsNotFound {}),
    };

    let reserve_asset = match msg
        .asset_infos
        .iter()
        .position(|asset_info| asset_info.eq(&params.project_asset))
    {
        Some(project_index) => msg.asset_infos[1 - project_index].clone(),
        None => {
            return Err(ContractError::InvalidAssetManagers {
                reason: format!("project asset {} is not in the pool", params.project_asset),
            })
        }
    };

    let owner = deps.api.addr_validate(&params.owner)?;
    validate_asset_managers(&msg, &reserve_asset, &owner)?;
    validate_weights(&params.weights)?;

    store_precisions(
        deps.storage,
        &deps.querier,
        &msg.asset_infos,
        &msg.native_asset_precisions,
    )?;

    let now = env.block.time.seconds();
    WEIGHT_SCHEDULE.save(
        deps.storage,
        &GradualWeightUpdate::constant(params.weights, now)?,
    )?;

    let config = Config {
        pool_id: msg.pool_id,
        lp_token_addr: None,
        vault_addr: msg.vault_addr.clone(),
        owner,
        pool_type: msg.pool_type.clone(),
        fee_info: msg.fee_info,
        project_asset: params.project_asset,
        reserve_asset,
        assets: msg
            .asset_infos
            .iter()
            .map(|info| Asset::new(info.clone(), Uint128::zero()))
            .collect(),
        swap_enabled: params.swap_enabled_on_start,
        status: PoolStatus::Uninitialized,
        block_time_last: now,
    };
    CONFIG.save(deps.storage, &config)?;

    // Create the BPT token, minted and burned by the Vault
    let sub_msg = SubMsg {
        msg: WasmMsg::Instantiate {
            code_id: msg.lp_token_code_id,
            msg: to_json_binary(&TokenInstantiateMsg {
                name: get_lp_token_name(msg.pool_id, msg.lp_token_name.clone()),
                symbol: get_lp_token_symbol(msg.lp_token_symbol.clone()),
                decimals: LP_TOKEN_PRECISION,
                initial_balances: vec![],
                mint: Some(MinterResponse {
                    minter: msg.vault_addr.to_string(),
                    cap: None,
                }),
                marketing: None,
            })?,
            funds: vec![],
            admin: None,
            label: String::from("LBP share token"),
        }
        .into(),
        id: INSTANTIATE_TOKEN_REPLY_ID,
        gas_limit: None,
        reply_on: ReplyOn::Success,
    };

    let event = Event::new("lbp-pool::instantiate")
        .add_attribute("pool_id", config.pool_id.to_string())
        .add_attribute("owner", config.owner.to_string())
        .add_attribute("project_asset", config.project_asset.to_string())
        .add_attribute("reserve_asset", config.reserve_asset.to_string())
        .add_attribute("swap_enabled", config.swap_enabled.to_string());

    Ok(Response::new().add_event(event).add_submessage(sub_msg))
}

fn validate_asset_managers(
    msg: &InstantiateMsg,
    reserve_asset: &AssetInfo,
    owner: &Addr,
) -> Result<(), ContractError> {
    let manager = match msg.asset_managers.as_slice() {
        [manager] => manager,
        _ => {
            return Err(ContractError::InvalidAssetManagers {
                reason: "exactly one asset manager is required".to_string(),
            })
        }
    };
    if !manager.asset_info.eq(reserve_asset) {
        return Err(ContractError::InvalidAssetManagers {
            reason: "only the reserve token can be asset managed".to_string(),
        });
    }
    if manager.manager != owner.as_str() {
        return Err(ContractError::InvalidAssetManagers {
            reason: "the reserve manager must be the pool owner".to_string(),
        });
    }
    Ok(())
}

/// # Description
/// Stores the BPT token address from the instantiate reply.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    if msg.id != INSTANTIATE_TOKEN_REPLY_ID {
        return Err(StdError::generic_err(format!("Unknown reply id {}", msg.id)).into());
    }

    let mut config = CONFIG.load(deps.storage)?;
    if config.lp_token_addr.is_some() {
        return Err(ContractError::LpTokenAlreadySet {});
    }

    let res = parse_reply_instantiate_data(msg)?;
    let lp_token_addr = deps.api.addr_validate(&res.contract_address)?;
    config.lp_token_addr = Some(lp_token_addr.clone());
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("lp_token_addr", lp_token_addr))
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
        ExecuteMsg::UpdateLiquidity { assets, operation } => {
            execute_update_pool_liquidity(deps, env, info, assets, operation)
        }
        ExecuteMsg::SetSwapEnabled { enabled } => execute_set_swap_enabled(deps, info, enabled),
        ExecuteMsg::UpdateWeightsGradually {
            start_time,
            end_time,
            end_weights,
        } => execute_update_weights_gradually(deps, env, info, start_time, end_time, end_weights),
    }
}

/// ## Description
/// Vault only. Mirrors the ledger totals after the Vault committed an operation and moves the
/// pool status forward: the first join funds the pool, the first swap activates it.
pub fn execute_update_pool_liquidity(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    assets: Vec<Asset>,
    operation: LiquidityOperation,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.vault_addr {
        return Err(ContractError::Unauthorized {});
    }
    if assets.len() != config.assets.len()
        || assets.iter().any(|asset| config.asset(&asset.info).is_none())
    {
        return Err(ContractError::InvalidNumberOfAssets {});
    }

    config.status = match (config.status, operation) {
        (PoolStatus::Uninitialized, LiquidityOperation::Join) => PoolStatus::Funded,
        (PoolStatus::Funded, LiquidityOperation::Swap) => PoolStatus::Active,
        (status, _) => status,
    };
    config.assets = assets;
    config.block_time_last = env.block.time.seconds();
    CONFIG.save(deps.storage, &config)?;

    let mut event = Event::new("lbp-pool::update_liquidity")
        .add_attribute("pool_id", config.pool_id.to_string())
        .add_attribute("operation", operation.to_string())
        .add_attribute("status", config.status.to_string());
    for asset in config.assets.iter() {
        event = event.add_attribute(asset.info.to_string(), asset.amount.to_string());
    }

    Ok(Response::new().add_event(event))
}

/// Owner only
pub fn execute_set_swap_enabled(
    deps: DepsMut,
    info: MessageInfo,
    enabled: bool,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }
    config.swap_enabled = enabled;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_event(
        Event::new("lbp-pool::set_swap_enabled")
            .add_attribute("pool_id", config.pool_id.to_string())
            .add_attribute("swap_enabled", enabled.to_string()),
    ))
}

/// ## Description
/// Owner only. Schedules a linear move from the current weights to `end_weights`.
/// A start time in the past is moved to the current block time.
pub fn execute_update_weights_gradually(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    start_time: u64,
    end_time: u64,
    end_weights: WeightPair,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.owner {
        return Err(ContractError::Unauthorized {});
    }

    let now = env.block.time.seconds();
    let current = WEIGHT_SCHEDULE.load(deps.storage)?.weights_at(now);
    let start_time = start_time.max(now);
    let schedule = GradualWeightUpdate::new(start_time, end_time, current, end_weights)?;
    WEIGHT_SCHEDULE.save(deps.storage, &schedule)?;

    Ok(Response::new().add_event(
        Event::new("lbp-pool::update_weights_gradually")
            .add_attribute("pool_id", config.pool_id.to_string())
            .add_attribute("start_time", start_time.to_string())
            .add_attribute("end_time", end_time.to_string())
            .add_attribute("start_project_weight", current.project.to_string())
            .add_attribute("end_project_weight", end_weights.project.to_string()),
    ))
}

// ----------------x----------------x---------------------x-----------------------x----------------x----------------
// ----------------x----------------x  :::: LBP POOL::QUERIES Implementation   ::::  x----------------x----------------
// ----------------x----------------x---------------------x-----------------------x----------------x----------------

/// ## Description
/// Available the query messages of the contract.
///
/// `OnJoinPool`, `OnExitPool` and `OnSwap` never fail: math errors are returned as
/// [`ResponseType::Failure`] for the Vault to surface.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let res = match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?)?,
        QueryMsg::FeeParams {} => to_json_binary(&FeeResponse {
            total_fee_bps: CONFIG.load(deps.storage)?.fee_info.total_fee_bps,
        })?,
        QueryMsg::PoolId {} => to_json_binary(&CONFIG.load(deps.storage)?.pool_id)?,
        QueryMsg::OnJoinPool { sender, assets_in } => to_json_binary(
            &query_on_join_pool(deps, &env, sender, assets_in)
                .unwrap_or_else(|e| return_join_failure(e.to_string())),
        )?,
        QueryMsg::OnExitPool { burn_amount } => to_json_binary(
            &query_on_exit_pool(deps, burn_amount)
                .unwrap_or_else(|e| return_exit_failure(e.to_string())),
        )?,
        QueryMsg::OnSwap {
            swap_type,
            offer_asset,
            ask_asset,
            amount,
        } => to_json_binary(
            &query_on_swap(deps, &env, swap_type, offer_asset, ask_asset, amount)
                .unwrap_or_else(|e| return_swap_failure(e.to_string())),
        )?,
        QueryMsg::CurrentWeights {} => to_json_binary(&query_current_weights(deps, &env)?)?,
        QueryMsg::GradualWeightUpdateParams {} => {
            to_json_binary(&WEIGHT_SCHEDULE.load(deps.storage)?.to_response())?
        }
        QueryMsg::SwapEnabled {} => to_json_binary(&CONFIG.load(deps.storage)?.swap_enabled)?,
        QueryMsg::TokenInfo { asset_info } => to_json_binary(&query_token_info(deps, asset_info)?)?,
        QueryMsg::SpotPrice {
            offer_asset,
            ask_asset,
        } => to_json_binary(&query_spot_price(deps, &env, offer_asset, ask_asset)?)?,
        QueryMsg::Invariant {} => to_json_binary(&query_invariant(deps, &env)?)?,
        QueryMsg::Status {} => {
            let config = CONFIG.load(deps.storage)?;
            to_json_binary(&PoolStatusResponse {
                status: config.status,
                swap_enabled: config.swap_enabled,
            })?
        }
    };
    Ok(res)
}

pub fn query_config(deps: Deps) -> Result<ConfigResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        pool_id: config.pool_id,
        lp_token_addr: config.lp_token_addr,
        vault_addr: config.vault_addr,
        owner: config.owner,
        pool_type: config.pool_type,
        project_asset: config.project_asset,
        reserve_asset: config.reserve_asset,
        assets: config.assets,
        fee_info: config.fee_info,
        swap_enabled: config.swap_enabled,
        block_time_last: config.block_time_last,
    })
}

fn current_weights(deps: Deps, env: &Env) -> Result<WeightPair, ContractError> {
    Ok(WEIGHT_SCHEDULE
        .load(deps.storage)?
        .weights_at(env.block.time.seconds()))
}

pub fn query_current_weights(deps: Deps, env: &Env) -> Result<CurrentWeightsResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let weights = current_weights(deps, env)?;
    Ok(CurrentWeightsResponse {
        weights: vec![
            (config.project_asset, weights.project),
            (config.reserve_asset, weights.reserve),
        ],
    })
}

/// Ledger entry of a pool token, read from the Vault in the same query
pub fn query_token_info(
    deps: Deps,
    asset_info: AssetInfo,
) -> Result<TokenInfoResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if config.asset(&asset_info).is_none() {
        return Err(ContractError::UnknownToken {
            asset: asset_info.to_string(),
        });
    }

    let entry = query_pool_token_info(
        &deps.querier,
        config.vault_addr,
        config.pool_id,
        asset_info,
    )?;
    Ok(TokenInfoResponse {
        asset_info: entry.asset_info,
        balance: entry.balance,
        cash: entry.cash,
        managed: entry.managed,
        asset_manager: entry.asset_manager,
    })
}

pub fn query_spot_price(
    deps: Deps,
    env: &Env,
    offer_asset: AssetInfo,
    ask_asset: AssetInfo,
) -> Result<SpotPriceResponse, ContractError> {
    if offer_asset.eq(&ask_asset) {
        return Err(ContractError::SameAssets {});
    }
    let config = CONFIG.load(deps.storage)?;
    let weights = current_weights(deps, env)?;
    let offer = swap_leg(deps.storage, &config, &weights, &offer_asset)?;
    let ask = swap_leg(deps.storage, &config, &weights, &ask_asset)?;

    Ok(SpotPriceResponse {
        price: calc_spot_price(offer.pool.amount, offer.weight, ask.pool.amount, ask.weight)?,
    })
}

pub fn query_invariant(deps: Deps, env: &Env) -> Result<InvariantResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if !config.is_funded() {
        return Err(ContractError::PoolNotFunded {});
    }
    let weights = ordered_weights(&config, &current_weights(deps, env)?)?;
    let balances = transform_to_decimal_asset(deps.storage, &config.assets)?
        .into_iter()
        .map(|asset| asset.amount)
        .collect::<Vec<_>>();

    Ok(InvariantResponse {
        invariant: calculate_invariant(&weights, &balances)?,
    })
}

//--------x------------------x--------------x-----x-----
//--------x    Query :: OnJoin, OnExit, OnSwap    x-----
//--------x------------------x--------------x-----x-----

/// ## Description
/// BPT minted for a join by `sender`, who must be the pool owner.
///
/// The first join must provide both tokens and mints `invariant * 2` shares. Later joins may be
/// single sided; the non proportional part of a leg pays the swap fee.
pub fn query_on_join_pool(
    deps: Deps,
    env: &Env,
    sender: String,
    assets_in: Vec<Asset>,
) -> Result<AfterJoinResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if deps.api.addr_validate(&sender)? != config.owner {
        return Err(ContractError::Unauthorized {});
    }

    // Line the amounts up with the pool's asset order
    let mut provided_assets: Vec<Asset> = config
        .assets
        .iter()
        .map(|asset| Asset::new(asset.info.clone(), Uint128::zero()))
        .collect();
    for asset in assets_in.iter() {
        let slot = provided_assets
            .iter_mut()
            .find(|provided| provided.info.eq(&asset.info))
            .ok_or_else(|| ContractError::UnknownToken {
                asset: asset.info.to_string(),
            })?;
        if !slot.amount.is_zero() {
            return Err(ContractError::RepeatedAssets {});
        }
        slot.amount = asset.amount;
    }
    if provided_assets.iter().all(|asset| asset.amount.is_zero()) {
        return Err(ContractError::InvalidZeroAmount {});
    }

    let lp_token_addr = config
        .lp_token_addr
        .clone()
        .ok_or_else(|| StdError::generic_err("LP token is not instantiated"))?;
    let total_share = query_supply(&deps.querier, lp_token_addr)?;

    let weights = ordered_weights(&config, &current_weights(deps, env)?)?;
    let amounts_in = to_amounts(&transform_to_decimal_asset(deps.storage, &provided_assets)?);

    let shares = if total_share.is_zero() {
        if provided_assets.iter().any(|asset| asset.amount.is_zero()) {
            return Err(ContractError::IncompleteInitialJoin {});
        }
        calc_initial_bpt(&weights, &amounts_in)?
    } else {
        if !config.is_funded() {
            return Err(ContractError::PoolNotFunded {});
        }
        let balances = to_amounts(&transform_to_decimal_asset(deps.storage, &config.assets)?);
        calc_bpt_out_given_exact_tokens_in(
            &balances,
            &weights,
            &amounts_in,
            Decimal256::with_precision(total_share, LP_TOKEN_PRECISION)?,
            decimal2decimal256(config.fee_info.fee_rate())?,
        )?
    };

    let new_shares = shares.to_uint128_with_precision(LP_TOKEN_PRECISION)?;
    if new_shares.is_zero() {
        return Err(ContractError::InsufficientLiquidity {
            reason: "join mints no shares".to_string(),
        });
    }

    Ok(AfterJoinResponse {
        provided_assets,
        new_shares,
        response: ResponseType::Success {},
    })
}

fn to_amounts(assets: &[DecimalAsset]) -> Vec<Decimal256> {
    assets.iter().map(|asset| asset.amount).collect()
}

/// ## Description
/// Proportional exit: every token is returned in the ratio `burn_amount / total_share`, rounded
/// down. Exits are allowed whatever the swap status.
pub fn query_on_exit_pool(
    deps: Deps,
    burn_amount: Uint128,
) -> Result<AfterExitResponse, ContractError> {
    if burn_amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }
    let config = CONFIG.load(deps.storage)?;
    let lp_token_addr = config
        .lp_token_addr
        .clone()
        .ok_or_else(|| StdError::generic_err("LP token is not instantiated"))?;
    let total_share = query_supply(&deps.querier, lp_token_addr)?;

    let balances: Vec<Uint128> = config.assets.iter().map(|asset| asset.amount).collect();
    let amounts_out = calc_tokens_out_given_exact_bpt_in(&balances, burn_amount, total_share)?;

    Ok(AfterExitResponse {
        assets_out: config
            .assets
            .iter()
            .zip(amounts_out)
            .map(|(asset, amount)| Asset::new(asset.info.clone(), amount))
            .collect(),
        burn_shares: burn_amount,
        response: ResponseType::Success {},
    })
}

/// ## Description
/// Prices a swap at the current weights. The fee is always retained in the ask asset.
pub fn query_on_swap(
    deps: Deps,
    env: &Env,
    swap_type: SwapType,
    offer_asset: AssetInfo,
    ask_asset: AssetInfo,
    amount: Uint128,
) -> Result<SwapResponse, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if offer_asset.eq(&ask_asset) {
        return Err(ContractError::SameAssets {});
    }
    if amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }

    let weights = current_weights(deps, env)?;
    let offer = swap_leg(deps.storage, &config, &weights, &offer_asset)?;
    let ask = swap_leg(deps.storage, &config, &weights, &ask_asset)?;

    if !config.is_funded() {
        return Err(ContractError::PoolNotFunded {});
    }
    if !config.swap_enabled {
        return Err(ContractError::SwapsDisabled {});
    }

    let (trade_params, fee) = match swap_type {
        SwapType::GiveIn {} => compute_swap(&offer, &ask, amount, &config.fee_info)?,
        SwapType::GiveOut {} => compute_offer_amount(&offer, &ask, amount, &config.fee_info)?,
    };

    Ok(SwapResponse {
        trade_params,
        response: ResponseType::Success {},
        fee: Some(Asset::new(ask_asset, fee)),
    })
}

// --------x--------x--------x--------x--------x--------x---
// --------x--------x Migrate Function   x--------x---------
// --------x--------x--------x--------x--------x--------x---

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let version = get_contract_version(deps.storage)?;
    if version.contract != CONTRACT_NAME {
        return Err(StdError::generic_err("Can only upgrade from same contract type").into());
    }
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new().add_attribute("action", "migrate"))
}
