use cosmwasm_std::{
    entry_point, to_json_binary, Addr, Binary, Coin, CosmosMsg, Decimal, Deps, DepsMut, Env, Event,
    MessageInfo, Reply, ReplyOn, Response, StdError, StdResult, SubMsg, Uint128, WasmMsg,
};
use cw2::{get_contract_version, set_contract_version};
use cw20::Cw20ExecuteMsg;
use cw_utils::{nonpayable, PaymentError};

use crate::error::ContractError;
use crate::state::{Config, PendingSeed, State, CONFIG, PENDING_SEED, SEED_DEBT, STATE};

use lbp::asset::{Asset, AssetInfo};
use lbp::controller::{
    ConfigResponse, ExecuteMsg, InstantiateMsg, MigrateMsg, PartialRepayPolicy, QueryMsg,
    SeedDebt, SeedStatus, StateResponse,
};
use lbp::helper::{
    build_increase_allowance_msg, build_send_native_asset_msg, build_transfer_cw20_from_user_msg,
    find_sent_native_token_balance,
};
use lbp::pool::{
    ExecuteMsg as PoolExecuteMsg, LbpParams, PoolStatus, PoolStatusResponse,
    QueryMsg as PoolQueryMsg,
};
use lbp::querier::{
    query_pool_info, query_pool_token_info, query_pool_tokens, query_token_balance,
    query_vault_config,
};
use lbp::vault::{
    AssetManager, Cw20HookMsg, ExecuteMsg as VaultExecuteMsg, ManagedTransferDirection, PoolType,
};

/// Contract name that is used for migration.
const CONTRACT_NAME: &str = "lbp-seed-controller";
/// Contract version that is used for migration.
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const CREATE_POOL_REPLY_ID: u64 = 1;
const FUND_POOL_REPLY_ID: u64 = 2;

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x      Instantiate Contract : Execute function     x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

/// ## Description
/// Creates the controller and, through the Vault, its bootstrapping pool.
///
/// The controller owns the pool and is the asset manager of the reserve token, which lets it
/// place reserve liquidity it does not hold yet.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    msg.project_asset.check(deps.api)?;
    msg.reserve_asset.check(deps.api)?;
    if msg.project_asset == msg.reserve_asset {
        return Err(ContractError::InvalidAssets {});
    }

    let partial_repay = msg.partial_repay.unwrap_or_default();
    validate_repay_policy(&partial_repay)?;

    let vault_addr = deps.api.addr_validate(&msg.vault_addr)?;
    let manager = deps.api.addr_validate(&msg.manager)?;
    let pool_id = query_vault_config(&deps.querier, vault_addr.to_string())?.next_pool_id;

    let config = Config {
        vault_addr: vault_addr.clone(),
        manager,
        pool_id,
        pool_addr: None,
        lp_token_addr: None,
        project_asset: msg.project_asset.clone(),
        reserve_asset: msg.reserve_asset.clone(),
        partial_repay,
        allow_refunding: msg.allow_refunding.unwrap_or(false),
    };
    CONFIG.save(deps.storage, &config)?;
    STATE.save(
        deps.storage,
        &State {
            status: SeedStatus::NoDebt,
            completed_cycles: 0,
            funding_closed: false,
        },
    )?;
    SEED_DEBT.save(
        deps.storage,
        &SeedDebt {
            owed_amount: Uint128::zero(),
            asset_info: msg.reserve_asset.clone(),
            outstanding: false,
        },
    )?;

    let create_pool_msg = VaultExecuteMsg::CreatePoolInstance {
        pool_type: PoolType::Lbp {},
        asset_infos: vec![msg.project_asset.clone(), msg.reserve_asset.clone()],
        native_asset_precisions: msg.native_asset_precisions,
        lp_token_name: msg.lp_token_name,
        lp_token_symbol: msg.lp_token_symbol,
        asset_managers: vec![AssetManager {
            asset_info: msg.reserve_asset,
            manager: env.contract.address.to_string(),
        }],
        init_params: Some(to_json_binary(&LbpParams {
            owner: env.contract.address.to_string(),
            project_asset: msg.project_asset,
            weights: msg.weights,
            swap_enabled_on_start: msg.swap_enabled_on_start,
        })?),
    };
    let sub_msg = SubMsg {
        id: CREATE_POOL_REPLY_ID,
        msg: CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: vault_addr.to_string(),
            msg: to_json_binary(&create_pool_msg)?,
            funds: vec![],
        }),
        gas_limit: None,
        reply_on: ReplyOn::Success,
    };

    Ok(Response::new().add_submessage(sub_msg).add_event(
        Event::new("lbp-seed-controller::instantiate")
            .add_attribute("vault_addr", vault_addr.to_string())
            .add_attribute("manager", config.manager.to_string())
            .add_attribute("pool_id", pool_id.to_string())
            .add_attribute("allow_refunding", config.allow_refunding.to_string()),
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
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.manager {
        return Err(ContractError::NotManager {});
    }
    // Only the funding commands take native tokens
    if !matches!(
        msg,
        ExecuteMsg::FundPool { .. }
            | ExecuteMsg::AddLiquidity { .. }
            | ExecuteMsg::RepaySeedFunds { .. }
    ) {
        nonpayable(&info)?;
    }

    match msg {
        ExecuteMsg::FundPool {
            project_amount,
            reserve_amount,
        } => execute_fund_pool(deps, env, info, config, project_amount, reserve_amount),
        ExecuteMsg::AddLiquidity {
            project_amount,
            reserve_amount,
            min_bpt_out,
        } => execute_add_liquidity(
            deps,
            env,
            info,
            config,
            project_amount,
            reserve_amount,
            min_bpt_out,
        ),
        ExecuteMsg::RepaySeedFunds { full } => {
            execute_repay_seed_funds(deps, env, info, config, full)
        }
        ExecuteMsg::WithdrawLiquidity { bpt_amount } => {
            execute_withdraw_liquidity(deps, env, config, bpt_amount)
        }
        ExecuteMsg::SetSwapEnabled { enabled } => forward_to_pool(
            &config,
            "set_swap_enabled",
            PoolExecuteMsg::SetSwapEnabled { enabled },
        ),
        ExecuteMsg::UpdateWeightsGradually {
            start_time,
            end_time,
            end_weights,
        } => forward_to_pool(
            &config,
            "update_weights_gradually",
            PoolExecuteMsg::UpdateWeightsGradually {
                start_time,
                end_time,
                end_weights,
            },
        ),
        ExecuteMsg::UpdateRepayPolicy { partial_repay } => {
            execute_update_repay_policy(deps, config, partial_repay)
        }
    }
}

/// ## Description
/// Places the seed: the project tokens come from the manager, the reserve leg is booked by the
/// Vault as managed liquidity and becomes debt once the reply confirmed it.
pub fn execute_fund_pool(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    config: Config,
    project_amount: Uint128,
    reserve_amount: Uint128,
) -> Result<Response, ContractError> {
    let state = STATE.load(deps.storage)?;
    match state.status {
        SeedStatus::Funded | SeedStatus::Repaying => return Err(ContractError::AlreadyFunded {}),
        SeedStatus::NoDebt if state.funding_closed => return Err(ContractError::AlreadyFunded {}),
        SeedStatus::NoDebt | SeedStatus::Funding => {}
    }
    if project_amount.is_zero() || reserve_amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }
    if config.pool_addr.is_none() {
        return Err(ContractError::PoolNotCreated {});
    }

    let project = Asset::new(config.project_asset.clone(), project_amount);
    let (messages, funds) = collect_from_manager(&info, &env, &config.vault_addr, &[&project])?;

    let managed_before = query_pool_token_info(
        &deps.querier,
        config.vault_addr.to_string(),
        config.pool_id,
        config.reserve_asset.clone(),
    )?
    .managed;
    PENDING_SEED.save(
        deps.storage,
        &PendingSeed {
            managed_before,
            reserve_amount,
        },
    )?;
    STATE.save(
        deps.storage,
        &State {
            status: SeedStatus::Funding,
            ..state
        },
    )?;

    let join_msg = VaultExecuteMsg::ManagedJoinPool {
        pool_id: config.pool_id,
        recipient: None,
        assets: vec![
            project,
            Asset::new(config.reserve_asset.clone(), reserve_amount),
        ],
        min_lp_to_receive: None,
    };
    let sub_msg = SubMsg {
        id: FUND_POOL_REPLY_ID,
        msg: CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: config.vault_addr.to_string(),
            msg: to_json_binary(&join_msg)?,
            funds,
        }),
        gas_limit: None,
        reply_on: ReplyOn::Success,
    };

    Ok(Response::new()
        .add_messages(messages)
        .add_submessage(sub_msg)
        .add_attribute("action", "fund_pool")
        .add_attribute("project_amount", project_amount.to_string())
        .add_attribute("reserve_amount", reserve_amount.to_string()))
}

/// ## Description
/// Adds real liquidity from the manager's wallet.
///
/// A reserve leg is only accepted once the Vault holds some reserve cash, that is once traders
/// bought project tokens with it.
pub fn execute_add_liquidity(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    config: Config,
    project_amount: Uint128,
    reserve_amount: Uint128,
    min_bpt_out: Option<Uint128>,
) -> Result<Response, ContractError> {
    let pool_addr = config
        .pool_addr
        .clone()
        .ok_or(ContractError::PoolNotCreated {})?;
    let status: PoolStatusResponse = deps
        .querier
        .query_wasm_smart(pool_addr, &PoolQueryMsg::Status {})?;
    if status.status == PoolStatus::Uninitialized {
        return Err(ContractError::PoolNotFunded {});
    }
    if project_amount.is_zero() && reserve_amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }

    if !reserve_amount.is_zero() {
        let tokens = query_pool_tokens(&deps.querier, config.vault_addr.to_string(), config.pool_id)?;
        let reserve_cash = tokens
            .tokens
            .iter()
            .zip(tokens.cash_balances.iter())
            .find(|(info, _)| **info == config.reserve_asset)
            .map(|(_, cash)| *cash)
            .unwrap_or_default();
        if reserve_cash.is_zero() {
            return Err(ContractError::InsufficientCashBalance {
                asset: config.reserve_asset.to_string(),
            });
        }
    }

    let assets: Vec<Asset> = vec![
        Asset::new(config.project_asset.clone(), project_amount),
        Asset::new(config.reserve_asset.clone(), reserve_amount),
    ]
    .into_iter()
    .filter(|asset| !asset.amount.is_zero())
    .collect();
    let legs: Vec<&Asset> = assets.iter().collect();
    let (messages, funds) = collect_from_manager(&info, &env, &config.vault_addr, &legs)?;

    let join_msg = CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: config.vault_addr.to_string(),
        msg: to_json_binary(&VaultExecuteMsg::JoinPool {
            pool_id: config.pool_id,
            recipient: None,
            assets,
            min_lp_to_receive: min_bpt_out,
        })?,
        funds,
    });

    Ok(Response::new()
        .add_messages(messages)
        .add_message(join_msg)
        .add_event(
            Event::new("lbp-seed-controller::add_liquidity")
                .add_attribute("pool_id", config.pool_id.to_string())
                .add_attribute("project_amount", project_amount.to_string())
                .add_attribute("reserve_amount", reserve_amount.to_string()),
        ))
}

/// ## Description
/// Pays back seed debt with reserve tokens from the manager. The Vault moves the amount from the
/// managed to the cash balance of the reserve token.
///
/// `full` repays everything owed. Otherwise the amount comes from the partial repay policy.
pub fn execute_repay_seed_funds(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    config: Config,
    full: bool,
) -> Result<Response, ContractError> {
    let mut debt = SEED_DEBT.load(deps.storage)?;
    if !debt.outstanding {
        return Err(ContractError::NoOutstandingDebt {});
    }

    let amount = if full {
        debt.owed_amount
    } else {
        config
            .partial_repay
            .amount(debt.owed_amount)
            .ok_or(ContractError::PartialRepayDisabled {})?
    };
    if amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }
    if amount > debt.owed_amount {
        return Err(ContractError::OverRepayment {
            requested: amount,
            owed: debt.owed_amount,
        });
    }

    let repayment = Asset::new(config.reserve_asset.clone(), amount);
    let (messages, funds) =
        collect_from_manager(&info, &env, &config.vault_addr, &[&repayment])?;
    let transfer_msg = CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: config.vault_addr.to_string(),
        msg: to_json_binary(&VaultExecuteMsg::TransferAsManager {
            pool_id: config.pool_id,
            asset_info: config.reserve_asset.clone(),
            amount,
            direction: ManagedTransferDirection::ToCash,
        })?,
        funds,
    });

    debt.owed_amount = debt.owed_amount.checked_sub(amount)?;
    let mut state = STATE.load(deps.storage)?;
    if debt.owed_amount.is_zero() {
        debt.outstanding = false;
        state.status = SeedStatus::NoDebt;
        state.completed_cycles += 1;
        state.funding_closed = !config.allow_refunding;
    } else {
        state.status = SeedStatus::Repaying;
    }
    SEED_DEBT.save(deps.storage, &debt)?;
    STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_messages(messages)
        .add_message(transfer_msg)
        .add_event(
            Event::new("lbp-seed-controller::repay_seed_funds")
                .add_attribute("pool_id", config.pool_id.to_string())
                .add_attribute("repaid", amount.to_string())
                .add_attribute("owed_amount", debt.owed_amount.to_string())
                .add_attribute("status", state.status.to_string()),
        ))
}

/// ## Description
/// Exits the pool to the manager by sending BPT to the Vault. Refused while seed debt is open,
/// the borrowed reserve must never leave as real tokens.
pub fn execute_withdraw_liquidity(
    deps: DepsMut,
    env: Env,
    config: Config,
    bpt_amount: Option<Uint128>,
) -> Result<Response, ContractError> {
    if SEED_DEBT.load(deps.storage)?.outstanding {
        return Err(ContractError::DebtOutstanding {});
    }
    let lp_token_addr = config
        .lp_token_addr
        .clone()
        .ok_or(ContractError::PoolNotCreated {})?;

    let amount = match bpt_amount {
        Some(amount) => amount,
        None => query_token_balance(
            &deps.querier,
            lp_token_addr.clone(),
            env.contract.address,
        )?,
    };
    if amount.is_zero() {
        return Err(ContractError::InvalidZeroAmount {});
    }

    let exit_msg = CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: lp_token_addr.to_string(),
        msg: to_json_binary(&Cw20ExecuteMsg::Send {
            contract: config.vault_addr.to_string(),
            amount,
            msg: to_json_binary(&Cw20HookMsg::ExitPool {
                pool_id: config.pool_id,
                recipient: Some(config.manager.to_string()),
                min_assets_out: None,
            })?,
        })?,
        funds: vec![],
    });

    Ok(Response::new().add_message(exit_msg).add_event(
        Event::new("lbp-seed-controller::withdraw_liquidity")
            .add_attribute("pool_id", config.pool_id.to_string())
            .add_attribute("bpt_amount", amount.to_string())
            .add_attribute("recipient", config.manager.to_string()),
    ))
}

pub fn execute_update_repay_policy(
    deps: DepsMut,
    mut config: Config,
    partial_repay: PartialRepayPolicy,
) -> Result<Response, ContractError> {
    validate_repay_policy(&partial_repay)?;
    config.partial_repay = partial_repay;
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_repay_policy")
        .add_attribute("partial_repay", format!("{:?}", config.partial_repay)))
}

/// A fraction policy repays a share of the current debt, which must lie in `(0, 1]`
fn validate_repay_policy(policy: &PartialRepayPolicy) -> Result<(), ContractError> {
    if let PartialRepayPolicy::Fraction { ratio } = policy {
        if ratio.is_zero() || *ratio > Decimal::one() {
            return Err(ContractError::InvalidRepayFraction {});
        }
    }
    Ok(())
}

/// The controller owns the pool, so owner commands go through it
fn forward_to_pool(
    config: &Config,
    action: &str,
    msg: PoolExecuteMsg,
) -> Result<Response, ContractError> {
    let pool_addr = config
        .pool_addr
        .clone()
        .ok_or(ContractError::PoolNotCreated {})?;
    Ok(Response::new()
        .add_message(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: pool_addr.to_string(),
            msg: to_json_binary(&msg)?,
            funds: vec![],
        }))
        .add_attribute("action", action))
}

// ----------------x----------------x----------------x----------------x----------------x----------------
// ----------------x----------------x           Reply handlers          x----------------x----------------
// ----------------x----------------x----------------x----------------x----------------x----------------

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        CREATE_POOL_REPLY_ID => reply_create_pool(deps, env),
        FUND_POOL_REPLY_ID => reply_fund_pool(deps),
        id => Err(StdError::generic_err(format!("Unknown reply id {}", id)).into()),
    }
}

/// Stores the pool registered by the Vault and checks the controller manages its reserve
fn reply_create_pool(deps: DepsMut, env: Env) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    let pool_info = query_pool_info(&deps.querier, config.vault_addr.to_string(), config.pool_id)?;

    let reserve_managed_by_controller = pool_info.assets.iter().any(|asset| {
        asset.info.eq(&config.reserve_asset) && asset.is_managed_by(&env.contract.address)
    });
    let project_unmanaged = pool_info
        .assets
        .iter()
        .any(|asset| asset.info.eq(&config.project_asset) && asset.asset_manager.is_none());
    if !reserve_managed_by_controller || !project_unmanaged {
        return Err(StdError::generic_err("Unexpected asset managers on the created pool").into());
    }

    config.pool_addr = Some(pool_info.pool_addr.clone());
    config.lp_token_addr = Some(pool_info.lp_token_addr.clone());
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_event(
        Event::new("lbp-seed-controller::pool_created")
            .add_attribute("pool_id", config.pool_id.to_string())
            .add_attribute("pool_addr", pool_info.pool_addr.to_string())
            .add_attribute("lp_token_addr", pool_info.lp_token_addr.to_string()),
    ))
}

/// Books the seed debt once the managed reserve balance grew by exactly the seeded amount
fn reply_fund_pool(deps: DepsMut) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let pending = PENDING_SEED.load(deps.storage)?;
    PENDING_SEED.remove(deps.storage);

    let managed_after = query_pool_token_info(
        &deps.querier,
        config.vault_addr.to_string(),
        config.pool_id,
        config.reserve_asset.clone(),
    )?
    .managed;
    let actual = managed_after.saturating_sub(pending.managed_before);
    if actual != pending.reserve_amount {
        return Err(ContractError::SeedNotReconciled {
            expected: pending.reserve_amount,
            actual,
        });
    }

    let mut debt = SEED_DEBT.load(deps.storage)?;
    debt.owed_amount = debt.owed_amount.checked_add(pending.reserve_amount)?;
    debt.outstanding = true;
    SEED_DEBT.save(deps.storage, &debt)?;

    let mut state = STATE.load(deps.storage)?;
    state.status = SeedStatus::Funded;
    STATE.save(deps.storage, &state)?;

    Ok(Response::new().add_event(
        Event::new("lbp-seed-controller::fund_pool")
            .add_attribute("pool_id", config.pool_id.to_string())
            .add_attribute("seeded_reserve", pending.reserve_amount.to_string())
            .add_attribute("owed_amount", debt.owed_amount.to_string())
            .add_attribute("status", state.status.to_string()),
    ))
}

// ----------------x----------------x---------------------x-----------------------x----------------x----------------
// ----------------x----------------x  :::: SEED CONTROLLER::QUERIES Implementation   ::::  x----------------x----------
// ----------------x----------------x---------------------x-----------------------x----------------x----------------

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::SeedDebt {} => to_json_binary(&SEED_DEBT.load(deps.storage)?),
        QueryMsg::State {} => to_json_binary(&query_state(deps)?),
    }
}

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        vault_addr: config.vault_addr,
        manager: config.manager,
        pool_id: config.pool_id,
        pool_addr: config.pool_addr,
        lp_token_addr: config.lp_token_addr,
        project_asset: config.project_asset,
        reserve_asset: config.reserve_asset,
        partial_repay: config.partial_repay,
        allow_refunding: config.allow_refunding,
    })
}

pub fn query_state(deps: Deps) -> StdResult<StateResponse> {
    let state = STATE.load(deps.storage)?;
    let debt = SEED_DEBT.load(deps.storage)?;
    Ok(StateResponse {
        status: state.status,
        owed_amount: debt.owed_amount,
        completed_cycles: state.completed_cycles,
        funding_closed: state.funding_closed,
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

// ----------------x----------------x---------------------x-------------------x----------------x-----
// ----------------x----------------x  :::: helper functions  ::::  x----------------x---------------
// ----------------x----------------x---------------------x-------------------x----------------x-----

/// ## Description
/// Brings `assets` from the manager to the controller and lets the Vault take them.
///
/// CW20 tokens are pulled with `TransferFrom` and approved for the Vault. Native tokens must be
/// attached by the manager; they are returned as funds to forward and any excess is refunded.
/// Attached coins of any other denom are refused.
fn collect_from_manager(
    info: &MessageInfo,
    env: &Env,
    vault: &Addr,
    assets: &[&Asset],
) -> Result<(Vec<CosmosMsg>, Vec<Coin>), ContractError> {
    let mut messages: Vec<CosmosMsg> = vec![];
    let mut funds: Vec<Coin> = vec![];

    for asset in assets.iter().filter(|asset| !asset.amount.is_zero()) {
        match &asset.info {
            AssetInfo::Token { contract_addr } => {
                messages.push(build_transfer_cw20_from_user_msg(
                    contract_addr.to_string(),
                    info.sender.to_string(),
                    env.contract.address.to_string(),
                    asset.amount,
                )?);
                messages.push(build_increase_allowance_msg(
                    contract_addr.to_string(),
                    vault.to_string(),
                    asset.amount,
                )?);
            }
            AssetInfo::NativeToken { denom } => {
                let sent = find_sent_native_token_balance(info, denom);
                if sent < asset.amount {
                    return Err(ContractError::InsufficientNativeTokensSent {
                        denom: denom.to_string(),
                        sent,
                        needed: asset.amount,
                    });
                }
                if sent > asset.amount {
                    messages.push(build_send_native_asset_msg(
                        info.sender.clone(),
                        denom,
                        sent.checked_sub(asset.amount)?,
                    )?);
                }
                funds.push(Coin {
                    denom: denom.to_string(),
                    amount: asset.amount,
                });
            }
        }
    }
    // a coin that pays no leg would stay behind in the controller
    if let Some(coin) = info
        .funds
        .iter()
        .find(|coin| !funds.iter().any(|leg| leg.denom == coin.denom))
    {
        return Err(PaymentError::ExtraDenom(coin.denom.clone()).into());
    }
    funds.sort_by(|a, b| a.denom.cmp(&b.denom));

    Ok((messages, funds))
}
