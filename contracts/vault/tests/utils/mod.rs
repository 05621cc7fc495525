#![allow(dead_code)]

use cosmwasm_std::testing::mock_env;
use cosmwasm_std::{to_json_binary, Addr, Coin, Decimal, Timestamp, Uint128};
use cw20::MinterResponse;
use cw_multi_test::{App, ContractWrapper, Executor};
use lbp::asset::{Asset, AssetInfo, NativeAssetPrecisionInfo};
use lbp::lp_token::InstantiateMsg as TokenInstantiateMsg;
use lbp::pool::{LbpParams, WeightPair};
use lbp::vault::{
    AssetManager, ConfigResponse, ExecuteMsg, FeeInfo, InstantiateMsg, PoolInfoResponse, PoolType,
    PoolTypeConfig, QueryMsg,
};

pub const EPOCH_START: u64 = 1_000_000;
pub const RESERVE_DENOM: &str = "ureserve";

pub fn mock_app(owner: Addr, coins: Vec<Coin>) -> App {
    let mut env = mock_env();
    env.block.time = Timestamp::from_seconds(EPOCH_START);

    let mut app = App::new(|router, _, storage| {
        router.bank.init_balance(storage, &owner, coins).unwrap();
    });
    app.set_block(env.block);
    app
}

pub fn store_vault_code(app: &mut App) -> u64 {
    let vault_contract = Box::new(
        ContractWrapper::new_with_empty(
            lbp_vault::contract::execute,
            lbp_vault::contract::instantiate,
            lbp_vault::contract::query,
        )
        .with_reply_empty(lbp_vault::contract::reply),
    );
    app.store_code(vault_contract)
}

pub fn store_pool_code(app: &mut App) -> u64 {
    let pool_contract = Box::new(
        ContractWrapper::new_with_empty(
            lbp_pool::contract::execute,
            lbp_pool::contract::instantiate,
            lbp_pool::contract::query,
        )
        .with_reply_empty(lbp_pool::contract::reply),
    );
    app.store_code(pool_contract)
}

pub fn store_token_code(app: &mut App) -> u64 {
    let token_contract = Box::new(ContractWrapper::new_with_empty(
        lbp_lp_token::contract::execute,
        lbp_lp_token::contract::instantiate,
        lbp_lp_token::contract::query,
    ));
    app.store_code(token_contract)
}

pub fn lbp_pool_config(code_id: u64) -> PoolTypeConfig {
    PoolTypeConfig {
        code_id,
        pool_type: PoolType::Lbp {},
        default_fee_info: FeeInfo { total_fee_bps: 100 },
        is_disabled: false,
    }
}

/// Vault with the LBP pool type registered at a 1% fee
pub fn instantiate_contract(app: &mut App, owner: &Addr) -> Addr {
    let pool_code_id = store_pool_code(app);
    let vault_code_id = store_vault_code(app);
    let token_code_id = store_token_code(app);

    let vault_init_msg = InstantiateMsg {
        owner: owner.to_string(),
        pool_configs: vec![lbp_pool_config(pool_code_id)],
        lp_token_code_id: token_code_id,
    };

    app.instantiate_contract(
        vault_code_id,
        owner.to_owned(),
        &vault_init_msg,
        &[],
        "vault",
        None,
    )
    .unwrap()
}

pub fn create_project_token(app: &mut App, owner: &Addr) -> Addr {
    let token_code_id = store_token_code(app);
    app.instantiate_contract(
        token_code_id,
        owner.clone(),
        &TokenInstantiateMsg {
            name: "Project token".to_string(),
            symbol: "PROJ".to_string(),
            decimals: 6,
            initial_balances: vec![],
            mint: Some(MinterResponse {
                minter: owner.to_string(),
                cap: None,
            }),
            marketing: None,
        },
        &[],
        "project_token",
        None,
    )
    .unwrap()
}

// Mints some Tokens to "to" recipient
pub fn mint_some_tokens(app: &mut App, owner: Addr, token_instance: Addr, amount: Uint128, to: String) {
    let msg = cw20::Cw20ExecuteMsg::Mint {
        recipient: to,
        amount,
    };
    app.execute_contract(owner, token_instance, &msg, &[])
        .unwrap();
}

pub fn increase_token_allowance(
    app: &mut App,
    owner: Addr,
    token_instance: Addr,
    spender: String,
    amount: Uint128,
) {
    let msg = cw20::Cw20ExecuteMsg::IncreaseAllowance {
        spender,
        amount,
        expires: None,
    };
    app.execute_contract(owner, token_instance, &msg, &[])
        .unwrap();
}

pub fn project_and_reserve(project_token: &Addr) -> (AssetInfo, AssetInfo) {
    (
        AssetInfo::Token {
            contract_addr: project_token.clone(),
        },
        AssetInfo::native_token(RESERVE_DENOM),
    )
}

pub fn lbp_creation_msg(
    owner: &Addr,
    project_token: &Addr,
    project_weight: u64,
    asset_managers: Vec<AssetManager>,
) -> ExecuteMsg {
    let (project, reserve) = project_and_reserve(project_token);
    ExecuteMsg::CreatePoolInstance {
        pool_type: PoolType::Lbp {},
        asset_infos: vec![project.clone(), reserve],
        native_asset_precisions: vec![NativeAssetPrecisionInfo {
            denom: RESERVE_DENOM.to_string(),
            precision: 6u8,
        }],
        lp_token_name: None,
        lp_token_symbol: None,
        asset_managers,
        init_params: Some(
            to_json_binary(&LbpParams {
                owner: owner.to_string(),
                project_asset: project,
                weights: WeightPair {
                    project: Decimal::percent(project_weight),
                    reserve: Decimal::percent(100 - project_weight),
                },
                swap_enabled_on_start: true,
            })
            .unwrap(),
        ),
    }
}

/// Creates an LBP owned by `owner`, who also manages the reserve token.
/// Returns (pool_addr, lp_token_addr, pool_id)
pub fn initialize_lbp(
    app: &mut App,
    owner: &Addr,
    vault_instance: &Addr,
    project_token: &Addr,
    project_weight: u64,
) -> (Addr, Addr, Uint128) {
    let vault_config_res: ConfigResponse = app
        .wrap()
        .query_wasm_smart(vault_instance.clone(), &QueryMsg::Config {})
        .unwrap();
    let next_pool_id = vault_config_res.next_pool_id;

    let msg = lbp_creation_msg(
        owner,
        project_token,
        project_weight,
        vec![AssetManager {
            asset_info: AssetInfo::native_token(RESERVE_DENOM),
            manager: owner.to_string(),
        }],
    );
    app.execute_contract(owner.clone(), vault_instance.clone(), &msg, &[])
        .unwrap();

    let pool_info_res: PoolInfoResponse = app
        .wrap()
        .query_wasm_smart(
            vault_instance.clone(),
            &QueryMsg::GetPoolById {
                pool_id: next_pool_id,
            },
        )
        .unwrap();

    (
        pool_info_res.pool_addr,
        pool_info_res.lp_token_addr,
        pool_info_res.pool_id,
    )
}

/// Seeds the pool: the project tokens are real cash, the reserve is booked as managed
pub fn seed_lbp(
    app: &mut App,
    owner: &Addr,
    vault_instance: &Addr,
    project_token: &Addr,
    pool_id: Uint128,
    project_amount: Uint128,
    reserve_amount: Uint128,
) {
    let (project, reserve) = project_and_reserve(project_token);
    mint_some_tokens(
        app,
        owner.clone(),
        project_token.clone(),
        project_amount,
        owner.to_string(),
    );
    increase_token_allowance(
        app,
        owner.clone(),
        project_token.clone(),
        vault_instance.to_string(),
        project_amount,
    );

    app.execute_contract(
        owner.clone(),
        vault_instance.clone(),
        &ExecuteMsg::ManagedJoinPool {
            pool_id,
            recipient: None,
            assets: vec![
                Asset::new(project, project_amount),
                Asset::new(reserve, reserve_amount),
            ],
            min_lp_to_receive: None,
        },
        &[],
    )
    .unwrap();
}
