#![allow(dead_code)]

use cosmwasm_std::testing::mock_env;
use cosmwasm_std::{coins, Addr, Coin, Decimal, Timestamp, Uint128};
use cw20::{BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg, MinterResponse};
use cw_multi_test::{App, AppResponse, ContractWrapper, Executor};
use lbp::asset::{AssetInfo, NativeAssetPrecisionInfo};
use lbp::controller::{
    ConfigResponse, ExecuteMsg, InstantiateMsg, PartialRepayPolicy, QueryMsg, SeedDebt,
    StateResponse,
};
use lbp::lp_token::InstantiateMsg as TokenInstantiateMsg;
use lbp::pool::WeightPair;
use lbp::vault::{
    ExecuteMsg as VaultExecuteMsg, FeeInfo, InstantiateMsg as VaultInstantiateMsg,
    PoolTokenInfoResponse, PoolType, PoolTypeConfig, QueryMsg as VaultQueryMsg,
    SingleSwapRequest, SwapType,
};

pub const EPOCH_START: u64 = 1_000_000;
pub const RESERVE_DENOM: &str = "ureserve";

pub const PROJECT_SEED: u128 = 1_000_000_000;
pub const RESERVE_SEED: u128 = 1_800_000;

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

pub fn store_controller_code(app: &mut App) -> u64 {
    let controller_contract = Box::new(
        ContractWrapper::new_with_empty(
            lbp_seed_controller::contract::execute,
            lbp_seed_controller::contract::instantiate,
            lbp_seed_controller::contract::query,
        )
        .with_reply_empty(lbp_seed_controller::contract::reply),
    );
    app.store_code(controller_contract)
}

pub fn instantiate_vault(app: &mut App, owner: &Addr) -> Addr {
    let pool_code_id = store_pool_code(app);
    let vault_code_id = store_vault_code(app);
    let token_code_id = store_token_code(app);

    app.instantiate_contract(
        vault_code_id,
        owner.to_owned(),
        &VaultInstantiateMsg {
            owner: owner.to_string(),
            pool_configs: vec![PoolTypeConfig {
                code_id: pool_code_id,
                pool_type: PoolType::Lbp {},
                default_fee_info: FeeInfo { total_fee_bps: 100 },
                is_disabled: false,
            }],
            lp_token_code_id: token_code_id,
        },
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

pub fn controller_init_msg(
    vault: &Addr,
    manager: &Addr,
    project_token: &Addr,
    allow_refunding: bool,
) -> InstantiateMsg {
    InstantiateMsg {
        vault_addr: vault.to_string(),
        manager: manager.to_string(),
        project_asset: AssetInfo::Token {
            contract_addr: project_token.clone(),
        },
        reserve_asset: AssetInfo::native_token(RESERVE_DENOM),
        weights: WeightPair {
            project: Decimal::percent(90),
            reserve: Decimal::percent(10),
        },
        native_asset_precisions: vec![NativeAssetPrecisionInfo {
            denom: RESERVE_DENOM.to_string(),
            precision: 6u8,
        }],
        swap_enabled_on_start: true,
        lp_token_name: None,
        lp_token_symbol: None,
        partial_repay: None,
        allow_refunding: Some(allow_refunding),
    }
}

/// A vault, a project token held by the manager and a controller that created its pool
pub struct Seed {
    pub app: App,
    pub owner: Addr,
    pub manager: Addr,
    pub trader: Addr,
    pub vault: Addr,
    pub controller: Addr,
    pub project_token: Addr,
    pub pool_addr: Addr,
    pub lp_token: Addr,
    pub pool_id: Uint128,
}

impl Seed {
    pub fn new(allow_refunding: bool) -> Seed {
        let owner = Addr::unchecked("owner");
        let manager = Addr::unchecked("manager");
        let trader = Addr::unchecked("trader");
        let mut app = mock_app(owner.clone(), coins(1_000_000_000_000, RESERVE_DENOM));
        for account in [&manager, &trader] {
            app.send_tokens(
                owner.clone(),
                account.clone(),
                &coins(100_000_000_000, RESERVE_DENOM),
            )
            .unwrap();
        }

        let vault = instantiate_vault(&mut app, &owner);
        let project_token = create_project_token(&mut app, &owner);
        app.execute_contract(
            owner.clone(),
            project_token.clone(),
            &Cw20ExecuteMsg::Mint {
                recipient: manager.to_string(),
                amount: Uint128::new(100_000_000_000),
            },
            &[],
        )
        .unwrap();

        let controller_code_id = store_controller_code(&mut app);
        let controller = app
            .instantiate_contract(
                controller_code_id,
                manager.clone(),
                &controller_init_msg(&vault, &manager, &project_token, allow_refunding),
                &[],
                "seed_controller",
                None,
            )
            .unwrap();

        let config: ConfigResponse = app
            .wrap()
            .query_wasm_smart(controller.clone(), &QueryMsg::Config {})
            .unwrap();

        Seed {
            app,
            owner,
            manager,
            trader,
            vault,
            controller,
            project_token,
            pool_addr: config.pool_addr.unwrap(),
            lp_token: config.lp_token_addr.unwrap(),
            pool_id: config.pool_id,
        }
    }

    pub fn project_info(&self) -> AssetInfo {
        AssetInfo::Token {
            contract_addr: self.project_token.clone(),
        }
    }

    pub fn reserve_info(&self) -> AssetInfo {
        AssetInfo::native_token(RESERVE_DENOM)
    }

    pub fn execute(&mut self, msg: &ExecuteMsg, funds: &[Coin]) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.manager.clone(),
            self.controller.clone(),
            msg,
            funds,
        )
    }

    pub fn approve_project(&mut self, amount: u128) {
        self.app
            .execute_contract(
                self.manager.clone(),
                self.project_token.clone(),
                &Cw20ExecuteMsg::IncreaseAllowance {
                    spender: self.controller.to_string(),
                    amount: Uint128::new(amount),
                    expires: None,
                },
                &[],
            )
            .unwrap();
    }

    pub fn fund(&mut self, project_amount: u128, reserve_amount: u128) -> anyhow::Result<AppResponse> {
        self.approve_project(project_amount);
        self.execute(
            &ExecuteMsg::FundPool {
                project_amount: Uint128::new(project_amount),
                reserve_amount: Uint128::new(reserve_amount),
            },
            &[],
        )
    }

    pub fn repay(&mut self, full: bool, reserve_sent: u128) -> anyhow::Result<AppResponse> {
        let funds = if reserve_sent == 0 {
            vec![]
        } else {
            coins(reserve_sent, RESERVE_DENOM)
        };
        self.execute(&ExecuteMsg::RepaySeedFunds { full }, &funds)
    }

    pub fn buy_project(&mut self, reserve_in: u128) -> anyhow::Result<AppResponse> {
        let msg = VaultExecuteMsg::Swap {
            swap_request: SingleSwapRequest {
                pool_id: self.pool_id,
                asset_in: self.reserve_info(),
                asset_out: self.project_info(),
                swap_type: SwapType::GiveIn {},
                amount: Uint128::new(reserve_in),
            },
            recipient: None,
            min_receive: None,
            max_spend: None,
        };
        self.app.execute_contract(
            self.trader.clone(),
            self.vault.clone(),
            &msg,
            &coins(reserve_in, RESERVE_DENOM),
        )
    }

    pub fn state(&self) -> StateResponse {
        self.app
            .wrap()
            .query_wasm_smart(self.controller.clone(), &QueryMsg::State {})
            .unwrap()
    }

    pub fn debt(&self) -> SeedDebt {
        self.app
            .wrap()
            .query_wasm_smart(self.controller.clone(), &QueryMsg::SeedDebt {})
            .unwrap()
    }

    pub fn reserve_ledger(&self) -> PoolTokenInfoResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                self.vault.clone(),
                &VaultQueryMsg::GetPoolTokenInfo {
                    pool_id: self.pool_id,
                    asset_info: self.reserve_info(),
                },
            )
            .unwrap()
    }

    pub fn cw20_balance(&self, token: &Addr, address: &Addr) -> Uint128 {
        let res: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                token.clone(),
                &Cw20QueryMsg::Balance {
                    address: address.to_string(),
                },
            )
            .unwrap();
        res.balance
    }

    pub fn set_repay_policy(&mut self, partial_repay: PartialRepayPolicy) {
        self.execute(&ExecuteMsg::UpdateRepayPolicy { partial_repay }, &[])
            .unwrap();
    }
}
