pub mod utils;

use cosmwasm_std::{coins, to_json_binary, Addr, Decimal, Decimal256, Uint128};
use cw20::{BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};
use cw_multi_test::{App, Executor};
use lbp::asset::{Asset, AssetInfo};
use lbp::pool::{
    ConfigResponse as PoolConfigResponse, ExecuteMsg as PoolExecuteMsg, PoolStatus,
    PoolStatusResponse, QueryMsg as PoolQueryMsg, SpotPriceResponse, WeightPair,
};
use lbp::vault::{
    Cw20HookMsg, ExecuteMsg, ManagedTransferDirection, PoolTokenInfoResponse, QueryMsg,
    SingleSwapRequest, SwapType,
};

use crate::utils::*;

const PROJECT_SEED: u128 = 1_000_000_000_000;
const RESERVE_SEED: u128 = 100_000_000_000;

struct Lbp {
    app: App,
    owner: Addr,
    trader: Addr,
    vault: Addr,
    project_token: Addr,
    pool_addr: Addr,
    lp_token: Addr,
    pool_id: Uint128,
}

impl Lbp {
    fn token_info(&self, asset_info: AssetInfo) -> PoolTokenInfoResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                self.vault.clone(),
                &QueryMsg::GetPoolTokenInfo {
                    pool_id: self.pool_id,
                    asset_info,
                },
            )
            .unwrap()
    }

    fn reserve_info(&self) -> PoolTokenInfoResponse {
        self.token_info(AssetInfo::native_token(RESERVE_DENOM))
    }

    fn project_info(&self) -> PoolTokenInfoResponse {
        self.token_info(AssetInfo::Token {
            contract_addr: self.project_token.clone(),
        })
    }

    fn cw20_balance(&self, token: &Addr, address: &Addr) -> Uint128 {
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

    fn status(&self) -> PoolStatus {
        let res: PoolStatusResponse = self
            .app
            .wrap()
            .query_wasm_smart(self.pool_addr.clone(), &PoolQueryMsg::Status {})
            .unwrap();
        res.status
    }

    fn buy_project(
        &mut self,
        reserve_in: u128,
        min_receive: Option<Uint128>,
    ) -> anyhow::Result<cw_multi_test::AppResponse> {
        let msg = ExecuteMsg::Swap {
            swap_request: SingleSwapRequest {
                pool_id: self.pool_id,
                asset_in: AssetInfo::native_token(RESERVE_DENOM),
                asset_out: AssetInfo::Token {
                    contract_addr: self.project_token.clone(),
                },
                swap_type: SwapType::GiveIn {},
                amount: Uint128::new(reserve_in),
            },
            recipient: None,
            min_receive,
            max_spend: None,
        };
        self.app.execute_contract(
            self.trader.clone(),
            self.vault.clone(),
            &msg,
            &coins(reserve_in, RESERVE_DENOM),
        )
    }
}

/// Pool created at 90/10 weights, not funded yet
fn setup() -> Lbp {
    let owner = Addr::unchecked("owner");
    let trader = Addr::unchecked("trader");
    let mut app = mock_app(owner.clone(), coins(10_000_000_000_000, RESERVE_DENOM));
    app.send_tokens(
        owner.clone(),
        trader.clone(),
        &coins(1_000_000_000_000, RESERVE_DENOM),
    )
    .unwrap();

    let vault = instantiate_contract(&mut app, &owner);
    let project_token = create_project_token(&mut app, &owner);
    let (pool_addr, lp_token, pool_id) =
        initialize_lbp(&mut app, &owner, &vault, &project_token, 90);

    Lbp {
        app,
        owner,
        trader,
        vault,
        project_token,
        pool_addr,
        lp_token,
        pool_id,
    }
}

fn seeded() -> Lbp {
    let mut lbp = setup();
    seed_lbp(
        &mut lbp.app,
        &lbp.owner,
        &lbp.vault,
        &lbp.project_token,
        lbp.pool_id,
        Uint128::new(PROJECT_SEED),
        Uint128::new(RESERVE_SEED),
    );
    lbp
}

#[test]
fn test_swaps_need_a_funded_pool() {
    let mut lbp = setup();

    let err = lbp.buy_project(1_000_000, None).unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Pool query failed: Pool is not funded"
    );

    // Only the pool owner can provide liquidity
    let err = lbp
        .app
        .execute_contract(
            lbp.trader.clone(),
            lbp.vault.clone(),
            &ExecuteMsg::JoinPool {
                pool_id: lbp.pool_id,
                recipient: None,
                assets: vec![Asset::new(
                    AssetInfo::native_token(RESERVE_DENOM),
                    1_000_000u128,
                )],
                min_lp_to_receive: None,
            },
            &coins(1_000_000, RESERVE_DENOM),
        )
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "Pool query failed: Unauthorized");

    // A managed join needs a managed token
    let err = lbp
        .app
        .execute_contract(
            lbp.trader.clone(),
            lbp.vault.clone(),
            &ExecuteMsg::ManagedJoinPool {
                pool_id: lbp.pool_id,
                recipient: None,
                assets: vec![],
                min_lp_to_receive: None,
            },
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Sender is not the asset manager of any pool asset"
    );

    // Unknown pools
    let err = lbp
        .app
        .execute_contract(
            lbp.owner.clone(),
            lbp.vault.clone(),
            &ExecuteMsg::JoinPool {
                pool_id: Uint128::new(7),
                recipient: None,
                assets: vec![],
                min_lp_to_receive: None,
            },
            &[],
        )
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "Pool 7 does not exist");
}

#[test]
fn test_managed_seed_moves_no_reserve_tokens() {
    let mut lbp = setup();
    let owner_reserve_before = lbp
        .app
        .wrap()
        .query_balance(lbp.owner.clone(), RESERVE_DENOM)
        .unwrap()
        .amount;

    seed_lbp(
        &mut lbp.app,
        &lbp.owner,
        &lbp.vault,
        &lbp.project_token,
        lbp.pool_id,
        Uint128::new(PROJECT_SEED),
        Uint128::new(RESERVE_SEED),
    );

    let reserve = lbp.reserve_info();
    assert_eq!(reserve.cash, Uint128::zero());
    assert_eq!(reserve.managed, Uint128::new(RESERVE_SEED));
    assert_eq!(reserve.balance, Uint128::new(RESERVE_SEED));
    assert_eq!(reserve.asset_manager, Some(lbp.owner.clone()));

    let project = lbp.project_info();
    assert_eq!(project.cash, Uint128::new(PROJECT_SEED));
    assert_eq!(project.managed, Uint128::zero());

    // Only the project side moved
    let owner_reserve_after = lbp
        .app
        .wrap()
        .query_balance(lbp.owner.clone(), RESERVE_DENOM)
        .unwrap()
        .amount;
    assert_eq!(owner_reserve_before, owner_reserve_after);
    assert_eq!(
        lbp.cw20_balance(&lbp.project_token, &lbp.vault),
        Uint128::new(PROJECT_SEED)
    );
    assert!(!lbp.cw20_balance(&lbp.lp_token, &lbp.owner).is_zero());

    // The pool sees the totals
    let pool_config: PoolConfigResponse = lbp
        .app
        .wrap()
        .query_wasm_smart(lbp.pool_addr.clone(), &PoolQueryMsg::Config {})
        .unwrap();
    assert!(pool_config
        .assets
        .contains(&Asset::new(AssetInfo::native_token(RESERVE_DENOM), RESERVE_SEED)));
    assert_eq!(lbp.status(), PoolStatus::Funded);
}

#[test]
fn test_swaps_are_paid_out_of_cash() {
    let mut lbp = seeded();

    // Owner can pause trading
    lbp.app
        .execute_contract(
            lbp.owner.clone(),
            lbp.pool_addr.clone(),
            &PoolExecuteMsg::SetSwapEnabled { enabled: false },
            &[],
        )
        .unwrap();
    let err = lbp.buy_project(1_000_000_000, None).unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Pool query failed: Swaps are disabled"
    );
    lbp.app
        .execute_contract(
            lbp.owner.clone(),
            lbp.pool_addr.clone(),
            &PoolExecuteMsg::SetSwapEnabled { enabled: true },
            &[],
        )
        .unwrap();

    let err = lbp
        .buy_project(1_000_000_000, Some(Uint128::new(2_000_000_000)))
        .unwrap_err();
    assert!(err.root_cause().to_string().starts_with("Received"));

    lbp.buy_project(1_000_000_000, None).unwrap();
    assert_eq!(lbp.status(), PoolStatus::Active);

    let received = lbp.cw20_balance(&lbp.project_token, &lbp.trader);
    assert!(!received.is_zero());
    let project = lbp.project_info();
    assert_eq!(project.cash, Uint128::new(PROJECT_SEED) - received);
    let reserve = lbp.reserve_info();
    assert_eq!(reserve.cash, Uint128::new(1_000_000_000));
    assert_eq!(reserve.managed, Uint128::new(RESERVE_SEED));

    // Selling project tokens needs more reserve than the Vault holds in cash
    let sell = Uint128::new(100_000_000_000);
    mint_some_tokens(
        &mut lbp.app,
        lbp.owner.clone(),
        lbp.project_token.clone(),
        sell,
        lbp.trader.to_string(),
    );
    increase_token_allowance(
        &mut lbp.app,
        lbp.trader.clone(),
        lbp.project_token.clone(),
        lbp.vault.to_string(),
        sell,
    );
    let err = lbp
        .app
        .execute_contract(
            lbp.trader.clone(),
            lbp.vault.clone(),
            &ExecuteMsg::Swap {
                swap_request: SingleSwapRequest {
                    pool_id: lbp.pool_id,
                    asset_in: AssetInfo::Token {
                        contract_addr: lbp.project_token.clone(),
                    },
                    asset_out: AssetInfo::native_token(RESERVE_DENOM),
                    swap_type: SwapType::GiveIn {},
                    amount: sell,
                },
                recipient: None,
                min_receive: None,
                max_spend: None,
            },
            &[],
        )
        .unwrap_err();
    assert!(err
        .root_cause()
        .to_string()
        .starts_with("Insufficient cash balance of ureserve: available 1000000000"));
}

#[test]
fn test_transfer_as_manager() {
    let mut lbp = seeded();
    lbp.buy_project(1_000_000_000, None).unwrap();
    let reserve_total = Uint128::new(RESERVE_SEED + 1_000_000_000);
    let to_cash = |amount: u128| ExecuteMsg::TransferAsManager {
        pool_id: Uint128::one(),
        asset_info: AssetInfo::native_token(RESERVE_DENOM),
        amount: Uint128::new(amount),
        direction: ManagedTransferDirection::ToCash,
    };

    let err = lbp
        .app
        .execute_contract(
            lbp.trader.clone(),
            lbp.vault.clone(),
            &to_cash(1_000),
            &coins(1_000, RESERVE_DENOM),
        )
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Sender is not the asset manager of ureserve"
    );

    let err = lbp
        .app
        .execute_contract(
            lbp.owner.clone(),
            lbp.vault.clone(),
            &ExecuteMsg::TransferAsManager {
                pool_id: lbp.pool_id,
                asset_info: AssetInfo::Token {
                    contract_addr: lbp.project_token.clone(),
                },
                amount: Uint128::new(1_000),
                direction: ManagedTransferDirection::ToManaged,
            },
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        format!("Sender is not the asset manager of {}", lbp.project_token)
    );

    let err = lbp
        .app
        .execute_contract(lbp.owner.clone(), lbp.vault.clone(), &to_cash(0), &[])
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "Amount cannot be 0");

    let err = lbp
        .app
        .execute_contract(
            lbp.owner.clone(),
            lbp.vault.clone(),
            &to_cash(1_000_000_000),
            &[],
        )
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Insufficient number of ureserve tokens sent. Tokens sent = 0. Tokens needed = 1000000000"
    );

    // Return half of the seed
    lbp.app
        .execute_contract(
            lbp.owner.clone(),
            lbp.vault.clone(),
            &to_cash(50_000_000_000),
            &coins(50_000_000_000, RESERVE_DENOM),
        )
        .unwrap();
    let reserve = lbp.reserve_info();
    assert_eq!(reserve.cash, Uint128::new(51_000_000_000));
    assert_eq!(reserve.managed, Uint128::new(50_000_000_000));
    assert_eq!(reserve.balance, reserve_total);

    let err = lbp
        .app
        .execute_contract(
            lbp.owner.clone(),
            lbp.vault.clone(),
            &to_cash(60_000_000_000),
            &coins(60_000_000_000, RESERVE_DENOM),
        )
        .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Insufficient managed balance of ureserve: available 50000000000, needed 60000000000"
    );

    // Take some cash back out
    let owner_before = lbp
        .app
        .wrap()
        .query_balance(lbp.owner.clone(), RESERVE_DENOM)
        .unwrap()
        .amount;
    lbp.app
        .execute_contract(
            lbp.owner.clone(),
            lbp.vault.clone(),
            &ExecuteMsg::TransferAsManager {
                pool_id: lbp.pool_id,
                asset_info: AssetInfo::native_token(RESERVE_DENOM),
                amount: Uint128::new(1_000_000_000),
                direction: ManagedTransferDirection::ToManaged,
            },
            &[],
        )
        .unwrap();
    let owner_after = lbp
        .app
        .wrap()
        .query_balance(lbp.owner.clone(), RESERVE_DENOM)
        .unwrap()
        .amount;
    assert_eq!(owner_after - owner_before, Uint128::new(1_000_000_000));

    let reserve = lbp.reserve_info();
    assert_eq!(reserve.cash, Uint128::new(50_000_000_000));
    assert_eq!(reserve.managed, Uint128::new(51_000_000_000));
    assert_eq!(reserve.balance, reserve_total);

    // Pool totals never moved
    let pool_config: PoolConfigResponse = lbp
        .app
        .wrap()
        .query_wasm_smart(lbp.pool_addr.clone(), &PoolQueryMsg::Config {})
        .unwrap();
    assert!(pool_config
        .assets
        .contains(&Asset::new(AssetInfo::native_token(RESERVE_DENOM), reserve_total)));
}

#[test]
fn test_exit_is_limited_to_cash() {
    let mut lbp = seeded();
    lbp.buy_project(1_000_000_000, None).unwrap();
    let lp_balance = lbp.cw20_balance(&lbp.lp_token, &lbp.owner);

    let vault = lbp.vault.to_string();
    let exit = |amount: Uint128, min_assets_out: Option<Vec<Asset>>| Cw20ExecuteMsg::Send {
        contract: vault.clone(),
        amount,
        msg: to_json_binary(&Cw20HookMsg::ExitPool {
            pool_id: Uint128::one(),
            recipient: None,
            min_assets_out,
        })
        .unwrap(),
    };
    // The reserve share of a full exit is mostly managed
    let err = lbp
        .app
        .execute_contract(
            lbp.owner.clone(),
            lbp.lp_token.clone(),
            &exit(lp_balance, None),
            &[],
        )
        .unwrap_err();
    assert!(err
        .root_cause()
        .to_string()
        .starts_with("Insufficient cash balance of ureserve"));

    let small = lp_balance.multiply_ratio(1u128, 1_000u128);
    let err = lbp
        .app
        .execute_contract(
            lbp.owner.clone(),
            lbp.lp_token.clone(),
            &exit(
                small,
                Some(vec![Asset::new(
                    AssetInfo::native_token(RESERVE_DENOM),
                    1_000_000_000u128,
                )]),
            ),
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().starts_with("Received"));

    let reserve_before = lbp.reserve_info();
    lbp.app
        .execute_contract(lbp.owner.clone(), lbp.lp_token.clone(), &exit(small, None), &[])
        .unwrap();
    assert_eq!(lbp.cw20_balance(&lbp.lp_token, &lbp.owner), lp_balance - small);

    let reserve_after = lbp.reserve_info();
    assert_eq!(reserve_after.managed, reserve_before.managed);
    let paid = reserve_before.cash - reserve_after.cash;
    // ~1/1000 of the reserve total
    assert!(paid > Uint128::new(100_000_000) && paid <= Uint128::new(101_000_000));

    // Direct calls to the hook are refused
    let err = lbp
        .app
        .execute_contract(
            lbp.owner.clone(),
            lbp.vault.clone(),
            &ExecuteMsg::Receive(cw20::Cw20ReceiveMsg {
                sender: lbp.owner.to_string(),
                amount: small,
                msg: to_json_binary(&Cw20HookMsg::ExitPool {
                    pool_id: lbp.pool_id,
                    recipient: None,
                    min_assets_out: None,
                })
                .unwrap(),
            }),
            &[],
        )
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "Unauthorized");
}

#[test]
fn test_weight_schedule_lowers_the_project_price() {
    let mut lbp = seeded();
    let project = AssetInfo::Token {
        contract_addr: lbp.project_token.clone(),
    };
    let spot_price = |app: &App, pool: &Addr| -> Decimal256 {
        let res: SpotPriceResponse = app
            .wrap()
            .query_wasm_smart(
                pool.clone(),
                &PoolQueryMsg::SpotPrice {
                    offer_asset: project.clone(),
                    ask_asset: AssetInfo::native_token(RESERVE_DENOM),
                },
            )
            .unwrap();
        res.price
    };
    let start_price = spot_price(&lbp.app, &lbp.pool_addr);

    let update = PoolExecuteMsg::UpdateWeightsGradually {
        start_time: EPOCH_START,
        end_time: EPOCH_START + 1_000,
        end_weights: WeightPair {
            project: Decimal::percent(50),
            reserve: Decimal::percent(50),
        },
    };
    let err = lbp
        .app
        .execute_contract(lbp.trader.clone(), lbp.pool_addr.clone(), &update, &[])
        .unwrap_err();
    assert_eq!(err.root_cause().to_string(), "Unauthorized");
    lbp.app
        .execute_contract(lbp.owner.clone(), lbp.pool_addr.clone(), &update, &[])
        .unwrap();

    lbp.app
        .update_block(|b| b.time = b.time.plus_seconds(500));
    let mid_price = spot_price(&lbp.app, &lbp.pool_addr);
    lbp.app
        .update_block(|b| b.time = b.time.plus_seconds(500));
    let end_price = spot_price(&lbp.app, &lbp.pool_addr);

    assert!(mid_price < start_price);
    assert!(end_price < mid_price);
    // 50/50 at 1M project vs 100k reserve
    assert_eq!(end_price, Decimal256::percent(10));

    // Ledger untouched by the schedule
    assert_eq!(lbp.reserve_info().managed, Uint128::new(RESERVE_SEED));
}
