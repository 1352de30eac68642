#![cfg(test)]

use lending_pool::{Action, ActionType, LendingPoolError, ReserveRestrictions};
use soroban_sdk::{
    testutils::{Address as _, AuthorizedFunction, AuthorizedInvocation},
    vec, Address, IntoVal, Symbol,
};
use test_suites::{
    assertions::assert_approx_eq_abs,
    test_fixture::{TestFixture, TokenIndex, ONE_YEAR, SCALAR_7, SCALAR_9},
};

/// Test a deposit and withdrawal for auth, token movements and positions
#[test]
fn test_deposit_and_withdraw() {
    let fixture = TestFixture::create();
    let pool = &fixture.pool;
    let usdc = fixture.token(TokenIndex::USDC);

    let sam = Address::generate(&fixture.env);
    usdc.mint(&sam, &(1_000 * SCALAR_7));

    let amount = 1_000 * SCALAR_7;
    let result = pool.deposit(&sam, &usdc.address, &sam, &amount);
    assert_eq!(result, amount);
    assert_eq!(
        fixture.env.auths()[0],
        (
            sam.clone(),
            AuthorizedInvocation {
                function: AuthorizedFunction::Contract((
                    pool.address.clone(),
                    Symbol::new(&fixture.env, "deposit"),
                    vec![
                        &fixture.env,
                        sam.to_val(),
                        usdc.address.to_val(),
                        sam.to_val(),
                        amount.into_val(&fixture.env)
                    ]
                )),
                sub_invocations: std::vec![AuthorizedInvocation {
                    function: AuthorizedFunction::Contract((
                        usdc.address.clone(),
                        Symbol::new(&fixture.env, "transfer"),
                        vec![
                            &fixture.env,
                            sam.to_val(),
                            pool.address.to_val(),
                            amount.into_val(&fixture.env)
                        ]
                    )),
                    sub_invocations: std::vec![]
                }]
            }
        )
    );
    assert_eq!(usdc.balance(&sam), 0);
    assert_eq!(usdc.balance(&pool.address), amount);
    let sam_data = fixture.read_account_reserve_data(TokenIndex::USDC, &sam);
    assert_eq!(sam_data.deposit, amount);
    assert_eq!(fixture.read_reserve_data(TokenIndex::USDC).total_deposit, amount);
    let config = pool.view_account_config(&sam);
    assert_eq!(config.deposits, 0b1);
    assert_eq!(config.collaterals, 0);

    // withdrawing more than deposited fails
    let result = pool.try_withdraw(&sam, &usdc.address, &sam, &Some(amount + 1));
    assert_eq!(result.err(), Some(Ok(LendingPoolError::InsufficientDeposit)));

    let result = pool.withdraw(&sam, &usdc.address, &sam, &None);
    assert_eq!(result, amount);
    assert_eq!(usdc.balance(&sam), amount);
    assert_eq!(usdc.balance(&pool.address), 0);
    assert_eq!(fixture.read_account_reserve_data(TokenIndex::USDC, &sam).deposit, 0);
    assert_eq!(fixture.read_reserve_data(TokenIndex::USDC).total_deposit, 0);
    assert_eq!(pool.view_account_config(&sam).deposits, 0);
}

/// Test that an account can't move value out of another account's positions without its auth
#[test]
fn test_on_behalf_of_requires_owner_auth_to_withdraw() {
    let fixture = TestFixture::create();
    let pool = &fixture.pool;
    let usdc = fixture.token(TokenIndex::USDC);

    let sam = Address::generate(&fixture.env);
    let merry = Address::generate(&fixture.env);
    usdc.mint(&merry, &(100 * SCALAR_7));

    // anyone can deposit for someone else
    pool.deposit(&merry, &usdc.address, &sam, &(100 * SCALAR_7));
    assert_eq!(fixture.env.auths().len(), 1);
    assert_eq!(fixture.env.auths()[0].0, merry);
    assert_eq!(
        fixture.read_account_reserve_data(TokenIndex::USDC, &sam).deposit,
        100 * SCALAR_7
    );
    assert_eq!(usdc.balance(&merry), 0);

    // withdrawing for someone else requires both the caller and the owner
    pool.withdraw(&merry, &usdc.address, &sam, &Some(40 * SCALAR_7));
    let auths = fixture.env.auths();
    assert_eq!(auths.len(), 2);
    assert!(auths.iter().any(|(address, _)| address == &sam));
    assert!(auths.iter().any(|(address, _)| address == &merry));
    assert_eq!(usdc.balance(&merry), 40 * SCALAR_7);
    assert_eq!(
        fixture.read_account_reserve_data(TokenIndex::USDC, &sam).deposit,
        60 * SCALAR_7
    );
}

/// Test a variable borrow across a year of interest and its full repayment
#[test]
fn test_borrow_and_repay_over_time() {
    let (fixture, frodo) = TestFixture::create_with_liquidity();
    let pool = &fixture.pool;
    let usdc = fixture.token(TokenIndex::USDC);

    let sam = Address::generate(&fixture.env);
    // 20k of wETH backs 16k of weighted debt
    fixture.deposit_collateral(&sam, TokenIndex::WETH, 10 * SCALAR_9);

    let amount = 10_000 * SCALAR_7;
    let result = pool.borrow(&sam, &usdc.address, &sam, &amount);
    assert_eq!(result, amount);
    assert_eq!(usdc.balance(&sam), amount);
    let reserve_data = fixture.read_reserve_data(TokenIndex::USDC);
    assert_eq!(reserve_data.total_debt, amount);
    // 10% utilization on a 10% at 80% target curve is 1.25% a year
    assert_eq!(reserve_data.current_debt_rate_e24, 396_372_399_797_058);
    let (is_positive, free) = pool.get_free_collateral_coefficient(&sam);
    assert!(is_positive);
    // 16,000 - 10,000 / 0.95
    assert_approx_eq_abs(free, 5_473_684_210_526_315_789_474, 1);

    fixture.jump(ONE_YEAR);

    let sam_data = fixture.read_account_reserve_data(TokenIndex::USDC, &sam);
    assert_approx_eq_abs(sam_data.debt, 10_125 * SCALAR_7, 10);
    let frodo_data = fixture.read_account_reserve_data(TokenIndex::USDC, &frodo);
    assert_approx_eq_abs(frodo_data.deposit, 100_125 * SCALAR_7, 10);
    let reserve_data = fixture.read_reserve_data(TokenIndex::USDC);
    assert_approx_eq_abs(reserve_data.total_debt, 10_125 * SCALAR_7, 10);
    assert_approx_eq_abs(reserve_data.total_deposit, 100_125 * SCALAR_7, 10);
    assert!(reserve_data.cumulative_debt_index_e18 > reserve_data.cumulative_supply_index_e18);

    // repaying more than owed only repays the debt
    usdc.mint(&sam, &(1_000 * SCALAR_7));
    let balance = usdc.balance(&sam);
    let repaid = pool.repay(&sam, &usdc.address, &sam, &Some(20_000 * SCALAR_7));
    assert_eq!(repaid, sam_data.debt);
    assert_eq!(usdc.balance(&sam), balance - repaid);
    assert_eq!(fixture.read_account_reserve_data(TokenIndex::USDC, &sam).debt, 0);
    assert_eq!(pool.view_account_config(&sam).borrows, 0);

    let result = pool.try_repay(&sam, &usdc.address, &sam, &None);
    assert_eq!(result.err(), Some(Ok(LendingPoolError::NothingToRepay)));

    // the lender withdraws everything including interest
    let withdrawn = pool.withdraw(&frodo, &usdc.address, &frodo, &None);
    assert_eq!(withdrawn, frodo_data.deposit);
}

/// Test that only collateral-flagged deposits back debt
#[test]
fn test_collateral_gating() {
    let (fixture, _) = TestFixture::create_with_liquidity();
    let pool = &fixture.pool;
    let usdc = fixture.token(TokenIndex::USDC);
    let weth = fixture.token(TokenIndex::WETH);

    let sam = Address::generate(&fixture.env);
    weth.mint(&sam, &SCALAR_9);
    pool.deposit(&sam, &weth.address, &sam, &SCALAR_9);

    let result = pool.try_borrow(&sam, &usdc.address, &sam, &(100 * SCALAR_7));
    assert_eq!(result.err(), Some(Ok(LendingPoolError::InsufficientCollateral)));

    pool.set_as_collateral(&sam, &weth.address, &true);
    let result = pool.try_set_as_collateral(&sam, &weth.address, &true);
    assert_eq!(result.err(), Some(Ok(LendingPoolError::AlreadySet)));
    pool.borrow(&sam, &usdc.address, &sam, &(1_000 * SCALAR_7));

    // 2,000 * 0.8 covers 1,000 / 0.95 but not 1,600 / 0.95
    let result = pool.try_borrow(&sam, &usdc.address, &sam, &(600 * SCALAR_7));
    assert_eq!(result.err(), Some(Ok(LendingPoolError::InsufficientCollateral)));

    let result = pool.try_set_as_collateral(&sam, &weth.address, &false);
    assert_eq!(result.err(), Some(Ok(LendingPoolError::InsufficientCollateral)));

    let result = pool.try_withdraw(&sam, &weth.address, &sam, &None);
    assert_eq!(result.err(), Some(Ok(LendingPoolError::InsufficientCollateral)));

    // a partial withdrawal that stays collateralized goes through
    pool.withdraw(&sam, &weth.address, &sam, &Some(SCALAR_9 / 10));
    assert_eq!(weth.balance(&sam), SCALAR_9 / 10);
}

/// Test that multi_op applies every action or none of them
#[test]
fn test_multi_op_is_atomic() {
    let (fixture, _) = TestFixture::create_with_liquidity();
    let pool = &fixture.pool;
    let usdc = fixture.token(TokenIndex::USDC);
    let xlm = fixture.token(TokenIndex::XLM);

    let sam = Address::generate(&fixture.env);
    // 1,600 of collateral
    fixture.deposit_collateral(&sam, TokenIndex::WETH, SCALAR_9);
    xlm.mint(&sam, &(10_000 * SCALAR_7));

    let actions = vec![
        &fixture.env,
        Action {
            action_type: ActionType::Deposit,
            asset: xlm.address.clone(),
            amount: Some(10_000 * SCALAR_7),
        },
        Action {
            action_type: ActionType::Borrow,
            asset: usdc.address.clone(),
            amount: Some(5_000 * SCALAR_7),
        },
    ];
    let result = pool.try_multi_op(&sam, &sam, &actions);
    assert_eq!(result.err(), Some(Ok(LendingPoolError::InsufficientCollateral)));
    assert_eq!(xlm.balance(&sam), 10_000 * SCALAR_7);
    assert_eq!(usdc.balance(&sam), 0);
    assert_eq!(pool.view_account_config(&sam).deposits, 0b10);
    assert_eq!(pool.view_unupdated_account_reserve(&xlm.address, &sam), None);

    // repaying in the same call is paid for before the borrowed tokens are sent
    usdc.mint(&sam, &(400 * SCALAR_7));
    let actions = vec![
        &fixture.env,
        Action {
            action_type: ActionType::Deposit,
            asset: xlm.address.clone(),
            amount: Some(10_000 * SCALAR_7),
        },
        Action {
            action_type: ActionType::Borrow,
            asset: usdc.address.clone(),
            amount: Some(1_000 * SCALAR_7),
        },
        Action {
            action_type: ActionType::Repay,
            asset: usdc.address.clone(),
            amount: Some(400 * SCALAR_7),
        },
    ];
    let amounts = pool.multi_op(&sam, &sam, &actions);
    assert_eq!(
        amounts,
        vec![&fixture.env, 10_000 * SCALAR_7, 1_000 * SCALAR_7, 400 * SCALAR_7]
    );
    assert_eq!(xlm.balance(&sam), 0);
    assert_eq!(usdc.balance(&sam), 1_000 * SCALAR_7);
    assert_eq!(
        fixture.read_account_reserve_data(TokenIndex::USDC, &sam).debt,
        600 * SCALAR_7
    );
    let config = pool.view_account_config(&sam);
    assert_eq!(config.deposits, 0b110);
    assert_eq!(config.borrows, 0b1);
}

/// Test stable borrows lock in a rate and reject assets without stable borrowing
#[test]
fn test_borrow_stable() {
    let (fixture, _) = TestFixture::create_with_liquidity();
    let pool = &fixture.pool;
    let usdc = fixture.token(TokenIndex::USDC);
    let xlm = fixture.token(TokenIndex::XLM);

    let sam = Address::generate(&fixture.env);
    fixture.deposit_collateral(&sam, TokenIndex::WETH, SCALAR_9);

    let result = pool.try_borrow_stable(&sam, &xlm.address, &sam, &(100 * SCALAR_7));
    assert_eq!(
        result.err(),
        Some(Ok(LendingPoolError::AssetStableBorrowDisabled))
    );

    let amount = 100 * SCALAR_7;
    pool.borrow_stable(&sam, &usdc.address, &sam, &amount);
    let sam_data = fixture.read_account_reserve_data(TokenIndex::USDC, &sam);
    assert_eq!(sam_data.debt, 0);
    assert_eq!(sam_data.stable_debt, amount);
    // the pool is unused so the rate at target applies, 10% a year
    assert_eq!(sam_data.stable_rate_e24, 3_170_979_198_376_459);
    let reserve_data = fixture.read_reserve_data(TokenIndex::USDC);
    assert_eq!(reserve_data.total_stable_debt, amount);
    assert_eq!(reserve_data.avg_stable_rate_e24, 3_170_979_198_376_459);
    assert_eq!(pool.view_account_config(&sam).borrows, 0b1);

    fixture.jump(30 * 24 * 60 * 60);

    let sam_data = fixture.read_account_reserve_data(TokenIndex::USDC, &sam);
    // 30 days at 10% a year, simple interest on the borrowed amount
    assert_eq!(sam_data.stable_debt, 100_8219179);
    assert_eq!(sam_data.stable_rate_e24, 3_170_979_198_376_459);

    usdc.mint(&sam, &SCALAR_7);
    let repaid = pool.repay(&sam, &usdc.address, &sam, &None);
    assert_eq!(repaid, sam_data.stable_debt);
    let sam_data = fixture.read_account_reserve_data(TokenIndex::USDC, &sam);
    assert_eq!(sam_data.stable_debt, 0);
    assert_eq!(sam_data.stable_rate_e24, 0);
    assert_eq!(fixture.read_reserve_data(TokenIndex::USDC).total_stable_debt, 0);
}

/// Test that reserve restrictions cap and floor positions
#[test]
fn test_reserve_restrictions() {
    let (fixture, _) = TestFixture::create_with_liquidity();
    let pool = &fixture.pool;
    let usdc = fixture.token(TokenIndex::USDC);

    pool.set_reserve_restrictions(
        &fixture.bombadil,
        &usdc.address,
        &ReserveRestrictions {
            maximal_total_deposit: Some(100_500 * SCALAR_7),
            maximal_total_debt: Some(2_000 * SCALAR_7),
            minimal_collateral: 0,
            minimal_debt: 10 * SCALAR_7,
        },
    );

    let sam = Address::generate(&fixture.env);
    usdc.mint(&sam, &(1_000 * SCALAR_7));
    let result = pool.try_deposit(&sam, &usdc.address, &sam, &(1_000 * SCALAR_7));
    assert_eq!(result.err(), Some(Ok(LendingPoolError::MaxDepositReached)));
    pool.deposit(&sam, &usdc.address, &sam, &(500 * SCALAR_7));

    fixture.deposit_collateral(&sam, TokenIndex::WETH, 10 * SCALAR_9);
    let result = pool.try_borrow(&sam, &usdc.address, &sam, &(5 * SCALAR_7));
    assert_eq!(result.err(), Some(Ok(LendingPoolError::MinimalDebt)));
    let result = pool.try_borrow(&sam, &usdc.address, &sam, &(2_001 * SCALAR_7));
    assert_eq!(result.err(), Some(Ok(LendingPoolError::MaxDebtReached)));
    pool.borrow(&sam, &usdc.address, &sam, &(100 * SCALAR_7));

    // partial repayments can't leave dust debt behind
    let result = pool.try_repay(&sam, &usdc.address, &sam, &Some(95 * SCALAR_7));
    assert_eq!(result.err(), Some(Ok(LendingPoolError::MinimalDebt)));
    pool.repay(&sam, &usdc.address, &sam, &None);
}
