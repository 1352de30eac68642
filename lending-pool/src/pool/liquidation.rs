use cast::i128;
use sep_41_token::TokenClient;
use soroban_sdk::{vec, Address, Env};

use crate::{
    constants::{E18, E6},
    errors::LendingPoolError,
    events,
    math::{checked_add, mul_div_ceil, mul_div_floor},
};

use super::{
    account::Account, collateral::PositionData, market_rule::get_asset_rules, pool::Pool,
};

/// Liquidate an undercollateralized account. The liquidator repays some of the account's
/// debt in `asset_to_repay` and takes over a discounted share of its collateral deposit in
/// `asset_to_take`.
///
/// ### Arguments
/// * `liquidator` - The address repaying the debt and receiving the deposit
/// * `liquidated` - The undercollateralized account
/// * `asset_to_repay` - The asset of the debt being repaid
/// * `asset_to_take` - The asset of the collateral deposit being taken
/// * `amount_to_repay` - The most debt to repay, or None to repay as much as possible
/// * `min_received_per_repaid_e18` - The least deposit taken per unit repaid
///
/// ### Returns
/// (amount repaid, deposit taken)
///
/// ### Errors
/// If the account is collateralized, has nothing to repay or take, or the liquidation does
/// not meet the minimum exchange rate
pub fn execute_liquidate(
    e: &Env,
    liquidator: &Address,
    liquidated: &Address,
    asset_to_repay: &Address,
    asset_to_take: &Address,
    amount_to_repay: Option<i128>,
    min_received_per_repaid_e18: i128,
) -> Result<(i128, i128), LendingPoolError> {
    if liquidator == liquidated {
        return Err(LendingPoolError::InvalidCaller);
    }
    if amount_to_repay.unwrap_or(0) < 0 {
        return Err(LendingPoolError::NegativeAmount);
    }

    let mut pool = Pool::load(e)?;
    let mut account = Account::load(e, liquidated);
    if PositionData::calculate(e, &mut pool, &mut account)?.is_collateralized() {
        return Err(LendingPoolError::Collateralized);
    }

    let mut repay_reserve = pool.load_reserve(e, asset_to_repay)?;
    repay_reserve.require_active()?;
    let repay_data = account.load_reserve_data(e, &repay_reserve)?;
    let owed = checked_add(repay_data.debt, repay_data.stable_debt)?;
    if owed == 0 {
        return Err(LendingPoolError::NothingToRepay);
    }

    let take_reserve = pool.load_reserve(e, asset_to_take)?;
    take_reserve.require_active()?;
    let take_data = account.load_reserve_data(e, &take_reserve)?;
    if !account.is_collateral(take_reserve.index()) || take_data.deposit == 0 {
        return Err(LendingPoolError::NothingToTake);
    }

    let rule = pool.load_market_rule(e, account.config.market_rule_id)?;
    let penalty_e6 = get_asset_rules(&rule, take_reserve.index())
        .and_then(|rules| rules.penalty_e6)
        .map(i128)
        .unwrap_or(0);
    pool.load_prices(
        e,
        &vec![e, asset_to_repay.clone(), asset_to_take.clone()],
    )?;
    let repay_price = pool.get_price(asset_to_repay)?;
    let take_price = pool.get_price(asset_to_take)?;

    let mut repaid = amount_to_repay.map_or(owed, |amount| amount.min(owed));
    if repaid == 0 {
        return Err(LendingPoolError::NothingToRepay);
    }
    let repaid_value = mul_div_floor(e, repaid, repay_price, repay_reserve.scalar())?;
    let taken_value = mul_div_floor(e, repaid_value, E6 + penalty_e6, E6)?;
    let mut taken = mul_div_floor(e, taken_value, take_reserve.scalar(), take_price)?;
    if taken > take_data.deposit {
        // not enough collateral, repay only what the whole deposit is worth
        taken = take_data.deposit;
        let taken_value = mul_div_ceil(e, taken, take_price, take_reserve.scalar())?;
        let repaid_value = mul_div_ceil(e, taken_value, E6, E6 + penalty_e6)?;
        repaid = mul_div_ceil(e, repaid_value, repay_reserve.scalar(), repay_price)?.min(owed);
    }

    if mul_div_floor(e, taken, E18, repaid)? < min_received_per_repaid_e18 {
        return Err(LendingPoolError::MinimumReceived);
    }

    account.repay_debt(e, &mut repay_reserve, repaid)?;
    pool.cache_reserve(repay_reserve, true);

    // reload in case both assets are the same reserve
    let mut take_reserve = pool.load_reserve(e, asset_to_take)?;
    let mut liquidator_account = Account::load(e, liquidator);
    account.remove_deposit(e, &mut take_reserve, taken)?;
    liquidator_account.add_deposit(e, &mut take_reserve, taken)?;
    pool.cache_reserve(take_reserve, true);

    TokenClient::new(e, asset_to_repay).transfer(
        liquidator,
        &e.current_contract_address(),
        &repaid,
    );

    pool.store_cached_reserves(e)?;
    account.store(e);
    liquidator_account.store(e);

    events::liquidation(
        e,
        liquidator.clone(),
        liquidated.clone(),
        asset_to_repay.clone(),
        asset_to_take.clone(),
        repaid,
        taken,
    );
    Ok((repaid, taken))
}
