use cast::i128;
use soroban_sdk::{vec, Address, Env};

use crate::{
    constants::E6,
    errors::LendingPoolError,
    events,
    math::{checked_add, mul_div_ceil, mul_div_floor},
};

use super::{account::Account, market_rule::get_asset_rules, pool::Pool};

/// An account's collateral and debt, valued in the common unit (18 decimals)
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionData {
    /// The collateral-flagged deposits, weighted by their collateral coefficients
    pub collateral_value: i128,
    /// The debt, weighted up by the borrow coefficients
    pub debt_value: i128,
}

impl PositionData {
    /// Value an account's positions under its market rule
    ///
    /// Every price needed is fetched in one call to the price feed. Reserves and positions
    /// are accrued in memory only.
    ///
    /// ### Errors
    /// If the account's market rule does not exist or a price is unavailable
    pub fn calculate(
        e: &Env,
        pool: &mut Pool,
        account: &mut Account,
    ) -> Result<Self, LendingPoolError> {
        let rule = pool.load_market_rule(e, account.config.market_rule_id)?;

        let mut assets = vec![e];
        for i in 0..pool.reserve_list.len() {
            if (account.is_collateral(i) && account.has_deposit(i)) || account.has_borrow(i) {
                assets.push_back(pool.reserve_list.get_unchecked(i));
            }
        }
        pool.load_prices(e, &assets)?;

        let mut collateral_value = 0;
        let mut debt_value = 0;
        for asset in assets.iter() {
            let reserve = pool.load_reserve(e, &asset)?;
            let data = account.load_reserve_data(e, &reserve)?;
            let price = pool.get_price(&asset)?;
            let rules = get_asset_rules(&rule, reserve.index());

            if account.is_collateral(reserve.index()) && data.deposit > 0 {
                if let Some(coefficient) = rules.as_ref().and_then(|r| r.collateral_coefficient_e6)
                {
                    let value = mul_div_floor(e, data.deposit, price, reserve.scalar())?;
                    collateral_value = checked_add(
                        collateral_value,
                        mul_div_floor(e, value, i128(coefficient), E6)?,
                    )?;
                }
            }

            let debt = checked_add(data.debt, data.stable_debt)?;
            if debt > 0 {
                // debt created under an older rule still counts at full weight
                let coefficient = rules
                    .and_then(|r| r.borrow_coefficient_e6)
                    .map(i128)
                    .unwrap_or(E6);
                let value = mul_div_ceil(e, debt, price, reserve.scalar())?;
                debt_value = checked_add(debt_value, mul_div_ceil(e, value, E6, coefficient)?)?;
            }

            pool.cache_reserve(reserve, false);
        }

        Ok(PositionData {
            collateral_value,
            debt_value,
        })
    }

    /// The account's free collateral as (is non-negative, magnitude)
    pub fn free_collateral(&self) -> (bool, i128) {
        if self.collateral_value >= self.debt_value {
            (true, self.collateral_value - self.debt_value)
        } else {
            (false, self.debt_value - self.collateral_value)
        }
    }

    /// Check if the collateral covers the debt
    pub fn is_collateralized(&self) -> bool {
        self.collateral_value >= self.debt_value
    }

    /// Require the collateral to cover the debt
    pub fn require_collateralized(&self) -> Result<(), LendingPoolError> {
        if !self.is_collateralized() {
            return Err(LendingPoolError::InsufficientCollateral);
        }
        Ok(())
    }
}

/// Calculate an account's free collateral without writing anything to the ledger
pub fn calc_account_free_collateral(
    e: &Env,
    address: &Address,
) -> Result<(bool, i128), LendingPoolError> {
    let mut pool = Pool::load(e)?;
    let mut account = Account::load(e, address);
    Ok(PositionData::calculate(e, &mut pool, &mut account)?.free_collateral())
}

/// Flag or unflag an account's deposit in a reserve as collateral
///
/// ### Errors
/// If the flag is unchanged, the market rule disables the asset as collateral, the deposit
/// is below the reserve's minimal collateral, or unflagging leaves the account
/// undercollateralized
pub fn execute_set_as_collateral(
    e: &Env,
    address: &Address,
    asset: &Address,
    use_as_collateral: bool,
) -> Result<(), LendingPoolError> {
    let mut pool = Pool::load(e)?;
    let reserve = pool.load_reserve(e, asset)?;
    reserve.require_active()?;
    let mut account = Account::load(e, address);
    if account.is_collateral(reserve.index()) == use_as_collateral {
        return Err(LendingPoolError::AlreadySet);
    }

    if use_as_collateral {
        let rule = pool.load_market_rule(e, account.config.market_rule_id)?;
        if get_asset_rules(&rule, reserve.index())
            .and_then(|rules| rules.collateral_coefficient_e6)
            .is_none()
        {
            return Err(LendingPoolError::RuleCollateralDisable);
        }
        let data = account.load_reserve_data(e, &reserve)?;
        reserve.require_minimal_collateral(data.deposit)?;
        account.set_collateral(reserve.index(), true);
    } else {
        account.set_collateral(reserve.index(), false);
        pool.cache_reserve(reserve, false);
        if account.config.borrows != 0 {
            PositionData::calculate(e, &mut pool, &mut account)?.require_collateralized()?;
        }
    }

    account.store(e);
    events::collateral_set(e, asset.clone(), address.clone(), use_as_collateral);
    Ok(())
}
