use soroban_sdk::{contracttype, vec, Address, Env, Map, Vec};

use crate::{
    errors::{LendingPoolError, MathError},
    events,
    math::{checked_add, checked_sub},
};

use super::{account::Account, market_rule::get_asset_rules, pool::Pool, reserve::Reserve};

/// The kind of an action an account takes against the pool
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
#[repr(u32)]
pub enum ActionType {
    Deposit = 0,
    Withdraw = 1,
    Borrow = 2,
    BorrowStable = 3,
    Repay = 4,
}

/// An action an account takes against the pool
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Action {
    pub action_type: ActionType,
    pub asset: Address,
    pub amount: Option<i128>, // None withdraws or repays everything
}

impl ActionType {
    /// Check if the action takes value out of the account's positions
    pub fn requires_owner_auth(&self) -> bool {
        matches!(
            self,
            ActionType::Withdraw | ActionType::Borrow | ActionType::BorrowStable
        )
    }
}

/// Token transfers to be made by the caller and pool
pub struct Transfers {
    pub caller_transfer: Map<Address, i128>,
    pub pool_transfer: Map<Address, i128>,
}

impl Transfers {
    /// Create an empty set of transfers
    pub fn new(e: &Env) -> Self {
        Transfers {
            caller_transfer: Map::new(e),
            pool_transfer: Map::new(e),
        }
    }

    /// Add tokens the caller needs to transfer to the pool
    pub fn add_for_caller_transfer(
        &mut self,
        asset: &Address,
        amount: i128,
    ) -> Result<(), MathError> {
        let total = checked_add(amount, self.caller_transfer.get(asset.clone()).unwrap_or(0))?;
        self.caller_transfer.set(asset.clone(), total);
        Ok(())
    }

    // Add tokens the pool needs to transfer to the caller
    pub fn add_for_pool_transfer(
        &mut self,
        asset: &Address,
        amount: i128,
    ) -> Result<(), MathError> {
        let total = checked_add(amount, self.pool_transfer.get(asset.clone()).unwrap_or(0))?;
        self.pool_transfer.set(asset.clone(), total);
        Ok(())
    }
}

/// Apply a list of actions to an account's positions and the cached reserves
///
/// ### Arguments
/// * `pool` - The pool
/// * `caller` - The address paying and receiving tokens
/// * `account` - The account whose positions are modified
/// * `actions` - The actions to apply, in order
///
/// ### Returns
/// A tuple of (transfers, amounts, check_collateral) where:
/// * transfers - The token transfers to make once every action has been applied
/// * amounts - The amount moved by each action
/// * check_collateral - If the account's collateral must be checked
///
/// ### Errors
/// If any action is invalid given the state of the pool or account
pub fn build_transfers_from_actions(
    e: &Env,
    pool: &mut Pool,
    caller: &Address,
    account: &mut Account,
    actions: &Vec<Action>,
) -> Result<(Transfers, Vec<i128>, bool), LendingPoolError> {
    let mut transfers = Transfers::new(e);
    let mut amounts = vec![e];
    let mut check_collateral = false;
    let mut fee_reductions: Option<(u32, u32)> = None;

    for action in actions.iter() {
        if action.amount.unwrap_or(0) < 0 {
            return Err(LendingPoolError::NegativeAmount);
        }
        let mut reserve = pool.load_reserve(e, &action.asset)?;
        let amount = match action.action_type {
            ActionType::Deposit => {
                reserve.require_active_not_frozen()?;
                let amount = require_positive(action.amount)?;
                let (deposit_reduction, _) = *fee_reductions
                    .get_or_insert_with(|| pool.load_fee_reductions(e, &account.address));
                let fee = Reserve::calc_fee(
                    e,
                    amount,
                    reserve.config.fees.deposit_fee_e6,
                    deposit_reduction,
                )?;

                let data = account.add_deposit(e, &mut reserve, amount - fee)?;
                reserve.data.earned_fee = checked_add(reserve.data.earned_fee, fee)?;
                reserve.require_deposit_cap()?;
                if account.is_collateral(reserve.index()) {
                    reserve.require_minimal_collateral(data.deposit)?;
                }
                transfers.add_for_caller_transfer(&reserve.asset, amount)?;
                events::deposit(
                    e,
                    reserve.asset.clone(),
                    caller.clone(),
                    account.address.clone(),
                    amount,
                );
                amount
            }
            ActionType::Withdraw => {
                reserve.require_active()?;
                let deposit = account.load_reserve_data(e, &reserve)?.deposit;
                let amount = action.amount.unwrap_or(deposit);

                let data = account.remove_deposit(e, &mut reserve, amount)?;
                reserve.require_minimal_collateral(data.deposit)?;
                if account.is_collateral(reserve.index()) {
                    check_collateral = true;
                }
                transfers.add_for_pool_transfer(&reserve.asset, amount)?;
                events::redeem(
                    e,
                    reserve.asset.clone(),
                    caller.clone(),
                    account.address.clone(),
                    amount,
                );
                amount
            }
            ActionType::Borrow | ActionType::BorrowStable => {
                reserve.require_active_not_frozen()?;
                let amount = require_positive(action.amount)?;
                let rule = pool.load_market_rule(e, account.config.market_rule_id)?;
                let rules = get_asset_rules(&rule, reserve.index())
                    .filter(|rules| rules.borrow_coefficient_e6.is_some())
                    .ok_or(LendingPoolError::RuleBorrowDisable)?;
                let (_, debt_reduction) = *fee_reductions
                    .get_or_insert_with(|| pool.load_fee_reductions(e, &account.address));
                let fee =
                    Reserve::calc_fee(e, amount, reserve.config.fees.debt_fee_e6, debt_reduction)?;
                let new_debt = checked_add(amount, fee)?;

                let data = if action.action_type == ActionType::BorrowStable {
                    if !rules.stable_borrow_enabled {
                        return Err(LendingPoolError::AssetStableBorrowDisabled);
                    }
                    let rate_e24 = reserve.stable_borrow_rate_e24(e)?;
                    let data = account.add_stable_debt(e, &mut reserve, new_debt, rate_e24)?;
                    events::borrow_stable(
                        e,
                        reserve.asset.clone(),
                        caller.clone(),
                        account.address.clone(),
                        amount,
                        rate_e24,
                    );
                    data
                } else {
                    let data = account.add_debt(e, &mut reserve, new_debt)?;
                    events::borrow(
                        e,
                        reserve.asset.clone(),
                        caller.clone(),
                        account.address.clone(),
                        amount,
                    );
                    data
                };
                reserve.data.earned_fee = checked_add(reserve.data.earned_fee, fee)?;
                reserve.require_debt_cap()?;
                reserve.require_minimal_debt(checked_add(data.debt, data.stable_debt)?)?;
                transfers.add_for_pool_transfer(&reserve.asset, amount)?;
                check_collateral = true;
                amount
            }
            ActionType::Repay => {
                reserve.require_active()?;
                let data = account.load_reserve_data(e, &reserve)?;
                let owed = checked_add(data.debt, data.stable_debt)?;
                if owed == 0 {
                    return Err(LendingPoolError::NothingToRepay);
                }
                // repaying more than is owed repays everything
                let amount = action.amount.map_or(owed, |amount| amount.min(owed));

                account.repay_debt(e, &mut reserve, amount)?;
                reserve.require_minimal_debt(checked_sub(owed, amount)?)?;
                transfers.add_for_caller_transfer(&reserve.asset, amount)?;
                events::repay(
                    e,
                    reserve.asset.clone(),
                    caller.clone(),
                    account.address.clone(),
                    amount,
                );
                amount
            }
        };
        pool.cache_reserve(reserve, true);
        amounts.push_back(amount);
    }
    Ok((transfers, amounts, check_collateral))
}

fn require_positive(amount: Option<i128>) -> Result<i128, LendingPoolError> {
    match amount {
        Some(amount) if amount > 0 => Ok(amount),
        _ => Err(LendingPoolError::NegativeAmount),
    }
}
