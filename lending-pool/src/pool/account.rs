use soroban_sdk::{vec, Address, Env, Map, Vec};

use crate::{
    errors::{LendingPoolError, MathError},
    math::{
        checked_add, checked_mul, checked_sub, mul_div_ceil, mul_div_floor, sub_or_zero,
        weighted_average_ceil,
    },
    storage::{self, AccountConfig, AccountReserveData},
};

use super::{interest::calc_stable_interest, Reserve};

fn bit(reserve_index: u32) -> u64 {
    1u64 << reserve_index
}

/// An account's positions with the pool
#[derive(Clone)]
pub struct Account {
    pub address: Address,
    pub config: AccountConfig,
    reserves: Map<u32, AccountReserveData>,
    reserves_to_store: Vec<u32>,
}

impl Account {
    /// Load an account's config from the ledger. Positions are loaded lazily per reserve.
    pub fn load(e: &Env, address: &Address) -> Self {
        Account {
            address: address.clone(),
            config: storage::get_account_config(e, address),
            reserves: Map::new(e),
            reserves_to_store: vec![e],
        }
    }

    /// Store the account's config and every position that was modified
    pub fn store(&self, e: &Env) {
        storage::set_account_config(e, &self.address, &self.config);
        for index in self.reserves_to_store.iter() {
            if let Some(data) = self.reserves.get(index) {
                storage::set_account_reserve(e, &self.address, index, &data);
            }
        }
    }

    /// Load the account's position in a reserve, accrued to the reserve's indexes
    ///
    /// ### Arguments
    /// * `reserve` - The reserve, already accrued
    pub fn load_reserve_data(
        &mut self,
        e: &Env,
        reserve: &Reserve,
    ) -> Result<AccountReserveData, MathError> {
        if let Some(data) = self.reserves.get(reserve.index()) {
            if data.update_timestamp == reserve.data.indexes_update_timestamp {
                return Ok(data);
            }
        }
        let mut data = match self.reserves.get(reserve.index()) {
            Some(data) => data,
            None => storage::get_account_reserve(e, &self.address, reserve.index())
                .unwrap_or(AccountReserveData {
                    deposit: 0,
                    debt: 0,
                    stable_debt: 0,
                    stable_principal: 0,
                    stable_rate_e24: 0,
                    stable_update_timestamp: reserve.data.indexes_update_timestamp,
                    applied_supply_index_e18: reserve.data.cumulative_supply_index_e18,
                    applied_debt_index_e18: reserve.data.cumulative_debt_index_e18,
                    update_timestamp: reserve.data.indexes_update_timestamp,
                }),
        };
        accrue_account_reserve(e, &mut data, reserve)?;
        self.reserves.set(reserve.index(), data.clone());
        Ok(data)
    }

    /// Accrue the account's position in a reserve and mark it to be stored
    pub fn accrue_reserve(&mut self, e: &Env, reserve: &Reserve) -> Result<(), MathError> {
        let data = self.load_reserve_data(e, reserve)?;
        self.set_reserve_data(reserve.index(), data);
        Ok(())
    }

    fn set_reserve_data(&mut self, reserve_index: u32, data: AccountReserveData) {
        if data.deposit > 0 {
            self.config.deposits |= bit(reserve_index);
        } else {
            self.config.deposits &= !bit(reserve_index);
        }
        if data.debt > 0 || data.stable_debt > 0 {
            self.config.borrows |= bit(reserve_index);
        } else {
            self.config.borrows &= !bit(reserve_index);
        }
        self.reserves.set(reserve_index, data);
        if !self.reserves_to_store.contains(reserve_index) {
            self.reserves_to_store.push_back(reserve_index);
        }
    }

    /********** Config **********/

    /// Check if the reserve at the given index is used as collateral
    pub fn is_collateral(&self, reserve_index: u32) -> bool {
        self.config.collaterals & bit(reserve_index) != 0
    }

    /// Flag or unflag the reserve at the given index as collateral
    pub fn set_collateral(&mut self, reserve_index: u32, flag: bool) {
        if flag {
            self.config.collaterals |= bit(reserve_index);
        } else {
            self.config.collaterals &= !bit(reserve_index);
        }
    }

    /// Check if the account has a deposit in the reserve at the given index
    pub fn has_deposit(&self, reserve_index: u32) -> bool {
        self.config.deposits & bit(reserve_index) != 0
    }

    /// Check if the account has debt in the reserve at the given index
    pub fn has_borrow(&self, reserve_index: u32) -> bool {
        self.config.borrows & bit(reserve_index) != 0
    }

    /********** Positions **********/

    /// Add a deposit to the position and the reserve's total deposit
    ///
    /// ### Returns
    /// The updated position
    pub fn add_deposit(
        &mut self,
        e: &Env,
        reserve: &mut Reserve,
        amount: i128,
    ) -> Result<AccountReserveData, LendingPoolError> {
        let mut data = self.load_reserve_data(e, reserve)?;
        data.deposit = checked_add(data.deposit, amount)?;
        reserve.data.total_deposit = checked_add(reserve.data.total_deposit, amount)?;
        self.set_reserve_data(reserve.index(), data.clone());
        Ok(data)
    }

    /// Remove a deposit from the position and the reserve's total deposit
    ///
    /// ### Errors
    /// If the position holds less than `amount`
    pub fn remove_deposit(
        &mut self,
        e: &Env,
        reserve: &mut Reserve,
        amount: i128,
    ) -> Result<AccountReserveData, LendingPoolError> {
        let mut data = self.load_reserve_data(e, reserve)?;
        if amount > data.deposit {
            return Err(LendingPoolError::InsufficientDeposit);
        }
        data.deposit -= amount;
        reserve.data.total_deposit = sub_or_zero(reserve.data.total_deposit, amount);
        self.set_reserve_data(reserve.index(), data.clone());
        Ok(data)
    }

    /// Add variable debt to the position and the reserve's total debt
    pub fn add_debt(
        &mut self,
        e: &Env,
        reserve: &mut Reserve,
        amount: i128,
    ) -> Result<AccountReserveData, LendingPoolError> {
        let mut data = self.load_reserve_data(e, reserve)?;
        data.debt = checked_add(data.debt, amount)?;
        reserve.data.total_debt = checked_add(reserve.data.total_debt, amount)?;
        self.set_reserve_data(reserve.index(), data.clone());
        Ok(data)
    }

    /// Add stable debt at `rate_e24` to the position, averaging it into the position's stable
    /// rate
    pub fn add_stable_debt(
        &mut self,
        e: &Env,
        reserve: &mut Reserve,
        amount: i128,
        rate_e24: i128,
    ) -> Result<AccountReserveData, LendingPoolError> {
        let mut data = self.load_reserve_data(e, reserve)?;
        let rate_e24 =
            weighted_average_ceil(e, data.stable_rate_e24, data.stable_debt, rate_e24, amount)?;
        let stable_debt = checked_add(data.stable_debt, amount)?;
        rebase_stable_debt(e, reserve, &mut data, stable_debt, rate_e24)?;
        self.set_reserve_data(reserve.index(), data.clone());
        Ok(data)
    }

    /// Repay debt from the position, variable debt first and then stable debt
    ///
    /// ### Errors
    /// If `amount` exceeds the position's total debt
    pub fn repay_debt(
        &mut self,
        e: &Env,
        reserve: &mut Reserve,
        amount: i128,
    ) -> Result<AccountReserveData, LendingPoolError> {
        let mut data = self.load_reserve_data(e, reserve)?;
        if amount > checked_add(data.debt, data.stable_debt)? {
            return Err(LendingPoolError::InsufficientDebt);
        }
        let variable = amount.min(data.debt);
        let stable = amount - variable;

        data.debt -= variable;
        reserve.data.total_debt = sub_or_zero(reserve.data.total_debt, variable);

        if stable > 0 {
            let stable_debt = data.stable_debt - stable;
            let stable_rate_e24 = data.stable_rate_e24;
            rebase_stable_debt(e, reserve, &mut data, stable_debt, stable_rate_e24)?;
        }
        self.set_reserve_data(reserve.index(), data.clone());
        Ok(data)
    }
}

/// Restart a position's stable debt from `stable_debt` at `rate_e24`, moving the position's
/// principal and accrual in the reserve's stable sums
///
/// The position must be accrued to the reserve's timestamp.
fn rebase_stable_debt(
    e: &Env,
    reserve: &mut Reserve,
    data: &mut AccountReserveData,
    stable_debt: i128,
    rate_e24: i128,
) -> Result<(), MathError> {
    let now = reserve.data.indexes_update_timestamp;
    let mut total = reserve.data.total_stable_debt;
    if data.stable_principal > 0 {
        // the reserve's total carries the position's interest rounded down, add the rounding
        let elapsed = now - data.stable_update_timestamp;
        let floor =
            calc_stable_interest(e, data.stable_principal, data.stable_rate_e24, elapsed, false)?;
        let rounding = checked_sub(checked_sub(data.stable_debt, data.stable_principal)?, floor)?;
        total = checked_add(total, rounding)?;
        reserve.data.stable_principal =
            sub_or_zero(reserve.data.stable_principal, data.stable_principal);
        reserve.data.stable_accrual_e24 = sub_or_zero(
            reserve.data.stable_accrual_e24,
            checked_mul(data.stable_principal, data.stable_rate_e24)?,
        );
    }
    total = sub_or_zero(checked_add(total, stable_debt)?, data.stable_debt);

    if stable_debt > 0 {
        reserve.data.stable_principal = checked_add(reserve.data.stable_principal, stable_debt)?;
        reserve.data.stable_accrual_e24 = checked_add(
            reserve.data.stable_accrual_e24,
            checked_mul(stable_debt, rate_e24)?,
        )?;
        data.stable_rate_e24 = rate_e24;
    } else {
        data.stable_rate_e24 = 0;
    }
    data.stable_debt = stable_debt;
    data.stable_principal = stable_debt;
    data.stable_update_timestamp = now;

    if reserve.data.stable_principal == 0 {
        // rounding left behind once every stable position is closed
        reserve.data.total_stable_debt = 0;
        reserve.data.avg_stable_rate_e24 = 0;
    } else {
        reserve.data.total_stable_debt = total;
        reserve.data.avg_stable_rate_e24 = mul_div_ceil(
            e,
            reserve.data.stable_accrual_e24,
            1,
            reserve.data.stable_principal,
        )?;
    }
    Ok(())
}

/// Accrue an account's position in a reserve to the reserve's current indexes
///
/// Deposits round down and debt rounds up. Stable debt accrues simple interest on the principal
/// set the last time the position's stable debt changed.
pub fn accrue_account_reserve(
    e: &Env,
    data: &mut AccountReserveData,
    reserve: &Reserve,
) -> Result<(), MathError> {
    let now = reserve.data.indexes_update_timestamp;
    if data.update_timestamp >= now {
        return Ok(());
    }
    if data.deposit > 0 {
        data.deposit = mul_div_floor(
            e,
            data.deposit,
            reserve.data.cumulative_supply_index_e18,
            data.applied_supply_index_e18,
        )?;
    }
    if data.debt > 0 {
        data.debt = mul_div_ceil(
            e,
            data.debt,
            reserve.data.cumulative_debt_index_e18,
            data.applied_debt_index_e18,
        )?;
    }
    if data.stable_principal > 0 {
        let elapsed = now - data.stable_update_timestamp;
        let interest =
            calc_stable_interest(e, data.stable_principal, data.stable_rate_e24, elapsed, true)?;
        data.stable_debt = checked_add(data.stable_principal, interest)?;
    }
    data.applied_supply_index_e18 = reserve.data.cumulative_supply_index_e18;
    data.applied_debt_index_e18 = reserve.data.cumulative_debt_index_e18;
    data.update_timestamp = now;
    Ok(())
}
