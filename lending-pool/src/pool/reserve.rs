use cast::i128;
use soroban_sdk::{contracttype, Address, Env};

use crate::{
    constants::{E18, E24, E6},
    errors::{LendingPoolError, MathError, ReserveDataError, ReserveRestrictionsError},
    math::{checked_add, mul_div_ceil, mul_div_floor, sub_or_zero},
    storage::{self, InterestRateModel, ReserveConfig, ReserveData, TwIndex},
};

use super::interest::{
    annual_to_per_second_e24, calc_adjusted_rate_at_target, calc_debt_rate_e24,
    calc_growth_factor_e18, calc_supply_rate_e24,
};

#[derive(Clone)]
#[contracttype]
pub struct Reserve {
    pub asset: Address, // the underlying asset address
    pub config: ReserveConfig,
    pub data: ReserveData,
    pub irm: InterestRateModel,
    pub tw: TwIndex,
}

impl Reserve {
    /// Load a Reserve from the ledger and accrue it to the current ledger timestamp.
    ///
    /// **NOTE**: This function is not cached, and should be called from the Pool.
    ///
    /// ### Arguments
    /// * `asset` - The address of the underlying asset
    ///
    /// ### Errors
    /// If the asset is not registered or the accrual overflows
    pub fn load(e: &Env, asset: &Address) -> Result<Reserve, LendingPoolError> {
        let mut reserve = Reserve::load_unaccrued(e, asset)?;
        reserve.accrue(e, e.ledger().timestamp())?;
        Ok(reserve)
    }

    /// Load a Reserve from the ledger exactly as it was stored
    ///
    /// ### Errors
    /// If the asset is not registered
    pub fn load_unaccrued(e: &Env, asset: &Address) -> Result<Reserve, LendingPoolError> {
        let config =
            storage::get_res_config(e, asset).ok_or(LendingPoolError::AssetNotRegistered)?;
        Ok(Reserve {
            asset: asset.clone(),
            config,
            data: storage::get_res_data(e, asset),
            irm: storage::get_res_irm(e, asset),
            tw: storage::get_res_tw(e, asset),
        })
    }

    /// Store the reserve's data, interest rate model and utilization index to the ledger
    pub fn store(&self, e: &Env) {
        storage::set_res_data(e, &self.asset, &self.data);
        storage::set_res_irm(e, &self.asset, &self.irm);
        storage::set_res_tw(e, &self.asset, &self.tw);
    }

    /// The reserve's index in the pool
    pub fn index(&self) -> u32 {
        self.config.index
    }

    /// The scalar of one whole token of the underlying
    pub fn scalar(&self) -> i128 {
        10i128.pow(self.config.decimals)
    }

    /// Accrue interest on the reserve's indexes and totals up to `now`
    ///
    /// The stable total grows by the stable interest accrued per second, so it never falls
    /// behind the stable positions it sums. Accruing twice at the same timestamp is a no-op.
    pub fn accrue(&mut self, e: &Env, now: u64) -> Result<(), MathError> {
        if now <= self.data.indexes_update_timestamp {
            return Ok(());
        }
        let elapsed = now - self.data.indexes_update_timestamp;

        // the utilization held since the last accrual
        self.tw.update(now, self.utilization(e)?)?;

        let supply_growth =
            calc_growth_factor_e18(e, self.data.current_supply_rate_e24, elapsed, false)?;
        let debt_growth =
            calc_growth_factor_e18(e, self.data.current_debt_rate_e24, elapsed, true)?;
        let stable_interest = mul_div_ceil(e, self.data.stable_accrual_e24, i128(elapsed), E24)?;

        self.data.cumulative_supply_index_e18 =
            mul_div_floor(e, self.data.cumulative_supply_index_e18, supply_growth, E18)?;
        self.data.cumulative_debt_index_e18 =
            mul_div_ceil(e, self.data.cumulative_debt_index_e18, debt_growth, E18)?;
        self.data.total_deposit = mul_div_floor(e, self.data.total_deposit, supply_growth, E18)?;
        self.data.total_debt = mul_div_ceil(e, self.data.total_debt, debt_growth, E18)?;
        self.data.total_stable_debt = checked_add(self.data.total_stable_debt, stable_interest)?;
        self.data.indexes_update_timestamp = now;
        Ok(())
    }

    /// Recompute the current supply and debt rates from the reserve's totals
    pub fn update_rates(&mut self, e: &Env) -> Result<(), MathError> {
        let debt_rate = calc_debt_rate_e24(e, &self.irm, self.utilization(e)?)?;
        self.data.current_debt_rate_e24 = debt_rate;
        self.data.current_supply_rate_e24 = calc_supply_rate_e24(
            e,
            debt_rate,
            self.data.total_debt,
            self.data.stable_accrual_e24,
            self.data.total_deposit,
            self.config.fees.income_share_e6,
        )?;
        Ok(())
    }

    /// Recalibrate the rate at target from the utilization held since the last adjustment
    ///
    /// ### Arguments
    /// * `now` - The current timestamp, the reserve must already be accrued to it
    /// * `guessed_slot` - A hint for the utilization index slot that opens the window
    ///
    /// ### Errors
    /// If the minimal time between adjustments has not passed
    pub fn adjust_rate_at_target(
        &mut self,
        e: &Env,
        now: u64,
        guessed_slot: u32,
    ) -> Result<i128, LendingPoolError> {
        let earliest = self
            .irm
            .last_adjustment_timestamp
            .saturating_add(self.irm.min_time_between_adjustments);
        if now < earliest {
            return Err(LendingPoolError::TooEarlyToAdjustRate);
        }
        let (tw_utilization, window) = self.tw.calc_time_weighted_utilization(
            now,
            self.irm.last_adjustment_timestamp,
            guessed_slot,
            self.utilization(e)?,
        )?;
        self.irm.rate_at_target_e18 =
            calc_adjusted_rate_at_target(e, &self.irm, tw_utilization, window)?;
        self.irm.last_adjustment_timestamp = now;
        self.update_rates(e)?;
        Ok(self.irm.rate_at_target_e18)
    }

    /// The per second rate locked by a new stable borrow. Stable borrowers never lock in less
    /// than the rate at target.
    pub fn stable_borrow_rate_e24(&self, e: &Env) -> Result<i128, MathError> {
        let rate_at_target = annual_to_per_second_e24(e, self.irm.rate_at_target_e18)?;
        Ok(rate_at_target.max(self.data.current_debt_rate_e24))
    }

    /// Fetch the current utilization of the reserve, expressed in 6 decimals
    pub fn utilization(&self, e: &Env) -> Result<i128, MathError> {
        let total_debt = self.total_debt()?;
        if self.data.total_deposit == 0 {
            return Ok(if total_debt == 0 { 0 } else { E6 });
        }
        mul_div_floor(e, total_debt, E6, self.data.total_deposit)
    }

    /// The total variable and stable debt of the reserve
    pub fn total_debt(&self) -> Result<i128, MathError> {
        checked_add(self.data.total_debt, self.data.total_stable_debt)
    }

    /// Calculate the protocol's income given the pool's token balance of the underlying
    pub fn protocol_income(&self, balance: i128) -> Result<i128, MathError> {
        let assets = checked_add(balance, self.total_debt()?)?;
        Ok(sub_or_zero(assets, self.data.total_deposit))
    }

    /********** Gating **********/

    /// Require the reserve to be active
    pub fn require_active(&self) -> Result<(), ReserveDataError> {
        if !self.data.activated {
            return Err(ReserveDataError::Inactive);
        }
        Ok(())
    }

    /// Require the reserve to be active and not frozen
    pub fn require_active_not_frozen(&self) -> Result<(), ReserveDataError> {
        self.require_active()?;
        if self.data.frozen {
            return Err(ReserveDataError::Frozen);
        }
        Ok(())
    }

    /// Require the total deposit to be within the reserve's cap
    pub fn require_deposit_cap(&self) -> Result<(), ReserveRestrictionsError> {
        match self.config.restrictions.maximal_total_deposit {
            Some(max) if self.data.total_deposit > max => {
                Err(ReserveRestrictionsError::MaxDepositReached)
            }
            _ => Ok(()),
        }
    }

    /// Require the total debt to be within the reserve's cap
    pub fn require_debt_cap(&self) -> Result<(), ReserveRestrictionsError> {
        let total_debt = self.data.total_debt.saturating_add(self.data.total_stable_debt);
        match self.config.restrictions.maximal_total_debt {
            Some(max) if total_debt > max => Err(ReserveRestrictionsError::MaxDebtReached),
            _ => Ok(()),
        }
    }

    /// Require a deposit to be zero or at least the minimal collateral
    pub fn require_minimal_collateral(
        &self,
        deposit: i128,
    ) -> Result<(), ReserveRestrictionsError> {
        if deposit != 0 && deposit < self.config.restrictions.minimal_collateral {
            return Err(ReserveRestrictionsError::MinimalCollateral);
        }
        Ok(())
    }

    /// Require an account's debt to be zero or at least the minimal debt
    pub fn require_minimal_debt(&self, debt: i128) -> Result<(), ReserveRestrictionsError> {
        if debt != 0 && debt < self.config.restrictions.minimal_debt {
            return Err(ReserveRestrictionsError::MinimalDebt);
        }
        Ok(())
    }

    /********** Fees **********/

    /// Calculate the fee on `amount` at `fee_e6`, discounted by `reduction_e6`. Rounds down.
    pub fn calc_fee(
        e: &Env,
        amount: i128,
        fee_e6: u32,
        reduction_e6: u32,
    ) -> Result<i128, MathError> {
        let effective_fee_e6 = mul_div_floor(
            e,
            i128(fee_e6),
            sub_or_zero(E6, i128(reduction_e6)),
            E6,
        )?;
        mul_div_floor(e, amount, effective_fee_e6, E6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils;

    #[test]
    fn test_accrue() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        reserve.data.total_deposit = 100_000_000_000;
        reserve.data.total_debt = 40_000_000_000;
        reserve.data.current_debt_rate_e24 = 1_585_489_599_188_230;
        reserve.data.current_supply_rate_e24 = 634_195_839_675_292;

        reserve.accrue(&e, 86400).unwrap();

        assert_eq!(
            reserve.data.cumulative_debt_index_e18,
            1_000_136_986_301_369_864
        );
        assert_eq!(
            reserve.data.cumulative_supply_index_e18,
            1_000_054_794_520_547_945
        );
        assert_eq!(reserve.data.total_debt, 40_005_479_453);
        assert_eq!(reserve.data.total_deposit, 100_005_479_452);
        assert_eq!(reserve.data.indexes_update_timestamp, 86400);
        assert_eq!(reserve.tw.accumulator, 400_000 * 86400);
    }

    #[test]
    fn test_accrue_stable_total() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        // positions of 1e12 at 1e-12 a second and 2e12 at 3e-12 a second
        reserve.data.total_stable_debt = 3_000_000_000_000;
        reserve.data.stable_principal = 3_000_000_000_000;
        reserve.data.stable_accrual_e24 = 7_000_000_000_000 * 1_000_000_000_000;

        reserve.accrue(&e, 1_000_000).unwrap();
        assert_eq!(reserve.data.total_stable_debt, 3_000_007_000_000);

        // the total grows by the same amount however often it is accrued
        let mut stepped = testutils::default_reserve(&e);
        stepped.data = reserve.data.clone();
        stepped.data.total_stable_debt = 3_000_000_000_000;
        stepped.data.indexes_update_timestamp = 0;
        stepped.accrue(&e, 400_000).unwrap();
        stepped.accrue(&e, 1_000_000).unwrap();
        assert_eq!(stepped.data.total_stable_debt, reserve.data.total_stable_debt);
    }

    #[test]
    fn test_accrue_same_timestamp_is_noop() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        reserve.data.total_deposit = 100_000_000_000;
        reserve.data.total_debt = 40_000_000_000;
        reserve.update_rates(&e).unwrap();

        reserve.accrue(&e, 1000).unwrap();
        let data = reserve.data.clone();
        reserve.accrue(&e, 1000).unwrap();
        assert_eq!(reserve.data, data);

        // an older timestamp never moves the indexes back
        reserve.accrue(&e, 500).unwrap();
        assert_eq!(reserve.data, data);
    }

    #[test]
    fn test_accrue_indexes_never_decrease() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        reserve.data.total_deposit = 100_000_000_000;
        reserve.data.total_debt = 95_000_000_000;
        reserve.update_rates(&e).unwrap();

        let mut last_supply = reserve.data.cumulative_supply_index_e18;
        let mut last_debt = reserve.data.cumulative_debt_index_e18;
        for step in 1..10u64 {
            reserve.accrue(&e, step * step * 1000).unwrap();
            reserve.update_rates(&e).unwrap();
            assert!(reserve.data.cumulative_supply_index_e18 >= last_supply);
            assert!(reserve.data.cumulative_debt_index_e18 >= last_debt);
            last_supply = reserve.data.cumulative_supply_index_e18;
            last_debt = reserve.data.cumulative_debt_index_e18;
        }
        assert!(last_debt > E18);
    }

    #[test]
    fn test_update_rates() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        reserve.data.total_deposit = 100_000_000_000;
        reserve.data.total_debt = 40_000_000_000;

        reserve.update_rates(&e).unwrap();

        // 40% utilization on a 10% at 80% target curve is 5% a year
        assert_eq!(reserve.data.current_debt_rate_e24, 1_585_489_599_188_230);
        assert_eq!(reserve.data.current_supply_rate_e24, 634_195_839_675_292);
    }

    #[test]
    fn test_utilization() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        assert_eq!(reserve.utilization(&e), Ok(0));

        reserve.data.total_deposit = 100_000_000_000;
        reserve.data.total_debt = 40_000_000_000;
        reserve.data.total_stable_debt = 10_000_000_000;
        assert_eq!(reserve.utilization(&e), Ok(500_000));
    }

    #[test]
    fn test_stable_borrow_rate() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);

        // 10% a year at target
        assert_eq!(reserve.stable_borrow_rate_e24(&e), Ok(3_170_979_198_376_459));

        reserve.data.current_debt_rate_e24 = 5_000_000_000_000_000;
        assert_eq!(reserve.stable_borrow_rate_e24(&e), Ok(5_000_000_000_000_000));
    }

    #[test]
    fn test_caps() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        reserve.config.restrictions.maximal_total_deposit = Some(1000);
        reserve.config.restrictions.maximal_total_debt = Some(500);

        reserve.data.total_deposit = 1000;
        reserve.data.total_debt = 400;
        reserve.data.total_stable_debt = 100;
        assert_eq!(reserve.require_deposit_cap(), Ok(()));
        assert_eq!(reserve.require_debt_cap(), Ok(()));

        reserve.data.total_deposit = 1001;
        reserve.data.total_stable_debt = 101;
        assert_eq!(
            reserve.require_deposit_cap(),
            Err(ReserveRestrictionsError::MaxDepositReached)
        );
        assert_eq!(
            reserve.require_debt_cap(),
            Err(ReserveRestrictionsError::MaxDebtReached)
        );

        reserve.config.restrictions.maximal_total_deposit = None;
        assert_eq!(reserve.require_deposit_cap(), Ok(()));
    }

    #[test]
    fn test_minimal_restrictions() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        reserve.config.restrictions.minimal_collateral = 100;
        reserve.config.restrictions.minimal_debt = 50;

        assert_eq!(reserve.require_minimal_collateral(0), Ok(()));
        assert_eq!(reserve.require_minimal_collateral(100), Ok(()));
        assert_eq!(
            reserve.require_minimal_collateral(99),
            Err(ReserveRestrictionsError::MinimalCollateral)
        );
        assert_eq!(reserve.require_minimal_debt(0), Ok(()));
        assert_eq!(
            reserve.require_minimal_debt(49),
            Err(ReserveRestrictionsError::MinimalDebt)
        );
    }

    #[test]
    fn test_gating() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        assert_eq!(reserve.require_active_not_frozen(), Ok(()));

        reserve.data.frozen = true;
        assert_eq!(reserve.require_active(), Ok(()));
        assert_eq!(
            reserve.require_active_not_frozen(),
            Err(ReserveDataError::Frozen)
        );

        reserve.data.activated = false;
        assert_eq!(reserve.require_active(), Err(ReserveDataError::Inactive));
    }

    #[test]
    fn test_calc_fee() {
        let e = Env::default();

        assert_eq!(Reserve::calc_fee(&e, 1_000_000, 1_000, 0), Ok(1_000));
        assert_eq!(Reserve::calc_fee(&e, 1_000_000, 1_000, 250_000), Ok(750));
        assert_eq!(Reserve::calc_fee(&e, 1_000_000, 1_000, 2_000_000), Ok(0));
        assert_eq!(Reserve::calc_fee(&e, 999, 1_000, 0), Ok(0));
    }

    #[test]
    fn test_protocol_income() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        reserve.data.total_deposit = 100_005_479_452;
        reserve.data.total_debt = 40_005_479_453;

        assert_eq!(reserve.protocol_income(60_000_000_000), Ok(1));
        assert_eq!(reserve.protocol_income(0), Ok(0));
    }

    #[test]
    fn test_adjust_rate_at_target_too_early() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        reserve.irm.last_adjustment_timestamp = 0;
        reserve.irm.min_time_between_adjustments = 3600;

        assert_eq!(
            reserve.adjust_rate_at_target(&e, 3599, 0),
            Err(LendingPoolError::TooEarlyToAdjustRate)
        );
    }

    #[test]
    fn test_adjust_rate_at_target_with_huge_interval() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        reserve.irm.last_adjustment_timestamp = 1000;
        reserve.irm.min_time_between_adjustments = u64::MAX;

        assert_eq!(
            reserve.adjust_rate_at_target(&e, u64::MAX - 1, 0),
            Err(LendingPoolError::TooEarlyToAdjustRate)
        );
    }

    #[test]
    fn test_adjust_rate_at_target_at_full_utilization() {
        let e = Env::default();
        let mut reserve = testutils::default_reserve(&e);
        reserve.data.total_deposit = 100_000_000_000;
        reserve.data.total_debt = 100_000_000_000;
        reserve.update_rates(&e).unwrap();

        reserve.accrue(&e, 86400).unwrap();
        let rate = reserve.adjust_rate_at_target(&e, 86400, 0).unwrap();

        assert!(rate > 0_100_000_000_000_000_000);
        assert_eq!(reserve.irm.rate_at_target_e18, rate);
        assert_eq!(reserve.irm.last_adjustment_timestamp, 86400);
        assert_eq!(
            reserve.adjust_rate_at_target(&e, 86400, 0),
            Err(LendingPoolError::TooEarlyToAdjustRate)
        );
    }
}
