use cast::i128;
use soroban_sdk::Env;

use crate::{
    constants::{E12, E18, E24, E6, RATE_AT_TARGET_ADJUSTMENT_SPEED_E6, SECONDS_PER_YEAR},
    errors::{LendingPoolError, MathError},
    math::{checked_add, checked_mul, mul_div_ceil, mul_div_floor, sub_or_zero},
    storage::{InterestRateModel, InterestRateModelParams},
};

/// Validate interest rate model parameters supplied by an admin
///
/// ### Errors
/// If the target utilization is not within (0, 1), the rates at target are not ordered
/// min <= rate <= max <= rate at max utilization, or no adjustment interval is set
pub fn require_valid_irm_params(params: &InterestRateModelParams) -> Result<(), LendingPoolError> {
    if params.target_ur_e6 == 0
        || i128(params.target_ur_e6) >= E6
        || params.min_rate_at_target_e18 < 0
        || params.min_rate_at_target_e18 > params.rate_at_target_e18
        || params.rate_at_target_e18 > params.max_rate_at_target_e18
        || params.max_rate_at_target_e18 > params.rate_at_max_ur_e18
        || params.min_time_between_adjustments == 0
    {
        return Err(LendingPoolError::InvalidReserveParameters);
    }
    Ok(())
}

/// Build an interest rate model whose adjustment clock starts at `now`
pub fn build_irm(params: &InterestRateModelParams, now: u64) -> InterestRateModel {
    InterestRateModel {
        target_ur_e6: params.target_ur_e6,
        min_rate_at_target_e18: params.min_rate_at_target_e18,
        max_rate_at_target_e18: params.max_rate_at_target_e18,
        rate_at_target_e18: params.rate_at_target_e18,
        rate_at_max_ur_e18: params.rate_at_max_ur_e18,
        min_time_between_adjustments: params.min_time_between_adjustments,
        last_adjustment_timestamp: now,
    }
}

/// Calculates the annual debt rate of a reserve at the given utilization
///
/// The curve is linear from 0 at no utilization to `rate_at_target` at the target utilization,
/// then linear up to `rate_at_max_ur` at full utilization. The minimum rate of the curve is fixed
/// at 0. `min_rate_at_target` only bounds how far adjustments can lower `rate_at_target`.
///
/// ### Arguments
/// * `irm` - The interest rate model of the reserve
/// * `utilization_e6` - The utilization of the reserve (6 decimals), capped at 1
pub fn calc_annual_debt_rate_e18(
    e: &Env,
    irm: &InterestRateModel,
    utilization_e6: i128,
) -> Result<i128, MathError> {
    let utilization = utilization_e6.min(E6);
    let target = i128(irm.target_ur_e6);
    if utilization <= target {
        mul_div_ceil(e, irm.rate_at_target_e18, utilization, target)
    } else {
        let slope = sub_or_zero(irm.rate_at_max_ur_e18, irm.rate_at_target_e18);
        let extra = mul_div_ceil(e, slope, utilization - target, E6 - target)?;
        checked_add(irm.rate_at_target_e18, extra)
    }
}

/// Converts an annual rate (18 decimals) to a per second rate (24 decimals), rounding up
pub fn annual_to_per_second_e24(e: &Env, annual_rate_e18: i128) -> Result<i128, MathError> {
    mul_div_ceil(e, annual_rate_e18, E6, SECONDS_PER_YEAR)
}

/// Calculates the per second variable debt rate of a reserve at the given utilization
pub fn calc_debt_rate_e24(
    e: &Env,
    irm: &InterestRateModel,
    utilization_e6: i128,
) -> Result<i128, MathError> {
    let annual = calc_annual_debt_rate_e18(e, irm, utilization_e6)?;
    annual_to_per_second_e24(e, annual)
}

/// Calculates the per second supply rate of a reserve
///
/// Interest paid by borrowers is spread over all deposits, minus the protocol's share.
///
/// ### Arguments
/// * `debt_rate_e24` - The variable debt rate per second
/// * `total_debt` - The total variable debt
/// * `stable_accrual_e24` - The stable interest accrued per second, in 24 decimals
/// * `total_deposit` - The total deposits
/// * `income_share_e6` - The share of interest kept by the protocol (6 decimals)
pub fn calc_supply_rate_e24(
    e: &Env,
    debt_rate_e24: i128,
    total_debt: i128,
    stable_accrual_e24: i128,
    total_deposit: i128,
    income_share_e6: u32,
) -> Result<i128, MathError> {
    if total_deposit == 0 {
        return Ok(0);
    }
    let variable = mul_div_floor(e, debt_rate_e24, total_debt, total_deposit)?;
    let stable = mul_div_floor(e, stable_accrual_e24, 1, total_deposit)?;
    let gross = checked_add(variable, stable)?;
    mul_div_floor(e, gross, sub_or_zero(E6, i128(income_share_e6)), E6)
}

/// Calculates the growth factor of an index over `elapsed` seconds at `rate_e24` per second
///
/// Interest accrues linearly between two accruals and compounds on every accrual.
///
/// ### Arguments
/// * `rate_e24` - The rate per second (24 decimals)
/// * `elapsed` - The seconds since the last accrual
/// * `round_up` - True to round in favor of the pool when growing debt
///
/// ### Returns
/// The growth factor, expressed in 18 decimals
pub fn calc_growth_factor_e18(
    e: &Env,
    rate_e24: i128,
    elapsed: u64,
    round_up: bool,
) -> Result<i128, MathError> {
    let accrued = if round_up {
        mul_div_ceil(e, rate_e24, i128(elapsed), E6)?
    } else {
        mul_div_floor(e, rate_e24, i128(elapsed), E6)?
    };
    checked_add(E18, accrued)
}

/// Calculates the simple interest on a stable `principal` over `elapsed` seconds at `rate_e24`
/// per second
///
/// Stable debt does not compound between changes to a position, so a reserve can accrue the
/// sum of its positions exactly from the sum of each principal times its rate.
pub fn calc_stable_interest(
    e: &Env,
    principal: i128,
    rate_e24: i128,
    elapsed: u64,
    round_up: bool,
) -> Result<i128, MathError> {
    let rate = checked_mul(rate_e24, i128(elapsed))?;
    if round_up {
        mul_div_ceil(e, principal, rate, E24)
    } else {
        mul_div_floor(e, principal, rate, E24)
    }
}

/// Calculates the new rate at target after a window of time weighted utilization
///
/// The rate moves up when the utilization ran above target and down when it ran below it,
/// proportionally to the normalized error and the length of the window. The result is
/// clamped to the model's bounds.
///
/// ### Arguments
/// * `irm` - The interest rate model of the reserve
/// * `tw_utilization_e6` - The time weighted utilization over the window (6 decimals)
/// * `window` - The length of the window in seconds
pub fn calc_adjusted_rate_at_target(
    e: &Env,
    irm: &InterestRateModel,
    tw_utilization_e6: i128,
    window: u64,
) -> Result<i128, MathError> {
    let target = i128(irm.target_ur_e6);
    let utilization = tw_utilization_e6.min(E6);
    let (error_e6, increase) = if utilization >= target {
        (mul_div_floor(e, utilization - target, E6, E6 - target)?, true)
    } else {
        (mul_div_floor(e, target - utilization, E6, target)?, false)
    };

    let change_e18 = mul_div_floor(
        e,
        error_e6 * E12,
        RATE_AT_TARGET_ADJUSTMENT_SPEED_E6 * i128(window),
        E6 * SECONDS_PER_YEAR,
    )?;
    let factor_e18 = if increase {
        checked_add(E18, change_e18)?
    } else {
        sub_or_zero(E18, change_e18)
    };

    let adjusted = mul_div_floor(e, irm.rate_at_target_e18, factor_e18, E18)?;
    Ok(adjusted.clamp(irm.min_rate_at_target_e18, irm.max_rate_at_target_e18))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_irm() -> InterestRateModel {
        InterestRateModel {
            target_ur_e6: 800_000,
            min_rate_at_target_e18: 0_010_000_000_000_000_000,
            max_rate_at_target_e18: 0_500_000_000_000_000_000,
            rate_at_target_e18: 0_100_000_000_000_000_000,
            rate_at_max_ur_e18: 1_000_000_000_000_000_000,
            min_time_between_adjustments: 3600,
            last_adjustment_timestamp: 0,
        }
    }

    #[test]
    fn test_calc_annual_debt_rate_under_target() {
        let e = Env::default();
        let irm = test_irm();

        // the minimum rate at target does not floor the curve
        assert_eq!(calc_annual_debt_rate_e18(&e, &irm, 0), Ok(0));
        assert_eq!(
            calc_annual_debt_rate_e18(&e, &irm, 40_000),
            Ok(0_005_000_000_000_000_000)
        );
        assert_eq!(
            calc_annual_debt_rate_e18(&e, &irm, 400_000),
            Ok(0_050_000_000_000_000_000)
        );
        assert_eq!(
            calc_annual_debt_rate_e18(&e, &irm, 800_000),
            Ok(0_100_000_000_000_000_000)
        );
    }

    #[test]
    fn test_calc_annual_debt_rate_over_target() {
        let e = Env::default();
        let irm = test_irm();

        assert_eq!(
            calc_annual_debt_rate_e18(&e, &irm, 900_000),
            Ok(0_550_000_000_000_000_000)
        );
        assert_eq!(
            calc_annual_debt_rate_e18(&e, &irm, 1_000_000),
            Ok(1_000_000_000_000_000_000)
        );
        // utilization over 1 is capped
        assert_eq!(
            calc_annual_debt_rate_e18(&e, &irm, 1_500_000),
            Ok(1_000_000_000_000_000_000)
        );
    }

    #[test]
    fn test_per_second_rate_accrues_annual_rate_over_a_year() {
        let e = Env::default();
        let rate_e24 = annual_to_per_second_e24(&e, 0_100_000_000_000_000_000).unwrap();

        assert_eq!(rate_e24, 3_170_979_198_376_459);
        let growth = calc_growth_factor_e18(&e, rate_e24, SECONDS_PER_YEAR as u64, true).unwrap();
        // rounding up the per second rate overshoots by less than one unit per second
        assert!(growth >= 1_100_000_000_000_000_000);
        assert!(growth < 1_100_000_000_000_000_000 + SECONDS_PER_YEAR / E6 + 1);
    }

    #[test]
    fn test_calc_growth_factor_zero_elapsed() {
        let e = Env::default();

        assert_eq!(calc_growth_factor_e18(&e, 3_170_979_198_376_459, 0, true), Ok(E18));
        assert_eq!(calc_growth_factor_e18(&e, 3_170_979_198_376_459, 0, false), Ok(E18));
    }

    #[test]
    fn test_calc_growth_factor_rounding() {
        let e = Env::default();

        assert_eq!(calc_growth_factor_e18(&e, 1_500_001, 1, false), Ok(E18 + 1));
        assert_eq!(calc_growth_factor_e18(&e, 1_500_001, 1, true), Ok(E18 + 2));
    }

    #[test]
    fn test_calc_stable_interest() {
        let e = Env::default();

        assert_eq!(
            calc_stable_interest(&e, 1_000_000_000, 3_170_979_198_376_459, 0, true),
            Ok(0)
        );
        // 1e-12 a second for 3 seconds
        assert_eq!(
            calc_stable_interest(&e, 10_000_000_000_000, 1_000_000_000_000, 3, false),
            Ok(30)
        );
        assert_eq!(
            calc_stable_interest(&e, 10_000_000_000_001, 1_000_000_000_000, 3, false),
            Ok(30)
        );
        assert_eq!(
            calc_stable_interest(&e, 10_000_000_000_001, 1_000_000_000_000, 3, true),
            Ok(31)
        );
        // 30 days at 10% a year
        assert_eq!(
            calc_stable_interest(&e, 1_000_000_000, 3_170_979_198_376_459, 2_592_000, true),
            Ok(8_219_179)
        );
        assert_eq!(
            calc_stable_interest(&e, 1, i128::MAX, 2, true),
            Err(MathError::Overflow)
        );
    }

    #[test]
    fn test_calc_supply_rate() {
        let e = Env::default();

        // 40% utilization, no income share
        assert_eq!(
            calc_supply_rate_e24(&e, 1_000_000, 4_000, 0, 10_000, 0),
            Ok(400_000)
        );
        // 40% utilization, 10% income share
        assert_eq!(
            calc_supply_rate_e24(&e, 1_000_000, 4_000, 0, 10_000, 100_000),
            Ok(360_000)
        );
        // 1,000 of stable debt at 2e-18 a second adds its own interest
        assert_eq!(
            calc_supply_rate_e24(&e, 1_000_000, 4_000, 2_000_000_000, 10_000, 0),
            Ok(600_000)
        );
        assert_eq!(calc_supply_rate_e24(&e, 1_000_000, 0, 0, 0, 0), Ok(0));
    }

    #[test]
    fn test_calc_adjusted_rate_at_target_on_target() {
        let e = Env::default();
        let irm = test_irm();

        assert_eq!(
            calc_adjusted_rate_at_target(&e, &irm, 800_000, 86400),
            Ok(irm.rate_at_target_e18)
        );
    }

    #[test]
    fn test_calc_adjusted_rate_at_target_full_utilization() {
        let e = Env::default();
        let irm = test_irm();

        // error of 1 for a day moves the rate up by 50 * 86400 / 31536000
        assert_eq!(
            calc_adjusted_rate_at_target(&e, &irm, 1_000_000, 86400),
            Ok(0_113_698_630_136_986_301)
        );
    }

    #[test]
    fn test_calc_adjusted_rate_at_target_clamps() {
        let e = Env::default();
        let irm = test_irm();

        // a year at full utilization hits the max
        assert_eq!(
            calc_adjusted_rate_at_target(&e, &irm, 1_000_000, 31536000),
            Ok(irm.max_rate_at_target_e18)
        );
        // a year at zero utilization hits the min
        assert_eq!(
            calc_adjusted_rate_at_target(&e, &irm, 0, 31536000),
            Ok(irm.min_rate_at_target_e18)
        );
    }

    #[test]
    fn test_require_valid_irm_params() {
        let params = InterestRateModelParams {
            target_ur_e6: 800_000,
            min_rate_at_target_e18: 0_010_000_000_000_000_000,
            max_rate_at_target_e18: 0_500_000_000_000_000_000,
            rate_at_target_e18: 0_100_000_000_000_000_000,
            rate_at_max_ur_e18: 1_000_000_000_000_000_000,
            min_time_between_adjustments: 3600,
        };
        assert_eq!(require_valid_irm_params(&params), Ok(()));

        let mut bad_target = params.clone();
        bad_target.target_ur_e6 = 1_000_000;
        assert_eq!(
            require_valid_irm_params(&bad_target),
            Err(LendingPoolError::InvalidReserveParameters)
        );

        let mut bad_order = params.clone();
        bad_order.rate_at_target_e18 = 0_600_000_000_000_000_000;
        assert_eq!(
            require_valid_irm_params(&bad_order),
            Err(LendingPoolError::InvalidReserveParameters)
        );

        let mut bad_interval = params;
        bad_interval.min_time_between_adjustments = 0;
        assert_eq!(
            require_valid_irm_params(&bad_interval),
            Err(LendingPoolError::InvalidReserveParameters)
        );
    }
}
