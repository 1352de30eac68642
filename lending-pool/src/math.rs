use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{Env, I256};

use crate::errors::MathError;

/// Calculate `x * y / denominator`, rounding down
///
/// Uses 128-bit math when the product fits, otherwise redoes the calculation with 256-bit
/// intermediates.
///
/// ### Errors
/// * `DivByZero` - If `denominator` is zero
/// * `Underflow` - If any operand is negative
/// * `Overflow` - If the result does not fit in an i128
pub fn mul_div_floor(e: &Env, x: i128, y: i128, denominator: i128) -> Result<i128, MathError> {
    check_operands(x, y, denominator)?;
    match x.fixed_mul_floor(y, denominator) {
        Some(result) => Ok(result),
        None => wide_mul_div(e, x, y, denominator, false),
    }
}

/// Calculate `x * y / denominator`, rounding up
///
/// ### Errors
/// * `DivByZero` - If `denominator` is zero
/// * `Underflow` - If any operand is negative
/// * `Overflow` - If the result does not fit in an i128
pub fn mul_div_ceil(e: &Env, x: i128, y: i128, denominator: i128) -> Result<i128, MathError> {
    check_operands(x, y, denominator)?;
    match x.fixed_mul_ceil(y, denominator) {
        Some(result) => Ok(result),
        None => wide_mul_div(e, x, y, denominator, true),
    }
}

/// Add two scaled values
pub fn checked_add(x: i128, y: i128) -> Result<i128, MathError> {
    x.checked_add(y).ok_or(MathError::Overflow)
}

/// Multiply `x` by `y`, failing on overflow
pub fn checked_mul(x: i128, y: i128) -> Result<i128, MathError> {
    x.checked_mul(y).ok_or(MathError::Overflow)
}

/// Subtract `y` from `x`, failing if the result would go negative
pub fn checked_sub(x: i128, y: i128) -> Result<i128, MathError> {
    match x.checked_sub(y) {
        Some(result) if result >= 0 => Ok(result),
        _ => Err(MathError::Underflow),
    }
}

/// Subtract `y` from `x`, clamping the result at zero
pub fn sub_or_zero(x: i128, y: i128) -> i128 {
    if y >= x {
        0
    } else {
        x - y
    }
}

/// Calculate the weighted average of `rate` over `weight` after adding a `delta_weight` at
/// `delta_rate`, rounding up. Returns zero when no weight remains.
///
/// Products are taken with 256-bit intermediates.
pub fn weighted_average_ceil(
    e: &Env,
    rate: i128,
    weight: i128,
    delta_rate: i128,
    delta_weight: i128,
) -> Result<i128, MathError> {
    let total_weight = checked_add(weight, delta_weight)?;
    if total_weight <= 0 {
        return Ok(0);
    }
    let current = I256::from_i128(e, rate).mul(&I256::from_i128(e, weight));
    let delta = I256::from_i128(e, delta_rate).mul(&I256::from_i128(e, delta_weight));
    let numerator = current.add(&delta);
    if numerator <= I256::from_i32(e, 0) {
        return Ok(0);
    }
    let denominator = I256::from_i128(e, total_weight);
    numerator
        .add(&denominator.sub(&I256::from_i32(e, 1)))
        .div(&denominator)
        .to_i128()
        .ok_or(MathError::Overflow)
}

fn check_operands(x: i128, y: i128, denominator: i128) -> Result<(), MathError> {
    if denominator == 0 {
        return Err(MathError::DivByZero);
    }
    if x < 0 || y < 0 || denominator < 0 {
        return Err(MathError::Underflow);
    }
    Ok(())
}

fn wide_mul_div(
    e: &Env,
    x: i128,
    y: i128,
    denominator: i128,
    round_up: bool,
) -> Result<i128, MathError> {
    let product = I256::from_i128(e, x).mul(&I256::from_i128(e, y));
    let denominator = I256::from_i128(e, denominator);
    let result = if round_up {
        product
            .add(&denominator.sub(&I256::from_i32(e, 1)))
            .div(&denominator)
    } else {
        product.div(&denominator)
    };
    result.to_i128().ok_or(MathError::Overflow)
}
