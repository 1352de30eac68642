use cast::i128;
use sep_41_token::TokenClient;
use soroban_sdk::{map, vec, Address, Bytes, Env, Map, Vec};

use crate::{
    constants::E6,
    dependencies::FlashLoanReceiverClient,
    errors::LendingPoolError,
    events,
    math::{checked_add, mul_div_ceil, mul_div_floor, sub_or_zero},
};

use super::pool::Pool;

/// Calculate the flash loan fee rate after the initiator's reduction, in 6 decimals
fn calc_flash_loan_fee_e6(
    e: &Env,
    pool: &Pool,
    initiator: &Address,
) -> Result<i128, LendingPoolError> {
    let reduction_e6 = i128(pool.load_flash_loan_fee_reduction(e, initiator));
    Ok(mul_div_floor(
        e,
        i128(pool.config.flash_loan_fee_e6),
        sub_or_zero(E6, reduction_e6),
        E6,
    )?)
}

/// Lend `amounts` of `assets` to `receiver` for the duration of one call. The receiver must
/// send every amount plus its fee back to the pool before it returns.
///
/// ### Arguments
/// * `initiator` - The address requesting the flash loan
/// * `receiver` - The contract receiving the loan and called back
/// * `assets` - The assets to lend
/// * `amounts` - The amount of each asset to lend
/// * `data` - Arbitrary data forwarded to the receiver
///
/// ### Returns
/// The fee charged on each loaned amount
///
/// ### Errors
/// If the lengths differ, a reserve is inactive or frozen, the receiver rejects the loan, or
/// the pool is not repaid in full
pub fn execute_flash_loan(
    e: &Env,
    initiator: &Address,
    receiver: &Address,
    assets: &Vec<Address>,
    amounts: &Vec<i128>,
    data: &Bytes,
) -> Result<Vec<i128>, LendingPoolError> {
    if assets.len() != amounts.len() {
        return Err(LendingPoolError::FlashLoanAmountsAssetsInconsistentLengths);
    }

    let pool = Pool::load(e)?;
    let fee_e6 = calc_flash_loan_fee_e6(e, &pool, initiator)?;

    let mut fees: Vec<i128> = vec![e];
    // asset -> (balance before the loan, total fee owed)
    let mut expected: Map<Address, (i128, i128)> = map![e];
    for (asset, amount) in assets.iter().zip(amounts.iter()) {
        if amount < 0 {
            return Err(LendingPoolError::NegativeAmount);
        }
        let reserve = pool.load_reserve(e, &asset)?;
        reserve.require_active_not_frozen()?;

        let fee = mul_div_ceil(e, amount, fee_e6, E6)?;
        fees.push_back(fee);
        let (balance, total_fee) = match expected.get(asset.clone()) {
            Some(entry) => entry,
            None => (TokenClient::new(e, &asset).balance(&e.current_contract_address()), 0),
        };
        expected.set(asset, (balance, checked_add(total_fee, fee)?));
    }

    for (asset, amount) in assets.iter().zip(amounts.iter()) {
        if amount > 0 {
            TokenClient::new(e, &asset).transfer(&e.current_contract_address(), receiver, &amount);
        }
    }

    let accepted = FlashLoanReceiverClient::new(e, receiver).execute_operation(
        assets,
        amounts,
        &fees,
        initiator,
        data,
    );
    if !accepted {
        return Err(LendingPoolError::FlashLoanReceiverRejected);
    }

    let mut pool = Pool::load(e)?;
    for (asset, (balance, total_fee)) in expected.iter() {
        let balance_after = TokenClient::new(e, &asset).balance(&e.current_contract_address());
        if balance_after < checked_add(balance, total_fee)? {
            return Err(LendingPoolError::FlashLoanNotRepaid);
        }
        let mut reserve = pool.load_reserve(e, &asset)?;
        reserve.data.earned_fee = checked_add(reserve.data.earned_fee, total_fee)?;
        pool.cache_reserve(reserve, true);
    }
    pool.store_cached_reserves(e)?;

    for ((asset, amount), fee) in assets.iter().zip(amounts.iter()).zip(fees.iter()) {
        events::flash_loan(e, asset, initiator.clone(), receiver.clone(), amount, fee);
    }
    Ok(fees)
}
