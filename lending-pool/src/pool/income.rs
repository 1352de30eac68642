use sep_41_token::TokenClient;
use soroban_sdk::{vec, Address, Env, Vec};

use crate::{errors::LendingPoolError, events};

use super::pool::Pool;

/// Calculate the protocol income of each asset, accrued to the current timestamp
///
/// ### Errors
/// If an asset is not registered
pub fn view_protocol_income(
    e: &Env,
    assets: &Vec<Address>,
) -> Result<Vec<(Address, i128)>, LendingPoolError> {
    let pool = Pool::load(e)?;
    let mut income: Vec<(Address, i128)> = vec![e];
    for asset in assets.iter() {
        let reserve = pool.load_reserve(e, &asset)?;
        let balance = TokenClient::new(e, &asset).balance(&e.current_contract_address());
        income.push_back((asset, reserve.protocol_income(balance)?));
    }
    Ok(income)
}

/// Transfer the protocol income of each asset to `to`. No more than the pool's balance of an
/// asset is taken.
///
/// ### Returns
/// The amount taken of each asset
///
/// ### Errors
/// If an asset is not registered
pub fn execute_take_protocol_income(
    e: &Env,
    assets: &Vec<Address>,
    to: &Address,
) -> Result<Vec<(Address, i128)>, LendingPoolError> {
    let mut pool = Pool::load(e)?;
    let mut taken: Vec<(Address, i128)> = vec![e];
    for asset in assets.iter() {
        let reserve = pool.load_reserve(e, &asset)?;
        let balance = TokenClient::new(e, &asset).balance(&e.current_contract_address());
        let amount = reserve.protocol_income(balance)?.min(balance);
        taken.push_back((asset, amount));
        pool.cache_reserve(reserve, true);
    }
    pool.store_cached_reserves(e)?;

    for (asset, amount) in taken.iter() {
        if amount > 0 {
            TokenClient::new(e, &asset).transfer(&e.current_contract_address(), to, &amount);
            events::income_taken(e, asset, to.clone(), amount);
        }
    }
    Ok(taken)
}
