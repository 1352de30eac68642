use sep_41_token::TokenClient;
use soroban_sdk::{Address, Env, Vec};

use crate::errors::LendingPoolError;

use super::{
    account::Account,
    actions::{build_transfers_from_actions, Action},
    collateral::PositionData,
    pool::Pool,
};

/// Require the account owner to authorize actions that take value out of its positions,
/// when someone else is the caller
pub fn require_owner_auth(caller: &Address, on_behalf_of: &Address, actions: &Vec<Action>) {
    if caller != on_behalf_of
        && actions
            .iter()
            .any(|action| action.action_type.requires_owner_auth())
    {
        on_behalf_of.require_auth();
    }
}

/// Execute a list of actions for an account against the pool.
///
/// ### Arguments
/// * `caller` - The address sending tokens to and receiving tokens from the pool
/// * `on_behalf_of` - The account whose positions are being modified
/// * `actions` - The actions to be processed
///
/// ### Returns
/// The amount moved by each action
///
/// ### Errors
/// If any action is unable to be fully executed
pub fn execute_actions(
    e: &Env,
    caller: &Address,
    on_behalf_of: &Address,
    actions: &Vec<Action>,
) -> Result<Vec<i128>, LendingPoolError> {
    let mut pool = Pool::load(e)?;
    let mut account = Account::load(e, on_behalf_of);

    let (transfers, amounts, check_collateral) =
        build_transfers_from_actions(e, &mut pool, caller, &mut account, actions)?;

    if check_collateral && account.config.borrows != 0 {
        PositionData::calculate(e, &mut pool, &mut account)?.require_collateralized()?;
    }

    // transfer tokens from caller to pool
    for (asset, amount) in transfers.caller_transfer.iter() {
        if amount > 0 {
            TokenClient::new(e, &asset).transfer(caller, &e.current_contract_address(), &amount);
        }
    }

    // store updated info to ledger
    pool.store_cached_reserves(e)?;
    account.store(e);

    // transfer tokens from pool to caller
    for (asset, amount) in transfers.pool_transfer.iter() {
        if amount > 0 {
            TokenClient::new(e, &asset).transfer(&e.current_contract_address(), caller, &amount);
        }
    }

    Ok(amounts)
}
