use soroban_sdk::{Address, Env, Vec};

use crate::{
    constants::E6,
    errors::LendingPoolError,
    events,
    storage::{self, AssetRules, MarketRule},
};

use super::{account::Account, collateral::PositionData, pool::Pool};

/// Require the asset rules to hold valid coefficients
///
/// ### Errors
/// If a coefficient is out of range
pub fn require_valid_asset_rules(rules: &AssetRules) -> Result<(), LendingPoolError> {
    let e6 = E6 as u32;
    if let Some(collateral_coefficient) = rules.collateral_coefficient_e6 {
        if collateral_coefficient > e6 {
            return Err(LendingPoolError::InvalidAssetRule);
        }
    }
    if let Some(borrow_coefficient) = rules.borrow_coefficient_e6 {
        if borrow_coefficient == 0 || borrow_coefficient > e6 {
            return Err(LendingPoolError::InvalidAssetRule);
        }
    }
    if let Some(penalty) = rules.penalty_e6 {
        if penalty >= e6 {
            return Err(LendingPoolError::InvalidAssetRule);
        }
    }
    Ok(())
}

/// Fetch the rules a market rule applies to the reserve at `reserve_index`
pub fn get_asset_rules(rule: &MarketRule, reserve_index: u32) -> Option<AssetRules> {
    rule.get(reserve_index).flatten()
}

/// Set the rules for the reserve at `reserve_index`, padding the rule with empty entries
pub(super) fn set_asset_rules(
    rule: &mut MarketRule,
    reserve_index: u32,
    rules: Option<AssetRules>,
) {
    while rule.len() <= reserve_index {
        rule.push_back(None);
    }
    rule.set(reserve_index, rules);
}

/// Create a new market rule
///
/// ### Arguments
/// * `rules` - The asset rules, indexed by reserve index
///
/// ### Returns
/// The id of the new market rule
///
/// ### Errors
/// If any asset rules are invalid or reference an unregistered reserve
pub fn execute_add_market_rule(
    e: &Env,
    rules: &Vec<Option<AssetRules>>,
) -> Result<u32, LendingPoolError> {
    if rules.len() > storage::get_res_list(e).len() {
        return Err(LendingPoolError::InvalidAssetRule);
    }
    for asset_rules in rules.iter().flatten() {
        require_valid_asset_rules(&asset_rules)?;
    }

    let id = storage::get_market_rule_count(e);
    storage::set_market_rule(e, id, rules);
    storage::set_market_rule_count(e, id + 1);
    events::market_rule_added(e, id, rules.clone());
    Ok(id)
}

/// Modify the rules a market rule applies to one asset
///
/// ### Arguments
/// * `rule_id` - The id of the market rule
/// * `asset` - The underlying asset
/// * `rules` - The new asset rules, or None to disable the asset under the rule
///
/// ### Errors
/// If the market rule or asset does not exist, or the asset rules are invalid
pub fn execute_modify_asset_rule(
    e: &Env,
    rule_id: u32,
    asset: &Address,
    rules: &Option<AssetRules>,
) -> Result<(), LendingPoolError> {
    let mut rule =
        storage::get_market_rule(e, rule_id).ok_or(LendingPoolError::MarketRuleInvalidId)?;
    let config = storage::get_res_config(e, asset).ok_or(LendingPoolError::AssetNotRegistered)?;
    if let Some(asset_rules) = rules {
        require_valid_asset_rules(asset_rules)?;
    }

    set_asset_rules(&mut rule, config.index, rules.clone());
    storage::set_market_rule(e, rule_id, &rule);
    events::asset_rule_modified(e, rule_id, asset.clone(), rules.clone());
    Ok(())
}

/// Switch the market rule an account is evaluated under
///
/// ### Arguments
/// * `address` - The account
/// * `rule_id` - The id of the market rule to use
///
/// ### Errors
/// If the rule does not exist, disables an asset the account borrows, or would leave the
/// account undercollateralized
pub fn execute_choose_market_rule(
    e: &Env,
    address: &Address,
    rule_id: u32,
) -> Result<(), LendingPoolError> {
    let mut pool = Pool::load(e)?;
    let rule = pool.load_market_rule(e, rule_id)?;
    let mut account = Account::load(e, address);
    account.config.market_rule_id = rule_id;

    if account.config.borrows != 0 {
        for i in 0..pool.reserve_list.len() {
            if !account.has_borrow(i) {
                continue;
            }
            if get_asset_rules(&rule, i)
                .and_then(|rules| rules.borrow_coefficient_e6)
                .is_none()
            {
                return Err(LendingPoolError::RuleBorrowDisable);
            }
        }
        PositionData::calculate(e, &mut pool, &mut account)?.require_collateralized()?;
    }

    account.store(e);
    events::market_rule_chosen(e, address.clone(), rule_id);
    Ok(())
}
