use soroban_sdk::{Address, Env, Symbol, Vec};

use crate::storage::{AssetRules, InterestRateModelParams, ReserveFees, ReserveRestrictions, Role};

/********** Actions **********/

pub(crate) fn deposit(
    e: &Env,
    asset: Address,
    caller: Address,
    on_behalf_of: Address,
    amount: i128,
) {
    let topics = (Symbol::new(e, "deposit"), asset, caller);
    e.events().publish(topics, (on_behalf_of, amount));
}

pub(crate) fn redeem(
    e: &Env,
    asset: Address,
    caller: Address,
    on_behalf_of: Address,
    amount: i128,
) {
    let topics = (Symbol::new(e, "redeem"), asset, caller);
    e.events().publish(topics, (on_behalf_of, amount));
}

pub(crate) fn borrow(
    e: &Env,
    asset: Address,
    caller: Address,
    on_behalf_of: Address,
    amount: i128,
) {
    let topics = (Symbol::new(e, "borrow"), asset, caller);
    e.events().publish(topics, (on_behalf_of, amount));
}

pub(crate) fn borrow_stable(
    e: &Env,
    asset: Address,
    caller: Address,
    on_behalf_of: Address,
    amount: i128,
    rate_e24: i128,
) {
    let topics = (Symbol::new(e, "borrow_stable"), asset, caller);
    e.events().publish(topics, (on_behalf_of, amount, rate_e24));
}

pub(crate) fn repay(
    e: &Env,
    asset: Address,
    caller: Address,
    on_behalf_of: Address,
    amount: i128,
) {
    let topics = (Symbol::new(e, "repay"), asset, caller);
    e.events().publish(topics, (on_behalf_of, amount));
}

pub(crate) fn liquidation(
    e: &Env,
    liquidator: Address,
    liquidated: Address,
    asset_to_repay: Address,
    asset_to_take: Address,
    repaid: i128,
    taken: i128,
) {
    let topics = (Symbol::new(e, "liquidation"), liquidator, liquidated);
    e.events()
        .publish(topics, (asset_to_repay, asset_to_take, repaid, taken));
}

pub(crate) fn flash_loan(
    e: &Env,
    asset: Address,
    caller: Address,
    receiver: Address,
    amount: i128,
    fee: i128,
) {
    let topics = (Symbol::new(e, "flash_loan"), asset, caller);
    e.events().publish(topics, (receiver, amount, fee));
}

pub(crate) fn interests_accumulated(
    e: &Env,
    asset: Address,
    supply_index_e18: i128,
    debt_index_e18: i128,
) {
    let topics = (Symbol::new(e, "interests_accumulated"), asset);
    e.events().publish(topics, (supply_index_e18, debt_index_e18));
}

pub(crate) fn user_interests_accumulated(
    e: &Env,
    asset: Address,
    account: Address,
    deposit: i128,
    debt: i128,
) {
    let topics = (Symbol::new(e, "user_interests_accumulated"), asset, account);
    e.events().publish(topics, (deposit, debt));
}

pub(crate) fn collateral_set(e: &Env, asset: Address, account: Address, flag: bool) {
    let topics = (Symbol::new(e, "collateral_set"), asset, account);
    e.events().publish(topics, flag);
}

pub(crate) fn market_rule_chosen(e: &Env, account: Address, rule_id: u32) {
    let topics = (Symbol::new(e, "market_rule_chosen"), account);
    e.events().publish(topics, rule_id);
}

/********** Administration **********/

pub(crate) fn asset_registered(e: &Env, asset: Address, index: u32, decimals: u32) {
    let topics = (Symbol::new(e, "asset_registered"), asset);
    e.events().publish(topics, (index, decimals));
}

pub(crate) fn reserve_activated(e: &Env, asset: Address, active: bool) {
    let topics = (Symbol::new(e, "reserve_activated"), asset);
    e.events().publish(topics, active);
}

pub(crate) fn reserve_frozen(e: &Env, asset: Address, frozen: bool) {
    let topics = (Symbol::new(e, "reserve_frozen"), asset);
    e.events().publish(topics, frozen);
}

pub(crate) fn irm_set(e: &Env, asset: Address, params: InterestRateModelParams) {
    let topics = (Symbol::new(e, "irm_set"), asset);
    e.events().publish(topics, params);
}

pub(crate) fn rate_at_target_adjusted(e: &Env, asset: Address, rate_at_target_e18: i128) {
    let topics = (Symbol::new(e, "rate_at_target_adjusted"), asset);
    e.events().publish(topics, rate_at_target_e18);
}

pub(crate) fn restrictions_set(e: &Env, asset: Address, restrictions: ReserveRestrictions) {
    let topics = (Symbol::new(e, "restrictions_set"), asset);
    e.events().publish(topics, restrictions);
}

pub(crate) fn fees_set(e: &Env, asset: Address, fees: ReserveFees) {
    let topics = (Symbol::new(e, "fees_set"), asset);
    e.events().publish(topics, fees);
}

pub(crate) fn market_rule_added(e: &Env, rule_id: u32, rules: Vec<Option<AssetRules>>) {
    let topics = (Symbol::new(e, "market_rule_added"), rule_id);
    e.events().publish(topics, rules);
}

pub(crate) fn asset_rule_modified(
    e: &Env,
    rule_id: u32,
    asset: Address,
    rules: Option<AssetRules>,
) {
    let topics = (Symbol::new(e, "asset_rule_modified"), rule_id, asset);
    e.events().publish(topics, rules);
}

pub(crate) fn income_taken(e: &Env, asset: Address, to: Address, amount: i128) {
    let topics = (Symbol::new(e, "income_taken"), asset, to);
    e.events().publish(topics, amount);
}

pub(crate) fn flash_fee_set(e: &Env, flash_loan_fee_e6: u32) {
    let topics = (Symbol::new(e, "flash_fee_set"),);
    e.events().publish(topics, flash_loan_fee_e6);
}

pub(crate) fn price_feed_set(e: &Env, price_feed: Address) {
    let topics = (Symbol::new(e, "price_feed_set"),);
    e.events().publish(topics, price_feed);
}

pub(crate) fn fee_red_set(e: &Env, provider: Option<Address>) {
    let topics = (Symbol::new(e, "fee_red_set"),);
    e.events().publish(topics, provider);
}

/********** Access Control **********/

pub(crate) fn role_granted(e: &Env, role: Role, account: Address, caller: Address) {
    let topics = (Symbol::new(e, "role_granted"), account, caller);
    e.events().publish(topics, role);
}

pub(crate) fn role_revoked(e: &Env, role: Role, account: Address, caller: Address) {
    let topics = (Symbol::new(e, "role_revoked"), account, caller);
    e.events().publish(topics, role);
}
