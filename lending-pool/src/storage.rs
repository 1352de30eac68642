use soroban_sdk::{
    contracttype, unwrap::UnwrapOptimized, vec, Address, Env, IntoVal, Symbol, TryFromVal, Val,
    Vec,
};

use crate::{constants::MAX_RESERVES, errors::LendingPoolError};

pub(crate) const LEDGER_THRESHOLD_SHARED: u32 = 172800; // ~ 10 days
pub(crate) const LEDGER_BUMP_SHARED: u32 = 241920; // ~ 14 days

pub(crate) const LEDGER_THRESHOLD_USER: u32 = 518400; // ~ 30 days
pub(crate) const LEDGER_BUMP_USER: u32 = 535670; // ~ 31 days

/********** Storage Types **********/

/// The pool's config
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct PoolConfig {
    pub price_feed: Address,
    pub fee_reduction_provider: Option<Address>,
    pub flash_loan_fee_e6: u32, // the fee charged on flash loaned amounts, expressed in 6 decimals
}

/// Caps and floors applied to a reserve's balances, expressed in the asset's decimals
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ReserveRestrictions {
    pub maximal_total_deposit: Option<i128>, // None if deposits are uncapped
    pub maximal_total_debt: Option<i128>,    // None if debt is uncapped
    pub minimal_collateral: i128, // the smallest non-zero deposit that may be used as collateral
    pub minimal_debt: i128,       // the smallest non-zero debt an account may hold
}

/// The fees charged by a reserve
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ReserveFees {
    pub deposit_fee_e6: u32,  // withheld from deposits, expressed in 6 decimals
    pub debt_fee_e6: u32,     // added to new debt, expressed in 6 decimals
    pub income_share_e6: u32, // the protocol's share of debt interest, expressed in 6 decimals
}

/// The configuration information about a reserve asset
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ReserveConfig {
    pub index: u32,    // the index of the reserve in the list
    pub decimals: u32, // the decimals used by the underlying token
    pub restrictions: ReserveRestrictions,
    pub fees: ReserveFees,
}

/// The data for a reserve asset
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ReserveData {
    pub activated: bool,
    pub frozen: bool,
    pub total_deposit: i128,           // the total deposited underlying, accrued
    pub total_debt: i128,              // the total variable debt, accrued
    pub total_stable_debt: i128,       // the total stable debt, accrued
    pub stable_principal: i128,        // the sum of the stable positions' principals
    pub stable_accrual_e24: i128,      // the sum of each stable principal times its rate
    pub avg_stable_rate_e24: i128,     // the principal weighted average stable rate per second
    pub current_supply_rate_e24: i128, // the supply rate per second, expressed in 24 decimals
    pub current_debt_rate_e24: i128,   // the variable debt rate per second, in 24 decimals
    pub cumulative_supply_index_e18: i128,
    pub cumulative_debt_index_e18: i128,
    pub earned_fee: i128, // fees collected by the reserve, in the underlying
    pub indexes_update_timestamp: u64, // the last time the indexes were accrued
}

/// The interest rate model for a reserve. Rates are annual, expressed in 18 decimals.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct InterestRateModel {
    pub target_ur_e6: u32,
    pub min_rate_at_target_e18: i128,
    pub max_rate_at_target_e18: i128,
    pub rate_at_target_e18: i128,
    pub rate_at_max_ur_e18: i128,
    pub min_time_between_adjustments: u64,
    pub last_adjustment_timestamp: u64,
}

/// The admin supplied portion of an interest rate model
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct InterestRateModelParams {
    pub target_ur_e6: u32,
    pub min_rate_at_target_e18: i128,
    pub max_rate_at_target_e18: i128,
    pub rate_at_target_e18: i128,
    pub rate_at_max_ur_e18: i128,
    pub min_time_between_adjustments: u64,
}

/// A snapshot of a reserve's utilization accumulator
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct TwEntry {
    pub timestamp: u64,
    pub accumulator: i128, // sum of utilization_e6 * seconds up to `timestamp`
}

/// Ring buffer of utilization accumulator snapshots
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct TwIndex {
    pub entries: Vec<TwEntry>,
    pub next: u32, // the slot overwritten by the next entry once the buffer is full
    pub accumulator: i128,
    pub last_update: u64,
}

/// Per asset coefficients of a market rule
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct AssetRules {
    pub collateral_coefficient_e6: Option<u32>, // None if the asset can't back debt
    pub borrow_coefficient_e6: Option<u32>,     // None if the asset can't be borrowed
    pub penalty_e6: Option<u32>, // the liquidation bonus paid out of this asset
    pub stable_borrow_enabled: bool,
}

/// A market rule, indexed by reserve index
pub type MarketRule = Vec<Option<AssetRules>>;

/// An account's reserve membership bitmasks and chosen market rule
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[contracttype]
pub struct AccountConfig {
    pub deposits: u64,    // bit i is set if the account has a deposit in reserve i
    pub collaterals: u64, // bit i is set if reserve i is used as collateral
    pub borrows: u64,     // bit i is set if the account has debt in reserve i
    pub market_rule_id: u32,
}

/// An account's position in one reserve
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct AccountReserveData {
    pub deposit: i128,
    pub debt: i128,
    pub stable_debt: i128,       // the stable principal plus its interest, accrued
    pub stable_principal: i128,  // the stable debt as of the last time it changed
    pub stable_rate_e24: i128,   // the account's locked stable rate per second
    pub stable_update_timestamp: u64, // the last time the stable debt changed
    pub applied_supply_index_e18: i128,
    pub applied_debt_index_e18: i128,
    pub update_timestamp: u64,
}

/// Roles recognized by the pool's access control
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
#[repr(u32)]
pub enum Role {
    Admin = 0,
    ParametersAdmin = 1,
    AssetListingAdmin = 2,
    EmergencyAdmin = 3,
    Treasury = 4,
}

/********** Storage Key Types **********/

const POOL_CONFIG_KEY: &str = "Config";
const RES_LIST_KEY: &str = "ResList";
const RULE_COUNT_KEY: &str = "RuleCount";

#[derive(Clone)]
#[contracttype]
pub struct AccountReserveKey {
    account: Address,
    reserve_index: u32,
}

#[derive(Clone)]
#[contracttype]
pub struct RoleKey {
    role: Role,
    account: Address,
}

#[derive(Clone)]
#[contracttype]
pub enum PoolDataKey {
    // The reserve's config
    ResConfig(Address),
    // The reserve's data
    ResData(Address),
    // The reserve's interest rate model
    ResIrm(Address),
    // The reserve's time weighted utilization index
    ResTw(Address),
    // The account's config
    AccountConfig(Address),
    // The account's position in a reserve
    AccountReserve(AccountReserveKey),
    // A market rule by id
    MarketRule(u32),
    // Role membership
    Role(RoleKey),
}

/********** Storage **********/

/// Bump the instance rent for the contract
pub fn extend_instance(e: &Env) {
    e.storage()
        .instance()
        .extend_ttl(LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/// Fetch an entry in persistent storage that has a default value if it doesn't exist
fn get_persistent_default<K: IntoVal<Env, Val>, V: TryFromVal<Env, Val>>(
    e: &Env,
    key: &K,
    default: V,
    bump_threshold: u32,
    bump_amount: u32,
) -> V {
    if let Some(result) = e.storage().persistent().get::<K, V>(key) {
        e.storage()
            .persistent()
            .extend_ttl(key, bump_threshold, bump_amount);
        result
    } else {
        default
    }
}

fn set_persistent<K: IntoVal<Env, Val>, V: IntoVal<Env, Val>>(
    e: &Env,
    key: &K,
    value: &V,
    bump_threshold: u32,
    bump_amount: u32,
) {
    e.storage().persistent().set::<K, V>(key, value);
    e.storage()
        .persistent()
        .extend_ttl(key, bump_threshold, bump_amount);
}

/********** Pool Config **********/

/// Checks if the pool has been initialized
pub fn has_pool_config(e: &Env) -> bool {
    e.storage().instance().has(&Symbol::new(e, POOL_CONFIG_KEY))
}

/// Fetch the pool configuration, if the pool has been initialized
pub fn get_pool_config(e: &Env) -> Option<PoolConfig> {
    e.storage().instance().get(&Symbol::new(e, POOL_CONFIG_KEY))
}

/// Set the pool configuration
///
/// ### Arguments
/// * `config` - The new pool configuration
pub fn set_pool_config(e: &Env, config: &PoolConfig) {
    e.storage()
        .instance()
        .set::<Symbol, PoolConfig>(&Symbol::new(e, POOL_CONFIG_KEY), config);
}

/********** Reserve Config (ResConfig) **********/

/// Fetch the reserve config for an asset, if the asset is registered
///
/// ### Arguments
/// * `asset` - The contract address of the asset
pub fn get_res_config(e: &Env, asset: &Address) -> Option<ReserveConfig> {
    let key = PoolDataKey::ResConfig(asset.clone());
    get_persistent_default::<PoolDataKey, Option<ReserveConfig>>(
        e,
        &key,
        None,
        LEDGER_THRESHOLD_SHARED,
        LEDGER_BUMP_SHARED,
    )
}

/// Set the reserve configuration for an asset
///
/// ### Arguments
/// * `asset` - The contract address of the asset
/// * `config` - The reserve configuration for the asset
pub fn set_res_config(e: &Env, asset: &Address, config: &ReserveConfig) {
    let key = PoolDataKey::ResConfig(asset.clone());
    set_persistent(e, &key, config, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/// Checks if a reserve exists for an asset
///
/// ### Arguments
/// * `asset` - The contract address of the asset
pub fn has_res(e: &Env, asset: &Address) -> bool {
    let key = PoolDataKey::ResConfig(asset.clone());
    e.storage().persistent().has(&key)
}

/********** Reserve Data (ResData) **********/

/// Fetch the reserve data for an asset
///
/// ### Arguments
/// * `asset` - The contract address of the asset
///
/// ### Panics
/// If the reserve does not exist
pub fn get_res_data(e: &Env, asset: &Address) -> ReserveData {
    let key = PoolDataKey::ResData(asset.clone());
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
    e.storage()
        .persistent()
        .get::<PoolDataKey, ReserveData>(&key)
        .unwrap_optimized()
}

/// Set the reserve data for an asset
///
/// ### Arguments
/// * `asset` - The contract address of the asset
/// * `data` - The reserve data for the asset
pub fn set_res_data(e: &Env, asset: &Address, data: &ReserveData) {
    let key = PoolDataKey::ResData(asset.clone());
    set_persistent(e, &key, data, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/********** Reserve Interest Rate Model (ResIrm) **********/

/// Fetch the interest rate model for an asset
///
/// ### Panics
/// If the reserve does not exist
pub fn get_res_irm(e: &Env, asset: &Address) -> InterestRateModel {
    let key = PoolDataKey::ResIrm(asset.clone());
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
    e.storage()
        .persistent()
        .get::<PoolDataKey, InterestRateModel>(&key)
        .unwrap_optimized()
}

/// Set the interest rate model for an asset
pub fn set_res_irm(e: &Env, asset: &Address, irm: &InterestRateModel) {
    let key = PoolDataKey::ResIrm(asset.clone());
    set_persistent(e, &key, irm, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/********** Reserve Time Weighted Utilization (ResTw) **********/

/// Fetch the time weighted utilization index for an asset
///
/// ### Panics
/// If the reserve does not exist
pub fn get_res_tw(e: &Env, asset: &Address) -> TwIndex {
    let key = PoolDataKey::ResTw(asset.clone());
    e.storage()
        .persistent()
        .extend_ttl(&key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
    e.storage()
        .persistent()
        .get::<PoolDataKey, TwIndex>(&key)
        .unwrap_optimized()
}

/// Set the time weighted utilization index for an asset
pub fn set_res_tw(e: &Env, asset: &Address, tw: &TwIndex) {
    let key = PoolDataKey::ResTw(asset.clone());
    set_persistent(e, &key, tw, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/********** Reserve List (ResList) **********/

/// Fetch the list of reserves
pub fn get_res_list(e: &Env) -> Vec<Address> {
    get_persistent_default(
        e,
        &Symbol::new(e, RES_LIST_KEY),
        vec![e],
        LEDGER_THRESHOLD_SHARED,
        LEDGER_BUMP_SHARED,
    )
}

/// Add a reserve to the back of the list and returns the index
///
/// ### Arguments
/// * `asset` - The contract address of the underlying asset
///
/// ### Errors
/// If the number of reserves in the list would exceed the account bitmask width
///
// @dev: Once added it can't be removed
pub fn push_res_list(e: &Env, asset: &Address) -> Result<u32, LendingPoolError> {
    let mut res_list = get_res_list(e);
    if res_list.len() >= MAX_RESERVES {
        return Err(LendingPoolError::TooManyReserves);
    }
    res_list.push_back(asset.clone());
    let new_index = res_list.len() - 1;
    set_persistent(
        e,
        &Symbol::new(e, RES_LIST_KEY),
        &res_list,
        LEDGER_THRESHOLD_SHARED,
        LEDGER_BUMP_SHARED,
    );
    Ok(new_index)
}

/********** Accounts **********/

/// Fetch an account's config or a default config if the account is new
///
/// ### Arguments
/// * `account` - The address of the account
pub fn get_account_config(e: &Env, account: &Address) -> AccountConfig {
    let key = PoolDataKey::AccountConfig(account.clone());
    get_persistent_default(
        e,
        &key,
        AccountConfig::default(),
        LEDGER_THRESHOLD_USER,
        LEDGER_BUMP_USER,
    )
}

/// Set an account's config
///
/// ### Arguments
/// * `account` - The address of the account
/// * `config` - The new config for the account
pub fn set_account_config(e: &Env, account: &Address, config: &AccountConfig) {
    let key = PoolDataKey::AccountConfig(account.clone());
    set_persistent(e, &key, config, LEDGER_THRESHOLD_USER, LEDGER_BUMP_USER);
}

/// Fetch an account's position in a reserve, if it has ever had one
///
/// ### Arguments
/// * `account` - The address of the account
/// * `reserve_index` - The index of the reserve
pub fn get_account_reserve(
    e: &Env,
    account: &Address,
    reserve_index: u32,
) -> Option<AccountReserveData> {
    let key = PoolDataKey::AccountReserve(AccountReserveKey {
        account: account.clone(),
        reserve_index,
    });
    get_persistent_default::<PoolDataKey, Option<AccountReserveData>>(
        e,
        &key,
        None,
        LEDGER_THRESHOLD_USER,
        LEDGER_BUMP_USER,
    )
}

/// Set an account's position in a reserve
///
/// ### Arguments
/// * `account` - The address of the account
/// * `reserve_index` - The index of the reserve
/// * `data` - The new position
pub fn set_account_reserve(
    e: &Env,
    account: &Address,
    reserve_index: u32,
    data: &AccountReserveData,
) {
    let key = PoolDataKey::AccountReserve(AccountReserveKey {
        account: account.clone(),
        reserve_index,
    });
    set_persistent(e, &key, data, LEDGER_THRESHOLD_USER, LEDGER_BUMP_USER);
}

/********** Market Rules **********/

/// Fetch a market rule by id, if it exists
pub fn get_market_rule(e: &Env, id: u32) -> Option<MarketRule> {
    let key = PoolDataKey::MarketRule(id);
    get_persistent_default::<PoolDataKey, Option<MarketRule>>(
        e,
        &key,
        None,
        LEDGER_THRESHOLD_SHARED,
        LEDGER_BUMP_SHARED,
    )
}

/// Set a market rule
pub fn set_market_rule(e: &Env, id: u32, rule: &MarketRule) {
    let key = PoolDataKey::MarketRule(id);
    set_persistent(e, &key, rule, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

/// Fetch the number of market rules that have been created
pub fn get_market_rule_count(e: &Env) -> u32 {
    e.storage()
        .instance()
        .get(&Symbol::new(e, RULE_COUNT_KEY))
        .unwrap_or(0)
}

/// Set the number of market rules that have been created
pub fn set_market_rule_count(e: &Env, count: u32) {
    e.storage()
        .instance()
        .set::<Symbol, u32>(&Symbol::new(e, RULE_COUNT_KEY), &count);
}

/********** Roles **********/

/// Checks if an account holds a role
pub fn has_role(e: &Env, role: Role, account: &Address) -> bool {
    let key = PoolDataKey::Role(RoleKey {
        role,
        account: account.clone(),
    });
    get_persistent_default(e, &key, false, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED)
}

/// Grant or remove a role from an account
pub fn set_role(e: &Env, role: Role, account: &Address, granted: bool) {
    let key = PoolDataKey::Role(RoleKey {
        role,
        account: account.clone(),
    });
    if granted {
        set_persistent(e, &key, &true, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
    } else {
        e.storage().persistent().remove(&key);
    }
}
