use crate::{
    access_control,
    errors::LendingPoolError,
    pool::{self, Account, Action, ActionType, Reserve},
    storage::{
        self, AccountConfig, AccountReserveData, AssetRules, InterestRateModel,
        InterestRateModelParams, MarketRule, PoolConfig, ReserveConfig, ReserveData, ReserveFees,
        ReserveRestrictions, Role, TwIndex,
    },
};
use soroban_sdk::{contract, contractclient, contractimpl, vec, Address, Bytes, Env, Vec};

/// ### LendingPool
///
/// A multi asset money market. Accounts deposit assets to earn interest, and borrow against
/// deposits they flag as collateral.
#[contract]
pub struct LendingPoolContract;

#[contractclient(name = "LendingPoolClient")]
pub trait LendingPool {
    /********** Administration **********/

    /// Initialize the pool
    ///
    /// ### Arguments
    /// * `admin` - The Address granted every role
    /// * `price_feed` - The contract address of the price feed
    /// * `fee_reduction_provider` - The contract address of the fee reduction provider, if any
    /// * `flash_loan_fee_e6` - The fee charged on flash loans, expressed in 6 decimals
    ///
    /// ### Errors
    /// If the pool is already initialized or the flash loan fee is too large
    fn initialize(
        e: Env,
        admin: Address,
        price_feed: Address,
        fee_reduction_provider: Option<Address>,
        flash_loan_fee_e6: u32,
    ) -> Result<(), LendingPoolError>;

    /// (Asset listing admin only) Register a new reserve
    ///
    /// Returns the index of the reserve
    ///
    /// ### Arguments
    /// * `caller` - The address of the asset listing admin
    /// * `asset` - The underlying asset
    /// * `decimals` - The decimals of the underlying asset
    /// * `restrictions` - The caps and floors of the reserve
    /// * `fees` - The fees charged by the reserve
    /// * `irm_params` - The interest rate model of the reserve
    /// * `asset_rules` - The rules of the asset under the default market rule
    ///
    /// ### Errors
    /// If the caller is missing the role, the asset is already registered, or any parameter
    /// is invalid
    #[allow(clippy::too_many_arguments)]
    fn register_asset(
        e: Env,
        caller: Address,
        asset: Address,
        decimals: u32,
        restrictions: ReserveRestrictions,
        fees: ReserveFees,
        irm_params: InterestRateModelParams,
        asset_rules: Option<AssetRules>,
    ) -> Result<u32, LendingPoolError>;

    /// (Emergency admin only) Activate or deactivate a reserve
    ///
    /// ### Errors
    /// If the caller is missing the role or the flag is unchanged
    fn set_reserve_is_active(
        e: Env,
        caller: Address,
        asset: Address,
        active: bool,
    ) -> Result<(), LendingPoolError>;

    /// (Emergency admin only) Freeze or unfreeze a reserve. Frozen reserves still allow
    /// withdrawals, repayments and liquidations.
    ///
    /// ### Errors
    /// If the caller is missing the role or the flag is unchanged
    fn set_reserve_is_frozen(
        e: Env,
        caller: Address,
        asset: Address,
        frozen: bool,
    ) -> Result<(), LendingPoolError>;

    /// (Parameters admin only) Replace a reserve's interest rate model
    ///
    /// ### Errors
    /// If the caller is missing the role or the parameters are invalid
    fn set_interest_rate_model(
        e: Env,
        caller: Address,
        asset: Address,
        params: InterestRateModelParams,
    ) -> Result<(), LendingPoolError>;

    /// (Parameters admin only) Replace a reserve's restrictions
    ///
    /// ### Errors
    /// If the caller is missing the role or a restriction is negative
    fn set_reserve_restrictions(
        e: Env,
        caller: Address,
        asset: Address,
        restrictions: ReserveRestrictions,
    ) -> Result<(), LendingPoolError>;

    /// (Parameters admin only) Replace a reserve's fees
    ///
    /// ### Errors
    /// If the caller is missing the role or a fee is above 100%
    fn set_reserve_fees(
        e: Env,
        caller: Address,
        asset: Address,
        fees: ReserveFees,
    ) -> Result<(), LendingPoolError>;

    /// (Admin only) Create a new market rule
    ///
    /// Returns the id of the market rule
    ///
    /// ### Arguments
    /// * `rules` - The asset rules, indexed by reserve index
    fn add_market_rule(
        e: Env,
        caller: Address,
        rules: Vec<Option<AssetRules>>,
    ) -> Result<u32, LendingPoolError>;

    /// (Admin only) Modify the rules a market rule applies to one asset
    ///
    /// ### Arguments
    /// * `rule_id` - The id of the market rule
    /// * `asset` - The underlying asset
    /// * `rules` - The new asset rules, or None to disable the asset under the rule
    fn modify_asset_rule(
        e: Env,
        caller: Address,
        rule_id: u32,
        asset: Address,
        rules: Option<AssetRules>,
    ) -> Result<(), LendingPoolError>;

    /// (Treasury only) Transfer the protocol income of each asset to `to`
    ///
    /// Returns the amount taken of each asset
    fn take_protocol_income(
        e: Env,
        caller: Address,
        assets: Vec<Address>,
        to: Address,
    ) -> Result<Vec<(Address, i128)>, LendingPoolError>;

    /// (Admin only) Set the fee charged on flash loans, expressed in 6 decimals
    fn set_flash_loan_fee(
        e: Env,
        caller: Address,
        flash_loan_fee_e6: u32,
    ) -> Result<(), LendingPoolError>;

    /// (Admin only) Set the price feed
    fn set_price_feed_provider(
        e: Env,
        caller: Address,
        price_feed: Address,
    ) -> Result<(), LendingPoolError>;

    /// (Admin only) Set or remove the fee reduction provider
    fn set_fee_reduction_provider(
        e: Env,
        caller: Address,
        provider: Option<Address>,
    ) -> Result<(), LendingPoolError>;

    /********** Access Control **********/

    /// (Admin only) Grant `role` to `account`
    fn grant_role(
        e: Env,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), LendingPoolError>;

    /// (Admin only) Revoke `role` from `account`. An admin can't revoke its own admin role.
    fn revoke_role(
        e: Env,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), LendingPoolError>;

    /// Drop one of the caller's own roles
    fn renounce_role(e: Env, caller: Address, role: Role) -> Result<(), LendingPoolError>;

    /// Check if `account` holds `role`
    fn has_role(e: Env, role: Role, account: Address) -> bool;

    /********** Actions **********/

    /// Deposit `amount` of `asset` from `caller` into the position of `on_behalf_of`
    ///
    /// Returns the amount transferred from the caller
    fn deposit(
        e: Env,
        caller: Address,
        asset: Address,
        on_behalf_of: Address,
        amount: i128,
    ) -> Result<i128, LendingPoolError>;

    /// Withdraw `amount` of `asset` from the position of `on_behalf_of` to `caller`
    ///
    /// Returns the amount transferred to the caller
    ///
    /// ### Arguments
    /// * `amount` - The amount to withdraw, or None to withdraw the whole deposit
    fn withdraw(
        e: Env,
        caller: Address,
        asset: Address,
        on_behalf_of: Address,
        amount: Option<i128>,
    ) -> Result<i128, LendingPoolError>;

    /// Borrow `amount` of `asset` at the variable rate against the collateral of
    /// `on_behalf_of`, sending it to `caller`
    ///
    /// Returns the amount transferred to the caller
    fn borrow(
        e: Env,
        caller: Address,
        asset: Address,
        on_behalf_of: Address,
        amount: i128,
    ) -> Result<i128, LendingPoolError>;

    /// Borrow `amount` of `asset` at a locked stable rate against the collateral of
    /// `on_behalf_of`, sending it to `caller`
    ///
    /// Returns the amount transferred to the caller
    fn borrow_stable(
        e: Env,
        caller: Address,
        asset: Address,
        on_behalf_of: Address,
        amount: i128,
    ) -> Result<i128, LendingPoolError>;

    /// Repay `amount` of `asset` owed by `on_behalf_of` with tokens from `caller`. Repaying
    /// more than is owed repays everything.
    ///
    /// Returns the amount transferred from the caller
    ///
    /// ### Arguments
    /// * `amount` - The amount to repay, or None to repay the whole debt
    fn repay(
        e: Env,
        caller: Address,
        asset: Address,
        on_behalf_of: Address,
        amount: Option<i128>,
    ) -> Result<i128, LendingPoolError>;

    /// Execute a list of actions atomically. If any action fails, nothing is applied.
    ///
    /// Returns the amount moved by each action
    ///
    /// ### Arguments
    /// * `caller` - The address sending and receiving tokens
    /// * `on_behalf_of` - The account whose positions are modified
    /// * `actions` - The actions to execute, in order
    fn multi_op(
        e: Env,
        caller: Address,
        on_behalf_of: Address,
        actions: Vec<Action>,
    ) -> Result<Vec<i128>, LendingPoolError>;

    /// Flag or unflag the caller's deposit in `asset` as collateral
    ///
    /// ### Errors
    /// If the flag is unchanged, the market rule disables the asset as collateral, or
    /// unflagging leaves the caller undercollateralized
    fn set_as_collateral(
        e: Env,
        caller: Address,
        asset: Address,
        use_as_collateral: bool,
    ) -> Result<(), LendingPoolError>;

    /// Switch the market rule the caller is evaluated under
    ///
    /// ### Errors
    /// If the rule does not exist or would leave the caller undercollateralized
    fn choose_market_rule(e: Env, caller: Address, rule_id: u32) -> Result<(), LendingPoolError>;

    /// Liquidate an undercollateralized account
    ///
    /// Returns (amount repaid, deposit taken)
    ///
    /// ### Arguments
    /// * `liquidator` - The address repaying the debt and receiving the deposit
    /// * `liquidated` - The undercollateralized account
    /// * `asset_to_repay` - The asset of the debt being repaid
    /// * `asset_to_take` - The asset of the collateral deposit being taken
    /// * `amount_to_repay` - The most debt to repay, or None to repay as much as possible
    /// * `min_received_per_repaid_e18` - The least deposit taken per unit repaid
    #[allow(clippy::too_many_arguments)]
    fn liquidate(
        e: Env,
        liquidator: Address,
        liquidated: Address,
        asset_to_repay: Address,
        asset_to_take: Address,
        amount_to_repay: Option<i128>,
        min_received_per_repaid_e18: i128,
    ) -> Result<(i128, i128), LendingPoolError>;

    /// Lend `amounts` of `assets` to `receiver` for the duration of its callback
    ///
    /// Returns the fee charged on each loaned amount
    fn flash_loan(
        e: Env,
        caller: Address,
        receiver: Address,
        assets: Vec<Address>,
        amounts: Vec<i128>,
        data: Bytes,
    ) -> Result<Vec<i128>, LendingPoolError>;

    /********** Maintenance **********/

    /// Accrue a reserve's indexes to the current timestamp
    fn accumulate_interest(e: Env, asset: Address) -> Result<(), LendingPoolError>;

    /// Accrue a reserve and one account's position in it
    fn accumulate_user_interest(
        e: Env,
        asset: Address,
        account: Address,
    ) -> Result<(), LendingPoolError>;

    /// Recalibrate a reserve's rate at target from its time weighted utilization
    ///
    /// Returns the new rate at target, expressed in 18 decimals
    ///
    /// ### Arguments
    /// * `guessed_index` - A hint for the utilization index slot that opens the window
    fn adjust_rate_at_target(
        e: Env,
        asset: Address,
        guessed_index: u32,
    ) -> Result<i128, LendingPoolError>;

    /********** Views **********/

    /// Fetch a reserve's data accrued to the current timestamp
    fn view_reserve_data(e: Env, asset: Address) -> Result<ReserveData, LendingPoolError>;

    /// Fetch a reserve's data as last stored
    fn view_unupdated_reserve_data(
        e: Env,
        asset: Address,
    ) -> Result<ReserveData, LendingPoolError>;

    /// Fetch an account's position in a reserve accrued to the current timestamp
    fn view_account_reserve_data(
        e: Env,
        asset: Address,
        account: Address,
    ) -> Result<AccountReserveData, LendingPoolError>;

    /// Fetch an account's position in a reserve as last stored
    fn view_unupdated_account_reserve(
        e: Env,
        asset: Address,
        account: Address,
    ) -> Result<Option<AccountReserveData>, LendingPoolError>;

    /// Fetch an account's config
    fn view_account_config(e: Env, account: Address) -> AccountConfig;

    /// Fetch a market rule
    fn view_market_rule(e: Env, rule_id: u32) -> Option<MarketRule>;

    /// Fetch the number of market rules
    fn view_market_rule_count(e: Env) -> u32;

    /// Fetch a reserve's config
    fn view_reserve_config(e: Env, asset: Address) -> Result<ReserveConfig, LendingPoolError>;

    /// Fetch a reserve's interest rate model
    fn view_interest_rate_model(
        e: Env,
        asset: Address,
    ) -> Result<InterestRateModel, LendingPoolError>;

    /// Fetch a reserve's time weighted utilization index
    fn view_tw_index(e: Env, asset: Address) -> Result<TwIndex, LendingPoolError>;

    /// Fetch the registered assets, in reserve index order
    fn view_registered_assets(e: Env) -> Vec<Address>;

    /// Fetch the pool's config
    fn view_pool_config(e: Env) -> Result<PoolConfig, LendingPoolError>;

    /// Fetch an account's free collateral as (is non negative, magnitude), in the common unit
    /// with 18 decimals. A negative free collateral means the account can be liquidated.
    fn get_free_collateral_coefficient(
        e: Env,
        account: Address,
    ) -> Result<(bool, i128), LendingPoolError>;

    /// Fetch the protocol income of each asset, accrued to the current timestamp
    fn view_protocol_income(
        e: Env,
        assets: Vec<Address>,
    ) -> Result<Vec<(Address, i128)>, LendingPoolError>;
}

#[contractimpl]
impl LendingPool for LendingPoolContract {
    fn initialize(
        e: Env,
        admin: Address,
        price_feed: Address,
        fee_reduction_provider: Option<Address>,
        flash_loan_fee_e6: u32,
    ) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        admin.require_auth();

        pool::execute_initialize(
            &e,
            &admin,
            &price_feed,
            &fee_reduction_provider,
            flash_loan_fee_e6,
        )
    }

    fn register_asset(
        e: Env,
        caller: Address,
        asset: Address,
        decimals: u32,
        restrictions: ReserveRestrictions,
        fees: ReserveFees,
        irm_params: InterestRateModelParams,
        asset_rules: Option<AssetRules>,
    ) -> Result<u32, LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();
        access_control::require_role(&e, &caller, Role::AssetListingAdmin)?;

        pool::execute_register_asset(
            &e,
            &asset,
            decimals,
            &restrictions,
            &fees,
            &irm_params,
            &asset_rules,
        )
    }

    fn set_reserve_is_active(
        e: Env,
        caller: Address,
        asset: Address,
        active: bool,
    ) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();
        access_control::require_role(&e, &caller, Role::EmergencyAdmin)?;

        pool::execute_set_reserve_is_active(&e, &asset, active)
    }

    fn set_reserve_is_frozen(
        e: Env,
        caller: Address,
        asset: Address,
        frozen: bool,
    ) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();
        access_control::require_role(&e, &caller, Role::EmergencyAdmin)?;

        pool::execute_set_reserve_is_frozen(&e, &asset, frozen)
    }

    fn set_interest_rate_model(
        e: Env,
        caller: Address,
        asset: Address,
        params: InterestRateModelParams,
    ) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();
        access_control::require_role(&e, &caller, Role::ParametersAdmin)?;

        pool::execute_set_interest_rate_model(&e, &asset, &params)
    }

    fn set_reserve_restrictions(
        e: Env,
        caller: Address,
        asset: Address,
        restrictions: ReserveRestrictions,
    ) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();
        access_control::require_role(&e, &caller, Role::ParametersAdmin)?;

        pool::execute_set_reserve_restrictions(&e, &asset, &restrictions)
    }

    fn set_reserve_fees(
        e: Env,
        caller: Address,
        asset: Address,
        fees: ReserveFees,
    ) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();
        access_control::require_role(&e, &caller, Role::ParametersAdmin)?;

        pool::execute_set_reserve_fees(&e, &asset, &fees)
    }

    fn add_market_rule(
        e: Env,
        caller: Address,
        rules: Vec<Option<AssetRules>>,
    ) -> Result<u32, LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();
        access_control::require_role(&e, &caller, Role::Admin)?;

        pool::execute_add_market_rule(&e, &rules)
    }

    fn modify_asset_rule(
        e: Env,
        caller: Address,
        rule_id: u32,
        asset: Address,
        rules: Option<AssetRules>,
    ) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();
        access_control::require_role(&e, &caller, Role::Admin)?;

        pool::execute_modify_asset_rule(&e, rule_id, &asset, &rules)
    }

    fn take_protocol_income(
        e: Env,
        caller: Address,
        assets: Vec<Address>,
        to: Address,
    ) -> Result<Vec<(Address, i128)>, LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();
        access_control::require_role(&e, &caller, Role::Treasury)?;

        pool::execute_take_protocol_income(&e, &assets, &to)
    }

    fn set_flash_loan_fee(
        e: Env,
        caller: Address,
        flash_loan_fee_e6: u32,
    ) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();
        access_control::require_role(&e, &caller, Role::Admin)?;

        pool::execute_set_flash_loan_fee(&e, flash_loan_fee_e6)
    }

    fn set_price_feed_provider(
        e: Env,
        caller: Address,
        price_feed: Address,
    ) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();
        access_control::require_role(&e, &caller, Role::Admin)?;

        pool::execute_set_price_feed_provider(&e, &price_feed)
    }

    fn set_fee_reduction_provider(
        e: Env,
        caller: Address,
        provider: Option<Address>,
    ) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();
        access_control::require_role(&e, &caller, Role::Admin)?;

        pool::execute_set_fee_reduction_provider(&e, &provider)
    }

    fn grant_role(
        e: Env,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();

        access_control::execute_grant_role(&e, &caller, role, &account)
    }

    fn revoke_role(
        e: Env,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();

        access_control::execute_revoke_role(&e, &caller, role, &account)
    }

    fn renounce_role(e: Env, caller: Address, role: Role) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();

        access_control::execute_renounce_role(&e, &caller, role)
    }

    fn has_role(e: Env, role: Role, account: Address) -> bool {
        storage::has_role(&e, role, &account)
    }

    fn deposit(
        e: Env,
        caller: Address,
        asset: Address,
        on_behalf_of: Address,
        amount: i128,
    ) -> Result<i128, LendingPoolError> {
        execute_single_action(&e, caller, on_behalf_of, ActionType::Deposit, asset, Some(amount))
    }

    fn withdraw(
        e: Env,
        caller: Address,
        asset: Address,
        on_behalf_of: Address,
        amount: Option<i128>,
    ) -> Result<i128, LendingPoolError> {
        execute_single_action(&e, caller, on_behalf_of, ActionType::Withdraw, asset, amount)
    }

    fn borrow(
        e: Env,
        caller: Address,
        asset: Address,
        on_behalf_of: Address,
        amount: i128,
    ) -> Result<i128, LendingPoolError> {
        execute_single_action(&e, caller, on_behalf_of, ActionType::Borrow, asset, Some(amount))
    }

    fn borrow_stable(
        e: Env,
        caller: Address,
        asset: Address,
        on_behalf_of: Address,
        amount: i128,
    ) -> Result<i128, LendingPoolError> {
        execute_single_action(
            &e,
            caller,
            on_behalf_of,
            ActionType::BorrowStable,
            asset,
            Some(amount),
        )
    }

    fn repay(
        e: Env,
        caller: Address,
        asset: Address,
        on_behalf_of: Address,
        amount: Option<i128>,
    ) -> Result<i128, LendingPoolError> {
        execute_single_action(&e, caller, on_behalf_of, ActionType::Repay, asset, amount)
    }

    fn multi_op(
        e: Env,
        caller: Address,
        on_behalf_of: Address,
        actions: Vec<Action>,
    ) -> Result<Vec<i128>, LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();
        pool::require_owner_auth(&caller, &on_behalf_of, &actions);

        pool::execute_actions(&e, &caller, &on_behalf_of, &actions)
    }

    fn set_as_collateral(
        e: Env,
        caller: Address,
        asset: Address,
        use_as_collateral: bool,
    ) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();

        pool::execute_set_as_collateral(&e, &caller, &asset, use_as_collateral)
    }

    fn choose_market_rule(e: Env, caller: Address, rule_id: u32) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();

        pool::execute_choose_market_rule(&e, &caller, rule_id)
    }

    fn liquidate(
        e: Env,
        liquidator: Address,
        liquidated: Address,
        asset_to_repay: Address,
        asset_to_take: Address,
        amount_to_repay: Option<i128>,
        min_received_per_repaid_e18: i128,
    ) -> Result<(i128, i128), LendingPoolError> {
        storage::extend_instance(&e);
        liquidator.require_auth();

        pool::execute_liquidate(
            &e,
            &liquidator,
            &liquidated,
            &asset_to_repay,
            &asset_to_take,
            amount_to_repay,
            min_received_per_repaid_e18,
        )
    }

    fn flash_loan(
        e: Env,
        caller: Address,
        receiver: Address,
        assets: Vec<Address>,
        amounts: Vec<i128>,
        data: Bytes,
    ) -> Result<Vec<i128>, LendingPoolError> {
        storage::extend_instance(&e);
        caller.require_auth();

        pool::execute_flash_loan(&e, &caller, &receiver, &assets, &amounts, &data)
    }

    fn accumulate_interest(e: Env, asset: Address) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        pool::execute_accumulate_interest(&e, &asset)
    }

    fn accumulate_user_interest(
        e: Env,
        asset: Address,
        account: Address,
    ) -> Result<(), LendingPoolError> {
        storage::extend_instance(&e);
        pool::execute_accumulate_user_interest(&e, &asset, &account)
    }

    fn adjust_rate_at_target(
        e: Env,
        asset: Address,
        guessed_index: u32,
    ) -> Result<i128, LendingPoolError> {
        storage::extend_instance(&e);
        pool::execute_adjust_rate_at_target(&e, &asset, guessed_index)
    }

    fn view_reserve_data(e: Env, asset: Address) -> Result<ReserveData, LendingPoolError> {
        Ok(Reserve::load(&e, &asset)?.data)
    }

    fn view_unupdated_reserve_data(
        e: Env,
        asset: Address,
    ) -> Result<ReserveData, LendingPoolError> {
        Ok(Reserve::load_unaccrued(&e, &asset)?.data)
    }

    fn view_account_reserve_data(
        e: Env,
        asset: Address,
        account: Address,
    ) -> Result<AccountReserveData, LendingPoolError> {
        let reserve = Reserve::load(&e, &asset)?;
        Ok(Account::load(&e, &account).load_reserve_data(&e, &reserve)?)
    }

    fn view_unupdated_account_reserve(
        e: Env,
        asset: Address,
        account: Address,
    ) -> Result<Option<AccountReserveData>, LendingPoolError> {
        let config =
            storage::get_res_config(&e, &asset).ok_or(LendingPoolError::AssetNotRegistered)?;
        Ok(storage::get_account_reserve(&e, &account, config.index))
    }

    fn view_account_config(e: Env, account: Address) -> AccountConfig {
        storage::get_account_config(&e, &account)
    }

    fn view_market_rule(e: Env, rule_id: u32) -> Option<MarketRule> {
        storage::get_market_rule(&e, rule_id)
    }

    fn view_market_rule_count(e: Env) -> u32 {
        storage::get_market_rule_count(&e)
    }

    fn view_reserve_config(e: Env, asset: Address) -> Result<ReserveConfig, LendingPoolError> {
        storage::get_res_config(&e, &asset).ok_or(LendingPoolError::AssetNotRegistered)
    }

    fn view_interest_rate_model(
        e: Env,
        asset: Address,
    ) -> Result<InterestRateModel, LendingPoolError> {
        Ok(Reserve::load_unaccrued(&e, &asset)?.irm)
    }

    fn view_tw_index(e: Env, asset: Address) -> Result<TwIndex, LendingPoolError> {
        Ok(Reserve::load_unaccrued(&e, &asset)?.tw)
    }

    fn view_registered_assets(e: Env) -> Vec<Address> {
        storage::get_res_list(&e)
    }

    fn view_pool_config(e: Env) -> Result<PoolConfig, LendingPoolError> {
        storage::get_pool_config(&e).ok_or(LendingPoolError::NotInitialized)
    }

    fn get_free_collateral_coefficient(
        e: Env,
        account: Address,
    ) -> Result<(bool, i128), LendingPoolError> {
        pool::calc_account_free_collateral(&e, &account)
    }

    fn view_protocol_income(
        e: Env,
        assets: Vec<Address>,
    ) -> Result<Vec<(Address, i128)>, LendingPoolError> {
        pool::view_protocol_income(&e, &assets)
    }
}

/// Execute one action through the shared action path and return the amount it moved
fn execute_single_action(
    e: &Env,
    caller: Address,
    on_behalf_of: Address,
    action_type: ActionType,
    asset: Address,
    amount: Option<i128>,
) -> Result<i128, LendingPoolError> {
    storage::extend_instance(e);
    caller.require_auth();

    let actions = vec![
        e,
        Action {
            action_type,
            asset,
            amount,
        },
    ];
    pool::require_owner_auth(&caller, &on_behalf_of, &actions);
    let amounts = pool::execute_actions(e, &caller, &on_behalf_of, &actions)?;
    Ok(amounts.get(0).unwrap_or(0))
}
