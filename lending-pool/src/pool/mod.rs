mod account;
pub use account::Account;

mod actions;
pub use actions::{Action, ActionType};

mod collateral;
pub use collateral::{calc_account_free_collateral, execute_set_as_collateral, PositionData};

mod config;
pub use config::{
    execute_accumulate_interest, execute_accumulate_user_interest, execute_adjust_rate_at_target,
    execute_initialize, execute_register_asset, execute_set_fee_reduction_provider,
    execute_set_flash_loan_fee, execute_set_interest_rate_model, execute_set_price_feed_provider,
    execute_set_reserve_fees, execute_set_reserve_is_active, execute_set_reserve_is_frozen,
    execute_set_reserve_restrictions,
};

mod flash_loan;
pub use flash_loan::execute_flash_loan;

mod income;
pub use income::{execute_take_protocol_income, view_protocol_income};

mod interest;

mod liquidation;
pub use liquidation::execute_liquidate;

mod market_rule;
pub use market_rule::{
    execute_add_market_rule, execute_choose_market_rule, execute_modify_asset_rule,
};

#[allow(clippy::module_inception)]
mod pool;
pub use pool::Pool;

mod reserve;
pub use reserve::Reserve;

mod submit;
pub use submit::{execute_actions, require_owner_auth};

mod time_weighted;
