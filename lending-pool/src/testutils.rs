#![cfg(test)]

use crate::{
    access_control,
    constants::E18,
    pool::Reserve,
    storage::{
        self, AssetRules, InterestRateModel, InterestRateModelParams, PoolConfig, ReserveConfig,
        ReserveData, ReserveFees, ReserveRestrictions, TwIndex,
    },
    LendingPoolContract,
};
use mock_fee_reduction::{MockFeeReduction, MockFeeReductionClient};
use mock_flash_loan_receiver::{MockFlashLoanReceiver, MockFlashLoanReceiverClient};
use mock_price_feed::{MockPriceFeed, MockPriceFeedClient};
use sep_41_token::testutils::{MockTokenClient, MockTokenWASM};
use soroban_sdk::{
    testutils::{Address as _, Ledger, LedgerInfo},
    vec, Address, Env, IntoVal,
};

pub(crate) fn create_pool(e: &Env) -> Address {
    e.register_contract(None, LendingPoolContract {})
}

pub(crate) fn set_default_ledger(e: &Env, timestamp: u64) {
    e.ledger().set(LedgerInfo {
        timestamp,
        protocol_version: 20,
        sequence_number: 1234,
        network_id: Default::default(),
        base_reserve: 10,
        min_temp_entry_ttl: 10,
        min_persistent_entry_ttl: 10,
        max_entry_ttl: 3110400,
    });
}

//************************************************
//           External Contract Helpers
//************************************************

// ***** Token *****

pub(crate) fn create_token_contract<'a>(
    e: &Env,
    admin: &Address,
) -> (Address, MockTokenClient<'a>) {
    let contract_address = Address::generate(e);
    e.register_contract_wasm(&contract_address, MockTokenWASM);
    let client = MockTokenClient::new(e, &contract_address);
    client.initialize(admin, &7, &"unit".into_val(e), &"test".into_val(e));
    (contract_address, client)
}

//***** Price Feed ******

pub(crate) fn create_price_feed<'a>(e: &Env) -> (Address, MockPriceFeedClient<'a>) {
    let contract_address = e.register_contract(None, MockPriceFeed {});
    (
        contract_address.clone(),
        MockPriceFeedClient::new(e, &contract_address),
    )
}

//***** Fee Reduction ******

pub(crate) fn create_fee_reduction<'a>(e: &Env) -> (Address, MockFeeReductionClient<'a>) {
    let contract_address = e.register_contract(None, MockFeeReduction {});
    (
        contract_address.clone(),
        MockFeeReductionClient::new(e, &contract_address),
    )
}

//***** Flash Loan Receiver ******

pub(crate) fn create_flash_loan_receiver<'a>(
    e: &Env,
    pool: &Address,
    mode: u32,
) -> (Address, MockFlashLoanReceiverClient<'a>) {
    let contract_address = e.register_contract(None, MockFlashLoanReceiver {});
    let client = MockFlashLoanReceiverClient::new(e, &contract_address);
    client.initialize(pool, &mode);
    (contract_address, client)
}

//************************************************
//           Pool Helpers
//************************************************

/// Write a pool config with no flash loan fee and grant every role to `admin`
///
/// Must be called from within the pool contract.
pub(crate) fn setup_pool(e: &Env, admin: &Address, price_feed: &Address) {
    storage::set_pool_config(
        e,
        &PoolConfig {
            price_feed: price_feed.clone(),
            fee_reduction_provider: None,
            flash_loan_fee_e6: 0,
        },
    );
    access_control::grant_all_roles(e, admin);
    storage::set_market_rule(e, 0, &vec![e]);
    storage::set_market_rule_count(e, 1);
}

/// Register `asset` with 7 decimals, the default parameters and `rules` in market rule 0
///
/// Must be called from within the pool contract, after `setup_pool`.
///
/// Returns the index of the reserve.
pub(crate) fn create_reserve(e: &Env, asset: &Address, rules: &AssetRules) -> u32 {
    let now = e.ledger().timestamp();
    let index = storage::push_res_list(e, asset).unwrap();
    storage::set_res_config(
        e,
        asset,
        &ReserveConfig {
            index,
            decimals: 7,
            restrictions: default_restrictions(),
            fees: default_fees(),
        },
    );
    storage::set_res_data(e, asset, &default_reserve_data(now));
    storage::set_res_irm(e, asset, &default_irm(now));
    storage::set_res_tw(e, asset, &TwIndex::new(e, now));

    let mut rule = storage::get_market_rule(e, 0).unwrap();
    while rule.len() <= index {
        rule.push_back(None);
    }
    rule.set(index, Some(rules.clone()));
    storage::set_market_rule(e, 0, &rule);
    index
}

pub(crate) fn default_asset_rules() -> AssetRules {
    AssetRules {
        collateral_coefficient_e6: Some(750_000),
        borrow_coefficient_e6: Some(800_000),
        penalty_e6: Some(50_000),
        stable_borrow_enabled: true,
    }
}

pub(crate) fn default_restrictions() -> ReserveRestrictions {
    ReserveRestrictions {
        maximal_total_deposit: None,
        maximal_total_debt: None,
        minimal_collateral: 0,
        minimal_debt: 0,
    }
}

pub(crate) fn default_fees() -> ReserveFees {
    ReserveFees {
        deposit_fee_e6: 0,
        debt_fee_e6: 0,
        income_share_e6: 0,
    }
}

/// 10% a year at 80% utilization, adjustable between 1% and 50%
pub(crate) fn default_irm_params() -> InterestRateModelParams {
    InterestRateModelParams {
        target_ur_e6: 800_000,
        min_rate_at_target_e18: 0_010_000_000_000_000_000,
        max_rate_at_target_e18: 0_500_000_000_000_000_000,
        rate_at_target_e18: 0_100_000_000_000_000_000,
        rate_at_max_ur_e18: 1_000_000_000_000_000_000,
        min_time_between_adjustments: 3600,
    }
}

fn default_irm(now: u64) -> InterestRateModel {
    let params = default_irm_params();
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

fn default_reserve_data(now: u64) -> ReserveData {
    ReserveData {
        activated: true,
        frozen: false,
        total_deposit: 0,
        total_debt: 0,
        total_stable_debt: 0,
        stable_principal: 0,
        stable_accrual_e24: 0,
        avg_stable_rate_e24: 0,
        current_supply_rate_e24: 0,
        current_debt_rate_e24: 0,
        cumulative_supply_index_e18: E18,
        cumulative_debt_index_e18: E18,
        earned_fee: 0,
        indexes_update_timestamp: now,
    }
}

/// An empty, active reserve at index 0 last accrued at timestamp 0
pub(crate) fn default_reserve(e: &Env) -> Reserve {
    Reserve {
        asset: Address::generate(e),
        config: ReserveConfig {
            index: 0,
            decimals: 7,
            restrictions: default_restrictions(),
            fees: default_fees(),
        },
        data: default_reserve_data(0),
        irm: default_irm(0),
        tw: TwIndex::new(e, 0),
    }
}
