use lending_pool::{
    AssetRules, InterestRateModelParams, LendingPoolClient, LendingPoolContract, ReserveFees,
    ReserveRestrictions,
};
use soroban_sdk::{Address, Env};

pub fn create_lending_pool<'a>(e: &Env) -> (Address, LendingPoolClient<'a>) {
    let contract_id = e.register_contract(None, LendingPoolContract {});
    (contract_id.clone(), LendingPoolClient::new(e, &contract_id))
}

pub fn default_restrictions() -> ReserveRestrictions {
    ReserveRestrictions {
        maximal_total_deposit: None,
        maximal_total_debt: None,
        minimal_collateral: 0,
        minimal_debt: 0,
    }
}

pub fn default_fees() -> ReserveFees {
    ReserveFees {
        deposit_fee_e6: 0,
        debt_fee_e6: 0,
        income_share_e6: 0,
    }
}

/// 10% a year at 80% utilization, adjustable between 1% and 50% once an hour
pub fn default_irm_params() -> InterestRateModelParams {
    InterestRateModelParams {
        target_ur_e6: 800_000,
        min_rate_at_target_e18: 0_010_000_000_000_000_000,
        max_rate_at_target_e18: 0_500_000_000_000_000_000,
        rate_at_target_e18: 0_100_000_000_000_000_000,
        rate_at_max_ur_e18: 1_000_000_000_000_000_000,
        min_time_between_adjustments: 3600,
    }
}

pub fn asset_rules(
    collateral_coefficient_e6: u32,
    borrow_coefficient_e6: u32,
    penalty_e6: u32,
    stable_borrow_enabled: bool,
) -> AssetRules {
    AssetRules {
        collateral_coefficient_e6: Some(collateral_coefficient_e6),
        borrow_coefficient_e6: Some(borrow_coefficient_e6),
        penalty_e6: Some(penalty_e6),
        stable_borrow_enabled,
    }
}
