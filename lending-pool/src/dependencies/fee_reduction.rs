use soroban_sdk::{contractclient, Address, Env};

/// ### FeeReduction
///
/// Per account discounts on the pool's fees. Reductions are expressed in 6 decimals, where
/// 1_000_000 waives the fee entirely.
#[contractclient(name = "FeeReductionClient")]
pub trait FeeReduction {
    /// Fetch the (deposit fee, debt fee) reductions for an account
    fn get_fee_reductions(e: Env, account: Address) -> (u32, u32);

    /// Fetch the flash loan fee reduction for an account
    fn get_flash_loan_fee_reduction(e: Env, account: Address) -> u32;
}
