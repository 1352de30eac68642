use soroban_sdk::{contract, contractimpl, contracttype, Address, Env};

#[derive(Clone)]
#[contracttype]
pub enum MockFeeReductionDataKey {
    // MOCK: (deposit fee, debt fee) reductions of an account
    Reductions(Address),
    // MOCK: Flash loan fee reduction of an account
    FlashLoan(Address),
}

/// ### Mock Fee Reduction
///
/// Contract to fetch mocked per account fee reductions, in 6 decimals.
///
/// ### Dev
/// For testing purposes only!
#[contract]
pub struct MockFeeReduction;

#[contractimpl]
impl MockFeeReduction {
    /// Sets the mocked deposit and debt fee reductions of an account
    pub fn set_fee_reductions(
        e: Env,
        account: Address,
        deposit_reduction_e6: u32,
        debt_reduction_e6: u32,
    ) {
        e.storage().instance().set(
            &MockFeeReductionDataKey::Reductions(account),
            &(deposit_reduction_e6, debt_reduction_e6),
        );
    }

    /// Sets the mocked flash loan fee reduction of an account
    pub fn set_flash_loan_fee_reduction(e: Env, account: Address, reduction_e6: u32) {
        e.storage()
            .instance()
            .set(&MockFeeReductionDataKey::FlashLoan(account), &reduction_e6);
    }

    pub fn get_fee_reductions(e: Env, account: Address) -> (u32, u32) {
        e.storage()
            .instance()
            .get(&MockFeeReductionDataKey::Reductions(account))
            .unwrap_or((0, 0))
    }

    pub fn get_flash_loan_fee_reduction(e: Env, account: Address) -> u32 {
        e.storage()
            .instance()
            .get(&MockFeeReductionDataKey::FlashLoan(account))
            .unwrap_or(0)
    }
}
