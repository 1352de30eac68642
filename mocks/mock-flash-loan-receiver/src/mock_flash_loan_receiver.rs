use sep_41_token::TokenClient;
use soroban_sdk::{contract, contractimpl, contracttype, Address, Bytes, Env, Vec};

#[derive(Clone)]
#[contracttype]
pub enum MockFlashLoanReceiverDataKey {
    // The pool that issues flash loans
    Pool,
    // MOCK: How the receiver handles a loan
    Mode,
}

/// Repay the loan plus its fee
pub const MODE_REPAY: u32 = 0;
/// Repay the loan without its fee
pub const MODE_SKIP_FEE: u32 = 1;
/// Reject the loan
pub const MODE_REJECT: u32 = 2;

/// ### Mock Flash Loan Receiver
///
/// Contract that handles flash loans the way its mode is set.
///
/// ### Dev
/// For testing purposes only!
#[contract]
pub struct MockFlashLoanReceiver;

#[contractimpl]
impl MockFlashLoanReceiver {
    pub fn initialize(e: Env, pool: Address, mode: u32) {
        e.storage()
            .instance()
            .set(&MockFlashLoanReceiverDataKey::Pool, &pool);
        e.storage()
            .instance()
            .set(&MockFlashLoanReceiverDataKey::Mode, &mode);
    }

    /// Sets how the receiver handles the next loans
    pub fn set_mode(e: Env, mode: u32) {
        e.storage()
            .instance()
            .set(&MockFlashLoanReceiverDataKey::Mode, &mode);
    }

    pub fn execute_operation(
        e: Env,
        assets: Vec<Address>,
        amounts: Vec<i128>,
        fees: Vec<i128>,
        _initiator: Address,
        _data: Bytes,
    ) -> bool {
        let mode: u32 = e
            .storage()
            .instance()
            .get(&MockFlashLoanReceiverDataKey::Mode)
            .unwrap_or(MODE_REPAY);
        if mode == MODE_REJECT {
            return false;
        }
        let pool: Address = e
            .storage()
            .instance()
            .get(&MockFlashLoanReceiverDataKey::Pool)
            .unwrap();

        for ((asset, amount), fee) in assets.iter().zip(amounts.iter()).zip(fees.iter()) {
            let repayment = if mode == MODE_SKIP_FEE {
                amount
            } else {
                amount + fee
            };
            if repayment > 0 {
                TokenClient::new(&e, &asset).transfer(
                    &e.current_contract_address(),
                    &pool,
                    &repayment,
                );
            }
        }
        true
    }
}
