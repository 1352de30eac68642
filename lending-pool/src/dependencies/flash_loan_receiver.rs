use soroban_sdk::{contractclient, Address, Bytes, Env, Vec};

/// ### FlashLoanReceiver
///
/// Contract called back by the pool during a flash loan. Before returning, it must have sent
/// every loaned amount plus its fee back to the pool.
#[contractclient(name = "FlashLoanReceiverClient")]
pub trait FlashLoanReceiver {
    /// Handle a flash loan. Returns false to reject the loan.
    ///
    /// ### Arguments
    /// * `assets` - The loaned assets
    /// * `amounts` - The loaned amount of each asset
    /// * `fees` - The fee owed on each asset
    /// * `initiator` - The address that requested the flash loan
    /// * `data` - Arbitrary data forwarded from the initiator
    fn execute_operation(
        e: Env,
        assets: Vec<Address>,
        amounts: Vec<i128>,
        fees: Vec<i128>,
        initiator: Address,
        data: Bytes,
    ) -> bool;
}
