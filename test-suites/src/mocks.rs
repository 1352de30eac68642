use mock_fee_reduction::{MockFeeReduction, MockFeeReductionClient};
use mock_flash_loan_receiver::{MockFlashLoanReceiver, MockFlashLoanReceiverClient};
use mock_price_feed::{MockPriceFeed, MockPriceFeedClient};
use soroban_sdk::{Address, Env};

pub use mock_flash_loan_receiver::{MODE_REJECT, MODE_REPAY, MODE_SKIP_FEE};

pub fn create_price_feed<'a>(e: &Env) -> (Address, MockPriceFeedClient<'a>) {
    let contract_id = e.register_contract(None, MockPriceFeed {});
    (contract_id.clone(), MockPriceFeedClient::new(e, &contract_id))
}

pub fn create_fee_reduction<'a>(e: &Env) -> (Address, MockFeeReductionClient<'a>) {
    let contract_id = e.register_contract(None, MockFeeReduction {});
    (contract_id.clone(), MockFeeReductionClient::new(e, &contract_id))
}

pub fn create_flash_loan_receiver<'a>(
    e: &Env,
    pool: &Address,
    mode: u32,
) -> (Address, MockFlashLoanReceiverClient<'a>) {
    let contract_id = e.register_contract(None, MockFlashLoanReceiver {});
    let client = MockFlashLoanReceiverClient::new(e, &contract_id);
    client.initialize(pool, &mode);
    (contract_id, client)
}
