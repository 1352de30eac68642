mod price_feed;
pub use price_feed::{PriceFeedClient, PriceFeedError};

mod fee_reduction;
pub use fee_reduction::FeeReductionClient;

mod flash_loan_receiver;
pub use flash_loan_receiver::FlashLoanReceiverClient;
