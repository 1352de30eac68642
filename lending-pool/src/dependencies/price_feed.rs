use soroban_sdk::{contractclient, contracterror, Address, Env, Vec};

/// Error codes a price feed reports
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum PriceFeedError {
    NoSuchAsset = 1,
    NoPriceFeed = 2,
}

/// ### PriceFeed
///
/// Source of asset prices. A price is the value of one whole token in the pool's common unit,
/// expressed in 18 decimals.
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    /// Fetch the latest price of each asset, in the order the assets were given
    ///
    /// ### Arguments
    /// * `assets` - The assets to price
    fn get_latest_prices(e: Env, assets: Vec<Address>) -> Result<Vec<u128>, PriceFeedError>;
}
