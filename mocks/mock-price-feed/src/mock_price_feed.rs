use soroban_sdk::{contract, contracterror, contractimpl, contracttype, vec, Address, Env, Vec};

#[derive(Clone)]
#[contracttype]
pub enum MockPriceFeedDataKey {
    // MOCK: The price of an asset, None once removed
    Price(Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MockPriceFeedError {
    NoSuchAsset = 1,
    NoPriceFeed = 2,
}

/// ### Mock Price Feed
///
/// Contract to fetch mocked asset prices, in 18 decimals.
///
/// ### Dev
/// For testing purposes only!
#[contract]
pub struct MockPriceFeed;

#[contractimpl]
impl MockPriceFeed {
    /// Sets the mocked price for an asset
    pub fn set_price(e: Env, asset: Address, price: u128) {
        let key = MockPriceFeedDataKey::Price(asset);
        e.storage()
            .instance()
            .set::<MockPriceFeedDataKey, Option<u128>>(&key, &Some(price));
    }

    /// Removes the price feed of an asset. The asset stays known to the feed.
    pub fn remove_price(e: Env, asset: Address) {
        let key = MockPriceFeedDataKey::Price(asset);
        e.storage()
            .instance()
            .set::<MockPriceFeedDataKey, Option<u128>>(&key, &None);
    }

    pub fn get_latest_prices(
        e: Env,
        assets: Vec<Address>,
    ) -> Result<Vec<u128>, MockPriceFeedError> {
        let mut prices: Vec<u128> = vec![&e];
        for asset in assets.iter() {
            let price = e
                .storage()
                .instance()
                .get::<MockPriceFeedDataKey, Option<u128>>(&MockPriceFeedDataKey::Price(asset))
                .ok_or(MockPriceFeedError::NoSuchAsset)?
                .ok_or(MockPriceFeedError::NoPriceFeed)?;
            prices.push_back(price);
        }
        Ok(prices)
    }
}
