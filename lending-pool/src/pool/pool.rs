use soroban_sdk::{map, vec, Address, Env, Map, Vec};

use crate::{
    dependencies::{FeeReductionClient, PriceFeedClient},
    errors::LendingPoolError,
    storage::{self, MarketRule, PoolConfig},
};

use super::reserve::Reserve;

pub struct Pool {
    pub config: PoolConfig,
    pub reserve_list: Vec<Address>,
    pub reserves: Map<Address, Reserve>,
    reserves_to_store: Vec<Address>,
    prices: Map<Address, i128>,
    market_rules: Map<u32, MarketRule>,
}

impl Pool {
    /// Load the Pool from the ledger
    ///
    /// ### Errors
    /// If the pool has not been initialized
    pub fn load(e: &Env) -> Result<Self, LendingPoolError> {
        let pool_config = storage::get_pool_config(e).ok_or(LendingPoolError::NotInitialized)?;
        Ok(Pool {
            config: pool_config,
            reserve_list: storage::get_res_list(e),
            reserves: map![e],
            reserves_to_store: vec![e],
            prices: map![e],
            market_rules: map![e],
        })
    }

    /// Load a Reserve from the ledger and update to the current ledger timestamp. Returns
    /// a cached version if it exists.
    ///
    /// ### Arguments
    /// * asset - The address of the underlying asset
    pub fn load_reserve(&self, e: &Env, asset: &Address) -> Result<Reserve, LendingPoolError> {
        if let Some(reserve) = self.reserves.get(asset.clone()) {
            return Ok(reserve);
        }
        Reserve::load(e, asset)
    }

    /// Cache the updated reserve in the pool.
    ///
    /// ### Arguments
    /// * reserve - The updated reserve
    /// * write - If the reserve needs to be written to the ledger
    pub fn cache_reserve(&mut self, reserve: Reserve, write: bool) {
        if !self.reserves_to_store.contains(&reserve.asset) && write {
            self.reserves_to_store.push_back(reserve.asset.clone());
        }
        self.reserves.set(reserve.asset.clone(), reserve);
    }

    /// Store the cached reserves to the ledger that need to be written, after recomputing
    /// their rates from the final totals.
    pub fn store_cached_reserves(&self, e: &Env) -> Result<(), LendingPoolError> {
        for address in self.reserves_to_store.iter() {
            let mut reserve = self.reserves.get_unchecked(address);
            reserve.update_rates(e)?;
            reserve.store(e);
        }
        Ok(())
    }

    /// Load the prices of `assets` from the Pool's price feed in a single call. Prices that
    /// are already cached are not fetched again.
    ///
    /// ### Errors
    /// If the price feed does not know an asset or has no price for it
    pub fn load_prices(&mut self, e: &Env, assets: &Vec<Address>) -> Result<(), LendingPoolError> {
        let mut missing: Vec<Address> = vec![e];
        for asset in assets.iter() {
            if !self.prices.contains_key(asset.clone()) && !missing.contains(&asset) {
                missing.push_back(asset);
            }
        }
        if missing.is_empty() {
            return Ok(());
        }

        let price_feed = PriceFeedClient::new(e, &self.config.price_feed);
        let prices = match price_feed.try_get_latest_prices(&missing) {
            Ok(Ok(prices)) => prices,
            Err(Ok(error)) => return Err(error.into()),
            _ => return Err(LendingPoolError::PriceFeedNoPriceFeed),
        };
        if prices.len() != missing.len() {
            return Err(LendingPoolError::PriceFeedNoPriceFeed);
        }
        for (asset, price) in missing.iter().zip(prices.iter()) {
            let price =
                cast::i128(price).map_err(|_| LendingPoolError::PriceFeedNoPriceFeed)?;
            if price == 0 {
                return Err(LendingPoolError::PriceFeedNoPriceFeed);
            }
            self.prices.set(asset, price);
        }
        Ok(())
    }

    /// Fetch a price loaded by `load_prices`
    pub fn get_price(&self, asset: &Address) -> Result<i128, LendingPoolError> {
        self.prices
            .get(asset.clone())
            .ok_or(LendingPoolError::PriceFeedNoPriceFeed)
    }

    /// Load a market rule. Returns a cached version if it exists.
    ///
    /// ### Errors
    /// If no market rule exists with the id
    pub fn load_market_rule(&mut self, e: &Env, id: u32) -> Result<MarketRule, LendingPoolError> {
        if let Some(rule) = self.market_rules.get(id) {
            return Ok(rule);
        }
        let rule = storage::get_market_rule(e, id).ok_or(LendingPoolError::MarketRuleInvalidId)?;
        self.market_rules.set(id, rule.clone());
        Ok(rule)
    }

    /// Load the (deposit fee, debt fee) reductions of an account from the fee reduction
    /// provider, if the pool has one
    pub fn load_fee_reductions(&self, e: &Env, account: &Address) -> (u32, u32) {
        match &self.config.fee_reduction_provider {
            Some(provider) => FeeReductionClient::new(e, provider).get_fee_reductions(account),
            None => (0, 0),
        }
    }

    /// Load the flash loan fee reduction of an account from the fee reduction provider, if
    /// the pool has one
    pub fn load_flash_loan_fee_reduction(&self, e: &Env, account: &Address) -> u32 {
        match &self.config.fee_reduction_provider {
            Some(provider) => {
                FeeReductionClient::new(e, provider).get_flash_loan_fee_reduction(account)
            }
            None => 0,
        }
    }

    /// Fetch the address of the reserve at `index`
    pub fn reserve_address(&self, index: u32) -> Option<Address> {
        self.reserve_list.get(index)
    }
}
