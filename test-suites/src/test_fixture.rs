use crate::mocks::create_price_feed;
use crate::pool::{
    asset_rules, create_lending_pool, default_fees, default_irm_params, default_restrictions,
};
use crate::token::create_token;
use lending_pool::{AccountReserveData, LendingPoolClient, ReserveData};
use mock_price_feed::MockPriceFeedClient;
use sep_41_token::testutils::MockTokenClient;
use soroban_sdk::testutils::{Address as _, Ledger, LedgerInfo};
use soroban_sdk::{Address, Env};

pub const SCALAR_7: i128 = 1_000_0000;
pub const SCALAR_9: i128 = 1_000_000_000;
pub const E18: i128 = 1_000_000_000_000_000_000;

pub const ONE_DAY: u64 = 86400;
pub const ONE_YEAR: u64 = 31536000;

// ledger entries live for ten years so tests can jump far ahead without entries being archived
const ENTRY_TTL: u32 = 10 * 6_307_200;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(usize)]
pub enum TokenIndex {
    USDC = 0,
    WETH = 1,
    XLM = 2,
}

pub struct TestFixture<'a> {
    pub env: Env,
    pub bombadil: Address,
    pub pool: LendingPoolClient<'a>,
    pub price_feed: MockPriceFeedClient<'a>,
    pub tokens: Vec<MockTokenClient<'a>>,
}

impl TestFixture<'_> {
    /// Create a new TestFixture with a lending pool
    ///
    /// Deploys USDC (0, 7 decimals), wETH (1, 9 decimals) and XLM (2, 7 decimals) test tokens,
    /// prices them at 1, 2000 and 0.1 and registers each of them as a reserve of the pool.
    /// Bombadil holds every role. Flash loans cost 0.09%.
    pub fn create<'a>() -> TestFixture<'a> {
        let e = Env::default();
        e.mock_all_auths();
        e.budget().reset_unlimited();

        let bombadil = Address::generate(&e);

        e.ledger().set(LedgerInfo {
            timestamp: 1_700_000_000,
            protocol_version: 20,
            sequence_number: 100,
            network_id: Default::default(),
            base_reserve: 10,
            min_temp_entry_ttl: 10,
            min_persistent_entry_ttl: ENTRY_TTL,
            max_entry_ttl: ENTRY_TTL + 1,
        });

        // deploy tokens
        let (usdc_id, usdc_client) = create_token(&e, &bombadil, 7, "USDC");
        let (eth_id, eth_client) = create_token(&e, &bombadil, 9, "wETH");
        let (xlm_id, xlm_client) = create_token(&e, &bombadil, 7, "XLM");

        // initialize price feed
        let (price_feed_id, price_feed_client) = create_price_feed(&e);
        price_feed_client.set_price(&usdc_id, &(E18 as u128));
        price_feed_client.set_price(&eth_id, &(2000 * E18 as u128));
        price_feed_client.set_price(&xlm_id, &(E18 as u128 / 10));

        // initialize pool
        let (_, pool_client) = create_lending_pool(&e);
        pool_client.initialize(&bombadil, &price_feed_id, &None, &900);
        for (asset, decimals, rules) in [
            (&usdc_id, 7, asset_rules(900_000, 950_000, 30_000, true)),
            (&eth_id, 9, asset_rules(800_000, 850_000, 50_000, false)),
            (&xlm_id, 7, asset_rules(750_000, 800_000, 50_000, false)),
        ] {
            pool_client.register_asset(
                &bombadil,
                asset,
                &decimals,
                &default_restrictions(),
                &default_fees(),
                &default_irm_params(),
                &Some(rules),
            );
        }

        TestFixture {
            env: e,
            bombadil,
            pool: pool_client,
            price_feed: price_feed_client,
            tokens: vec![usdc_client, eth_client, xlm_client],
        }
    }

    /// Create a new TestFixture where Frodo has deposited 100k USDC, 100 wETH and 1M XLM
    ///
    /// Returns the fixture and Frodo's address
    pub fn create_with_liquidity<'a>() -> (TestFixture<'a>, Address) {
        let fixture = TestFixture::create();
        let frodo = Address::generate(&fixture.env);
        for (index, amount) in [
            (TokenIndex::USDC, 100_000 * SCALAR_7),
            (TokenIndex::WETH, 100 * SCALAR_9),
            (TokenIndex::XLM, 1_000_000 * SCALAR_7),
        ] {
            let token = fixture.token(index);
            token.mint(&frodo, &amount);
            fixture.pool.deposit(&frodo, &token.address, &frodo, &amount);
        }
        (fixture, frodo)
    }

    pub fn token(&self, index: TokenIndex) -> &MockTokenClient<'_> {
        &self.tokens[index as usize]
    }

    pub fn asset(&self, index: TokenIndex) -> Address {
        self.tokens[index as usize].address.clone()
    }

    /********** Pool Helpers ***********/

    /// Mint `amount` of a token to `account`, deposit it and use it as collateral
    pub fn deposit_collateral(&self, account: &Address, index: TokenIndex, amount: i128) {
        let token = self.token(index);
        token.mint(account, &amount);
        self.pool.deposit(account, &token.address, account, &amount);
        self.pool.set_as_collateral(account, &token.address, &true);
    }

    pub fn read_reserve_data(&self, index: TokenIndex) -> ReserveData {
        self.pool.view_reserve_data(&self.asset(index))
    }

    pub fn read_account_reserve_data(
        &self,
        index: TokenIndex,
        account: &Address,
    ) -> AccountReserveData {
        self.pool.view_account_reserve_data(&self.asset(index), account)
    }

    /********** Chain Helpers ***********/

    pub fn jump(&self, time: u64) {
        let blocks = time / 5;
        self.env.ledger().set(LedgerInfo {
            timestamp: self.env.ledger().timestamp() + time,
            protocol_version: 20,
            sequence_number: self.env.ledger().sequence() + (blocks as u32),
            network_id: Default::default(),
            base_reserve: 10,
            min_temp_entry_ttl: 10,
            min_persistent_entry_ttl: ENTRY_TTL,
            max_entry_ttl: ENTRY_TTL + 1,
        });
    }
}
