#![no_std]

#[cfg(any(test, feature = "testutils"))]
extern crate std;

mod access_control;
mod constants;
mod contract;
mod dependencies;
mod errors;
mod events;
mod math;
mod pool;
mod storage;
mod testutils;

pub use contract::*;
pub use dependencies::PriceFeedError;
pub use errors::LendingPoolError;
pub use pool::{Action, ActionType};
pub use storage::{
    AccountConfig, AccountReserveData, AssetRules, InterestRateModel, InterestRateModelParams,
    MarketRule, PoolConfig, ReserveConfig, ReserveData, ReserveFees, ReserveRestrictions, Role,
    TwEntry, TwIndex,
};
