use soroban_sdk::contracterror;

use crate::dependencies::PriceFeedError;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
/// Error codes for the lending pool contract. Codes are grouped by the component that raises
/// them: math errors start at 1, access control at 10, asset rules at 20, reserve data at 30,
/// reserve restrictions at 40, price feed at 50 and lending pool errors at 100.
pub enum LendingPoolError {
    // Math Errors
    MathUnderflow = 1,
    MathOverflow = 2,
    MathDivByZero = 3,

    // Access Control Errors (start at 10)
    InvalidCaller = 10,
    MissingRole = 11,
    RoleRedundant = 12,

    // Asset Rules Errors (start at 20)
    InvalidAssetRule = 20,

    // Reserve Data Errors (start at 30)
    AlreadySet = 30,
    Inactive = 31,
    Frozen = 32,

    // Reserve Restrictions Errors (start at 40)
    MaxDebtReached = 40,
    MaxDepositReached = 41,
    MinimalDebt = 42,
    MinimalCollateral = 43,

    // Price Feed Errors (start at 50)
    PriceFeedNoSuchAsset = 50,
    PriceFeedNoPriceFeed = 51,

    // Lending Pool Errors (start at 100)
    AlreadyInitialized = 100,
    NotInitialized = 101,
    AssetNotRegistered = 102,
    AlreadyRegistered = 103,
    TooManyReserves = 104,
    InvalidReserveParameters = 105,
    NegativeAmount = 106,
    InsufficientCollateral = 107,
    InsufficientDeposit = 108,
    InsufficientDebt = 109,
    NothingToRepay = 110,
    NothingToTake = 111,
    Collateralized = 112,
    MinimumReceived = 113,
    MarketRuleInvalidId = 114,
    RuleBorrowDisable = 115,
    RuleCollateralDisable = 116,
    AssetStableBorrowDisabled = 117,
    TooEarlyToAdjustRate = 118,
    FlashLoanAmountsAssetsInconsistentLengths = 119,
    FlashLoanNotRepaid = 120,
    FlashLoanReceiverRejected = 121,
    InvalidFlashLoanFee = 122,
}

/// Failures of the scaled-integer helpers in `math`
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MathError {
    Underflow,
    Overflow,
    DivByZero,
}

/// Failures raised while applying a reserve's restrictions
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReserveRestrictionsError {
    MaxDebtReached,
    MaxDepositReached,
    MinimalDebt,
    MinimalCollateral,
}

/// Failures raised while gating an action on a reserve's flags
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ReserveDataError {
    Inactive,
    Frozen,
}

impl From<MathError> for LendingPoolError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Underflow => LendingPoolError::MathUnderflow,
            MathError::Overflow => LendingPoolError::MathOverflow,
            MathError::DivByZero => LendingPoolError::MathDivByZero,
        }
    }
}

impl From<ReserveRestrictionsError> for LendingPoolError {
    fn from(err: ReserveRestrictionsError) -> Self {
        match err {
            ReserveRestrictionsError::MaxDebtReached => LendingPoolError::MaxDebtReached,
            ReserveRestrictionsError::MaxDepositReached => LendingPoolError::MaxDepositReached,
            ReserveRestrictionsError::MinimalDebt => LendingPoolError::MinimalDebt,
            ReserveRestrictionsError::MinimalCollateral => LendingPoolError::MinimalCollateral,
        }
    }
}

impl From<ReserveDataError> for LendingPoolError {
    fn from(err: ReserveDataError) -> Self {
        match err {
            ReserveDataError::Inactive => LendingPoolError::Inactive,
            ReserveDataError::Frozen => LendingPoolError::Frozen,
        }
    }
}

impl From<PriceFeedError> for LendingPoolError {
    fn from(err: PriceFeedError) -> Self {
        match err {
            PriceFeedError::NoSuchAsset => LendingPoolError::PriceFeedNoSuchAsset,
            PriceFeedError::NoPriceFeed => LendingPoolError::PriceFeedNoPriceFeed,
        }
    }
}
