/********** Numbers **********/

/// Fixed-point scalar for utilization, coefficients, fees and penalties
pub const E6: i128 = 1_000_000;

/// Lifts an E6 value to E18
pub const E12: i128 = 1_000_000_000_000;

/// Fixed-point scalar for indexes, growth factors, prices and annual rates
pub const E18: i128 = 1_000_000_000_000_000_000;

/// Fixed-point scalar for per-second rates
pub const E24: i128 = 1_000_000_000_000_000_000_000_000;

// seconds per year
pub const SECONDS_PER_YEAR: i128 = 31536000;

/********** Limits **********/

/// Reserves an account bitmask can track
pub const MAX_RESERVES: u32 = 64;

/// The largest flash loan fee the pool accepts
pub const MAX_FLASH_LOAN_FEE_E6: u32 = 100_000;

/********** Time Weighted Utilization **********/

/// Entries kept in a reserve's time weighted utilization ring buffer
pub const TW_CAPACITY: u32 = 24;

/// Minimum seconds between two ring buffer entries
pub const TW_ENTRY_PERIOD: u64 = 3600;

/// Relative change of the rate at target per year of maximal utilization error
pub const RATE_AT_TARGET_ADJUSTMENT_SPEED_E6: i128 = 50 * E6;
