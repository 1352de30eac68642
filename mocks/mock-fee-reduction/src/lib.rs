#![no_std]

#[cfg(any(test, feature = "testutils"))]
extern crate std;

mod mock_fee_reduction;

pub use crate::mock_fee_reduction::*;
