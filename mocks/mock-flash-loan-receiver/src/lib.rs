#![no_std]

#[cfg(any(test, feature = "testutils"))]
extern crate std;

mod mock_flash_loan_receiver;

pub use crate::mock_flash_loan_receiver::*;
