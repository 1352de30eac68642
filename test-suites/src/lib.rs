pub mod assertions;
pub mod mocks;
pub mod pool;
pub mod test_fixture;
pub mod token;
