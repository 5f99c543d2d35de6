//! Shared test infrastructure

pub mod database_helper;
pub mod test_data;
