pub mod account;
pub mod create_transaction;
pub mod validation;
