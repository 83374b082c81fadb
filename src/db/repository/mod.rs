pub mod account;
pub mod patient;
