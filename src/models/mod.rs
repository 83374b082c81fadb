pub mod account;
pub mod patient;

pub use account::{AppRole, AppUser};
pub use patient::Patient;
