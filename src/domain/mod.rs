pub mod transaction;

pub use transaction::{RedeemError, Transaction, TransactionStatus};
