pub mod transaction;

pub use transaction::{Transaction, lock_path_for};
