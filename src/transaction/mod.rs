//! Transactions: the data model, the data service boundary, the local store
//! and the views derived from it.

mod core;
mod gateway;
mod remote;
mod sqlite;
mod store;
mod view;

pub use self::core::{NewTransaction, RawTransactionId, Transaction, TransactionId};
pub use gateway::TransactionGateway;
pub use remote::{NewTransactionPayload, TransactionService};
pub use sqlite::{SQLiteTransactionService, create_transaction_table};
pub use store::TransactionStore;
pub use view::{balance, expense_transactions, income_transactions};

pub use self::core::parse_timestamp;
