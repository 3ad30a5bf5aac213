//! The local copy of the signed-in user's transactions.

use crate::{
    Error,
    auth::Identity,
    transaction::{
        core::{Transaction, TransactionId},
        gateway::TransactionGateway,
        remote::{parse_record, record_owner},
    },
};

/// The signed-in user's transactions, newest first.
///
/// The store is replaced wholesale by [TransactionStore::refresh] and
/// patched with [TransactionStore::insert] and [TransactionStore::remove]
/// after the data service has confirmed a change. It is never re-fetched
/// after a change, so it drifts if the data changes elsewhere, e.g. a
/// transaction deleted from another device stays visible until the next
/// refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    loading: bool,
}

impl Default for TransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionStore {
    /// Create an empty store that is waiting for its first refresh.
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            loading: true,
        }
    }

    /// The transactions, sorted by date from newest to oldest.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Whether a refresh is in progress or has not happened yet.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replace the contents of the store with `user`'s transactions.
    ///
    /// With no user the store is emptied without calling the service.
    /// Otherwise every record is fetched and only those owned by the user's
    /// email are kept. Records that cannot be read as transactions are
    /// skipped. Returns the number of transactions loaded.
    ///
    /// The store is empty and no longer loading when this returns, whatever
    /// the outcome.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DataFormat] if the service did not return a list,
    /// - or [Error::Transport] if the call failed.
    pub async fn refresh(
        &mut self,
        user: Option<&Identity>,
        gateway: &TransactionGateway,
    ) -> Result<usize, Error> {
        let Some(user) = user else {
            self.clear();
            self.loading = false;
            return Ok(0);
        };

        self.loading = true;
        let result = fetch_user_transactions(user, gateway).await;
        self.loading = false;

        match result {
            Ok(transactions) => {
                // Sorted here too, not just on insert, so the store is newest
                // first whatever order the service lists records in.
                self.transactions = transactions;
                sort_newest_first(&mut self.transactions);
                Ok(self.transactions.len())
            }
            Err(error) => {
                self.clear();
                Err(error)
            }
        }
    }

    /// Add a transaction confirmed by the data service, keeping the store
    /// sorted.
    pub fn insert(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
        sort_newest_first(&mut self.transactions);
    }

    /// Remove the transaction with `id`, keeping the order of the rest.
    ///
    /// Returns `false` if no transaction has that ID.
    pub fn remove(&mut self, id: TransactionId) -> bool {
        let count_before = self.transactions.len();
        self.transactions.retain(|transaction| transaction.id != id);

        self.transactions.len() != count_before
    }

    /// Remove every transaction.
    pub fn clear(&mut self) {
        self.transactions.clear();
    }
}

/// Stable, so transactions on the same date keep their relative order.
fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

async fn fetch_user_transactions(
    user: &Identity,
    gateway: &TransactionGateway,
) -> Result<Vec<Transaction>, Error> {
    let records = gateway.list().await?;
    let record_count = records.len();

    // The service returns everyone's records, so ownership is only enforced here.
    let email = user.email.as_ref().map(|email| email.as_str());
    let transactions: Vec<Transaction> = records
        .into_iter()
        .filter(|record| email.is_some() && record_owner(record) == email)
        .filter_map(|record| match parse_record(record) {
            Ok(transaction) => Some(transaction),
            Err(error) => {
                tracing::warn!("Skipping transaction record: {error}");
                None
            }
        })
        .collect();

    tracing::debug!(
        "Loaded {} of {} transaction records for {}",
        transactions.len(),
        record_count,
        user.uid
    );

    Ok(transactions)
}
