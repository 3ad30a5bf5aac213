//! Views derived from the transaction store.
//!
//! These are pure functions of the store contents and are cheap enough to
//! recompute whenever the store changes.

use crate::transaction::core::Transaction;

/// The sum of all transaction amounts. Zero for no transactions.
pub fn balance(transactions: &[Transaction]) -> f64 {
    // `Sum for f64` starts from -0.0.
    transactions
        .iter()
        .fold(0.0, |sum, transaction| sum + transaction.amount)
}

/// The transactions with a positive amount, in store order.
pub fn income_transactions(transactions: &[Transaction]) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.is_income())
        .cloned()
        .collect()
}

/// The transactions with a negative amount, in store order.
///
/// Zero-amount transactions are neither income nor expenses.
pub fn expense_transactions(transactions: &[Transaction]) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.is_expense())
        .cloned()
        .collect()
}
