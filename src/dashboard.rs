//! The dashboard: the signed-in user's balance, transactions and spending
//! report, and the actions they can take on them.
//!
//! [Dashboard] ties the other parts together. It follows the session,
//! refreshes the store when the user changes, runs add and delete through
//! the gateway and patches the store once the data service confirms. Every
//! action ends with exactly one notification; errors never escape.

use std::sync::Arc;

use crate::{
    Action,
    auth::{Identity, IdentityProvider},
    log_out::log_out,
    navigation::Navigator,
    notification::{Notification, NotificationSink},
    report::{SpendingReport, spending_report},
    session::SessionObserver,
    transaction::{
        NewTransaction, RawTransactionId, Transaction, TransactionGateway, TransactionId,
        TransactionService, TransactionStore, balance, expense_transactions, income_transactions,
    },
};

/// Everything the presentation layer needs to draw the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// The signed-in user, if any.
    pub user: Option<Identity>,
    /// Whether the identity provider has yet to report.
    pub auth_loading: bool,
    /// Whether the transactions are still loading.
    pub loading: bool,
    /// The sum of all transactions.
    pub balance: f64,
    /// Transactions with a positive amount, newest first.
    pub income: Vec<Transaction>,
    /// Transactions with a negative amount, newest first.
    pub expenses: Vec<Transaction>,
    /// Spending by category.
    pub report: SpendingReport,
}

/// The state behind the dashboard page.
///
/// All operations take `&mut self`, so a refresh and a mutation can never
/// interleave on the same store.
pub struct Dashboard {
    session: SessionObserver,
    provider: Arc<dyn IdentityProvider>,
    gateway: TransactionGateway,
    store: TransactionStore,
    notifier: Arc<dyn NotificationSink>,
    navigator: Arc<dyn Navigator>,
}

impl Dashboard {
    /// Create a dashboard and start following `provider`.
    ///
    /// Call [Dashboard::sync_session] or [Dashboard::next_session_change]
    /// to load the user's transactions.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        service: Arc<dyn TransactionService>,
        notifier: Arc<dyn NotificationSink>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let session = SessionObserver::start(provider.as_ref());

        Self {
            session,
            provider,
            gateway: TransactionGateway::new(service),
            store: TransactionStore::new(),
            notifier,
            navigator,
        }
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<Identity> {
        self.session.current_user()
    }

    /// The signed-in user's transactions, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        self.store.transactions()
    }

    /// Whether the transactions are still loading.
    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    /// Wait for the identity provider's next report, then bring the store
    /// in line with it.
    ///
    /// # Errors
    /// Returns [Error::SessionEnded](crate::Error::SessionEnded) if the
    /// session observer has stopped.
    pub async fn next_session_change(&mut self) -> Result<(), crate::Error> {
        self.session.changed().await?;
        self.sync_session().await;

        Ok(())
    }

    /// Bring the store in line with the current session.
    ///
    /// A signed-in user gets a fresh load of their transactions. Once the
    /// provider has reported that nobody is signed in, the store is emptied.
    /// Before the provider's first report nothing happens.
    pub async fn sync_session(&mut self) {
        let state = self.session.state();

        match (state.current_user, state.auth_loading) {
            (Some(user), _) => self.refresh(Some(&user)).await,
            (None, false) => self.refresh(None).await,
            (None, true) => {}
        }
    }

    async fn refresh(&mut self, user: Option<&Identity>) {
        if let Err(error) = self.store.refresh(user, &self.gateway).await {
            tracing::error!("Could not load transactions: {error}");
            self.notifier.notify(error.into_notification(Action::Load));
        }
    }

    /// Save a new transaction and add it to the store.
    ///
    /// Returns the new transaction's ID, or `None` if it could not be saved,
    /// in which case the store is unchanged and the user has been told why.
    pub async fn add_transaction(&mut self, transaction: NewTransaction) -> Option<TransactionId> {
        let user = self.session.current_user();

        match self.gateway.add(user.as_ref(), transaction).await {
            Ok(transaction) => {
                let id = transaction.id;
                tracing::info!("Added transaction {id}");
                self.store.insert(transaction);
                self.notifier.notify(Notification::success(
                    "Success!",
                    "Your transaction has been recorded.",
                ));
                Some(id)
            }
            Err(error) => {
                tracing::error!("Could not add transaction: {error}");
                self.notifier.notify(error.into_notification(Action::Add));
                None
            }
        }
    }

    /// Delete a transaction and remove it from the store.
    ///
    /// Returns `false` if it could not be deleted, in which case the store
    /// is unchanged and the user has been told why.
    pub async fn delete_transaction(&mut self, id: impl Into<RawTransactionId>) -> bool {
        let id = id.into();
        let user = self.session.current_user();

        match self.gateway.delete(user.as_ref(), id.clone()).await {
            Ok(id) => {
                tracing::info!("Deleted transaction {id}");
                self.store.remove(id);
                self.notifier
                    .notify(Notification::success("Success!", "Transaction deleted."));
                true
            }
            Err(error) => {
                tracing::error!("Could not delete transaction {id}: {error}");
                self.notifier.notify(error.into_notification(Action::Delete));
                false
            }
        }
    }

    /// Sign the user out and go to the log-in page.
    ///
    /// The store is emptied on the next session change, not here.
    pub async fn log_out(&mut self) -> bool {
        log_out(
            self.provider.as_ref(),
            self.notifier.as_ref(),
            self.navigator.as_ref(),
        )
        .await
    }

    /// The view models for the current store contents.
    pub fn summary(&self) -> DashboardSummary {
        let state = self.session.state();
        let transactions = self.store.transactions();
        let expenses = expense_transactions(transactions);

        DashboardSummary {
            user: state.current_user,
            auth_loading: state.auth_loading,
            loading: self.store.is_loading(),
            balance: balance(transactions),
            income: income_transactions(transactions),
            report: spending_report(&expenses),
            expenses,
        }
    }

    /// Stop following the identity provider.
    pub fn shutdown(self) {
        self.session.shutdown();
    }
}
