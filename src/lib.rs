//! PennyWise is a personal finance tracker.
//!
//! This library implements the state that sits behind the PennyWise
//! dashboard: it follows the signed-in user, keeps a local copy of their
//! transactions in sync with a remote data service, and derives the balance,
//! income and expense views and the spending report from that copy.
//!
//! The identity provider, the transaction data service, the notification
//! sink and navigation are external collaborators, modelled as the traits
//! [IdentityProvider], [TransactionService], [NotificationSink] and
//! [Navigator].

#![warn(missing_docs)]

mod auth;
mod dashboard;
mod db;
mod email;
mod endpoints;
mod format;
mod log_out;
mod navigation;
mod notification;
mod report;
mod session;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use auth::{AuthListener, Identity, IdentityProvider, LocalIdentityProvider, Subscription};
pub use dashboard::{Dashboard, DashboardSummary};
pub use db::initialize as initialize_db;
pub use email::{Email, EmailAddressError};
pub use endpoints::{DASHBOARD_VIEW, LOG_IN_VIEW};
pub use format::format_currency;
pub use log_out::log_out;
pub use navigation::{ConsoleNavigator, Navigator};
pub use notification::{ConsoleNotifier, Notification, NotificationSink, Severity};
pub use report::{CategoryTotal, SpendingReport, UNCATEGORISED_LABEL, spending_report};
pub use session::{SessionObserver, SessionState};
pub use transaction::{
    NewTransaction, NewTransactionPayload, RawTransactionId, SQLiteTransactionService,
    Transaction, TransactionGateway, TransactionId, TransactionService, TransactionStore, balance,
    expense_transactions, income_transactions, parse_timestamp,
};

/// The user action that produced an [Error].
///
/// Used to pick the wording of the notification shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Loading the user's transactions from the data service.
    Load,
    /// Adding a new transaction.
    Add,
    /// Deleting a transaction.
    Delete,
    /// Signing the user out.
    LogOut,
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The action requires a signed-in user with a known email address.
    ///
    /// Raised before any remote call is made.
    #[error("no signed-in user with an email address")]
    Unauthenticated,

    /// The transaction identifier could not be read as a number.
    #[error("\"{0}\" is not a valid transaction ID")]
    InvalidId(String),

    /// The amount of a new transaction was NaN or infinite.
    #[error("{0} is not a valid transaction amount")]
    InvalidAmount(f64),

    /// A date could not be formatted or parsed.
    ///
    /// Callers should pass in the original error as a string.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// The data service explicitly refused the request.
    ///
    /// The string is the error detail from the service and is shown to the
    /// user as is.
    #[error("the data service rejected the request: {0}")]
    RemoteRejection(String),

    /// The data service responded with neither a success nor an error
    /// payload.
    #[error("the data service returned an unexpected response")]
    RemoteMalformed,

    /// The list of transactions from the data service was not a sequence.
    #[error("the data service did not return a list of transactions")]
    DataFormat,

    /// A single record from the data service could not be read as a
    /// transaction.
    #[error("invalid transaction record: {0}")]
    InvalidRecord(String),

    /// The call to an external service failed outright, e.g., a network
    /// error.
    #[error("could not reach the service: {0}")]
    Transport(String),

    /// The identity provider could not sign the user out.
    #[error("could not sign out: {0}")]
    SignOut(String),

    /// The identity provider stopped delivering session updates.
    #[error("the session has ended")]
    SessionEnded,

    /// The provided string is not a valid email address.
    #[error(transparent)]
    InvalidEmail(#[from] EmailAddressError),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl Error {
    /// Convert the error into the notification shown to the user after
    /// `action` failed.
    pub fn into_notification(self, action: Action) -> Notification {
        match (action, self) {
            (Action::Add, Error::Unauthenticated) => {
                Notification::error("Error", "Please log in to add a transaction.")
            }
            (Action::Delete, Error::Unauthenticated) => {
                Notification::error("Error", "Please log in to delete a transaction.")
            }
            (_, Error::InvalidId(_)) => Notification::error("Error!", "Invalid transaction ID."),
            (_, Error::InvalidAmount(amount)) => Notification::error(
                "Error!",
                &format!("{amount} is not a valid amount. Enter a number."),
            ),
            (Action::Add, Error::RemoteRejection(detail)) => Notification::error(
                "Error!",
                &format!("Could not add the transaction: {detail}"),
            ),
            (Action::Delete, Error::RemoteRejection(detail)) => {
                Notification::error("Error!", &detail)
            }
            (Action::Add, Error::RemoteMalformed) => Notification::error(
                "Error!",
                "Could not add the transaction: Unknown error.",
            ),
            (Action::Delete, Error::RemoteMalformed) => Notification::error(
                "Error!",
                "Could not delete the transaction: Unknown error.",
            ),
            (Action::Delete, _) => {
                Notification::error("Error!", "An error occurred while deleting.")
            }
            (Action::Load, Error::DataFormat) => Notification::error(
                "Data format error!",
                "Could not process the transaction data.",
            ),
            (Action::Load, _) => {
                Notification::error("Loading failed!", "Could not load your transactions.")
            }
            (Action::LogOut, Error::SignOut(message)) => {
                Notification::error("Log out failed", &message)
            }
            (_, error) => Notification::error("Error!", &error.to_string()),
        }
    }
}
