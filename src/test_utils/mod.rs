#![allow(missing_docs)]

pub(crate) mod fakes;
pub(crate) mod fixtures;

pub(crate) use fakes::{
    FailingSignOutProvider, FakeTransactionService, RecordingNavigator, RecordingNotifier,
    ServiceCall, SilentIdentityProvider,
};
pub(crate) use fixtures::{identity, transaction, transaction_in};
