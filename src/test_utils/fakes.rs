use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    AuthListener, Error, IdentityProvider, Navigator, Notification, NotificationSink,
    Subscription,
    transaction::{NewTransactionPayload, TransactionId, TransactionService},
};

/// A call received by [FakeTransactionService].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ServiceCall {
    List,
    Create(NewTransactionPayload),
    Delete(TransactionId, String),
}

/// A data service that answers with scripted responses, in order, and
/// records every call it gets.
#[derive(Debug, Default)]
pub(crate) struct FakeTransactionService {
    responses: Mutex<VecDeque<Result<Value, Error>>>,
    calls: Mutex<Vec<ServiceCall>>,
}

impl FakeTransactionService {
    pub(crate) fn with_responses(
        responses: impl IntoIterator<Item = Result<Value, Error>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self, call: ServiceCall) -> Result<Value, Error> {
        self.calls.lock().unwrap().push(call);

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Transport("no scripted response".to_owned())))
    }
}

#[async_trait]
impl TransactionService for FakeTransactionService {
    async fn list(&self) -> Result<Value, Error> {
        self.respond(ServiceCall::List)
    }

    async fn create(&self, payload: NewTransactionPayload) -> Result<Value, Error> {
        self.respond(ServiceCall::Create(payload))
    }

    async fn delete(&self, id: TransactionId, owner_email: &str) -> Result<Value, Error> {
        self.respond(ServiceCall::Delete(id, owner_email.to_owned()))
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub(crate) fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn go_to(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_owned());
    }
}

/// An identity provider that never reports.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SilentIdentityProvider;

#[async_trait]
impl IdentityProvider for SilentIdentityProvider {
    fn subscribe(&self, _listener: AuthListener) -> Subscription {
        Subscription::new(|| {})
    }

    async fn sign_out(&self) -> Result<(), Error> {
        Ok(())
    }
}

/// An identity provider where nobody is signed in and signing out fails
/// with the given message.
#[derive(Debug, Clone)]
pub(crate) struct FailingSignOutProvider(pub(crate) String);

#[async_trait]
impl IdentityProvider for FailingSignOutProvider {
    fn subscribe(&self, listener: AuthListener) -> Subscription {
        listener(None);
        Subscription::new(|| {})
    }

    async fn sign_out(&self) -> Result<(), Error> {
        Err(Error::SignOut(self.0.clone()))
    }
}
