//! The identity provider interface and the signed-in user's identity.

use async_trait::async_trait;

use crate::{Error, email::Email};

mod local;

pub use local::LocalIdentityProvider;

/// The signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The provider's stable ID for the user.
    pub uid: String,
    /// The user's email address, the ownership key for transactions.
    ///
    /// Some providers allow accounts without an email address. Such users
    /// can sign in but cannot see, add or delete transactions.
    pub email: Option<Email>,
}

impl Identity {
    /// Create an identity for a user with an email address.
    pub fn new(uid: &str, email: Email) -> Self {
        Self {
            uid: uid.to_owned(),
            email: Some(email),
        }
    }
}

/// Called with the current identity, or `None` when nobody is signed in.
pub type AuthListener = Box<dyn Fn(Option<Identity>) + Send + Sync>;

/// Keeps a listener registered with an [IdentityProvider].
///
/// The listener is removed when the subscription is dropped or
/// [Subscription::unsubscribe] is called.
#[must_use = "dropping a subscription unsubscribes the listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Create a subscription that runs `unsubscribe` when it ends.
    pub fn new(unsubscribe: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Remove the listener from the provider.
    pub fn unsubscribe(mut self) {
        self.end();
    }

    fn end(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.end();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

/// The external service that authenticates users.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register `listener` for authentication state changes.
    ///
    /// The provider calls the listener once with the current state soon
    /// after subscribing, and again on every sign in or sign out.
    fn subscribe(&self, listener: AuthListener) -> Subscription;

    /// Sign the current user out.
    ///
    /// # Errors
    /// Returns [Error::SignOut] if the provider could not sign the user out.
    async fn sign_out(&self) -> Result<(), Error>;
}
