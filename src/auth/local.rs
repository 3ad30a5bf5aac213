//! An in-process identity provider.
//!
//! Users sign in with an email address only; there are no passwords. This
//! provider backs the CLI and the tests, where the real identity service is
//! not available.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use async_trait::async_trait;

use crate::{
    Error,
    auth::{AuthListener, Identity, IdentityProvider, Subscription},
    email::Email,
};

type SharedListener = Arc<dyn Fn(Option<Identity>) + Send + Sync>;

#[derive(Default)]
struct ProviderState {
    current_user: Option<Identity>,
    listeners: Vec<(u64, SharedListener)>,
    next_listener_id: u64,
}

/// Keeps the signed-in user in memory and tells subscribers about changes.
///
/// Clones share the same state.
#[derive(Clone, Default)]
pub struct LocalIdentityProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl LocalIdentityProvider {
    /// Create a provider with nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign in as the user with `email`, replacing any current user.
    ///
    /// # Errors
    /// Returns [Error::InvalidEmail] if `email` is not an email address.
    pub fn sign_in(&self, email: &str) -> Result<Identity, Error> {
        let email = Email::new(email)?;
        let identity = Identity::new(&format!("local:{email}"), email);

        tracing::debug!("Signing in {}", identity.uid);
        self.set_current_user(Some(identity.clone()));

        Ok(identity)
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<Identity> {
        self.lock().current_user.clone()
    }

    fn set_current_user(&self, user: Option<Identity>) {
        let listeners = {
            let mut state = self.lock();
            state.current_user = user.clone();
            state
                .listeners
                .iter()
                .map(|(_, listener)| listener.clone())
                .collect::<Vec<_>>()
        };

        // Listeners run without the lock so they may call back into the provider.
        for listener in listeners {
            listener(user.clone());
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProviderState> {
        lock_state(&self.state)
    }
}

fn lock_state(state: &Mutex<ProviderState>) -> MutexGuard<'_, ProviderState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn subscribe(&self, listener: AuthListener) -> Subscription {
        let listener: SharedListener = Arc::from(listener);

        let (id, current_user) = {
            let mut state = self.lock();
            let id = state.next_listener_id;
            state.next_listener_id += 1;
            state.listeners.push((id, listener.clone()));
            (id, state.current_user.clone())
        };

        listener(current_user);

        let state: Weak<Mutex<ProviderState>> = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = state.upgrade() {
                lock_state(&state)
                    .listeners
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    async fn sign_out(&self) -> Result<(), Error> {
        if let Some(user) = self.current_user() {
            tracing::debug!("Signing out {}", user.uid);
        }

        self.set_current_user(None);

        Ok(())
    }
}
