//! Follows the identity provider to know who is signed in.

use tokio::sync::watch;

use crate::{
    Error,
    auth::{Identity, IdentityProvider, Subscription},
};

/// A snapshot of the authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// The signed-in user, or `None` when nobody is signed in.
    pub current_user: Option<Identity>,
    /// True until the identity provider has reported for the first time.
    pub auth_loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current_user: None,
            auth_loading: true,
        }
    }
}

/// The process-wide view of who is signed in.
///
/// Created with [SessionObserver::start], which subscribes to the identity
/// provider. The subscription ends with [SessionObserver::shutdown] or when
/// the observer is dropped.
#[derive(Debug)]
pub struct SessionObserver {
    receiver: watch::Receiver<SessionState>,
    subscription: Option<Subscription>,
}

impl SessionObserver {
    /// Subscribe to `provider` and start tracking the signed-in user.
    pub fn start(provider: &dyn IdentityProvider) -> Self {
        let (sender, receiver) = watch::channel(SessionState::default());

        let subscription = provider.subscribe(Box::new(move |user: Option<Identity>| {
            sender.send_replace(SessionState {
                current_user: user,
                auth_loading: false,
            });
        }));

        Self {
            receiver,
            subscription: Some(subscription),
        }
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Option<Identity> {
        self.receiver.borrow().current_user.clone()
    }

    /// Whether the identity provider has yet to report.
    pub fn auth_loading(&self) -> bool {
        self.receiver.borrow().auth_loading
    }

    /// The current authentication state.
    pub fn state(&self) -> SessionState {
        self.receiver.borrow().clone()
    }

    /// Wait for the provider's next report and return the new state.
    ///
    /// Returns straight away if there is a report that has not been seen
    /// yet, including the provider's first report.
    ///
    /// # Errors
    /// Returns [Error::SessionEnded] once the observer has unsubscribed.
    pub async fn changed(&mut self) -> Result<SessionState, Error> {
        self.receiver
            .changed()
            .await
            .map_err(|_| Error::SessionEnded)?;

        Ok(self.receiver.borrow_and_update().clone())
    }

    /// Unsubscribe from the identity provider.
    pub fn shutdown(mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

#[cfg(test)]
mod session_tests {
    use crate::{Error, LocalIdentityProvider, SessionObserver, SessionState};

    #[test]
    fn auth_loading_until_provider_reports() {
        let provider = crate::test_utils::SilentIdentityProvider;

        let observer = SessionObserver::start(&provider);

        assert!(observer.auth_loading());
        assert_eq!(observer.current_user(), None);
    }

    #[tokio::test]
    async fn first_report_clears_auth_loading() {
        let provider = LocalIdentityProvider::new();
        let mut observer = SessionObserver::start(&provider);

        let state = observer.changed().await.unwrap();

        assert_eq!(
            state,
            SessionState {
                current_user: None,
                auth_loading: false
            }
        );
    }

    #[tokio::test]
    async fn follows_sign_in() {
        let provider = LocalIdentityProvider::new();
        let mut observer = SessionObserver::start(&provider);
        observer.changed().await.unwrap();

        let identity = provider.sign_in("foo@bar.baz").unwrap();
        let state = observer.changed().await.unwrap();

        assert_eq!(state.current_user, Some(identity.clone()));
        assert_eq!(observer.current_user(), Some(identity));
        assert!(!observer.auth_loading());
    }

    #[tokio::test]
    async fn changed_fails_after_subscription_ends() {
        let provider = LocalIdentityProvider::new();
        let mut observer = SessionObserver::start(&provider);
        observer.changed().await.unwrap();

        if let Some(subscription) = observer.subscription.take() {
            subscription.unsubscribe();
        }

        assert_eq!(observer.changed().await, Err(Error::SessionEnded));
    }
}
