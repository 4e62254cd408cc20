//! # Authentication collaborator and session state
//!
//! Two halves, mirroring the gateway/list-store split used for entities:
//!
//! - [`AuthBackend`] is the narrow async interface to the external auth
//!   provider: account creation, credential and federated sign-in, sign-out,
//!   profile updates, and a subscription that yields the current identity
//!   whenever it changes. [`MemoryAuth`] is the bundled in-memory backend.
//! - [`SessionState`] holds the session-scoped snapshot `{ user, loading,
//!   error }` with the same subscribe/dispatch contract as
//!   [`crate::list::ListStore`]. Authentication failures are the one failure
//!   category surfaced to the user: [`AuthSession`] stores the message here
//!   and clears it on the next attempt or successful transition.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use thiserror::Error;

use crate::models::UserInfo;

/// Callback invoked with the current identity whenever it changes.
pub type AuthListener = Box<dyn Fn(Option<UserInfo>) + Send + Sync>;

/// Failure of an auth operation, with a message fit to show the user.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("An account with this email already exists")]
    EmailInUse,
    #[error("Please enter a valid email")]
    InvalidEmail,
    #[error("Password must be at least 6 characters")]
    WeakPassword,
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("{0}")]
    Provider(String),
}

/// Async interface to the external auth provider.
pub trait AuthBackend {
    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<UserInfo, AuthError>>;

    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<UserInfo, AuthError>>;

    /// Federated sign-in (e.g. `"google"`), creating the account on first use.
    fn sign_in_federated(
        &self,
        provider: &str,
    ) -> impl std::future::Future<Output = Result<UserInfo, AuthError>>;

    fn sign_out(&self) -> impl std::future::Future<Output = Result<(), AuthError>>;

    fn update_profile(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<UserInfo, AuthError>>;

    fn update_password(
        &self,
        new_password: &str,
    ) -> impl std::future::Future<Output = Result<(), AuthError>>;

    /// Register a listener; it is invoked immediately with the current
    /// identity and again on every change.
    fn subscribe(&self, listener: AuthListener);
}

#[derive(Clone, Debug)]
struct Account {
    user: UserInfo,
    password: Option<String>,
}

/// In-memory AuthBackend for testing and as the bundled development backend.
#[derive(Clone, Default)]
pub struct MemoryAuth {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    current: Arc<Mutex<Option<UserInfo>>>,
    listeners: Arc<Mutex<Vec<AuthListener>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    fn notify(&self, user: Option<UserInfo>) {
        let listeners = self.listeners.lock().unwrap();
        for listener in listeners.iter() {
            listener(user.clone());
        }
    }

    fn set_current(&self, user: Option<UserInfo>) {
        *self.current.lock().unwrap() = user.clone();
        self.notify(user);
    }

    fn new_user(&self, email: &str, provider: &str) -> UserInfo {
        UserInfo {
            id: format!("u{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1),
            email: email.to_string(),
            name: None,
            provider: provider.to_string(),
        }
    }
}

impl AuthBackend for MemoryAuth {
    async fn sign_up(&self, email: &str, password: &str) -> Result<UserInfo, AuthError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidEmail);
        }
        if password.len() < 6 {
            return Err(AuthError::WeakPassword);
        }

        let user = {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts.contains_key(&email) {
                return Err(AuthError::EmailInUse);
            }
            let user = self.new_user(&email, "local");
            accounts.insert(
                email,
                Account {
                    user: user.clone(),
                    password: Some(password.to_string()),
                },
            );
            user
        };
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserInfo, AuthError> {
        let email = email.trim().to_lowercase();
        let user = {
            let accounts = self.accounts.lock().unwrap();
            let account = accounts.get(&email).ok_or(AuthError::InvalidCredentials)?;
            if account.password.as_deref() != Some(password) {
                return Err(AuthError::InvalidCredentials);
            }
            account.user.clone()
        };
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in_federated(&self, provider: &str) -> Result<UserInfo, AuthError> {
        let email = format!("user@{provider}.example");
        let user = {
            let mut accounts = self.accounts.lock().unwrap();
            match accounts.get(&email) {
                Some(account) => account.user.clone(),
                None => {
                    let user = self.new_user(&email, provider);
                    accounts.insert(
                        email,
                        Account {
                            user: user.clone(),
                            password: None,
                        },
                    );
                    user
                }
            }
        };
        self.set_current(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.set_current(None);
        Ok(())
    }

    async fn update_profile(&self, name: &str) -> Result<UserInfo, AuthError> {
        let current = self
            .current
            .lock()
            .unwrap()
            .clone()
            .ok_or(AuthError::NotAuthenticated)?;
        let name = name.trim();
        let updated = {
            let mut accounts = self.accounts.lock().unwrap();
            let account = accounts
                .get_mut(&current.email)
                .ok_or(AuthError::NotAuthenticated)?;
            account.user.name = if name.is_empty() {
                None
            } else {
                Some(name.to_string())
            };
            account.user.clone()
        };
        self.set_current(Some(updated.clone()));
        Ok(updated)
    }

    async fn update_password(&self, new_password: &str) -> Result<(), AuthError> {
        let current = self
            .current
            .lock()
            .unwrap()
            .clone()
            .ok_or(AuthError::NotAuthenticated)?;
        if current.provider != "local" {
            return Err(AuthError::Provider(
                "Federated accounts manage their password with the provider".to_string(),
            ));
        }
        if new_password.len() < 6 {
            return Err(AuthError::WeakPassword);
        }
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(&current.email)
            .ok_or(AuthError::NotAuthenticated)?;
        account.password = Some(new_password.to_string());
        Ok(())
    }

    fn subscribe(&self, listener: AuthListener) {
        listener(self.current.lock().unwrap().clone());
        self.listeners.lock().unwrap().push(listener);
    }
}

/// One immutable view of the auth session.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthSnapshot {
    pub user: Option<UserInfo>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        AuthSnapshot {
            user: None,
            // True until the backend subscription reports the initial identity.
            loading: true,
            error: None,
        }
    }
}

struct SessionInner {
    snapshot: AuthSnapshot,
    senders: Vec<UnboundedSender<AuthSnapshot>>,
}

/// Session-scoped state container: current user, loading flag, last error.
#[derive(Clone)]
pub struct SessionState {
    inner: Arc<Mutex<SessionInner>>,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            inner: Arc::new(Mutex::new(SessionInner {
                snapshot: AuthSnapshot::default(),
                senders: Vec::new(),
            })),
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.inner.lock().unwrap().snapshot.clone()
    }

    pub fn current_user(&self) -> Option<UserInfo> {
        self.inner.lock().unwrap().snapshot.user.clone()
    }

    /// Subscribe to snapshots. The current one is delivered immediately.
    pub fn subscribe(&self) -> UnboundedReceiver<AuthSnapshot> {
        let (tx, rx) = unbounded();
        let mut inner = self.inner.lock().unwrap();
        let _ = tx.unbounded_send(inner.snapshot.clone());
        inner.senders.push(tx);
        rx
    }

    /// Set the identity. Clears the error and the loading flag.
    pub fn set_user(&self, user: Option<UserInfo>) {
        self.write(|snapshot| {
            snapshot.user = user;
            snapshot.loading = false;
            snapshot.error = None;
        });
    }

    /// Mark an attempt as started: loading set, previous error cleared.
    pub fn begin(&self) {
        self.write(|snapshot| {
            snapshot.loading = true;
            snapshot.error = None;
        });
    }

    /// Record a failure message. Clears the loading flag.
    pub fn set_error(&self, message: String) {
        self.write(|snapshot| {
            snapshot.loading = false;
            snapshot.error = Some(message);
        });
    }

    fn write(&self, mutate: impl FnOnce(&mut AuthSnapshot)) {
        let mut inner = self.inner.lock().unwrap();
        mutate(&mut inner.snapshot);
        let snapshot = inner.snapshot.clone();
        inner
            .senders
            .retain(|tx| tx.unbounded_send(snapshot.clone()).is_ok());
    }
}

/// Ties an [`AuthBackend`] to a [`SessionState`].
///
/// Sign-up/sign-in/sign-out record failures in the session rather than
/// returning them; profile operations also return a `Result` so the profile
/// view can show local feedback.
#[derive(Clone)]
pub struct AuthSession<A: AuthBackend> {
    backend: A,
    state: SessionState,
}

impl<A: AuthBackend> AuthSession<A> {
    pub fn new(backend: A) -> Self {
        let state = SessionState::new();
        let listener_state = state.clone();
        backend.subscribe(Box::new(move |user| listener_state.set_user(user)));
        AuthSession { backend, state }
    }

    pub fn state(&self) -> SessionState {
        self.state.clone()
    }

    pub fn current_user(&self) -> Option<UserInfo> {
        self.state.current_user()
    }

    pub async fn sign_up(&self, email: &str, password: &str) {
        self.state.begin();
        match self.backend.sign_up(email, password).await {
            Ok(user) => self.state.set_user(Some(user)),
            Err(err) => self.state.set_error(err.to_string()),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) {
        self.state.begin();
        match self.backend.sign_in(email, password).await {
            Ok(user) => self.state.set_user(Some(user)),
            Err(err) => self.state.set_error(err.to_string()),
        }
    }

    pub async fn sign_in_with(&self, provider: &str) {
        self.state.begin();
        match self.backend.sign_in_federated(provider).await {
            Ok(user) => self.state.set_user(Some(user)),
            Err(err) => self.state.set_error(err.to_string()),
        }
    }

    pub async fn sign_out(&self) {
        self.state.begin();
        match self.backend.sign_out().await {
            Ok(()) => self.state.set_user(None),
            Err(err) => self.state.set_error(err.to_string()),
        }
    }

    pub async fn update_profile(&self, name: &str) -> Result<(), AuthError> {
        let user = self.backend.update_profile(name).await?;
        self.state.set_user(Some(user));
        Ok(())
    }

    pub async fn update_password(&self, new_password: &str) -> Result<(), AuthError> {
        self.backend.update_password(new_password).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> AuthSession<MemoryAuth> {
        AuthSession::new(MemoryAuth::new())
    }

    #[tokio::test]
    async fn test_initial_identity_resolves_on_subscribe() {
        let session = session();
        let snapshot = session.state().snapshot();
        assert!(snapshot.user.is_none());
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_sign_up_sets_user_and_clears_error() {
        let session = session();
        session.sign_in("ana@example.com", "secret1").await;
        assert!(session.state().snapshot().error.is_some());

        session.sign_up("ana@example.com", "secret1").await;
        let snapshot = session.state().snapshot();
        let user = snapshot.user.expect("signed up");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.provider, "local");
        assert!(snapshot.error.is_none());
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_sign_up_duplicate_email_surfaces_message() {
        let session = session();
        session.sign_up("ana@example.com", "secret1").await;
        session.sign_up("ana@example.com", "other66").await;
        assert_eq!(
            session.state().snapshot().error.as_deref(),
            Some("An account with this email already exists"),
        );
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_keeps_user_signed_out() {
        let session = session();
        session.sign_up("ana@example.com", "secret1").await;
        session.sign_out().await;
        session.sign_in("ana@example.com", "wrong!!").await;

        let snapshot = session.state().snapshot();
        assert!(snapshot.user.is_none());
        assert_eq!(snapshot.error.as_deref(), Some("Invalid email or password"));
    }

    #[tokio::test]
    async fn test_federated_sign_in_reuses_account() {
        let session = session();
        session.sign_in_with("google").await;
        let first = session.current_user().expect("signed in");
        assert_eq!(first.provider, "google");

        session.sign_out().await;
        session.sign_in_with("google").await;
        assert_eq!(session.current_user().unwrap().id, first.id);
    }

    #[tokio::test]
    async fn test_session_subscription_follows_changes() {
        let session = session();
        let mut rx = session.state().subscribe();
        // Current snapshot first.
        assert!(rx.try_next().unwrap().unwrap().user.is_none());

        session.sign_up("ana@example.com", "secret1").await;
        let mut last_user = None;
        while let Ok(Some(snapshot)) = rx.try_next() {
            last_user = snapshot.user;
        }
        assert_eq!(last_user.unwrap().email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_update_profile_refreshes_session_user() {
        let session = session();
        session.sign_up("ana@example.com", "secret1").await;
        session.update_profile("Ana Lima").await.unwrap();
        assert_eq!(
            session.current_user().unwrap().display_name(),
            "Ana Lima",
        );
    }

    #[tokio::test]
    async fn test_update_password_rules() {
        let session = session();
        assert_eq!(
            session.update_password("longenough").await.unwrap_err(),
            AuthError::NotAuthenticated,
        );

        session.sign_up("ana@example.com", "secret1").await;
        assert_eq!(
            session.update_password("short").await.unwrap_err(),
            AuthError::WeakPassword,
        );
        session.update_password("brandnew").await.unwrap();

        session.sign_out().await;
        session.sign_in("ana@example.com", "brandnew").await;
        assert!(session.current_user().is_some());
    }

    #[tokio::test]
    async fn test_federated_account_cannot_change_password() {
        let session = session();
        session.sign_in_with("google").await;
        assert!(matches!(
            session.update_password("longenough").await.unwrap_err(),
            AuthError::Provider(_),
        ));
    }
}
