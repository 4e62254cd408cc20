//! Authentication context and hooks for the UI.

use dioxus::prelude::*;
use futures::StreamExt;

use store::UserInfo;

use crate::backend::use_backend;

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<UserInfo>,
    pub loading: bool,
    /// Message of the last failed auth attempt, cleared on the next one.
    pub error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
            error: None,
        }
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Provider component that mirrors the auth session into a signal.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let backend = use_backend();
    let mut auth_state = use_signal(AuthState::default);

    use_hook(move || {
        let mut rx = backend.auth.state().subscribe();
        spawn(async move {
            while let Some(snapshot) = rx.next().await {
                auth_state.set(AuthState {
                    user: snapshot.user,
                    loading: snapshot.loading,
                    error: snapshot.error,
                });
            }
        });
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}
