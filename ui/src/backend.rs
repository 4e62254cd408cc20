//! Shared backend context for all views.
//!
//! [`Backend`] is the explicit application-state container: both resource
//! gateways plus the auth session, sharing one remote store and one session.
//! It is provided once at the app root by [`BackendProvider`] and read with
//! [`use_backend`], instead of living in ambient global state.

use dioxus::prelude::*;

use store::{AuthSession, MemoryAuth, MemoryStore, NoteGateway, TaskGateway};

/// Remote collaborators used by the application. The in-memory pair stands in
/// for a hosted provider SDK, which would slot in at this seam.
pub type Remote = MemoryStore;
pub type Auth = MemoryAuth;

/// Gateways and auth session handed to views through context.
#[derive(Clone)]
pub struct Backend {
    pub tasks: TaskGateway<Remote>,
    pub notes: NoteGateway<Remote>,
    pub auth: AuthSession<Auth>,
}

impl Backend {
    pub fn new() -> Self {
        let remote = Remote::new();
        let auth = AuthSession::new(Auth::new());
        let tasks = TaskGateway::new(remote.clone(), auth.state());
        let notes = NoteGateway::new(remote, auth.state());
        Backend { tasks, notes, auth }
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the application backend from context.
pub fn use_backend() -> Backend {
    use_context::<Backend>()
}

/// Provider component that owns the backend for the session duration.
/// Wrap your app with this component (outside [`crate::AuthProvider`]).
#[component]
pub fn BackendProvider(children: Element) -> Element {
    use_context_provider(Backend::new);

    rsx! {
        {children}
    }
}
