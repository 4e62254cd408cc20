//! This crate contains all shared UI for the workspace.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_brands_icons::*;
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod backend;
pub use backend::{use_backend, Backend, BackendProvider};

mod auth;
pub use auth::{use_auth, AuthProvider, AuthState};

mod hooks;
pub use hooks::{use_notes, use_tasks, NotesHandle, TasksHandle};

mod sidebar;
pub use sidebar::AppSidebar;

mod task_item;
pub use task_item::TaskItem;

mod note_card;
pub use note_card::NoteCard;
