//! Bridges from the synchronized list stores into Dioxus signals.
//!
//! Each hook subscribes to the store's snapshot channel once and keeps a pair
//! of signals (items, loading flag) in sync with it, so optimistic mutations
//! applied by the gateways show up in the view immediately.

use dioxus::prelude::*;
use futures::StreamExt;

use store::{Note, Task};

use crate::backend::use_backend;

#[derive(Clone, Copy)]
pub struct TasksHandle {
    pub tasks: Signal<Vec<Task>>,
    pub loading: Signal<bool>,
}

/// Subscribe to the task list store.
pub fn use_tasks() -> TasksHandle {
    let backend = use_backend();
    let mut tasks = use_signal(Vec::<Task>::new);
    let mut loading = use_signal(|| false);

    use_hook(move || {
        let mut rx = backend.tasks.store().subscribe();
        spawn(async move {
            while let Some(snapshot) = rx.next().await {
                tasks.set(snapshot.items.as_ref().clone());
                loading.set(snapshot.loading);
            }
        });
    });

    TasksHandle { tasks, loading }
}

#[derive(Clone, Copy)]
pub struct NotesHandle {
    pub notes: Signal<Vec<Note>>,
    pub loading: Signal<bool>,
}

/// Subscribe to the note list store.
pub fn use_notes() -> NotesHandle {
    let backend = use_backend();
    let mut notes = use_signal(Vec::<Note>::new);
    let mut loading = use_signal(|| false);

    use_hook(move || {
        let mut rx = backend.notes.store().subscribe();
        spawn(async move {
            while let Some(snapshot) = rx.next().await {
                notes.set(snapshot.items.as_ref().clone());
                loading.set(snapshot.loading);
            }
        });
    });

    NotesHandle { notes, loading }
}
