//! Dashboard: greeting plus a quick summary of tasks and notes.

use dioxus::prelude::*;

use ui::{use_auth, use_backend, use_notes, use_tasks};

use super::Shell;

#[component]
pub fn Dashboard() -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let tasks = use_tasks();
    let notes = use_notes();

    // Load both lists on mount
    let _loader = use_resource(move || {
        let backend = backend.clone();
        async move {
            backend.tasks.fetch_all().await;
            backend.notes.fetch_all().await;
        }
    });

    let pending = tasks
        .tasks
        .read()
        .iter()
        .filter(|t| !t.status.is_done())
        .count();
    let done = tasks.tasks.read().len() - pending;
    let note_count = notes.notes.read().len();
    let name = auth()
        .user
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();

    rsx! {
        Shell {
            active: "dashboard",

            header {
                class: "page-header",
                h1 { "Welcome, {name}" }
                p { class: "page-subtitle", "Your productivity home." }
            }

            div {
                class: "stats-grid",
                div {
                    class: "stat-card",
                    span { class: "stat-value", "{pending}" }
                    span { class: "stat-label", "Pending tasks" }
                }
                div {
                    class: "stat-card",
                    span { class: "stat-value", "{done}" }
                    span { class: "stat-label", "Completed tasks" }
                }
                div {
                    class: "stat-card",
                    span { class: "stat-value", "{note_count}" }
                    span { class: "stat-label", "Notes" }
                }
            }
        }
    }
}
