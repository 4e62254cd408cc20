//! Task list: add form, loading/empty states, and the list itself.

use dioxus::prelude::*;

use store::{Priority, TaskPatch, TaskStatus};
use ui::{use_backend, use_tasks, TaskItem};

use super::Shell;

#[component]
pub fn Tasks() -> Element {
    let backend = use_backend();
    let handle = use_tasks();
    let mut new_title = use_signal(String::new);
    let mut new_priority = use_signal(|| Priority::Medium);

    // Load tasks when the page opens
    let _loader = use_resource({
        let backend = backend.clone();
        move || {
            let backend = backend.clone();
            async move {
                backend.tasks.fetch_all().await;
            }
        }
    });

    let handle_add = {
        let backend = backend.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let title = new_title();
            if title.trim().is_empty() {
                return;
            }
            new_title.set(String::new());
            let priority = new_priority();
            let backend = backend.clone();
            spawn(async move {
                backend.tasks.add(&title, priority).await;
            });
        }
    };

    let handle_status = {
        let backend = backend.clone();
        move |(id, status): (String, TaskStatus)| {
            let backend = backend.clone();
            spawn(async move {
                backend.tasks.update(&id, TaskPatch::status(status)).await;
            });
        }
    };

    let handle_delete = move |id: String| {
        let backend = backend.clone();
        spawn(async move {
            backend.tasks.remove(&id).await;
        });
    };

    rsx! {
        Shell {
            active: "tasks",

            header {
                class: "page-header",
                h1 { "My Tasks" }
                p { class: "page-subtitle", "Organize your day." }
            }

            form {
                class: "add-task-form",
                onsubmit: handle_add,

                input {
                    r#type: "text",
                    class: "add-task-input",
                    placeholder: "What needs to be done today?",
                    value: new_title(),
                    oninput: move |evt| new_title.set(evt.value()),
                }
                select {
                    class: "add-task-priority",
                    value: "{new_priority().as_str()}",
                    onchange: move |evt| {
                        if let Some(priority) = Priority::parse(&evt.value()) {
                            new_priority.set(priority);
                        }
                    },
                    option { value: "low", "Low" }
                    option { value: "medium", "Medium" }
                    option { value: "high", "High" }
                }
                button { class: "add-task-submit", r#type: "submit", "Add" }
            }

            if (handle.loading)() {
                div { class: "page-loading", div { class: "spinner" } }
            } else if handle.tasks.read().is_empty() {
                div {
                    class: "empty-state",
                    h3 { "No pending tasks" }
                    p { "Add a task above to get started." }
                }
            } else {
                ul {
                    class: "task-list",
                    for task in handle.tasks.read().iter().cloned() {
                        TaskItem {
                            key: "{task.id}",
                            task,
                            on_status: handle_status.clone(),
                            on_delete: handle_delete.clone(),
                        }
                    }
                }
            }
        }
    }
}
