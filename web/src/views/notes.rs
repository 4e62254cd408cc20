//! Quick notes: expandable capture card plus the notes grid.

use dioxus::prelude::*;

use store::NotePatch;
use ui::{use_backend, use_notes, NoteCard};

use super::Shell;

#[component]
pub fn Notes() -> Element {
    let backend = use_backend();
    let handle = use_notes();
    let mut title = use_signal(String::new);
    let mut content = use_signal(String::new);
    let mut expanded = use_signal(|| false);

    // Load notes when the page opens
    let _loader = use_resource({
        let backend = backend.clone();
        move || {
            let backend = backend.clone();
            async move {
                backend.notes.fetch_all().await;
            }
        }
    });

    let handle_add = {
        let backend = backend.clone();
        move |_| {
            let t = title();
            let c = content();
            if t.trim().is_empty() && c.trim().is_empty() {
                return;
            }
            title.set(String::new());
            content.set(String::new());
            expanded.set(false);
            let backend = backend.clone();
            spawn(async move {
                backend.notes.add(&t, &c).await;
            });
        }
    };

    let handle_toggle_pin = {
        let backend = backend.clone();
        move |(id, pinned): (String, bool)| {
            let backend = backend.clone();
            spawn(async move {
                backend.notes.update(&id, NotePatch::pinned(pinned)).await;
            });
        }
    };

    let handle_delete = move |id: String| {
        let backend = backend.clone();
        spawn(async move {
            backend.notes.remove(&id).await;
        });
    };

    rsx! {
        Shell {
            active: "notes",

            header {
                class: "page-header",
                h1 { "Quick Notes" }
                p { class: "page-subtitle", "Ideas, reminders, and fragments." }
            }

            div {
                class: "note-capture",
                if expanded() {
                    input {
                        r#type: "text",
                        class: "note-capture-title",
                        placeholder: "Title",
                        value: title(),
                        oninput: move |evt| title.set(evt.value()),
                    }
                }
                textarea {
                    class: "note-capture-content",
                    placeholder: "Take a note...",
                    rows: if expanded() { 3 } else { 1 },
                    value: content(),
                    onclick: move |_| expanded.set(true),
                    oninput: move |evt| content.set(evt.value()),
                }
                if expanded() {
                    div {
                        class: "note-capture-actions",
                        button {
                            class: "note-capture-cancel",
                            onclick: move |_| {
                                expanded.set(false);
                                title.set(String::new());
                                content.set(String::new());
                            },
                            "Cancel"
                        }
                        button {
                            class: "note-capture-save",
                            onclick: handle_add,
                            "Save"
                        }
                    }
                }
            }

            if (handle.loading)() {
                div { class: "page-loading", div { class: "spinner" } }
            } else if handle.notes.read().is_empty() {
                div {
                    class: "empty-state",
                    p { "No notes yet." }
                }
            } else {
                div {
                    class: "notes-grid",
                    for note in handle.notes.read().iter().cloned() {
                        NoteCard {
                            key: "{note.id}",
                            note,
                            on_toggle_pin: handle_toggle_pin.clone(),
                            on_delete: handle_delete.clone(),
                        }
                    }
                }
            }
        }
    }
}
