use chrono::DateTime;
use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::{FaThumbtack, FaTrashCan};
use dioxus_free_icons::Icon;

use store::Note;

/// One card in the notes grid: pin toggle, title, content, creation date.
#[component]
pub fn NoteCard(
    note: Note,
    on_toggle_pin: EventHandler<(String, bool)>,
    on_delete: EventHandler<String>,
) -> Element {
    let card_class = if note.pinned {
        "note-card pinned"
    } else {
        "note-card"
    };
    let created = DateTime::from_timestamp_millis(note.created_at)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let pin_id = note.id.clone();
    let pin_next = !note.pinned;
    let delete_id = note.id.clone();

    rsx! {
        div {
            class: "{card_class}",

            button {
                class: if note.pinned { "note-pin active" } else { "note-pin" },
                title: if note.pinned { "Unpin note" } else { "Pin note" },
                onclick: move |_| on_toggle_pin.call((pin_id.clone(), pin_next)),
                Icon { icon: FaThumbtack, width: 12, height: 12 }
            }

            if !note.title.is_empty() {
                h3 { class: "note-title", "{note.title}" }
            }
            p { class: "note-content", "{note.content}" }

            div {
                class: "note-footer",
                small { class: "note-date", "{created}" }
                button {
                    class: "note-delete",
                    title: "Delete note",
                    onclick: move |_| on_delete.call(delete_id.clone()),
                    Icon { icon: FaTrashCan, width: 12, height: 12 }
                }
            }
        }
    }
}
