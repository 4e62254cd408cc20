use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::FaTrashCan;
use dioxus_free_icons::Icon;

use store::{Task, TaskStatus};

/// One row in the task list: status control, title, priority badge, delete.
#[component]
pub fn TaskItem(
    task: Task,
    on_status: EventHandler<(String, TaskStatus)>,
    on_delete: EventHandler<String>,
) -> Element {
    let row_class = if task.status.is_done() {
        "task-item task-completed"
    } else {
        "task-item"
    };
    let status_id = task.id.clone();
    let delete_id = task.id.clone();

    rsx! {
        li {
            class: "{row_class}",

            div {
                class: "task-content",
                select {
                    class: "task-status",
                    value: "{task.status.as_str()}",
                    onchange: move |evt| {
                        if let Some(status) = TaskStatus::parse(&evt.value()) {
                            on_status.call((status_id.clone(), status));
                        }
                    },
                    option { value: "todo", "To do" }
                    option { value: "in-progress", "In progress" }
                    option { value: "done", "Done" }
                }
                span { class: "task-title", "{task.title}" }
                span {
                    class: "priority-badge priority-{task.priority.as_str()}",
                    "{task.priority.as_str()}"
                }
            }

            button {
                class: "task-delete",
                title: "Delete task",
                onclick: move |_| on_delete.call(delete_id.clone()),
                Icon { icon: FaTrashCan, width: 14, height: 14 }
            }
        }
    }
}
