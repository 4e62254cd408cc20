use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::{
    FaHouse, FaListCheck, FaNoteSticky, FaRightFromBracket, FaUser,
};
use dioxus_free_icons::Icon;

use store::UserInfo;

/// Application sidebar: brand, user block, navigation, logout.
///
/// Navigation targets are plain keys (`"dashboard"`, `"tasks"`, `"notes"`,
/// `"profile"`) so the component stays independent of the app's router.
#[component]
pub fn AppSidebar(
    user: Option<UserInfo>,
    pending_tasks: usize,
    active: String,
    on_navigate: EventHandler<String>,
    on_logout: EventHandler<()>,
) -> Element {
    let initial = user
        .as_ref()
        .and_then(|u| u.display_name().chars().next())
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "U".to_string());

    let item_class = |key: &str| {
        if active == key {
            "nav-link active"
        } else {
            "nav-link"
        }
    };

    rsx! {
        div {
            class: "sidebar",

            div {
                class: "sidebar-header",
                button {
                    class: "sidebar-brand",
                    onclick: move |_| on_navigate.call("dashboard".to_string()),
                    "Produtiv"
                }
            }

            div {
                class: "sidebar-user",
                div { class: "user-avatar", "{initial}" }
                div {
                    class: "user-details",
                    span {
                        class: "user-email",
                        if let Some(ref u) = user {
                            "{u.email}"
                        } else {
                            "Loading..."
                        }
                    }
                    span { class: "user-plan", "Free plan" }
                }
            }

            ul {
                class: "sidebar-nav",
                li {
                    button {
                        class: item_class("dashboard"),
                        onclick: move |_| on_navigate.call("dashboard".to_string()),
                        Icon { icon: FaHouse, width: 14, height: 14 }
                        span { "Dashboard" }
                    }
                }
                li {
                    button {
                        class: item_class("tasks"),
                        onclick: move |_| on_navigate.call("tasks".to_string()),
                        Icon { icon: FaListCheck, width: 14, height: 14 }
                        span { "Tasks" }
                        if pending_tasks > 0 {
                            span { class: "nav-badge", "{pending_tasks}" }
                        }
                    }
                }
                li {
                    button {
                        class: item_class("notes"),
                        onclick: move |_| on_navigate.call("notes".to_string()),
                        Icon { icon: FaNoteSticky, width: 14, height: 14 }
                        span { "Notes" }
                    }
                }
                li {
                    button {
                        class: item_class("profile"),
                        onclick: move |_| on_navigate.call("profile".to_string()),
                        Icon { icon: FaUser, width: 14, height: 14 }
                        span { "Profile" }
                    }
                }
            }

            div {
                class: "sidebar-footer",
                button {
                    class: "nav-link logout",
                    onclick: move |_| on_logout.call(()),
                    Icon { icon: FaRightFromBracket, width: 14, height: 14 }
                    span { "Sign out" }
                }
            }
        }
    }
}
