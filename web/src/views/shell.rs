//! Protected layout: auth guard plus sidebar around the page content.

use dioxus::prelude::*;

use ui::{use_auth, use_backend, use_tasks, AppSidebar};

use crate::Route;

#[component]
pub fn Shell(active: String, children: Element) -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let backend = use_backend();
    let tasks = use_tasks();

    if auth().loading {
        return rsx! {
            div { class: "page-loading", div { class: "spinner" } }
        };
    }
    if auth().user.is_none() {
        nav.replace(Route::Login {});
        return rsx! {};
    }

    let pending = tasks
        .tasks
        .read()
        .iter()
        .filter(|t| !t.status.is_done())
        .count();

    rsx! {
        div {
            class: "app-layout",

            AppSidebar {
                user: auth().user,
                pending_tasks: pending,
                active: active.clone(),
                on_navigate: move |target: String| {
                    match target.as_str() {
                        "tasks" => { nav.push(Route::Tasks {}); }
                        "notes" => { nav.push(Route::Notes {}); }
                        "profile" => { nav.push(Route::Profile {}); }
                        _ => { nav.push(Route::Dashboard {}); }
                    }
                },
                on_logout: move |_| {
                    let backend = backend.clone();
                    spawn(async move {
                        backend.auth.sign_out().await;
                    });
                },
            }

            main { class: "app-main", {children} }
        }
    }
}
