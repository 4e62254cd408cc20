use dioxus::prelude::*;

use ui::{AuthProvider, BackendProvider};
use views::{Dashboard, Login, Notes, Profile, Signup, Tasks};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[route("/login")]
    Login {},
    #[route("/signup")]
    Signup {},
    #[route("/dashboard")]
    Dashboard {},
    #[route("/tasks")]
    Tasks {},
    #[route("/notes")]
    Notes {},
    #[route("/profile")]
    Profile {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        BackendProvider {
            AuthProvider {
                Router::<Route> {}
            }
        }
    }
}

/// Redirect `/` to the dashboard; the shell bounces signed-out users to login.
#[component]
fn Root() -> Element {
    let nav = use_navigator();
    nav.replace(Route::Dashboard {});
    rsx! {}
}
