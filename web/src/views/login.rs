//! Login page with email/password form and federated sign-in.

use dioxus::prelude::*;

use ui::icons::FaGoogle;
use ui::{use_auth, use_backend, Icon};

use crate::Route;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let backend = use_backend();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);

    // If already logged in, redirect to the dashboard
    use_effect(move || {
        if !auth().loading && auth().user.is_some() {
            nav.replace(Route::Dashboard {});
        }
    });

    let handle_login = {
        let backend = backend.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let backend = backend.clone();
            spawn(async move {
                backend.auth.sign_in(&email(), &password()).await;
            });
        }
    };

    let handle_google = move |_| {
        let backend = backend.clone();
        spawn(async move {
            backend.auth.sign_in_with("google").await;
        });
    };

    rsx! {
        div {
            class: "auth-page",

            div {
                class: "auth-card",
                h1 { class: "auth-brand", "Produtiv" }
                h2 { class: "auth-heading", "Login" }

                if let Some(err) = auth().error {
                    div { class: "auth-error", "{err}" }
                }

                form {
                    onsubmit: handle_login,
                    class: "auth-form",

                    input {
                        r#type: "email",
                        class: "auth-input",
                        placeholder: "Email",
                        value: email(),
                        oninput: move |evt| email.set(evt.value()),
                    }
                    input {
                        r#type: "password",
                        class: "auth-input",
                        placeholder: "Password",
                        value: password(),
                        oninput: move |evt| password.set(evt.value()),
                    }
                    button {
                        class: "auth-submit",
                        r#type: "submit",
                        disabled: auth().loading,
                        if auth().loading { "Signing in..." } else { "Sign in" }
                    }
                }

                div { class: "auth-divider", "or" }

                button {
                    class: "auth-google",
                    onclick: handle_google,
                    Icon { icon: FaGoogle, width: 14, height: 14 }
                    span { "Continue with Google" }
                }

                p {
                    class: "auth-switch",
                    "Don't have an account? "
                    Link { to: Route::Signup {}, "Sign up" }
                }
            }
        }
    }
}
