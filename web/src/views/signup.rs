//! Registration page with email/password form.

use dioxus::prelude::*;

use ui::{use_auth, use_backend};

use crate::Route;

/// Signup page component.
#[component]
pub fn Signup() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let backend = use_backend();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut form_error = use_signal(|| Option::<String>::None);

    // If already logged in, redirect to the dashboard
    use_effect(move || {
        if !auth().loading && auth().user.is_some() {
            nav.replace(Route::Dashboard {});
        }
    });

    let handle_signup = move |evt: FormEvent| {
        evt.prevent_default();
        form_error.set(None);

        let e = email().trim().to_string();
        let p = password();
        if e.is_empty() || !e.contains('@') {
            form_error.set(Some("Please enter a valid email".to_string()));
            return;
        }
        if p.len() < 6 {
            form_error.set(Some("Password must be at least 6 characters".to_string()));
            return;
        }
        if p != confirm_password() {
            form_error.set(Some("Passwords do not match".to_string()));
            return;
        }

        let backend = backend.clone();
        spawn(async move {
            backend.auth.sign_up(&e, &p).await;
        });
    };

    rsx! {
        div {
            class: "auth-page",

            div {
                class: "auth-card",
                h1 { class: "auth-brand", "Produtiv" }
                h2 { class: "auth-heading", "Create account" }

                if let Some(err) = form_error().or(auth().error) {
                    div { class: "auth-error", "{err}" }
                }

                form {
                    onsubmit: handle_signup,
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
                        placeholder: "Password (min 6 characters)",
                        value: password(),
                        oninput: move |evt| password.set(evt.value()),
                    }
                    input {
                        r#type: "password",
                        class: "auth-input",
                        placeholder: "Confirm password",
                        value: confirm_password(),
                        oninput: move |evt| confirm_password.set(evt.value()),
                    }
                    button {
                        class: "auth-submit",
                        r#type: "submit",
                        disabled: auth().loading,
                        if auth().loading { "Creating account..." } else { "Sign up" }
                    }
                }

                p {
                    class: "auth-switch",
                    "Already have an account? "
                    Link { to: Route::Login {}, "Sign in" }
                }
            }
        }
    }
}
