//! Profile page: identity header, display-name form, password change.

use dioxus::prelude::*;

use ui::{use_auth, use_backend};

use super::Shell;

#[derive(Clone, PartialEq)]
enum Feedback {
    Success(String),
    Error(String),
}

#[component]
pub fn Profile() -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let mut display_name = use_signal(String::new);
    let mut new_password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut saving = use_signal(|| false);
    let mut message = use_signal(|| Option::<Feedback>::None);

    // Preload the current name when the user is available
    use_effect(move || {
        if let Some(user) = auth().user {
            if let Some(name) = user.name {
                display_name.set(name);
            }
        }
    });

    let user = auth().user;
    let is_local = user
        .as_ref()
        .map(|u| u.provider == "local")
        .unwrap_or(false);
    let initial = user
        .as_ref()
        .and_then(|u| u.display_name().chars().next())
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();
    let heading = user
        .as_ref()
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();
    let email = user.as_ref().map(|u| u.email.clone()).unwrap_or_default();
    let user_id = user.as_ref().map(|u| u.id.clone()).unwrap_or_default();

    let handle_save_profile = {
        let backend = backend.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let backend = backend.clone();
            let name = display_name();
            spawn(async move {
                saving.set(true);
                message.set(None);
                match backend.auth.update_profile(&name).await {
                    Ok(()) => message.set(Some(Feedback::Success(
                        "Profile updated.".to_string(),
                    ))),
                    Err(err) => message.set(Some(Feedback::Error(err.to_string()))),
                }
                saving.set(false);
            });
        }
    };

    let handle_change_password = move |evt: FormEvent| {
        evt.prevent_default();
        if new_password() != confirm_password() {
            message.set(Some(Feedback::Error("Passwords do not match.".to_string())));
            return;
        }
        let backend = backend.clone();
        let password = new_password();
        spawn(async move {
            saving.set(true);
            message.set(None);
            match backend.auth.update_password(&password).await {
                Ok(()) => {
                    new_password.set(String::new());
                    confirm_password.set(String::new());
                    message.set(Some(Feedback::Success(
                        "Password changed. Use the new password next login.".to_string(),
                    )));
                }
                Err(err) => message.set(Some(Feedback::Error(err.to_string()))),
            }
            saving.set(false);
        });
    };

    rsx! {
        Shell {
            active: "profile",

            div {
                class: "profile-header",
                div { class: "profile-avatar", "{initial}" }
                div {
                    class: "profile-info",
                    h2 { "{heading}" }
                    p { "{email}" }
                    span {
                        class: "provider-badge",
                        if is_local { "Email account" } else { "Federated account" }
                    }
                }
            }

            match message() {
                Some(Feedback::Success(text)) => rsx! {
                    div { class: "alert alert-success", "{text}" }
                },
                Some(Feedback::Error(text)) => rsx! {
                    div { class: "alert alert-error", "{text}" }
                },
                None => rsx! {},
            }

            section {
                class: "profile-section",
                h3 { "Personal information" }

                form {
                    onsubmit: handle_save_profile,

                    label { class: "form-label", "Display name" }
                    input {
                        r#type: "text",
                        class: "form-input",
                        placeholder: "What should we call you?",
                        value: display_name(),
                        oninput: move |evt| display_name.set(evt.value()),
                    }

                    label { class: "form-label", "Email (read-only)" }
                    input {
                        r#type: "email",
                        class: "form-input",
                        value: "{email}",
                        disabled: true,
                    }

                    label { class: "form-label", "User id" }
                    input {
                        r#type: "text",
                        class: "form-input mono",
                        value: "{user_id}",
                        disabled: true,
                    }

                    button {
                        class: "form-submit",
                        r#type: "submit",
                        disabled: saving(),
                        if saving() { "Saving..." } else { "Save changes" }
                    }
                }
            }

            // Password management applies to email accounts only
            if is_local {
                section {
                    class: "profile-section",
                    h3 { "Security" }

                    form {
                        onsubmit: handle_change_password,

                        label { class: "form-label", "New password" }
                        input {
                            r#type: "password",
                            class: "form-input",
                            placeholder: "Min 6 characters",
                            value: new_password(),
                            oninput: move |evt| new_password.set(evt.value()),
                        }

                        label { class: "form-label", "Confirm new password" }
                        input {
                            r#type: "password",
                            class: "form-input",
                            placeholder: "Repeat the password",
                            value: confirm_password(),
                            oninput: move |evt| confirm_password.set(evt.value()),
                        }

                        button {
                            class: "form-submit",
                            r#type: "submit",
                            disabled: saving(),
                            "Update password"
                        }
                    }
                }
            }
        }
    }
}
