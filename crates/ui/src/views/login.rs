use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::auth::use_auth_state;
use crate::vm::{AuthMode, submit_label};

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let auth = use_auth_state();
    let mut mode = use_signal(|| AuthMode::SignIn);
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut google_token = use_signal(String::new);

    let session = ctx.session();
    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let session = session.clone();
        let current = mode();
        let (name, email, password) = (name(), email(), password());
        spawn(async move {
            let result = match current {
                AuthMode::SignIn => session.login(&email, &password).await,
                AuthMode::SignUp => session.register(&name, &email, &password).await,
            };
            if result.is_ok() {
                navigator.replace(Route::Home {});
            }
        });
    };

    let session = ctx.session();
    let google = move |_: MouseEvent| {
        let session = session.clone();
        let token = google_token();
        spawn(async move {
            if session.google_login(&token).await.is_ok() {
                navigator.replace(Route::Home {});
            }
        });
    };

    let state = auth();
    let current = mode();
    let busy = state.is_loading();

    rsx! {
        div { class: "page login-page",
            header { class: "view-header",
                h2 { class: "view-title", "{current.title()}" }
            }
            div { class: "view-divider" }
            if let Some(user) = state.user.as_ref() {
                p { class: "login-signed-in", "Signed in as {user.email}" }
            }
            form { class: "login-form", onsubmit: submit,
                if current == AuthMode::SignUp {
                    label { r#for: "name", "Name" }
                    input {
                        id: "name",
                        r#type: "text",
                        value: "{name}",
                        oninput: move |evt| name.set(evt.value()),
                    }
                }
                label { r#for: "email", "Email" }
                input {
                    id: "email",
                    r#type: "email",
                    value: "{email}",
                    oninput: move |evt| email.set(evt.value()),
                }
                label { r#for: "password", "Password" }
                input {
                    id: "password",
                    r#type: "password",
                    value: "{password}",
                    oninput: move |evt| password.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy,
                    "{submit_label(current, &state)}"
                }
            }
            if let Some(message) = state.error.as_ref() {
                p { class: "error", "{message}" }
            }
            button {
                class: "btn btn-link",
                r#type: "button",
                onclick: move |_| mode.set(current.toggled()),
                "{current.toggle_label()}"
            }
            div { class: "view-divider" }
            div { class: "login-google",
                label { r#for: "google-token", "Google ID token" }
                input {
                    id: "google-token",
                    r#type: "text",
                    value: "{google_token}",
                    oninput: move |evt| google_token.set(evt.value()),
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    disabled: busy,
                    onclick: google,
                    "Continue with Google"
                }
            }
        }
    }
}
