use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::auth::{use_auth, use_backend};
use crate::backend::BackendError;
use crate::notify::{use_loader, use_toasts};

#[component]
pub fn Login() -> impl IntoView {
    let auth = use_auth();
    let backend = use_backend();
    let loader = use_loader();
    let toasts = use_toasts();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    // Already signed in: straight to the dashboard.
    {
        let navigate = navigate.clone();
        Effect::new(move |_| {
            if auth.signed_in() {
                navigate("/dashboard", Default::default());
            }
        });
    }

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let address = email.get().trim().to_string();
        let secret = password.get();
        if address.is_empty() || secret.is_empty() {
            toasts.error("All fields are required.");
            return;
        }
        let backend = backend.clone();
        let navigate = navigate.clone();
        busy.set(true);
        loader.show();
        spawn_local(async move {
            match backend.login(&address, &secret).await {
                Ok(session) => {
                    auth.session.try_set(Some(session));
                    toasts.success("Welcome back.");
                    navigate("/dashboard", Default::default());
                }
                Err(BackendError::Unauthorized) | Err(BackendError::Status(_)) => {
                    toasts.error("Invalid email or password.");
                }
                Err(e) => {
                    leptos::logging::error!("login failed: {e}");
                    toasts.error("Could not sign in. Please try again.");
                }
            }
            busy.try_set(false);
            loader.hide();
        });
    };

    view! {
        <section class="login">
            <h1>"Sign in"</h1>
            <form on:submit=submit>
                <label class="editor-field">
                    "Email"
                    <input
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </label>
                <label class="editor-field">
                    "Password"
                    <input
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>
                <button class="button-primary" type="submit" prop:disabled=move || busy.get()>
                    "Sign in"
                </button>
            </form>
        </section>
    }
}
