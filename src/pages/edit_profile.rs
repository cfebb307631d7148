//! Profile settings: display name, profile photo and password. A display
//! name change is fanned out to the user document and to the author field of
//! every post the user has written, so old posts never show a stale byline.

use leptos::prelude::*;
use leptos::task::spawn_local;

use serde_json::{json, Value};
use wasm_bindgen_futures::JsFuture;

use crate::auth::{use_auth, use_backend};
use crate::backend::{profile_photo_path, Backend, BackendError, QueryOp, Result};
use crate::model::{Blog, Session};
use crate::notify::{use_loader, use_toasts};

const MAX_PHOTO_BYTES: f64 = 5.0 * 1024.0 * 1024.0;

async fn rename_author(backend: &Backend, session: &Session, name: &str) -> Result<()> {
    let patch = json!({ "displayName": name });
    backend.update_auth_profile(&patch).await?;
    backend.update("users", &session.id, &patch).await?;
    let posts: Vec<Blog> = backend
        .query("blogs", "userId", QueryOp::Eq, &session.id)
        .await?;
    for post in posts {
        backend
            .update("blogs", &post.id, &json!({ "author": name }))
            .await?;
    }
    Ok(())
}

async fn set_photo(backend: &Backend, session: &Session, url: Option<&str>) -> Result<()> {
    let value = match url {
        Some(url) => Value::String(url.to_string()),
        None => Value::Null,
    };
    let patch = json!({ "photoUrl": value });
    backend.update_auth_profile(&patch).await?;
    backend.update("users", &session.id, &patch).await
}

#[component]
pub fn EditProfile() -> impl IntoView {
    let auth = use_auth();
    let backend = use_backend();
    let loader = use_loader();
    let toasts = use_toasts();

    let display_name = RwSignal::new(String::new());
    let current_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());

    // Seed the form from the session once the probe answers.
    Effect::new(move |_| {
        if let Some(session) = auth.session.get() {
            display_name.set(session.display_name);
        } else if auth.resolved.get() {
            let navigate = leptos_router::hooks::use_navigate();
            navigate("/login", Default::default());
        }
    });

    let save_name = {
        let backend = backend.clone();
        move |_| {
            let Some(session) = auth.user() else {
                return;
            };
            let name = display_name.get().trim().to_string();
            if name.is_empty() {
                toasts.error("Display name cannot be empty.");
                return;
            }
            let backend = backend.clone();
            loader.show();
            spawn_local(async move {
                match rename_author(&backend, &session, &name).await {
                    Ok(()) => {
                        auth.session.try_update(|s| {
                            if let Some(session) = s {
                                session.display_name = name;
                            }
                        });
                        toasts.success("Profile updated.");
                    }
                    Err(e) => {
                        leptos::logging::error!("profile update failed: {e}");
                        toasts.error("Could not update your profile.");
                    }
                }
                loader.hide();
            });
        }
    };

    let upload_photo = {
        let backend = backend.clone();
        move |ev: web_sys::Event| {
            let Some(session) = auth.user() else {
                return;
            };
            let input: web_sys::HtmlInputElement = event_target(&ev);
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            if file.size() > MAX_PHOTO_BYTES {
                toasts.error("Image must be 5 MB or smaller.");
                input.set_value("");
                return;
            }
            let backend = backend.clone();
            loader.show();
            spawn_local(async move {
                let outcome = async {
                    let buffer = JsFuture::from(file.array_buffer())
                        .await
                        .map_err(|_| BackendError::Network("file read failed".to_string()))?;
                    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
                    let url = backend
                        .upload_file(&profile_photo_path(&session.id), bytes)
                        .await?;
                    set_photo(&backend, &session, Some(&url)).await?;
                    Ok::<String, BackendError>(url)
                }
                .await;
                match outcome {
                    Ok(url) => {
                        auth.session.try_update(|s| {
                            if let Some(session) = s {
                                session.photo_url = Some(url);
                            }
                        });
                        toasts.success("Photo updated.");
                    }
                    Err(e) => {
                        leptos::logging::error!("photo upload failed: {e}");
                        toasts.error("Could not upload the photo.");
                    }
                }
                loader.hide();
            });
        }
    };

    let remove_photo = {
        let backend = backend.clone();
        move |_| {
            let Some(session) = auth.user() else {
                return;
            };
            let backend = backend.clone();
            loader.show();
            spawn_local(async move {
                let outcome = async {
                    backend
                        .delete_file(&profile_photo_path(&session.id))
                        .await?;
                    set_photo(&backend, &session, None).await
                }
                .await;
                match outcome {
                    Ok(()) => {
                        auth.session.try_update(|s| {
                            if let Some(session) = s {
                                session.photo_url = None;
                            }
                        });
                        toasts.success("Photo removed.");
                    }
                    Err(e) => {
                        leptos::logging::error!("photo remove failed: {e}");
                        toasts.error("Could not remove the photo.");
                    }
                }
                loader.hide();
            });
        }
    };

    let change_password = {
        let backend = backend.clone();
        move |_| {
            let current = current_password.get();
            let new = new_password.get();
            let confirm = confirm_password.get();
            if current.is_empty() || new.is_empty() || confirm.is_empty() {
                toasts.error("All fields are required.");
                return;
            }
            if new != confirm {
                toasts.error("New passwords do not match.");
                return;
            }
            let backend = backend.clone();
            loader.show();
            spawn_local(async move {
                match backend.change_password(&current, &new).await {
                    Ok(()) => {
                        current_password.try_set(String::new());
                        new_password.try_set(String::new());
                        confirm_password.try_set(String::new());
                        toasts.success("Password changed.");
                    }
                    Err(BackendError::Unauthorized) => {
                        toasts.error("Current password is incorrect.");
                    }
                    Err(e) => {
                        leptos::logging::error!("password change failed: {e}");
                        toasts.error("Could not change the password.");
                    }
                }
                loader.hide();
            });
        }
    };

    view! {
        <section class="edit-profile">
            <h1>"Edit profile"</h1>
            <div class="profile-photo">
                {move || {
                    auth.user()
                        .and_then(|s| s.photo_url)
                        .map(|url| view! { <img class="profile-avatar" src=url alt="profile photo" /> })
                }}
                <label class="editor-field">
                    "Profile photo"
                    <input type="file" accept="image/*" on:change=upload_photo.clone() />
                </label>
                {move || {
                    auth.user()
                        .is_some_and(|s| s.photo_url.is_some())
                        .then(|| {
                            view! {
                                <button class="button-secondary" on:click=remove_photo.clone()>
                                    "Remove photo"
                                </button>
                            }
                        })
                }}
            </div>
            <div class="profile-name">
                <label class="editor-field">
                    "Display name"
                    <input
                        type="text"
                        prop:value=move || display_name.get()
                        on:input=move |ev| display_name.set(event_target_value(&ev))
                    />
                </label>
                <button class="button-primary" on:click=save_name>"Save"</button>
            </div>
            <div class="profile-password">
                <h2>"Change password"</h2>
                <label class="editor-field">
                    "Current password"
                    <input
                        type="password"
                        prop:value=move || current_password.get()
                        on:input=move |ev| current_password.set(event_target_value(&ev))
                    />
                </label>
                <label class="editor-field">
                    "New password"
                    <input
                        type="password"
                        prop:value=move || new_password.get()
                        on:input=move |ev| new_password.set(event_target_value(&ev))
                    />
                </label>
                <label class="editor-field">
                    "Confirm new password"
                    <input
                        type="password"
                        prop:value=move || confirm_password.get()
                        on:input=move |ev| confirm_password.set(event_target_value(&ev))
                    />
                </label>
                <button class="button-primary" on:click=change_password>"Change password"</button>
            </div>
        </section>
    }
}
