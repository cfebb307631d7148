//! Create/edit form for a blog post: title, optional thumbnail and a
//! markdown textarea with a snippet toolbar, live preview and fullscreen
//! mode. Caret math happens in byte offsets via `editor_core`; the UTF-16
//! conversions at the textarea boundary are the only DOM-facing part.

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map};

use wasm_bindgen_futures::JsFuture;

use crate::auth::{use_auth, use_backend};
use crate::backend::BackendError;
use crate::editor_core::{byte_idx_to_utf16, insert_snippet, utf16_to_byte_idx, Selection, Snippet};
use crate::markdown::MarkdownView;
use crate::model::Blog;
use crate::notify::{use_loader, use_toasts};
use crate::pages::now_secs;

const MAX_THUMBNAIL_BYTES: f64 = 5.0 * 1024.0 * 1024.0;

#[component]
pub fn BlogEditor(#[prop(optional)] is_edit: bool) -> impl IntoView {
    let auth = use_auth();
    let backend = use_backend();
    let loader = use_loader();
    let toasts = use_toasts();
    let params = use_params_map();
    let navigate = use_navigate();

    let title = RwSignal::new(String::new());
    let content = RwSignal::new(String::new());
    let thumbnail = RwSignal::new(None::<Vec<u8>>);
    let existing_thumbnail = RwSignal::new(None::<String>);
    let show_preview = RwSignal::new(false);
    let fullscreen = RwSignal::new(false);
    let saving = RwSignal::new(false);

    let textarea: NodeRef<html::Textarea> = NodeRef::new();

    let blog_id = Memo::new(move |_| {
        if is_edit {
            params.with(|p| p.get("id").unwrap_or_default())
        } else {
            String::new()
        }
    });

    // Edit mode starts from the stored post.
    if is_edit {
        let backend = backend.clone();
        let navigate = navigate.clone();
        Effect::new(move |_| {
            let id = blog_id.get();
            if id.is_empty() {
                return;
            }
            let backend = backend.clone();
            let navigate = navigate.clone();
            loader.show();
            spawn_local(async move {
                match backend.fetch_by_id::<Blog>("blogs", &id).await {
                    Ok(blog) => {
                        title.try_set(blog.title);
                        content.try_set(blog.content);
                        existing_thumbnail.try_set(blog.thumbnail);
                    }
                    Err(BackendError::NotFound) => {
                        toasts.error("That blog no longer exists.");
                        navigate("/dashboard", Default::default());
                    }
                    Err(e) => {
                        leptos::logging::error!("blog load failed: {e}");
                        toasts.error("Could not load the blog for editing.");
                    }
                }
                loader.hide();
            });
        });
    }

    let insert = move |snippet: Snippet| {
        let Some(area) = textarea.get() else {
            return;
        };
        let text = area.value();
        let start = area.selection_start().ok().flatten().unwrap_or(0);
        let end = area.selection_end().ok().flatten().unwrap_or(start);
        let selection = Selection::new(
            utf16_to_byte_idx(&text, start),
            utf16_to_byte_idx(&text, end),
        );
        let (updated, caret) = insert_snippet(&text, selection, snippet.text());
        let caret16 = byte_idx_to_utf16(&updated, caret);
        area.set_value(&updated);
        content.set(updated);
        let _ = area.focus();
        let _ = area.set_selection_range(caret16, caret16);
    };

    let on_file = move |ev: web_sys::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            thumbnail.set(None);
            return;
        };
        if file.size() > MAX_THUMBNAIL_BYTES {
            toasts.error("Image must be 5 MB or smaller.");
            input.set_value("");
            thumbnail.set(None);
            return;
        }
        spawn_local(async move {
            match JsFuture::from(file.array_buffer()).await {
                Ok(buffer) => {
                    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
                    thumbnail.try_set(Some(bytes));
                }
                Err(_) => {
                    toasts.error("Could not read the selected image.");
                }
            }
        });
    };

    let save = {
        let backend = backend.clone();
        let navigate = navigate.clone();
        move |_| {
            if saving.get() {
                return;
            }
            let post_title = title.get().trim().to_string();
            let post_content = content.get();
            if post_title.is_empty() || post_content.trim().is_empty() {
                toasts.error("All fields are required.");
                return;
            }
            let Some(session) = auth.user() else {
                toasts.error("Sign in to publish.");
                return;
            };
            let backend = backend.clone();
            let navigate = navigate.clone();
            let id = blog_id.get();
            let attachment = thumbnail.get();
            saving.set(true);
            loader.show();
            spawn_local(async move {
                let result = if is_edit {
                    backend
                        .update_blog(&id, &post_title, &post_content, attachment)
                        .await
                        .map(|()| "Changes saved.")
                } else {
                    backend
                        .create_blog(&session, &post_title, &post_content, now_secs(), attachment)
                        .await
                        .map(|_| "Blog published.")
                };
                match result {
                    Ok(message) => {
                        toasts.success(message);
                        navigate("/dashboard", Default::default());
                    }
                    Err(e) => {
                        leptos::logging::error!("blog save failed: {e}");
                        toasts.error("Could not save the blog. Please try again.");
                    }
                }
                saving.try_set(false);
                loader.hide();
            });
        }
    };

    let editor_class = move || {
        if fullscreen.get() {
            "blog-editor editor-fullscreen"
        } else {
            "blog-editor"
        }
    };

    view! {
        <section class=editor_class>
            <header class="editor-head">
                <h1>{if is_edit { "Edit blog" } else { "Create blog" }}</h1>
                <div class="editor-modes">
                    <button
                        class="editor-toggle"
                        on:click=move |_| show_preview.update(|p| *p = !*p)
                    >
                        {move || if show_preview.get() { "Write" } else { "Preview" }}
                    </button>
                    <button
                        class="editor-toggle"
                        on:click=move |_| fullscreen.update(|f| *f = !*f)
                    >
                        {move || if fullscreen.get() { "Exit fullscreen" } else { "Fullscreen" }}
                    </button>
                </div>
            </header>
            <label class="editor-field">
                "Title"
                <input
                    type="text"
                    placeholder="Post title"
                    prop:value=move || title.get()
                    on:input=move |ev| title.set(event_target_value(&ev))
                />
            </label>
            <label class="editor-field">
                "Thumbnail"
                <input type="file" accept="image/*" on:change=on_file />
                {move || {
                    existing_thumbnail
                        .get()
                        .filter(|_| thumbnail.with(Option::is_none))
                        .map(|url| {
                            view! { <img class="editor-thumb" src=url alt="current thumbnail" /> }
                        })
                }}
            </label>
            {move || {
                if show_preview.get() {
                    view! {
                        <div class="editor-preview">
                            <h2>{title.get()}</h2>
                            <MarkdownView content={Signal::<String>::from(content)} />
                        </div>
                    }
                        .into_any()
                } else {
                    view! {
                        <div class="editor-pane">
                            <div class="editor-toolbar">
                                {Snippet::ALL
                                    .into_iter()
                                    .map(|snippet| {
                                        view! {
                                            <button
                                                class="toolbar-button"
                                                title=snippet.label()
                                                on:click=move |_| insert(snippet)
                                            >
                                                {snippet.label()}
                                            </button>
                                        }
                                    })
                                    .collect::<Vec<_>>()}
                            </div>
                            <textarea
                                node_ref=textarea
                                class="editor-textarea"
                                placeholder="Write your post in markdown"
                                prop:value=move || content.get()
                                on:input=move |ev| content.set(event_target_value(&ev))
                            ></textarea>
                        </div>
                    }
                        .into_any()
                }
            }}
            <div class="editor-actions">
                <button
                    class="button-primary"
                    prop:disabled=move || saving.get()
                    on:click=save
                >
                    {if is_edit { "Save changes" } else { "Publish" }}
                </button>
                <a class="button-secondary" href="/dashboard">"Cancel"</a>
            </div>
        </section>
    }
}
