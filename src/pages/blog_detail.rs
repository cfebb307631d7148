//! Blog detail: the rendered post, author byline, and the comment thread.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;

use serde_json::json;

use crate::auth::{use_auth, use_backend};
use crate::backend::{BackendError, QueryOp};
use crate::components::{Breadcrumbs, Crumb, EmptyState};
use crate::markdown::MarkdownView;
use crate::model::{format_date, format_relative, Blog, Comment, UserProfile};
use crate::notify::{use_loader, use_toasts};
use crate::pages::now_secs;

#[derive(Clone, Debug, Default, PartialEq)]
enum BlogState {
    #[default]
    Loading,
    Missing,
    Failed,
    Loaded(Blog),
}

/// Only a confirmed 404 means the post is gone; anything else is a fetch
/// failure and must not render the not-found view.
fn state_for_error(error: &BackendError) -> BlogState {
    match error {
        BackendError::NotFound => BlogState::Missing,
        _ => BlogState::Failed,
    }
}

#[component]
pub fn BlogDetail() -> impl IntoView {
    let backend = use_backend();
    let loader = use_loader();
    let toasts = use_toasts();
    let params = use_params_map();
    let id = Memo::new(move |_| params.with(|p| p.get("id").unwrap_or_default()));

    let state = RwSignal::new(BlogState::default());
    let author = RwSignal::new(None::<UserProfile>);
    let comments = RwSignal::new(Vec::<Comment>::new());

    Effect::new(move |_| {
        let blog_id = id.get();
        if blog_id.is_empty() {
            return;
        }
        let backend = backend.clone();
        state.set(BlogState::Loading);
        loader.show();
        spawn_local(async move {
            match backend.fetch_by_id::<Blog>("blogs", &blog_id).await {
                Ok(blog) => {
                    let author_id = blog.user_id.clone();
                    state.try_set(BlogState::Loaded(blog));
                    match backend.fetch_by_id::<UserProfile>("users", &author_id).await {
                        Ok(profile) => {
                            author.try_set(Some(profile));
                        }
                        Err(e) => {
                            leptos::logging::warn!("author fetch failed: {e}");
                        }
                    }
                }
                Err(e) => {
                    if e != BackendError::NotFound {
                        leptos::logging::error!("blog fetch failed: {e}");
                        toasts.error("Could not load this blog.");
                    }
                    state.try_set(state_for_error(&e));
                }
            }
            match backend
                .query::<Comment>("comments", "blogId", QueryOp::Eq, &blog_id)
                .await
            {
                Ok(mut list) => {
                    list.sort_by_key(|c| c.date);
                    comments.try_set(list);
                }
                Err(e) => {
                    leptos::logging::warn!("comment fetch failed: {e}");
                }
            }
            loader.hide();
        });
    });

    move || match state.get() {
        BlogState::Loading => view! { <EmptyState message="Loading..." /> }.into_any(),
        BlogState::Missing => view! {
            <div class="not-found">
                <h1>"Blog not found"</h1>
                <p>"This post may have been deleted."</p>
                <a href="/blogs">"Back to blogs"</a>
            </div>
        }
            .into_any(),
        BlogState::Failed => view! {
            <div class="not-found">
                <h1>"Something went wrong"</h1>
                <p>"The blog could not be loaded. Check your connection and try again."</p>
                <a href="/blogs">"Back to blogs"</a>
            </div>
        }
            .into_any(),
        BlogState::Loaded(blog) => {
            view! { <BlogArticle blog=blog author=author comments=comments /> }.into_any()
        }
    }
}

#[component]
fn BlogArticle(
    blog: Blog,
    author: RwSignal<Option<UserProfile>>,
    comments: RwSignal<Vec<Comment>>,
) -> impl IntoView {
    let auth = use_auth();
    let blog_id = blog.id.clone();
    let owner_id = blog.user_id.clone();
    let content = RwSignal::new(blog.content.clone());

    let edit_link = format!("/dashboard/edit/blog/{}", blog.id);
    let is_owner = move || auth.user().is_some_and(|s| s.id == owner_id);

    view! {
        <article class="blog-detail">
            <Breadcrumbs items=vec![
                Crumb::new("Blogs", "/blogs"),
                Crumb::new(blog.title.clone(), format!("/blogs/{}", blog.id)),
            ] />
            <header>
                <h1>{blog.title.clone()}</h1>
                <div class="blog-byline">
                    {move || {
                        author
                            .get()
                            .and_then(|profile| profile.photo_url)
                            .map(|url| {
                                view! { <img class="byline-avatar" src=url alt="" /> }
                            })
                    }}
                    <span>
                        {format!("By {} \u{00b7} {}", blog.author, format_date(blog.date))}
                    </span>
                </div>
                {move || {
                    is_owner()
                        .then(|| {
                            view! {
                                <a class="button-secondary" href=edit_link.clone()>"Edit"</a>
                            }
                        })
                }}
            </header>
            {blog
                .thumbnail
                .clone()
                .map(|url| view! { <img class="blog-hero" src=url alt="" /> })}
            <MarkdownView content={Signal::<String>::from(content)} />
            <CommentSection blog_id=blog_id comments=comments />
        </article>
    }
}

#[component]
fn CommentSection(blog_id: String, comments: RwSignal<Vec<Comment>>) -> impl IntoView {
    let auth = use_auth();
    let backend = use_backend();
    let toasts = use_toasts();

    let draft = RwSignal::new(String::new());

    let submit = {
        let backend = backend.clone();
        let blog_id = blog_id.clone();
        move |_| {
            let Some(session) = auth.user() else {
                toasts.info("Sign in to comment.");
                return;
            };
            let text = draft.get().trim().to_string();
            if text.is_empty() {
                toasts.error("Comment cannot be empty.");
                return;
            }
            let backend = backend.clone();
            let blog_id = blog_id.clone();
            let date = now_secs();
            spawn_local(async move {
                let fields = json!({
                    "blogId": blog_id,
                    "userId": session.id,
                    "userName": session.display_name,
                    "content": text,
                    "date": date,
                });
                match backend.create("comments", &fields).await {
                    Ok(id) => {
                        comments.try_update(|list| {
                            list.push(Comment {
                                id,
                                blog_id,
                                user_id: session.id,
                                user_name: session.display_name,
                                content: text,
                                date,
                            });
                        });
                        draft.try_set(String::new());
                    }
                    Err(e) => {
                        leptos::logging::error!("comment create failed: {e}");
                        toasts.error("Could not post your comment.");
                    }
                }
            });
        }
    };

    let remove = Callback::new(move |comment_id: String| {
        let backend = backend.clone();
        spawn_local(async move {
            match backend.delete("comments", &comment_id).await {
                Ok(()) => {
                    comments.try_update(|list| list.retain(|c| c.id != comment_id));
                }
                Err(e) => {
                    leptos::logging::error!("comment delete failed: {e}");
                    toasts.error("Could not delete the comment.");
                }
            }
        });
    });

    view! {
        <section class="comments">
            <h2>{move || format!("Comments ({})", comments.with(Vec::len))}</h2>
            {move || {
                let list = comments.get();
                if list.is_empty() {
                    view! { <p class="comments-empty">"Be the first to comment."</p> }.into_any()
                } else {
                    let now = now_secs();
                    let viewer = auth.user().map(|s| s.id);
                    view! {
                        <ul class="comment-list">
                            {list
                                .into_iter()
                                .map(|comment| {
                                    let mine = viewer.as_deref() == Some(comment.user_id.as_str());
                                    let comment_id = comment.id.clone();
                                    view! {
                                        <li class="comment">
                                            <div class="comment-head">
                                                <span class="comment-author">{comment.user_name}</span>
                                                <span class="comment-date">
                                                    {format_relative(comment.date, now)}
                                                </span>
                                                {mine
                                                    .then(|| {
                                                        view! {
                                                            <button
                                                                class="comment-delete"
                                                                on:click=move |_| remove.run(comment_id.clone())
                                                            >
                                                                "Delete"
                                                            </button>
                                                        }
                                                    })}
                                            </div>
                                            <p class="comment-body">{comment.content}</p>
                                        </li>
                                    }
                                })
                                .collect::<Vec<_>>()}
                        </ul>
                    }
                        .into_any()
                }
            }}
            {move || {
                if auth.signed_in() {
                    view! {
                        <div class="comment-form">
                            <textarea
                                placeholder="Write a comment"
                                prop:value=move || draft.get()
                                on:input=move |ev| draft.set(event_target_value(&ev))
                            ></textarea>
                            <button class="button-primary" on:click=submit.clone()>"Post"</button>
                        </div>
                    }
                        .into_any()
                } else {
                    view! {
                        <p class="comment-signin">
                            <a href="/login">"Sign in"</a>
                            " to join the conversation."
                        </p>
                    }
                        .into_any()
                }
            }}
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_missing_record_renders_not_found() {
        assert_eq!(state_for_error(&BackendError::NotFound), BlogState::Missing);
        assert_eq!(
            state_for_error(&BackendError::Network("connection reset".into())),
            BlogState::Failed
        );
        assert_eq!(state_for_error(&BackendError::Status(500)), BlogState::Failed);
        assert_eq!(state_for_error(&BackendError::Unauthorized), BlogState::Failed);
    }
}
