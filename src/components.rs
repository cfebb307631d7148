//! Shared chrome: navbar, footer, breadcrumbs, cards, dropdown, confirm
//! dialog and the small bits the pages compose.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::auth::{use_auth, use_backend};
use crate::notify::use_toasts;

/// Shared click-away signal. One document-level mousedown listener is
/// installed at the application root and bumps the tick; menus watch the
/// tick through scope-bound effects instead of registering their own
/// document listeners, so navigating between pages never accumulates
/// listeners.
#[derive(Clone, Copy)]
pub struct ClickAway(RwSignal<u32>);

impl ClickAway {
    /// Calls `f` on every document mousedown after the current one. The
    /// watcher lives in the calling scope and is dropped with it.
    pub fn listen(self, f: impl Fn() + 'static) {
        let tick = self.0;
        Effect::new(move |prev: Option<u32>| {
            let current = tick.get();
            if prev.is_some() {
                f();
            }
            current
        });
    }
}

/// Installs the shared listener. Call once from the root component; the
/// closure is forgotten there, a one-time cost for the page lifetime.
pub fn provide_click_away() {
    let tick = RwSignal::new(0u32);
    let bump = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_| {
        tick.try_update(|t| *t = t.wrapping_add(1));
    });
    let _ =
        document().add_event_listener_with_callback("mousedown", bump.as_ref().unchecked_ref());
    bump.forget();
    provide_context(ClickAway(tick));
}

pub fn use_click_away() -> ClickAway {
    expect_context::<ClickAway>()
}

/// A colored pill used for emphasized table cells.
#[component]
pub fn Badge(
    #[prop(into)] text: String,
    #[prop(into)] color: String,
    #[prop(into)] dark_color: String,
) -> impl IntoView {
    view! {
        <span class=format!("badge badge-{} badge-dark-{}", color, dark_color)>{text}</span>
    }
}

#[component]
pub fn EmptyState(message: &'static str) -> impl IntoView {
    view! {
        <div class="empty-state">
            <p>{message}</p>
        </div>
    }
}

/// Top navigation. Signed-in users get dashboard and sign-out controls.
#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let backend = use_backend();
    let toasts = use_toasts();

    let sign_out = move |_| {
        let backend = backend.clone();
        spawn_local(async move {
            match backend.logout().await {
                Ok(()) => {
                    auth.session.try_set(None);
                    toasts.info("Signed out.");
                }
                Err(e) => {
                    leptos::logging::error!("logout failed: {e}");
                    toasts.error("Could not sign out. Please try again.");
                }
            }
        });
    };

    view! {
        <nav class="navbar">
            <a href="/" class="navbar-brand">"inkpress"</a>
            <div class="navbar-links">
                <a href="/blogs">"Blogs"</a>
                <a href="/contact">"Contact"</a>
                {move || match auth.user() {
                    Some(session) => view! {
                        <a href="/dashboard">"Dashboard"</a>
                        <span class="navbar-user">{session.display_name.clone()}</span>
                        <button class="navbar-signout" on:click=sign_out.clone()>"Sign out"</button>
                    }
                        .into_any(),
                    None => view! { <a href="/login">"Login"</a> }.into_any(),
                }}
            </div>
        </nav>
    }
}

#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="footer">
            <span>"inkpress \u{2014} write in markdown."</span>
        </footer>
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub route: String,
}

impl Crumb {
    pub fn new(label: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            route: route.into(),
        }
    }
}

fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() > max {
        let head: String = label.chars().take(max).collect();
        format!("{head}...")
    } else {
        label.to_string()
    }
}

#[component]
pub fn Breadcrumbs(items: Vec<Crumb>) -> impl IntoView {
    let last = items.len().saturating_sub(1);
    view! {
        <nav class="breadcrumbs">
            <ol>
                {items
                    .into_iter()
                    .enumerate()
                    .map(|(i, crumb)| {
                        let label = truncate_label(&crumb.label, 24);
                        if i == last {
                            view! { <li class="crumb-current">{label}</li> }.into_any()
                        } else {
                            view! {
                                <li>
                                    <a href=crumb.route>{label}</a>
                                    <span class="crumb-sep">"/"</span>
                                </li>
                            }
                                .into_any()
                        }
                    })
                    .collect::<Vec<_>>()}
            </ol>
        </nav>
    }
}

/// A blog card for the public list: thumbnail, linked title, byline.
#[component]
pub fn Card(
    #[prop(into)] title: String,
    #[prop(into)] byline: String,
    #[prop(into)] href: String,
    #[prop(optional_no_strip, into)] image_url: Option<String>,
) -> impl IntoView {
    let link = href.clone();
    view! {
        <div class="card">
            {image_url
                .map(|url| {
                    view! {
                        <a href=link.clone()>
                            <img class="card-thumb" src=url alt="thumbnail" />
                        </a>
                    }
                })}
            <h2 class="card-title">
                <a href=href>{title}</a>
            </h2>
            <p class="card-byline">{byline}</p>
        </div>
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropdownItem {
    pub label: String,
    pub value: String,
}

impl DropdownItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Button-opened menu of options; any click elsewhere in the document closes
/// it.
#[component]
pub fn Dropdown(
    #[prop(into)] label: String,
    items: Vec<DropdownItem>,
    on_select: Callback<String>,
) -> impl IntoView {
    let (open, set_open) = signal(false);

    use_click_away().listen(move || {
        set_open.try_set(false);
    });

    view! {
        <div class="dropdown">
            <button
                class="dropdown-button"
                on:mousedown=|ev| ev.stop_propagation()
                on:click=move |_| set_open.update(|o| *o = !*o)
            >
                {label}
                <span class="dropdown-caret">"\u{25be}"</span>
            </button>
            {move || {
                open.get()
                    .then(|| {
                        let items = items.clone();
                        view! {
                            <ul class="dropdown-menu" on:mousedown=|ev| ev.stop_propagation()>
                                {items
                                    .into_iter()
                                    .map(|item| {
                                        let value = item.value.clone();
                                        view! {
                                            <li>
                                                <button on:click=move |_| {
                                                    on_select.run(value.clone());
                                                    set_open.set(false);
                                                }>{item.label.clone()}</button>
                                            </li>
                                        }
                                    })
                                    .collect::<Vec<_>>()}
                            </ul>
                        }
                    })
            }}
        </div>
    }
}

/// Modal confirmation listing what is about to be deleted.
#[component]
pub fn ConfirmDialog(
    #[prop(into)] message: String,
    details: Vec<String>,
    on_cancel: Callback<()>,
    on_confirm: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="dialog-backdrop">
            <div class="dialog">
                <p class="dialog-message">{message}</p>
                <ul class="dialog-details">
                    {details
                        .into_iter()
                        .map(|detail| view! { <li>{detail}</li> })
                        .collect::<Vec<_>>()}
                </ul>
                <div class="dialog-actions">
                    <button class="dialog-cancel" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button class="dialog-delete" on:click=move |_| on_confirm.run(())>
                        "Delete"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Route shell: navbar on top, page content, footer, overlays.
#[component]
pub fn NotFound() -> impl IntoView {
    let navigate = use_navigate();
    view! {
        <div class="not-found">
            <h1>"404"</h1>
            <p>"The page you are looking for does not exist."</p>
            <button on:click=move |_| navigate("/blogs", Default::default())>"Go to Blogs"</button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_label;

    #[test]
    fn truncates_long_labels() {
        assert_eq!(truncate_label("short", 24), "short");
        let long = "a".repeat(30);
        assert_eq!(truncate_label(&long, 24), format!("{}...", "a".repeat(24)));
    }
}
