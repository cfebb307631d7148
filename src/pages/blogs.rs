//! Public blog list: server-ordered fetch keyed on the sort choice, with a
//! debounced client-side title/author filter layered on top. Changing either
//! control goes through the same refresh path, so the list can never show a
//! stale combination of the two.

use leptos::prelude::*;
use leptos::task::spawn_local;

use gloo_timers::future::TimeoutFuture;

use crate::auth::use_backend;
use crate::components::{Card, Dropdown, DropdownItem, EmptyState};
use crate::model::{format_relative, Blog};
use crate::notify::{use_loader, use_toasts};
use crate::pages::now_secs;

const FILTER_DEBOUNCE_MS: u32 = 500;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum BlogSort {
    #[default]
    Newest,
    Oldest,
    TitleAsc,
    TitleDesc,
}

impl BlogSort {
    /// Server-side ordering: field name and direction.
    fn order(self) -> (&'static str, bool) {
        match self {
            BlogSort::Newest => ("date", true),
            BlogSort::Oldest => ("date", false),
            BlogSort::TitleAsc => ("title", false),
            BlogSort::TitleDesc => ("title", true),
        }
    }

    fn label(self) -> &'static str {
        match self {
            BlogSort::Newest => "Newest first",
            BlogSort::Oldest => "Oldest first",
            BlogSort::TitleAsc => "Title A-Z",
            BlogSort::TitleDesc => "Title Z-A",
        }
    }

    const ALL: [BlogSort; 4] = [
        BlogSort::Newest,
        BlogSort::Oldest,
        BlogSort::TitleAsc,
        BlogSort::TitleDesc,
    ];

    fn value(self) -> &'static str {
        match self {
            BlogSort::Newest => "newest",
            BlogSort::Oldest => "oldest",
            BlogSort::TitleAsc => "title-asc",
            BlogSort::TitleDesc => "title-desc",
        }
    }

    fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sort| sort.value() == value)
    }
}

fn matches_filter(blog: &Blog, needle: &str) -> bool {
    needle.is_empty()
        || blog.title.to_lowercase().contains(needle)
        || blog.author.to_lowercase().contains(needle)
}

#[component]
pub fn Blogs() -> impl IntoView {
    let backend = use_backend();
    let loader = use_loader();
    let toasts = use_toasts();

    let sort = RwSignal::new(BlogSort::default());
    let blogs = RwSignal::new(Vec::<Blog>::new());
    let loaded = RwSignal::new(false);
    // The committed filter, set only after the debounce window closes.
    let filter = RwSignal::new(String::new());
    let keystroke = StoredValue::new(0u64);

    Effect::new(move |_| {
        let (field, descending) = sort.get().order();
        let backend = backend.clone();
        loader.show();
        spawn_local(async move {
            match backend.fetch_all_ordered::<Blog>("blogs", field, descending).await {
                Ok(list) => blogs.try_set(list),
                Err(e) => {
                    leptos::logging::error!("blog list fetch failed: {e}");
                    toasts.error("Could not load blogs. Please try again.");
                    None
                }
            };
            loaded.try_set(true);
            loader.hide();
        });
    });

    let on_search = move |ev| {
        let text = event_target_value(&ev).to_lowercase();
        let mine = keystroke.try_update_value(|k| {
            *k += 1;
            *k
        });
        spawn_local(async move {
            TimeoutFuture::new(FILTER_DEBOUNCE_MS).await;
            if keystroke.try_get_value() == mine {
                filter.try_set(text);
            }
        });
    };

    let visible = Memo::new(move |_| {
        let needle = filter.get();
        blogs
            .get()
            .into_iter()
            .filter(|blog| matches_filter(blog, &needle))
            .collect::<Vec<_>>()
    });

    view! {
        <section class="blog-list">
            <div class="blog-list-controls">
                <input
                    class="blog-search"
                    type="search"
                    placeholder="Search by title or author"
                    on:input=on_search
                />
                <Dropdown
                    label="Sort"
                    items={BlogSort::ALL
                        .into_iter()
                        .map(|s| DropdownItem::new(s.label(), s.value()))
                        .collect::<Vec<_>>()}
                    on_select=Callback::new(move |value: String| {
                        if let Some(choice) = BlogSort::from_value(&value) {
                            sort.set(choice);
                        }
                    })
                />
            </div>
            {move || {
                let list = visible.get();
                if list.is_empty() {
                    let message = if !loaded.get() {
                        "Loading blogs..."
                    } else if filter.with(String::is_empty) {
                        "No blogs have been published yet."
                    } else {
                        "No blogs match your search."
                    };
                    view! { <EmptyState message=message /> }.into_any()
                } else {
                    let now = now_secs();
                    view! {
                        <div class="card-grid">
                            {list
                                .into_iter()
                                .map(|blog| {
                                    view! {
                                        <Card
                                            title=blog.title
                                            byline=format!(
                                                "{} \u{00b7} {}",
                                                blog.author,
                                                format_relative(blog.date, now),
                                            )
                                            href=format!("/blogs/{}", blog.id)
                                            image_url=blog.thumbnail
                                        />
                                    }
                                })
                                .collect::<Vec<_>>()}
                        </div>
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

    fn blog(title: &str, author: &str) -> Blog {
        Blog {
            id: "b".to_string(),
            title: title.to_string(),
            content: String::new(),
            author: author.to_string(),
            user_id: "u".to_string(),
            date: 0,
            thumbnail: None,
        }
    }

    #[test]
    fn filter_matches_title_or_author_case_insensitively() {
        let post = blog("Getting Started", "Ada");
        assert!(matches_filter(&post, ""));
        assert!(matches_filter(&post, "started"));
        assert!(matches_filter(&post, "ada"));
        assert!(!matches_filter(&post, "zzz"));
    }

    #[test]
    fn sort_orders_map_to_fields() {
        assert_eq!(BlogSort::Newest.order(), ("date", true));
        assert_eq!(BlogSort::TitleAsc.order(), ("title", false));
        assert_eq!(BlogSort::from_value("title-desc"), Some(BlogSort::TitleDesc));
        assert_eq!(BlogSort::from_value("bogus"), None);
    }
}
