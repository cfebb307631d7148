//! Author dashboard: the signed-in user's posts in a data table with edit,
//! delete and bulk delete. Deletion always goes through a confirmation
//! dialog listing exactly what is about to go.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::auth::{use_auth, use_backend};
use crate::backend::QueryOp;
use crate::components::{ConfirmDialog, EmptyState};
use crate::model::{format_date, Blog};
use crate::notify::{use_loader, use_toasts};
use crate::table::{DataTable, RowAction};
use crate::table_core::{CellValue, Row};

fn blog_row(blog: &Blog) -> Row {
    Row::new(
        blog.id.clone(),
        vec![
            CellValue::link(blog.title.clone(), format!("/blogs/{}", blog.id)),
            CellValue::text(blog.author.clone()),
            CellValue::text(format_date(blog.date)),
        ],
    )
}

#[component]
pub fn Dashboard() -> impl IntoView {
    let auth = use_auth();
    let backend = use_backend();
    let loader = use_loader();
    let toasts = use_toasts();

    let blogs = RwSignal::new(Vec::<Blog>::new());
    let loaded = RwSignal::new(false);
    // Posts staged for deletion; the dialog is open while this is non-empty.
    let pending_delete = RwSignal::new(Vec::<Blog>::new());
    let edit_target = RwSignal::new(None::<String>);

    {
        let navigate = use_navigate();
        Effect::new(move |_| {
            if let Some(id) = edit_target.get() {
                navigate(&format!("/dashboard/edit/blog/{id}"), Default::default());
            }
        });
    }

    // Auth gate: wait for the session probe, then bounce anonymous visitors.
    Effect::new(move |_| {
        if auth.resolved.get() && !auth.signed_in() {
            let navigate = use_navigate();
            navigate("/login", Default::default());
        }
    });

    Effect::new(move |_| {
        let Some(session) = auth.session.get() else {
            return;
        };
        let backend = backend.clone();
        loader.show();
        spawn_local(async move {
            match backend
                .query::<Blog>("blogs", "userId", QueryOp::Eq, &session.id)
                .await
            {
                Ok(mut list) => {
                    list.sort_by_key(|b| std::cmp::Reverse(b.date));
                    blogs.try_set(list);
                }
                Err(e) => {
                    leptos::logging::error!("dashboard fetch failed: {e}");
                    toasts.error("Could not load your blogs.");
                }
            }
            loaded.try_set(true);
            loader.hide();
        });
    });

    let rows = Signal::derive(move || {
        blogs.with(|list| list.iter().map(blog_row).collect::<Vec<Row>>())
    });

    let stage_one = Callback::new(move |id: String| {
        let staged = blogs.with(|list| list.iter().find(|b| b.id == id).cloned());
        if let Some(blog) = staged {
            pending_delete.set(vec![blog]);
        }
    });

    let stage_many = Callback::new(move |rows: Vec<Row>| {
        let staged = blogs.with(|list| {
            rows.iter()
                .filter_map(|row| list.iter().find(|b| b.id == row.id).cloned())
                .collect::<Vec<_>>()
        });
        if !staged.is_empty() {
            pending_delete.set(staged);
        }
    });

    let edit = Callback::new(move |id: String| edit_target.set(Some(id)));

    let confirm_delete = {
        let backend = use_backend();
        Callback::new(move |_: ()| {
            let staged = pending_delete.get();
            pending_delete.set(Vec::new());
            if staged.is_empty() {
                return;
            }
            let backend = backend.clone();
            loader.show();
            spawn_local(async move {
                match backend.bulk_delete_blogs(&staged).await {
                    Ok(()) => {
                        let gone: Vec<String> = staged.iter().map(|b| b.id.clone()).collect();
                        blogs.try_update(|list| list.retain(|b| !gone.contains(&b.id)));
                        toasts.success(if staged.len() == 1 {
                            "Blog deleted.".to_string()
                        } else {
                            format!("{} blogs deleted.", staged.len())
                        });
                    }
                    Err(e) => {
                        leptos::logging::error!("blog delete failed: {e}");
                        toasts.error("Could not delete. Some posts may remain.");
                    }
                }
                loader.hide();
            });
        })
    };

    let actions = vec![
        RowAction::new("Edit", edit),
        RowAction::danger("Delete", stage_one),
    ];

    view! {
        <section class="dashboard">
            <header class="dashboard-head">
                <h1>"Your blogs"</h1>
                <a class="button-primary" href="/dashboard/create/blog">"Create Blog"</a>
            </header>
            <div class="dashboard-links">
                <a href="/dashboard/edit/profile">"Edit profile"</a>
            </div>
            {move || {
                if loaded.get() && blogs.with(Vec::is_empty) {
                    view! { <EmptyState message="You have not written anything yet." /> }
                        .into_any()
                } else {
                    view! {
                        <DataTable
                            columns=vec!["Title", "Author", "Date"]
                            rows=rows
                            actions=actions.clone()
                            badge_column=1usize
                            on_bulk_delete=stage_many
                        />
                    }
                        .into_any()
                }
            }}
            {move || {
                let staged = pending_delete.get();
                (!staged.is_empty())
                    .then(|| {
                        let message = if staged.len() == 1 {
                            "Delete this blog? This cannot be undone.".to_string()
                        } else {
                            format!("Delete {} blogs? This cannot be undone.", staged.len())
                        };
                        view! {
                            <ConfirmDialog
                                message=message
                                details={staged.iter().map(|b| b.title.clone()).collect::<Vec<_>>()}
                                on_cancel=Callback::new(move |_| pending_delete.set(Vec::new()))
                                on_confirm=confirm_delete
                            />
                        }
                    })
            }}
        </section>
    }
}
