//! Application root: context wiring and the route table.

use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::auth::provide_auth;
use crate::backend::Backend;
use crate::components::{provide_click_away, Footer, Navbar, NotFound};
use crate::config::AppConfig;
use crate::notify::{provide_notifications, LoaderBar, ToastHost};
use crate::pages::blog_detail::BlogDetail;
use crate::pages::blog_form::BlogEditor;
use crate::pages::blogs::Blogs;
use crate::pages::contact::Contact;
use crate::pages::dashboard::Dashboard;
use crate::pages::edit_profile::EditProfile;
use crate::pages::home::Home;
use crate::pages::login::Login;

#[component]
pub fn App() -> impl IntoView {
    let backend = Backend::new(AppConfig::load());
    provide_context(backend.clone());
    provide_auth(backend);
    provide_notifications();
    provide_click_away();

    view! {
        <Router>
            <LoaderBar />
            <Navbar />
            <main class="page">
                <Routes fallback=NotFound>
                    <Route path=path!("/") view=Home />
                    <Route path=path!("/blogs") view=Blogs />
                    <Route path=path!("/blogs/:id") view=BlogDetail />
                    <Route path=path!("/contact") view=Contact />
                    <Route path=path!("/login") view=Login />
                    <Route path=path!("/dashboard") view=Dashboard />
                    <Route path=path!("/dashboard/edit/profile") view=EditProfile />
                    <Route
                        path=path!("/dashboard/create/blog")
                        view=|| view! { <BlogEditor /> }
                    />
                    <Route
                        path=path!("/dashboard/edit/blog/:id")
                        view=|| view! { <BlogEditor is_edit=true /> }
                    />
                </Routes>
            </main>
            <Footer />
            <ToastHost />
        </Router>
    }
}
