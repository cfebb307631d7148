use leptos::prelude::*;

#[component]
pub fn Home() -> impl IntoView {
    view! {
        <section class="hero">
            <h1>"Write in markdown. Publish in seconds."</h1>
            <p>
                "inkpress is a small blogging platform for people who think in plain text. "
                "Read what others are writing, or sign in and start your own."
            </p>
            <div class="hero-actions">
                <a class="button-primary" href="/blogs">"Browse blogs"</a>
                <a class="button-secondary" href="/login">"Start writing"</a>
            </div>
        </section>
    }
}
