use leptos::prelude::*;

#[component]
pub fn Contact() -> impl IntoView {
    view! {
        <section class="contact">
            <h1>"Contact"</h1>
            <p>"Questions, bug reports or takedown requests:"</p>
            <ul>
                <li>
                    <a href="mailto:hello@inkpress.example">"hello@inkpress.example"</a>
                </li>
                <li>
                    <a href="https://github.com/inkpress" target="_blank" rel="noreferrer">
                        "github.com/inkpress"
                    </a>
                </li>
            </ul>
        </section>
    }
}
