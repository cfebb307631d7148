mod app;
mod auth;
mod backend;
mod components;
mod config;
mod editor_core;
mod markdown;
mod model;
mod notify;
mod pages;
mod table;
mod table_core;

use app::App;

fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
