mod api;
mod components;
mod models;
mod render;
mod state;
mod widget;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::chat::ChatArea;

/// Root application component.
#[component]
fn App() -> impl IntoView {
    view! {
        <ChatArea />
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
