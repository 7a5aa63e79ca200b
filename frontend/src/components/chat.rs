use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use leptos::ev;
use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::HttpTransport;
use crate::state::AppState;
use crate::widget::{ChatWidget, Spawner};

/// Optional upper bound on how long a reply may take.
const REPLY_TIMEOUT: Option<Duration> = None;

fn is_send_key(key: &str, composing: bool) -> bool {
    key == "Enter" && !composing
}

/// Chat panel: transcript, typing indicator and input row.
#[component]
pub fn ChatArea() -> impl IntoView {
    let state = AppState::new();

    let mut transport = HttpTransport::default();
    if let Some(limit) = REPLY_TIMEOUT {
        transport = transport.with_timeout(limit);
    }
    let spawn: Spawner = Rc::new(|task: LocalBoxFuture<'static, ()>| spawn_local(task));
    let widget = StoredValue::new_local(ChatWidget::new(state, transport, spawn));

    let send = move || {
        let raw = state.input.get_untracked();
        widget.with_value(|w| w.submit_user_message(&raw));
    };

    let on_keydown = move |ev: ev::KeyboardEvent| {
        // Enter that confirms an IME composition is not a send.
        if is_send_key(&ev.key(), ev.is_composing()) {
            ev.prevent_default();
            send();
        }
    };

    // Focus the input once it is mounted.
    let input_ref = NodeRef::<Input>::new();
    Effect::new(move |_| {
        if let Some(input) = input_ref.get() {
            let _ = input.focus();
        }
    });

    view! {
        <main class="chat-container">
            <div class="chat-header">"InfoBot"</div>

            // Messages
            <div class="chat-messages" id="chat-messages" node_ref=state.container>
                <For
                    each=move || state.messages.get()
                    key=|m| m.id
                    let:msg
                >
                    <div class=msg.sender.css_class()>
                        <div class="message-content" inner_html=msg.markup.clone()></div>
                    </div>
                </For>
                <Show when=move || state.is_typing.get()>
                    <div class="message bot-message typing-indicator" id="typing-indicator">
                        <span></span>
                        <span></span>
                        <span></span>
                    </div>
                </Show>
            </div>

            // Input area
            <div class="chat-input">
                <input
                    type="text"
                    id="user-input"
                    placeholder="Type your message…"
                    autocomplete="off"
                    node_ref=input_ref
                    prop:value=move || state.input.get()
                    on:input=move |ev| {
                        state.set_input.set(event_target_value(&ev));
                    }
                    on:keydown=on_keydown
                />
                <button id="send-button" class="send-btn" on:click=move |_| send()>
                    "Send"
                </button>
            </div>
        </main>
    }
}
