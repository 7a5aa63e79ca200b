use leptos::html::Div;
use leptos::prelude::*;

use crate::models::RenderedMessage;
use crate::widget::ChatView;

/// Reactive state behind the chat panel. Every field is a copyable handle,
/// so the state can be moved freely into view closures and the widget.
#[derive(Clone, Copy)]
pub struct AppState {
    // --- Read signals (for components to subscribe to) ---
    pub messages: ReadSignal<Vec<RenderedMessage>>,
    pub is_typing: ReadSignal<bool>,
    pub input: ReadSignal<String>,

    // --- Write signals (for mutating state) ---
    pub set_messages: WriteSignal<Vec<RenderedMessage>>,
    pub set_is_typing: WriteSignal<bool>,
    pub set_input: WriteSignal<String>,

    /// The scrollable message container.
    pub container: NodeRef<Div>,
}

impl AppState {
    pub fn new() -> Self {
        let (messages, set_messages) = signal(Vec::<RenderedMessage>::new());
        let (is_typing, set_is_typing) = signal(false);
        let (input, set_input) = signal(String::new());

        Self {
            messages,
            is_typing,
            input,
            set_messages,
            set_is_typing,
            set_input,
            container: NodeRef::new(),
        }
    }
}

impl ChatView for AppState {
    fn append_message(&self, message: RenderedMessage) {
        self.set_messages.update(|msgs| msgs.push(message));
    }

    fn set_typing(&self, visible: bool) {
        self.set_is_typing.set(visible);
    }

    fn clear_input(&self) {
        self.set_input.set(String::new());
    }

    fn scroll_to_latest(&self) {
        // Wait for the new node to be laid out before measuring.
        let container = self.container;
        request_animation_frame(move || {
            if let Some(el) = container.get_untracked() {
                el.set_scroll_top(el.scroll_height());
            }
        });
    }
}
