use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::api::{ChatTransport, ReplyError};
use crate::models::{Message, RenderedMessage};
use crate::render::render_message;

/// The UI handles the widget drives: message container, typing slot and input.
pub trait ChatView {
    fn append_message(&self, message: RenderedMessage);
    fn set_typing(&self, visible: bool);
    fn clear_input(&self);
    fn scroll_to_latest(&self);
}

/// Runs a reply task on the UI event loop.
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Proof that a reply is outstanding. Handed back to [`TypingIndicator::finish`].
#[must_use]
#[derive(Debug)]
pub struct PendingReply(());

/// Counts outstanding replies; the indicator shows while any remain.
#[derive(Debug, Default)]
pub struct TypingIndicator {
    outstanding: usize,
}

impl TypingIndicator {
    pub fn begin(&mut self) -> PendingReply {
        self.outstanding += 1;
        PendingReply(())
    }

    pub fn finish(&mut self, _reply: PendingReply) {
        self.outstanding = self.outstanding.saturating_sub(1);
    }

    pub fn is_visible(&self) -> bool {
        self.outstanding > 0
    }
}

struct Inner<V, T> {
    view: V,
    transport: T,
    spawn: Spawner,
    next_id: Cell<usize>,
    typing: RefCell<TypingIndicator>,
}

/// Chat widget core: keeps the transcript and the typing indicator in step
/// with submissions and their replies.
pub struct ChatWidget<V, T> {
    inner: Rc<Inner<V, T>>,
}

impl<V, T> Clone for ChatWidget<V, T> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<V, T> ChatWidget<V, T>
where
    V: ChatView + 'static,
    T: ChatTransport + 'static,
{
    pub fn new(view: V, transport: T, spawn: Spawner) -> Self {
        Self {
            inner: Rc::new(Inner {
                view,
                transport,
                spawn,
                next_id: Cell::new(0),
                typing: RefCell::new(TypingIndicator::default()),
            }),
        }
    }

    /// Handles a send click or Enter press. Blank input is ignored.
    pub fn submit_user_message(&self, raw: &str) {
        let text = raw.trim();
        if text.is_empty() {
            return;
        }
        self.append(Message::user(text));
        self.inner.view.clear_input();
        self.request_reply(text.to_string());
    }

    /// Shows the indicator, issues the call and appends whatever comes back.
    pub fn request_reply(&self, text: String) {
        let pending = self.inner.typing.borrow_mut().begin();
        self.inner.view.set_typing(true);
        self.inner.view.scroll_to_latest();

        let reply = self.inner.transport.send(text);
        let widget = self.clone();
        (self.inner.spawn)(Box::pin(async move {
            let outcome = reply.await;
            widget.settle(pending, outcome);
        }));
    }

    fn settle(&self, pending: PendingReply, outcome: Result<String, ReplyError>) {
        let still_waiting = {
            let mut typing = self.inner.typing.borrow_mut();
            typing.finish(pending);
            typing.is_visible()
        };
        self.inner.view.set_typing(still_waiting);

        let text = match outcome {
            Ok(text) => text,
            Err(err) if err.is_transport() => {
                log::error!("Chat request failed: {err}");
                err.fallback_text().to_string()
            }
            Err(err) => {
                log::warn!("Chat request rejected: {err}");
                err.fallback_text().to_string()
            }
        };
        self.append(Message::bot(text));
    }

    fn append(&self, message: Message) {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.view.append_message(RenderedMessage {
            id,
            sender: message.sender,
            markup: render_message(&message.text),
        });
        self.inner.view.scroll_to_latest();
    }
}
