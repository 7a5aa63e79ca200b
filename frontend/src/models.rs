use serde::{Deserialize, Serialize};

/// Who authored a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn css_class(&self) -> &'static str {
        match self {
            Sender::User => "message user-message",
            Sender::Bot => "message bot-message",
        }
    }
}

/// A chat message before formatting.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), sender: Sender::User }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { text: text.into(), sender: Sender::Bot }
    }
}

/// A transcript entry as inserted into the message container.
/// `id` is the insertion sequence number and doubles as the list key.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedMessage {
    pub id: usize,
    pub sender: Sender,
    pub markup: String,
}

/// Request body for `POST /chat`.
#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Response body from `POST /chat`.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
}
