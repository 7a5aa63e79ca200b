use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use futures::future::{self, Either, LocalBoxFuture};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use thiserror::Error;

use crate::models::{ChatReply, ChatRequest};

/// Path of the chat endpoint, relative to the page origin.
pub const CHAT_ENDPOINT: &str = "/chat";

/// Shown when the server answered but could not produce a reply.
pub const SERVER_FALLBACK: &str = "I'm sorry, I couldn't process your request. Please try again.";

/// Shown when no usable answer came back at all.
pub const CONNECTION_FALLBACK: &str =
    "I'm sorry, there was an error connecting to the server. Please check your connection and try again.";

/// Why a chat request produced no reply text.
#[derive(Debug, Error)]
pub enum ReplyError {
    // ── Server-reported ──────────────────────────────────────────────────────
    #[error("Server error: {0}")]
    Status(u16),

    #[error("Reply carried no response text")]
    MissingContent,

    // ── Transport ────────────────────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Malformed(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("No reply after {0:?}")]
    TimedOut(Duration),
}

impl ReplyError {
    /// True when the failure happened before a usable server answer arrived.
    pub fn is_transport(&self) -> bool {
        !matches!(self, ReplyError::Status(_) | ReplyError::MissingContent)
    }

    /// The fixed text displayed in place of a reply.
    pub fn fallback_text(&self) -> &'static str {
        if self.is_transport() {
            CONNECTION_FALLBACK
        } else {
            SERVER_FALLBACK
        }
    }
}

/// Outbound call path used by the chat widget.
pub trait ChatTransport {
    fn send(&self, message: String) -> LocalBoxFuture<'static, Result<String, ReplyError>>;
}

/// Interprets a settled `/chat` response.
///
/// The body must be JSON before the status is considered: a non-ok status
/// with a JSON body is a server failure, anything unparsable is a transport
/// failure.
pub fn parse_reply(ok: bool, status: u16, body: &str) -> Result<String, ReplyError> {
    let malformed = |e: serde_json::Error| ReplyError::Malformed(e.to_string());
    let value: serde_json::Value = serde_json::from_str(body).map_err(malformed)?;
    if !ok {
        return Err(ReplyError::Status(status));
    }
    let reply: ChatReply = serde_json::from_value(value).map_err(malformed)?;
    reply.response.ok_or(ReplyError::MissingContent)
}

/// Resolves to `call`'s result, or `TimedOut(limit)` if `timer` fires first.
pub async fn race_timeout<C, T>(call: C, timer: T, limit: Duration) -> Result<String, ReplyError>
where
    C: Future<Output = Result<String, ReplyError>>,
    T: Future<Output = ()>,
{
    match future::select(pin!(call), pin!(timer)).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(ReplyError::TimedOut(limit)),
    }
}

/// Sends chat messages to the backend with `gloo-net`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    endpoint: String,
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), timeout: None }
    }

    /// Gives up on a reply after `timeout`, reporting it as a transport failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(CHAT_ENDPOINT)
    }
}

impl ChatTransport for HttpTransport {
    fn send(&self, message: String) -> LocalBoxFuture<'static, Result<String, ReplyError>> {
        let endpoint = self.endpoint.clone();
        let timeout = self.timeout;

        Box::pin(async move {
            let call = post_chat(endpoint, message);
            let Some(limit) = timeout else {
                return call.await;
            };
            let millis = u32::try_from(limit.as_millis()).unwrap_or(u32::MAX);
            race_timeout(call, TimeoutFuture::new(millis), limit).await
        })
    }
}

/// Posts a single message to the chat endpoint (non-streaming).
async fn post_chat(endpoint: String, message: String) -> Result<String, ReplyError> {
    let body = ChatRequest { message };

    let resp = Request::post(&endpoint)
        .json(&body)
        .map_err(|e| ReplyError::Serialize(e.to_string()))?
        .send()
        .await
        .map_err(|e| ReplyError::Network(e.to_string()))?;

    let text = resp
        .text()
        .await
        .map_err(|e| ReplyError::Network(e.to_string()))?;

    parse_reply(resp.ok(), resp.status(), &text)
}
