use std::sync::Arc;

use tracing::{debug, error};

use crate::bot::InfoBot;
use crate::errors::AppError;
use crate::models::{ChatRequest, ChatResponse};

const MAX_MESSAGE_LENGTH: usize = 8000;

pub const EMPTY_MESSAGE_REPLY: &str = "Please provide a message.";

#[derive(Clone)]
pub struct ChatService {
    bot: Arc<InfoBot>,
}

impl ChatService {
    pub fn new(bot: InfoBot) -> Self {
        Self { bot: Arc::new(bot) }
    }

    /// Answers one chat turn. Failures become an apology in the reply text.
    pub async fn chat(&self, request: ChatRequest) -> ChatResponse {
        let message = request.message.trim();
        if message.is_empty() {
            return ChatResponse::new(EMPTY_MESSAGE_REPLY);
        }

        match self.reply(message).await {
            Ok(response) => ChatResponse::new(response),
            Err(e) => {
                if e.is_validation() {
                    debug!("Rejected chat message: {e}");
                } else {
                    error!("Error processing request: {e}");
                }
                ChatResponse::new(format!("I'm sorry, I encountered an error: {e}"))
            }
        }
    }

    async fn reply(&self, message: &str) -> Result<String, AppError> {
        // ── Validation ────────────────────────────────────────────────────────
        if message.len() > MAX_MESSAGE_LENGTH {
            return Err(AppError::FieldTooLong {
                field_name: "message".to_string(),
                max_length: MAX_MESSAGE_LENGTH,
                actual_length: message.len(),
            });
        }

        self.bot.respond(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::GREETINGS;
    use crate::search::testing::StubSource;

    fn service(source: StubSource) -> ChatService {
        ChatService::new(InfoBot::new(Arc::new(source)))
    }

    fn request(message: &str) -> ChatRequest {
        ChatRequest { message: message.to_string() }
    }

    #[tokio::test]
    async fn blank_message_asks_for_input() {
        let svc = service(StubSource::default());
        for message in ["", "   \n"] {
            assert_eq!(svc.chat(request(message)).await.response, EMPTY_MESSAGE_REPLY);
        }
    }

    #[tokio::test]
    async fn message_is_trimmed_before_answering() {
        let svc = service(StubSource::default());
        let reply = svc.chat(request("  hi  ")).await;
        assert!(GREETINGS.contains(&reply.response.as_str()));
    }

    #[tokio::test]
    async fn oversized_message_is_rejected_in_reply_text() {
        let svc = service(StubSource::default());
        let reply = svc.chat(request(&"a".repeat(MAX_MESSAGE_LENGTH + 1))).await;
        assert_eq!(
            reply.response,
            "I'm sorry, I encountered an error: Field 'message' exceeds max length of 8000 (actual: 8001)"
        );
    }

    #[tokio::test]
    async fn lookup_failure_becomes_apology() {
        let mut source = StubSource::default();
        source.fail_wikipedia = true;
        let reply = service(source).chat(request("what is rust")).await;
        assert!(reply.response.starts_with("I'm sorry, I encountered an error: "));
        assert!(reply.response.contains("503"));
    }
}
