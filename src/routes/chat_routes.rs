use axum::extract::State;
use axum::Json;

use crate::models::{ChatRequest, ChatResponse};
use crate::service::chat_service::ChatService;

/// POST `/chat`: `{"message": "..."}` in, `{"response": "..."}` out.
///
/// Bot failures are reported inside `response` with a 200; only bodies that
/// are not JSON are rejected (by the extractor, with a 4xx).
pub async fn chat_handler(
    State(svc): State<ChatService>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    Json(svc.chat(request).await)
}
