use serde::{Deserialize, Serialize};

/// Body of `POST /chat`. A missing `message` reads as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

impl ChatResponse {
    pub fn new(response: impl Into<String>) -> Self {
        Self { response: response.into() }
    }
}

/// Lead section of a Wikipedia article.
#[derive(Debug, Clone, PartialEq)]
pub struct WikiSummary {
    pub title: String,
    pub extract: String,
    pub url: String,
}

/// One web search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: Option<String>,
}
