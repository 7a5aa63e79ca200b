pub mod intent;

use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::SearchHit;
use crate::search::KnowledgeSource;

use self::intent::{categorize, extract_search_query, is_url, Intent};

pub const GREETINGS: &[&str] = &[
    "Hello! How can I help you find information today?",
    "Hi there! I'm InfoBot. What would you like to know?",
    "Greetings! I'm here to help you find information. What are you curious about?",
    "Hey! I'm ready to search the web for you. What would you like to learn about?",
];

pub const FAREWELLS: &[&str] = &[
    "Goodbye! Feel free to come back if you have more questions.",
    "Farewell! I'll be here if you need me again.",
    "See you later! Come back anytime you need information.",
    "Bye for now! Don't hesitate to ask if you need to find something out.",
];

pub const GENERAL_REPLIES: &[&str] = &[
    "I'm a search assistant designed to find information for you. Try asking me about a topic or person.",
    "I can help you search for information on the web. What would you like to know about?",
    "I'm best at answering questions or finding information. Can you ask me something specific?",
    "I can search Wikipedia or the web for you. What topic are you interested in?",
];

const EXACT_SUMMARY_CHARS: usize = 1500;
const RELATED_SUMMARY_CHARS: usize = 1000;
const PAGE_TEXT_CHARS: usize = 1500;
const RELATED_TITLES: usize = 3;
const MAX_SEARCH_HITS: usize = 5;

fn pick(replies: &[&str]) -> String {
    replies
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
        .to_string()
}

/// First `max` characters of `text`.
fn clip(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Rule-based information bot: small talk from canned replies, questions
/// answered from Wikipedia, the web, or the page a URL points at.
pub struct InfoBot {
    source: Arc<dyn KnowledgeSource>,
}

impl InfoBot {
    pub fn new(source: Arc<dyn KnowledgeSource>) -> Self {
        info!("InfoBot initialized");
        Self { source }
    }

    pub async fn respond(&self, message: &str) -> Result<String, AppError> {
        match categorize(message) {
            Intent::Greeting => Ok(pick(GREETINGS)),
            Intent::Farewell => Ok(pick(FAREWELLS)),
            Intent::General => Ok(pick(GENERAL_REPLIES)),
            Intent::Question => {
                let query = extract_search_query(message);
                if is_url(&query) {
                    Ok(self.read_website(&query).await)
                } else {
                    match self.search_wikipedia(&query).await? {
                        Some(answer) => Ok(answer),
                        None => Ok(self.search_web(&query).await),
                    }
                }
            }
        }
    }

    /// `None` when Wikipedia has nothing useful for `query`.
    async fn search_wikipedia(&self, query: &str) -> Result<Option<String>, AppError> {
        if let Some(page) = self.source.page_summary(query).await? {
            return Ok(Some(format!(
                "According to Wikipedia:\n\n{}\n\nLearn more: {}",
                clip(&page.extract, EXACT_SUMMARY_CHARS),
                page.url
            )));
        }

        let titles = self.source.related_titles(query, RELATED_TITLES).await?;
        let Some(first) = titles.first() else {
            return Ok(None);
        };
        let Some(page) = self.source.page_summary(first).await? else {
            return Ok(None);
        };

        let related = titles
            .iter()
            .map(|title| format!("- {title}"))
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Some(format!(
            "I found this on Wikipedia about '{}':\n\n{}\n\nLearn more: {}\n\nRelated topics:\n{related}",
            page.title,
            clip(&page.extract, RELATED_SUMMARY_CHARS),
            page.url
        )))
    }

    async fn search_web(&self, query: &str) -> String {
        match self.source.web_search(query).await {
            Ok(hits) if hits.is_empty() => format!(
                "I couldn't find any search results for '{query}'. Try refining your search."
            ),
            Ok(hits) => format_hits(&hits),
            Err(e) => {
                error!("Error searching the web: {e}");
                format!("I encountered an error searching for '{query}': {e}")
            }
        }
    }

    async fn read_website(&self, target: &str) -> String {
        let url = if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            format!("https://{target}")
        };

        match self.source.read_page(&url).await {
            Ok(Some(text)) => {
                let body = if text.chars().count() > PAGE_TEXT_CHARS {
                    format!(
                        "{}...\n\n(Content truncated for readability)",
                        clip(&text, PAGE_TEXT_CHARS)
                    )
                } else {
                    text
                };
                format!("Content from {url}:\n\n{body}")
            }
            Ok(None) => format!(
                "I couldn't access the website at {url}. The site might be down or blocking requests."
            ),
            Err(e) => {
                error!("Error scraping website: {e}");
                format!("I encountered an error when trying to read that website: {e}")
            }
        }
    }
}

fn format_hits(hits: &[SearchHit]) -> String {
    let mut out = String::from("Here's what I found on the web:\n\n");
    for (i, hit) in hits.iter().take(MAX_SEARCH_HITS).enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, hit.title));
        if let Some(snippet) = &hit.snippet {
            out.push_str(&format!("   {snippet}\n"));
        }
        out.push_str(&format!("   URL: {}\n\n", hit.url));
    }
    out
}
